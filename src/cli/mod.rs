pub mod orchestration;

pub use orchestration::{run_release, ReleaseArgs, ReleaseContext, ReleaseOutcome};
