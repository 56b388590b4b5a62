//! Domain logic - pure release rules independent of git and remote hosts

pub mod branch;
pub mod snapshot;
pub mod target;

pub use branch::BranchContext;
pub use snapshot::RepositorySnapshot;
pub use target::ReleaseTarget;
