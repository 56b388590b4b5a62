pub mod cli;
pub mod config;
pub mod dist;
pub mod domain;
pub mod eggs;
pub mod error;
pub mod git;
pub mod remote;
pub mod sanity;
pub mod system;
pub mod ui;
pub mod version;

pub use domain::ReleaseTarget;
pub use error::{Result, WagnerError};
pub use sanity::check_sanity;
pub use version::resolve_version;
