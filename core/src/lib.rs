pub mod discovery;
pub mod error;
pub mod remote;
pub mod ssh_config;
pub mod tasks;

pub use error::{ProvisionError, Result};
