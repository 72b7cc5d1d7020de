mod application;
pub mod data;
mod prompt;
mod runtime_config;
mod scan_root;

pub use application::{Application, ApplicationError};
pub use runtime_config::RuntimeConfig;
