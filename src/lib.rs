pub mod config;
pub mod coordinator;
pub mod error;
pub mod group;
pub mod kernel;
pub mod matrix;
pub mod matrix_io;
pub mod orchestrator;
pub mod worker;

pub use config::{FailureMode, RunConfig};
pub use coordinator::Coordinator;
pub use error::Error;
pub use group::{Group, LocalGroup};
pub use matrix::Matrix;
pub use orchestrator::{run, Role, RunReport};
pub use worker::Worker;
