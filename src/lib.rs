pub mod config;
pub mod error;
pub mod outputs;
pub mod platform;
pub mod poll;
pub mod shutdown;
pub mod workflow;
