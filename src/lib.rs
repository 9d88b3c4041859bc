pub mod config;
pub mod demo;
pub mod discovery;
pub mod endpoint;
pub mod error;
pub mod inference;
pub mod server;

pub use error::{Error, Result};
