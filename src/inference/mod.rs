pub mod family;
pub mod handler;
pub mod prompt;
mod types;

pub use family::ModelFamily;
pub use handler::InferenceHandler;
pub use prompt::{TruncationBound, normalize};
pub use types::*;
