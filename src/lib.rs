pub mod bridge;
pub mod config;
pub mod downloader;
mod error;
pub mod extractor;
pub mod module;
pub mod piped;
pub mod stream;

pub use error::{Error, Rejection, Result};
