pub mod link_handler;
mod piped;

use async_trait::async_trait;

use crate::{
  stream::{InfoItem, StreamInfo},
  Result,
};

pub use piped::Piped;

/// A streaming site as seen through its extractor.
#[async_trait]
pub trait StreamingService: Send + Sync {
  fn video_id(&self, url: &str) -> Result<String> {
    link_handler::video_id(url)
  }

  async fn stream_info(&self, url: &str) -> Result<StreamInfo>;

  async fn search(&self, query: &str) -> Result<Vec<InfoItem>>;
}
