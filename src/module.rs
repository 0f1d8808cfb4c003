//! The bridge-facing module: every operation flattens the extractor's object
//! graph into plain serializable values, or rejects with a code and the
//! upstream message.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::{
  error::{Rejection, INVALID_ARGUMENTS, UNKNOWN_METHOD},
  extractor::StreamingService,
  stream::{thumbnail_url, AudioStream, InfoItem, InfoType, VideoStream},
};

pub const EXTRACTION_ERROR: &str = "EXTRACTION_ERROR";
pub const ID_EXTRACTION_ERROR: &str = "ID_EXTRACTION_ERROR";
pub const AUDIO_EXTRACTION_ERROR: &str = "AUDIO_EXTRACTION_ERROR";
pub const SEARCH_ERROR: &str = "SEARCH_ERROR";
pub const RELATED_VIDEOS_ERROR: &str = "RELATED_VIDEOS_ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
  GetStreamInfo,
  GetVideoId,
  GetAudioStreamInfo,
  SearchYoutube,
  GetRelatedVideos,
}

impl Method {
  fn from_name(name: &str) -> Option<Self> {
    match name {
      "getStreamInfo" => Some(Self::GetStreamInfo),
      "getVideoId" => Some(Self::GetVideoId),
      "getAudioStreamInfo" => Some(Self::GetAudioStreamInfo),
      "searchYoutube" => Some(Self::SearchYoutube),
      "getRelatedVideos" => Some(Self::GetRelatedVideos),
      _ => None,
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfoResult {
  pub title: String,
  pub uploader_name: String,
  pub description: String,
  pub view_count: i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub thumbnail_url: Option<String>,
  pub video_streams: Vec<VideoStreamResult>,
  pub audio_streams: Vec<AudioStreamResult>,
}

#[derive(Debug, Serialize)]
pub struct VideoStreamResult {
  pub url: String,
  pub resolution: String,
  pub format: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStreamResult {
  pub url: String,
  pub average_bitrate: i32,
  pub format: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStreamInfoResult {
  pub title: String,
  pub uploader_name: String,
  pub duration: u64,
  pub audio_streams: Vec<AudioStreamDetail>,
  pub metadata: StreamMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStreamDetail {
  pub url: String,
  pub average_bitrate: i32,
  pub format: String,
  pub bandwidth: i32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub codec: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamMetadata {
  pub category: String,
  pub start_position: u64,
  pub stream_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
  pub title: String,
  pub url: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub thumbnail_url: Option<String>,
}

impl From<VideoStream> for VideoStreamResult {
  fn from(stream: VideoStream) -> Self {
    Self {
      format: stream.format.name().to_string(),
      url: stream.url,
      resolution: stream.resolution,
    }
  }
}

impl From<AudioStream> for AudioStreamResult {
  fn from(stream: AudioStream) -> Self {
    Self {
      format: stream.format.name().to_string(),
      url: stream.url,
      average_bitrate: stream.average_bitrate,
    }
  }
}

impl From<AudioStream> for AudioStreamDetail {
  fn from(stream: AudioStream) -> Self {
    Self {
      format: stream.format.name().to_string(),
      codec: stream.format.audio_codec(),
      url: stream.url,
      average_bitrate: stream.average_bitrate,
      bandwidth: stream.bitrate,
    }
  }
}

// only stream items are reported, channels and playlists are dropped
fn search_results(items: Vec<InfoItem>) -> Vec<SearchResult> {
  items
    .into_iter()
    .filter(|item| item.info_type == InfoType::Stream)
    .map(|item| SearchResult {
      thumbnail_url: thumbnail_url(&item.thumbnails).map(str::to_string),
      title: item.name,
      url: item.url,
    })
    .collect()
}

pub struct NewPipeModule<S> {
  service: S,
}

impl<S: StreamingService> NewPipeModule<S> {
  pub const NAME: &'static str = "NewPipeModule";

  pub fn new(service: S) -> Self {
    Self { service }
  }

  pub async fn get_stream_info(
    &self,
    url: &str,
  ) -> Result<StreamInfoResult, Rejection> {
    let info = self
      .service
      .stream_info(url)
      .await
      .map_err(Rejection::with_code(EXTRACTION_ERROR))?;

    Ok(StreamInfoResult {
      thumbnail_url: thumbnail_url(&info.thumbnails).map(str::to_string),
      title: info.name,
      uploader_name: info.uploader_name,
      description: info.description,
      view_count: info.view_count,
      video_streams: info.video_streams.into_iter().map(Into::into).collect(),
      audio_streams: info.audio_streams.into_iter().map(Into::into).collect(),
    })
  }

  pub fn get_video_id(&self, url: &str) -> Result<String, Rejection> {
    self
      .service
      .video_id(url)
      .map_err(Rejection::with_code(ID_EXTRACTION_ERROR))
  }

  pub async fn get_audio_stream_info(
    &self,
    url: &str,
  ) -> Result<AudioStreamInfoResult, Rejection> {
    let info = self
      .service
      .stream_info(url)
      .await
      .map_err(Rejection::with_code(AUDIO_EXTRACTION_ERROR))?;

    Ok(AudioStreamInfoResult {
      title: info.name,
      uploader_name: info.uploader_name,
      duration: info.duration,
      audio_streams: info.audio_streams.into_iter().map(Into::into).collect(),
      metadata: StreamMetadata {
        category: info.category,
        start_position: info.start_position,
        stream_type: info.stream_type.to_string(),
      },
    })
  }

  pub async fn search_youtube(
    &self,
    query: &str,
  ) -> Result<Vec<SearchResult>, Rejection> {
    let items = self
      .service
      .search(query)
      .await
      .map_err(Rejection::with_code(SEARCH_ERROR))?;

    Ok(search_results(items))
  }

  pub async fn get_related_videos(
    &self,
    url: &str,
  ) -> Result<Vec<SearchResult>, Rejection> {
    let info = self
      .service
      .stream_info(url)
      .await
      .map_err(Rejection::with_code(RELATED_VIDEOS_ERROR))?;

    Ok(search_results(info.related_items))
  }

  /// Calls an operation by its bridge method name with positional
  /// arguments.
  pub async fn invoke(
    &self,
    method: &str,
    args: &[Value],
  ) -> Result<Value, Rejection> {
    let result = self.dispatch(method, args).await;
    if let Err(rejection) = &result {
      warn!(
        module = Self::NAME,
        method,
        code = rejection.code,
        "{}",
        rejection.message
      );
    }
    result
  }

  async fn dispatch(
    &self,
    method: &str,
    args: &[Value],
  ) -> Result<Value, Rejection> {
    let Some(call) = Method::from_name(method) else {
      return Err(Rejection::new(
        UNKNOWN_METHOD,
        format!("{} has no method {method}", Self::NAME),
      ));
    };

    let arg = args.first().and_then(Value::as_str).ok_or_else(|| {
      Rejection::new(
        INVALID_ARGUMENTS,
        format!("{method} expects a string argument"),
      )
    })?;

    match call {
      Method::GetStreamInfo => resolve(self.get_stream_info(arg).await),
      Method::GetVideoId => resolve(self.get_video_id(arg)),
      Method::GetAudioStreamInfo => {
        resolve(self.get_audio_stream_info(arg).await)
      }
      Method::SearchYoutube => resolve(self.search_youtube(arg).await),
      Method::GetRelatedVideos => resolve(self.get_related_videos(arg).await),
    }
  }
}

fn resolve<T: Serialize>(
  result: Result<T, Rejection>,
) -> Result<Value, Rejection> {
  let value = result?;
  serde_json::to_value(value)
    .map_err(|e| Rejection::with_code(EXTRACTION_ERROR)(e.into()))
}
