use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
  config::Localization,
  downloader::{Downloader, Request, Response},
  piped::PipedInstance,
  stream::{
    AudioStream, Image, InfoItem, InfoType, MediaFormat, StreamInfo,
    StreamType, VideoStream,
  },
  Error, Result,
};

use super::{link_handler, StreamingService};

const USER_AGENT: &str = "Mozilla/5.0";

/// Extraction delegated to a Piped API instance, fetched through a
/// [`Downloader`].
pub struct Piped<D> {
  instance: PipedInstance,
  localization: Localization,
  downloader: D,
}

impl<D: Downloader> Piped<D> {
  pub fn new(
    instance: PipedInstance,
    localization: Localization,
    downloader: D,
  ) -> Self {
    Self {
      instance,
      localization,
      downloader,
    }
  }

  async fn fetch<T: DeserializeOwned>(&self, url: String) -> Result<T> {
    let request = Request::get(url)
      .header("User-Agent", USER_AGENT)
      .header("Accept-Language", self.localization.to_string());

    let response = self.downloader.execute(request).await?;
    if !response.is_success() {
      return Err(piped_error(&response));
    }

    Ok(serde_json::from_str(&response.body)?)
  }
}

// Piped reports failures as `{"error": <stack trace>, "message": <reason>}`
fn piped_error(response: &Response) -> Error {
  #[derive(Deserialize)]
  struct PipedError {
    message: Option<String>,
    error: Option<String>,
  }

  serde_json::from_str::<PipedError>(&response.body)
    .ok()
    .and_then(|body| body.message.or(body.error))
    .filter(|message| !message.is_empty())
    .map(Error::Extraction)
    .unwrap_or_else(|| {
      Error::Extraction(format!("HTTP {} {}", response.code, response.message))
    })
}

#[async_trait]
impl<D: Downloader> StreamingService for Piped<D> {
  async fn stream_info(&self, url: &str) -> Result<StreamInfo> {
    let video_id = link_handler::video_id(url)?;
    let streams: PipedStreams =
      self.fetch(self.instance.stream_url(&video_id)).await?;

    let mut info = streams.into_stream_info(video_id);
    info.start_position = link_handler::start_position(url);
    Ok(info)
  }

  async fn search(&self, query: &str) -> Result<Vec<InfoItem>> {
    let url = self.instance.search_url(query)?;
    let search: PipedSearch = self.fetch(url).await?;

    Ok(
      search
        .items
        .into_iter()
        .filter_map(PipedItem::into_info_item)
        .collect(),
    )
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipedStreams {
  title: String,
  description: Option<String>,
  uploader: Option<String>,
  thumbnail_url: Option<String>,
  #[serde(default)]
  duration: i64,
  #[serde(default)]
  views: i64,
  category: Option<String>,
  #[serde(default)]
  livestream: bool,
  #[serde(default)]
  audio_streams: Vec<PipedStream>,
  #[serde(default)]
  video_streams: Vec<PipedStream>,
  #[serde(default)]
  related_streams: Vec<PipedItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipedStream {
  url: String,
  format: String,
  #[serde(default)]
  quality: String,
  #[serde(default)]
  bitrate: i32,
  #[serde(default)]
  video_only: bool,
}

#[derive(Debug, Deserialize)]
struct PipedSearch {
  #[serde(default)]
  items: Vec<PipedItem>,
}

#[derive(Debug, Deserialize)]
struct PipedItem {
  url: String,
  #[serde(rename = "type")]
  kind: String,
  // streams carry a title, channels and playlists a name
  title: Option<String>,
  name: Option<String>,
  thumbnail: Option<String>,
}

impl PipedStreams {
  fn into_stream_info(self, video_id: String) -> StreamInfo {
    let audio_streams: Vec<AudioStream> = self
      .audio_streams
      .into_iter()
      .map(PipedStream::into_audio_stream)
      .collect();

    // video-only representations are not playable on their own
    let video_streams: Vec<VideoStream> = self
      .video_streams
      .into_iter()
      .filter(|stream| !stream.video_only)
      .map(PipedStream::into_video_stream)
      .collect();

    let stream_type = if self.livestream {
      StreamType::LiveStream
    } else if video_streams.is_empty() && !audio_streams.is_empty() {
      StreamType::AudioStream
    } else {
      StreamType::VideoStream
    };

    StreamInfo {
      url: link_handler::watch_url(&video_id),
      id: video_id,
      name: self.title,
      uploader_name: self.uploader.unwrap_or_default(),
      description: self.description.unwrap_or_default(),
      view_count: self.views,
      duration: self.duration.max(0) as u64,
      thumbnails: images(self.thumbnail_url),
      video_streams,
      audio_streams,
      related_items: self
        .related_streams
        .into_iter()
        .filter_map(PipedItem::into_info_item)
        .collect(),
      category: self.category.unwrap_or_default(),
      start_position: 0,
      stream_type,
    }
  }
}

impl PipedStream {
  fn into_audio_stream(self) -> AudioStream {
    let average_bitrate =
      kbps_from_quality(&self.quality).unwrap_or(self.bitrate / 1000);

    AudioStream {
      url: self.url,
      average_bitrate,
      bitrate: self.bitrate,
      format: MediaFormat::from_name(&self.format),
    }
  }

  fn into_video_stream(self) -> VideoStream {
    VideoStream {
      url: self.url,
      resolution: self.quality,
      format: MediaFormat::from_name(&self.format),
    }
  }
}

impl PipedItem {
  fn into_info_item(self) -> Option<InfoItem> {
    let info_type = match self.kind.as_str() {
      "stream" => InfoType::Stream,
      "channel" => InfoType::Channel,
      "playlist" => InfoType::Playlist,
      _ => return None,
    };

    Some(InfoItem {
      info_type,
      name: self.title.or(self.name).unwrap_or_default(),
      url: link_handler::absolute_url(&self.url),
      thumbnails: images(self.thumbnail),
    })
  }
}

fn images(url: Option<String>) -> Vec<Image> {
  url.into_iter().map(|url| Image { url }).collect()
}

// "128 kbps" -> 128
fn kbps_from_quality(quality: &str) -> Option<i32> {
  quality.strip_suffix("kbps")?.trim().parse().ok()
}
