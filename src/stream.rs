use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamInfo {
  pub id: String,
  pub url: String,
  pub name: String,
  pub uploader_name: String,
  pub description: String,
  pub view_count: i64,
  /// seconds
  pub duration: u64,
  pub thumbnails: Vec<Image>,
  pub video_streams: Vec<VideoStream>,
  pub audio_streams: Vec<AudioStream>,
  pub related_items: Vec<InfoItem>,
  pub category: String,
  /// seconds into the stream requested by the URL
  pub start_position: u64,
  pub stream_type: StreamType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
  pub url: String,
}

/// Url of the first thumbnail, unless it is blank.
pub fn thumbnail_url(thumbnails: &[Image]) -> Option<&str> {
  thumbnails
    .first()
    .map(|image| image.url.as_str())
    .filter(|url| !url.is_empty())
}

/// A stream carrying both video and audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStream {
  pub url: String,
  pub resolution: String,
  pub format: MediaFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStream {
  pub url: String,
  /// kbps
  pub average_bitrate: i32,
  /// bits per second
  pub bitrate: i32,
  pub format: MediaFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaFormat {
  Mpeg4,
  V3gpp,
  Webm,
  M4a,
  Webma,
  Mp3,
  Opus,
  Ogg,
  WebmaOpus,
  Other(String),
}

impl MediaFormat {
  pub fn from_name(name: &str) -> Self {
    match name {
      "MPEG_4" => Self::Mpeg4,
      "v3GPP" => Self::V3gpp,
      "WEBM" => Self::Webm,
      "M4A" => Self::M4a,
      "WEBMA" => Self::Webma,
      "MP3" => Self::Mp3,
      "OPUS" => Self::Opus,
      "OGG" => Self::Ogg,
      "WEBMA_OPUS" => Self::WebmaOpus,
      other => Self::Other(other.to_string()),
    }
  }

  pub fn name(&self) -> &str {
    match self {
      Self::Mpeg4 => "MPEG_4",
      Self::V3gpp => "v3GPP",
      Self::Webm => "WEBM",
      Self::M4a => "M4A",
      Self::Webma => "WEBMA",
      Self::Mp3 => "MP3",
      Self::Opus => "OPUS",
      Self::Ogg => "OGG",
      Self::WebmaOpus => "WEBMA_OPUS",
      Self::Other(name) => name,
    }
  }

  /// Best-effort audio codec guess from the container.
  pub fn audio_codec(&self) -> Option<&'static str> {
    match self {
      Self::M4a => Some("aac"),
      Self::Webma | Self::WebmaOpus | Self::Opus => Some("opus"),
      Self::Mp3 => Some("mp3"),
      Self::Ogg => Some("vorbis"),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamType {
  #[default]
  None,
  VideoStream,
  AudioStream,
  LiveStream,
  AudioLiveStream,
  PostLiveStream,
  PostLiveAudioStream,
}

impl fmt::Display for StreamType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::None => "NONE",
      Self::VideoStream => "VIDEO_STREAM",
      Self::AudioStream => "AUDIO_STREAM",
      Self::LiveStream => "LIVE_STREAM",
      Self::AudioLiveStream => "AUDIO_LIVE_STREAM",
      Self::PostLiveStream => "POST_LIVE_STREAM",
      Self::PostLiveAudioStream => "POST_LIVE_AUDIO_STREAM",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoType {
  Stream,
  Channel,
  Playlist,
}

/// An entry of a search result or a related-items list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoItem {
  pub info_type: InfoType,
  pub name: String,
  pub url: String,
  pub thumbnails: Vec<Image>,
}
