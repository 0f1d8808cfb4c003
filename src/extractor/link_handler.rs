use std::sync::LazyLock;

use http_types::Url;
use regex::Regex;

use crate::{Error, Result};

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

static VIDEO_ID_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

// 90, 90s, 1m30s, 1h2m3s
static TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s?)?$").unwrap()
});

pub fn watch_url(video_id: &str) -> String {
  format!("{YOUTUBE_BASE_URL}/watch?v={video_id}")
}

/// Turns a site-relative url such as `/watch?v=..` into an absolute one.
pub fn absolute_url(url: &str) -> String {
  if url.starts_with('/') {
    format!("{YOUTUBE_BASE_URL}{url}")
  } else {
    url.to_string()
  }
}

fn parse(url: &str) -> Option<Url> {
  let url = url.trim();
  if url.contains("://") {
    Url::parse(url).ok()
  } else {
    Url::parse(&format!("https://{url}")).ok()
  }
}

// lower-cased, without a leading `www.`
fn bare_host(host: &str) -> String {
  let host = host.to_ascii_lowercase();
  match host.strip_prefix("www.") {
    Some(bare) => bare.to_string(),
    None => host,
  }
}

fn is_youtube_host(host: &str) -> bool {
  matches!(
    host,
    "youtube.com"
      | "m.youtube.com"
      | "music.youtube.com"
      | "youtube-nocookie.com"
      | "youtu.be"
  )
}

fn find_video_id(url: &Url) -> Option<String> {
  let host = bare_host(url.host_str()?);
  if !is_youtube_host(&host) {
    return None;
  }

  let segments: Vec<&str> = url
    .path_segments()
    .map(|segments| segments.filter(|s| !s.is_empty()).collect())
    .unwrap_or_default();

  if host == "youtu.be" {
    return segments.first().map(|id| id.to_string());
  }

  match segments.as_slice() {
    ["watch"] => url
      .query_pairs()
      .find_map(|(k, v)| (k == "v").then(|| v.into_owned())),
    [prefix, id, ..]
      if matches!(*prefix, "shorts" | "embed" | "live" | "v") =>
    {
      Some(id.to_string())
    }
    _ => None,
  }
}

/// Canonical 11-character video id of a YouTube video URL.
pub fn video_id(url: &str) -> Result<String> {
  parse(url)
    .as_ref()
    .and_then(find_video_id)
    .filter(|id| VIDEO_ID_REGEX.is_match(id))
    .ok_or_else(|| Error::InvalidUrl(url.to_string()))
}

fn parse_timestamp(s: &str) -> Option<u64> {
  if s.is_empty() {
    return None;
  }

  let caps = TIMESTAMP_REGEX.captures(s)?;
  let part = |i: usize| {
    caps
      .get(i)
      .map_or(Some(0), |m| m.as_str().parse::<u64>().ok())
  };

  part(1)?
    .checked_mul(3600)?
    .checked_add(part(2)?.checked_mul(60)?)?
    .checked_add(part(3)?)
}

/// Position in seconds the URL asks playback to start at, 0 if none.
pub fn start_position(url: &str) -> u64 {
  let Some(url) = parse(url) else {
    return 0;
  };

  let from_query = url
    .query_pairs()
    .find(|(k, _)| k == "t" || k == "start")
    .map(|(_, v)| v.into_owned());

  let from_fragment = url
    .fragment()
    .and_then(|f| f.strip_prefix("t="))
    .map(str::to_string);

  from_query
    .or(from_fragment)
    .and_then(|t| parse_timestamp(&t))
    .unwrap_or(0)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_video_id() {
    let urls = [
      "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
      "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42",
      "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
      "https://music.youtube.com/watch?v=dQw4w9WgXcQ&list=RD",
      "https://youtu.be/dQw4w9WgXcQ?t=10",
      "https://www.youtu.be/dQw4w9WgXcQ",
      "https://www.youtube.com/shorts/dQw4w9WgXcQ",
      "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
      "https://www.youtube.com/live/dQw4w9WgXcQ?feature=share",
      "youtube.com/watch?v=dQw4w9WgXcQ",
    ];

    for url in urls {
      assert_eq!(video_id(url).unwrap(), "dQw4w9WgXcQ", "{url}");
    }
  }

  #[test]
  fn test_invalid_video_urls() {
    let urls = [
      "",
      "not a url",
      "https://vimeo.com/watch?v=dQw4w9WgXcQ",
      "https://www.youtube.com/watch?v=short",
      "https://www.youtube.com/channel/UC1yNl2E66ZzKApQdRuTQ4tw",
      "https://youtu.be/",
    ];

    for url in urls {
      let err = video_id(url).unwrap_err();
      assert_eq!(err.to_string(), format!("not a YouTube video URL: {url}"));
    }
  }

  #[test]
  fn test_start_position() {
    let base = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    assert_eq!(start_position(base), 0);
    assert_eq!(start_position(&format!("{base}&t=90")), 90);
    assert_eq!(start_position(&format!("{base}&t=90s")), 90);
    assert_eq!(start_position(&format!("{base}&t=1m30s")), 90);
    assert_eq!(start_position(&format!("{base}&start=3700")), 3700);
    assert_eq!(start_position(&format!("{base}#t=1h2m3s")), 3723);
    assert_eq!(start_position("https://youtu.be/dQw4w9WgXcQ?t=42"), 42);
    assert_eq!(start_position(&format!("{base}&t=soon")), 0);
    // too large to represent
    assert_eq!(start_position(&format!("{base}&t=9999999999999999h")), 0);
    assert_eq!(
      start_position(&format!("{base}&t=18446744073709551615m")),
      0
    );
  }

  #[test]
  fn test_absolute_url() {
    assert_eq!(
      absolute_url("/watch?v=dQw4w9WgXcQ"),
      watch_url("dQw4w9WgXcQ")
    );
    assert_eq!(absolute_url("https://a.b/c"), "https://a.b/c");
  }
}
