use std::collections::BTreeMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{header, Method};
use tracing::debug;

use crate::{Error, Result};

/// Header name to all of its values.
pub type Headers = BTreeMap<String, Vec<String>>;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

// shared by every call, reqwest pools connections internally
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

#[derive(Debug, Clone, Default)]
pub struct Request {
  pub method: String,
  pub url: String,
  pub headers: Headers,
  pub data_to_send: Option<Vec<u8>>,
}

impl Request {
  pub fn get(url: impl Into<String>) -> Self {
    Self {
      method: "GET".into(),
      url: url.into(),
      ..Default::default()
    }
  }

  #[cfg(test)]
  pub fn post(url: impl Into<String>, data_to_send: Option<Vec<u8>>) -> Self {
    Self {
      method: "POST".into(),
      url: url.into(),
      data_to_send,
      ..Default::default()
    }
  }

  pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
    self
      .headers
      .entry(name.to_string())
      .or_default()
      .push(value.into());
    self
  }
}

#[derive(Debug, Clone, Default)]
pub struct Response {
  pub code: u16,
  pub message: String,
  pub headers: Headers,
  pub body: String,
  pub latest_url: String,
}

impl Response {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.code)
  }
}

#[async_trait]
pub trait Downloader: Send + Sync {
  async fn execute(&self, request: Request) -> Result<Response>;
}

/// Downloader backed by the process-wide reqwest client.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

#[async_trait]
impl Downloader for HttpDownloader {
  async fn execute(&self, request: Request) -> Result<Response> {
    let Request {
      method,
      url,
      headers,
      data_to_send,
    } = request;

    let method = Method::from_bytes(method.as_bytes())
      .map_err(|_| Error::InvalidMethod(method.clone()))?;
    debug!(%method, %url, "executing request");

    let has_content_type = headers
      .keys()
      .any(|name| name.eq_ignore_ascii_case(header::CONTENT_TYPE.as_str()));

    let mut builder = HTTP_CLIENT.request(method.clone(), &url);

    // only the first value of each header is forwarded
    for (name, values) in &headers {
      if let Some(value) = values.first() {
        builder = builder.header(name.as_str(), value.as_str());
      }
    }

    if method == Method::POST {
      builder = match data_to_send {
        Some(data) if !has_content_type => builder
          .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
          .body(data),
        Some(data) => builder.body(data),
        None => builder.body(Vec::new()),
      };
    }

    let response = builder.send().await?;

    let status = response.status();
    let latest_url = response.url().to_string();
    let mut headers = Headers::new();
    for (name, value) in response.headers() {
      headers
        .entry(name.as_str().to_owned())
        .or_default()
        .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    let body = response.text().await?;

    debug!(code = status.as_u16(), %latest_url, "request finished");

    Ok(Response {
      code: status.as_u16(),
      message: status.canonical_reason().unwrap_or_default().to_string(),
      headers,
      body,
      latest_url,
    })
  }
}
