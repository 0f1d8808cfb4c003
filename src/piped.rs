use std::{convert::Infallible, sync::Arc};

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts, Query};
use http_types::Url;
use serde::Deserialize;

use crate::{config::Config, Error, Result};

/// The Piped API instance extraction is delegated to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipedInstance {
  base_url: String,
}

impl PipedInstance {
  /// Accepts a bare domain (https is assumed) or a full base url.
  pub fn new(domain: &str) -> Self {
    let domain = domain.trim().trim_end_matches('/');
    let base_url = if domain.contains("://") {
      domain.to_string()
    } else {
      format!("https://{domain}")
    };

    Self { base_url }
  }

  pub fn stream_url(&self, video_id: &str) -> String {
    format!("{}/streams/{}", self.base_url, video_id)
  }

  pub fn search_url(&self, query: &str) -> Result<String> {
    let url = Url::parse_with_params(
      &format!("{}/search", self.base_url),
      &[("q", query), ("filter", "videos")],
    )
    .map_err(|e| Error::Extraction(format!("invalid Piped instance: {e}")))?;

    Ok(url.to_string())
  }
}

#[derive(Deserialize)]
struct PipedInstanceQuery {
  piped_instance: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for PipedInstance
where
  Arc<Config>: FromRef<S>,
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut http::request::Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    // extract &piped_instance=<value> from URL or use the configured instance.
    let instance =
      Query::<PipedInstanceQuery>::from_request_parts(parts, state)
        .await
        .map(|query| PipedInstance::new(&query.0.piped_instance))
        .unwrap_or_else(|_| {
          PipedInstance::new(&Arc::<Config>::from_ref(state).piped_instance)
        });

    Ok(instance)
  }
}
