use std::{fmt, net::SocketAddr, str::FromStr};

use anyhow::{bail, Context};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PIPED_INSTANCE: &str = "pipedapi.kavin.rocks";

#[derive(Debug, Clone)]
pub struct Config {
  pub bind_addr: SocketAddr,
  pub piped_instance: String,
  pub localization: Localization,
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  fn from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
  ) -> anyhow::Result<Self> {
    // empty values are treated as unset
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let bind_addr = var("BIND_ADDR")
      .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
      .parse::<SocketAddr>()
      .context("invalid BIND_ADDR")?;

    let piped_instance = var("PIPED_INSTANCE")
      .unwrap_or_else(|| DEFAULT_PIPED_INSTANCE.to_string());

    let localization = match var("CONTENT_LOCALIZATION") {
      Some(s) => s
        .parse::<Localization>()
        .context("invalid CONTENT_LOCALIZATION")?,
      None => Localization::default(),
    };

    Ok(Self {
      bind_addr,
      piped_instance,
      localization,
    })
  }
}

/// Content language and country requested from the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
  pub language: String,
  pub country: Option<String>,
}

impl Default for Localization {
  fn default() -> Self {
    Self {
      language: "en".into(),
      country: Some("GB".into()),
    }
  }
}

impl FromStr for Localization {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> anyhow::Result<Self> {
    let mut parts = s.trim().splitn(2, ['-', '_']);
    let language = parts.next().unwrap_or_default();
    let country = parts.next();

    let is_alpha =
      |x: &str| !x.is_empty() && x.chars().all(|c| c.is_ascii_alphabetic());
    if !is_alpha(language) || !country.map_or(true, is_alpha) {
      bail!("expected language[-COUNTRY], got {s:?}");
    }

    Ok(Self {
      language: language.to_ascii_lowercase(),
      country: country.map(str::to_ascii_uppercase),
    })
  }
}

impl fmt::Display for Localization {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.country {
      Some(country) => write!(f, "{}-{}", self.language, country),
      None => f.write_str(&self.language),
    }
  }
}

#[cfg(test)]
mod test {
  use std::collections::HashMap;

  use super::*;

  fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
    let vars: HashMap<String, String> = vars
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
  }

  #[test]
  fn test_defaults() {
    let config = config_from(&[]).unwrap();
    assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
    assert_eq!(config.piped_instance, "pipedapi.kavin.rocks");
    assert_eq!(config.localization.to_string(), "en-GB");
  }

  #[test]
  fn test_overrides() {
    let config = config_from(&[
      ("BIND_ADDR", "127.0.0.1:3000"),
      ("PIPED_INSTANCE", "piped.example.org"),
      ("CONTENT_LOCALIZATION", "de_at"),
      ("UNRELATED", "x"),
    ])
    .unwrap();

    assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
    assert_eq!(config.piped_instance, "piped.example.org");
    assert_eq!(config.localization.to_string(), "de-AT");
  }

  #[test]
  fn test_invalid_values() {
    assert!(config_from(&[("BIND_ADDR", "nowhere")]).is_err());
    assert!(config_from(&[("CONTENT_LOCALIZATION", "en-")]).is_err());
    assert!(config_from(&[("CONTENT_LOCALIZATION", "e1")]).is_err());
  }

  #[test]
  fn test_language_only_localization() {
    let loc: Localization = "FR".parse().unwrap();
    assert_eq!(loc.country, None);
    assert_eq!(loc.to_string(), "fr");
  }
}
