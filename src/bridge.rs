use std::sync::Arc;

use axum::{
  extract::{rejection::JsonRejection, Path, State},
  response::IntoResponse,
  routing::{get, post},
  Json, Router,
};
use serde_json::Value;

use crate::{
  config::Config,
  downloader::HttpDownloader,
  error::{Rejection, INVALID_ARGUMENTS},
  extractor::Piped,
  module::NewPipeModule,
  piped::PipedInstance,
};

pub fn router(config: Arc<Config>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/module/:method", post(invoke))
    .with_state(config)
}

async fn health() -> impl IntoResponse {
  "ok".to_owned()
}

#[axum::debug_handler(state = Arc<Config>)]
async fn invoke(
  Path(method): Path<String>,
  State(config): State<Arc<Config>>,
  piped: PipedInstance,
  args: Result<Json<Vec<Value>>, JsonRejection>,
) -> Result<Json<Value>, Rejection> {
  // the body must be a JSON array of positional arguments
  let Json(args) =
    args.map_err(|e| Rejection::new(INVALID_ARGUMENTS, e.body_text()))?;

  let service = Piped::new(piped, config.localization.clone(), HttpDownloader);
  let module = NewPipeModule::new(service);

  module.invoke(&method, &args).await.map(Json)
}

#[cfg(test)]
mod test {
  use std::net::SocketAddr;

  use serde_json::json;

  use super::*;

  async fn spawn_bridge() -> String {
    let config = Config {
      bind_addr: "127.0.0.1:0".parse().unwrap(),
      // never reached by the calls below
      piped_instance: "http://127.0.0.1:1".into(),
      localization: Default::default(),
    };

    let addr: SocketAddr = config.bind_addr;
    let server = axum::Server::bind(&addr)
      .serve(router(Arc::new(config)).into_make_service());
    let addr = server.local_addr();
    tokio::spawn(server);

    format!("http://{addr}")
  }

  #[tokio::test]
  async fn test_health() {
    let base = spawn_bridge().await;
    let body = reqwest::get(format!("{base}/health"))
      .await
      .unwrap()
      .text()
      .await
      .unwrap();
    assert_eq!(body, "ok");
  }

  #[tokio::test]
  async fn test_invoke_resolves() {
    let base = spawn_bridge().await;
    let resp = reqwest::Client::new()
      .post(format!("{base}/module/getVideoId"))
      .json(&json!(["https://youtu.be/dQw4w9WgXcQ"]))
      .send()
      .await
      .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.json::<Value>().await.unwrap(), json!("dQw4w9WgXcQ"));
  }

  #[tokio::test]
  async fn test_invoke_rejects() {
    let base = spawn_bridge().await;
    let client = reqwest::Client::new();

    let resp = client
      .post(format!("{base}/module/getComments"))
      .json(&json!(["https://youtu.be/dQw4w9WgXcQ"]))
      .send()
      .await
      .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.json::<Value>().await.unwrap()["code"], "UNKNOWN_METHOD");

    let resp = client
      .post(format!("{base}/module/getVideoId"))
      .json(&json!(["https://example.com/"]))
      .send()
      .await
      .unwrap();
    assert_eq!(resp.status(), 500);
    assert_eq!(
      resp.json::<Value>().await.unwrap(),
      json!({
        "code": "ID_EXTRACTION_ERROR",
        "message": "not a YouTube video URL: https://example.com/"
      })
    );

    // the instance is unreachable, so extraction fails with an I/O error
    let resp = client
      .post(format!("{base}/module/getStreamInfo"))
      .json(&json!(["https://youtu.be/dQw4w9WgXcQ"]))
      .send()
      .await
      .unwrap();
    assert_eq!(resp.status(), 500);
    assert_eq!(
      resp.json::<Value>().await.unwrap()["code"],
      "EXTRACTION_ERROR"
    );
  }

  #[tokio::test]
  async fn test_malformed_bodies_are_rejected() {
    let base = spawn_bridge().await;
    let url = format!("{base}/module/getVideoId");
    let client = reqwest::Client::new();

    let requests = [
      client.post(&url).json(&json!("https://youtu.be/dQw4w9WgXcQ")),
      client.post(&url).json(&json!({ "url": "https://youtu.be/dQw4w9WgXcQ" })),
      client
        .post(&url)
        .header("Content-Type", "application/json")
        .body("[not json"),
      client.post(&url),
    ];

    for request in requests {
      let resp = request.send().await.unwrap();
      assert_eq!(resp.status(), 400);

      let body = resp.json::<Value>().await.unwrap();
      assert_eq!(body["code"], "INVALID_ARGUMENTS");
      assert!(!body["message"].as_str().unwrap().is_empty());
    }
  }
}
