//! Async HTTP client for the Hacker News item API.

use std::time::Duration;

use hnvault_core::{Item, ItemId, source::ItemSource};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::trace;

/// Public base URL of the item API.
pub const DEFAULT_API_URL: &str = "https://hacker-news.firebaseio.com";

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("GET {url} → {status}")]
  Status { status: StatusCode, url: String },
}

/// Connection settings for the item API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

/// Read-only client for `/v0/item/<id>.json` and `/v0/maxitem.json`.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HnClient {
  client: Client,
  config: ClientConfig,
}

impl HnClient {
  pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/v0{}", self.config.base_url.trim_end_matches('/'), path)
  }

  async fn get_json<T>(&self, path: &str) -> Result<T, ClientError>
  where
    T: serde::de::DeserializeOwned,
  {
    let url = self.url(path);
    trace!(%url, "GET");
    let resp = self.client.get(&url).send().await?;

    if !resp.status().is_success() {
      return Err(ClientError::Status { status: resp.status(), url });
    }
    Ok(resp.json().await?)
  }
}

impl ItemSource for HnClient {
  type Error = ClientError;

  /// The API answers `null` for ids it does not know; a 404 means the same.
  async fn get_item(&self, id: ItemId) -> Result<Option<Item>, ClientError> {
    match self.get_json(&format!("/item/{id}.json")).await {
      Err(ClientError::Status { status: StatusCode::NOT_FOUND, .. }) => Ok(None),
      other => other,
    }
  }

  async fn get_max_item_id(&self) -> Result<ItemId, ClientError> {
    self.get_json("/maxitem.json").await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use hnvault_core::{Crawler, CrawlerConfig, ItemKind, store::ArchiveStore};
  use hnvault_store_sqlite::SqliteStore;
  use serde_json::json;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
  };

  fn client_for(server: &MockServer) -> HnClient {
    HnClient::new(ClientConfig {
      base_url: server.uri(),
      timeout:  Duration::from_secs(5),
    })
    .unwrap()
  }

  async fn mount_json(server: &MockServer, at: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
      .and(path(at))
      .respond_with(ResponseTemplate::new(200).set_body_json(body))
      .mount(server)
      .await;
  }

  #[tokio::test]
  async fn get_item_decodes_story() {
    let server = MockServer::start().await;
    mount_json(
      &server,
      "/v0/item/8863.json",
      json!({
        "by": "dhouston", "descendants": 71, "id": 8863, "score": 111,
        "time": 1175714200, "title": "My YC app: Dropbox", "type": "story",
        "url": "http://www.getdropbox.com/u/2/screencast.html"
      }),
    )
    .await;

    let item = client_for(&server).get_item(8863).await.unwrap().unwrap();
    assert_eq!(item.kind, ItemKind::Story);
    assert_eq!(item.by.as_deref(), Some("dhouston"));
    assert_eq!(item.score, Some(111));
  }

  #[tokio::test]
  async fn null_body_is_not_found() {
    let server = MockServer::start().await;
    mount_json(&server, "/v0/item/1.json", serde_json::Value::Null).await;

    assert!(client_for(&server).get_item(1).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn missing_item_status_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/v0/item/1.json"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;

    assert!(client_for(&server).get_item(1).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn server_error_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/v0/item/2.json"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let err = client_for(&server).get_item(2).await.unwrap_err();
    assert!(matches!(
      err,
      ClientError::Status { status: StatusCode::INTERNAL_SERVER_ERROR, .. }
    ));
  }

  #[tokio::test]
  async fn malformed_body_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/v0/maxitem.json"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
      .mount(&server)
      .await;

    let err = client_for(&server).get_max_item_id().await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
  }

  #[tokio::test]
  async fn get_max_item_id() {
    let server = MockServer::start().await;
    mount_json(&server, "/v0/maxitem.json", json!(41234567)).await;

    assert_eq!(client_for(&server).get_max_item_id().await.unwrap(), 41234567);
  }

  #[tokio::test]
  async fn crawl_into_sqlite_store() {
    let server = MockServer::start().await;
    mount_json(&server, "/v0/maxitem.json", json!(4)).await;
    mount_json(
      &server,
      "/v0/item/1.json",
      json!({"by": "a", "id": 1, "score": 3, "time": 1700000000, "title": "One", "type": "story"}),
    )
    .await;
    mount_json(
      &server,
      "/v0/item/2.json",
      json!({"by": "b", "id": 2, "parent": 1, "text": "hi", "time": 1700000060, "type": "comment"}),
    )
    .await;
    mount_json(
      &server,
      "/v0/item/3.json",
      json!({"id": 3, "deleted": true, "parent": 1, "time": 1700000120, "type": "comment"}),
    )
    .await;
    mount_json(&server, "/v0/item/4.json", serde_json::Value::Null).await;

    let client = client_for(&server);
    let store = SqliteStore::open_in_memory().await.unwrap();
    let report = Crawler::new(&client, &store, CrawlerConfig::default())
      .fetch_new_items()
      .await
      .unwrap();

    assert_eq!(report.stories, 1);
    assert_eq!(report.comments, 1);
    assert_eq!(report.skipped_flagged, 1);
    assert_eq!(report.not_found, 1);
    assert_eq!(store.max_item_id().await.unwrap(), 2);

    let story = store.get_story(1).await.unwrap().unwrap();
    assert_eq!(story.title, "One");
    assert_eq!(story.time_str, "2023-11-14 22:13:20");
    let comment = store.get_comment(2).await.unwrap().unwrap();
    assert_eq!(comment.parent, 1);
  }

  #[tokio::test]
  async fn unreachable_item_does_not_stop_the_crawl() {
    let server = MockServer::start().await;
    mount_json(&server, "/v0/maxitem.json", json!(2)).await;
    Mock::given(method("GET"))
      .and(path("/v0/item/1.json"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;
    mount_json(
      &server,
      "/v0/item/2.json",
      json!({"id": 2, "time": 1700000000, "title": "Two", "type": "story"}),
    )
    .await;

    let client = client_for(&server);
    let store = SqliteStore::open_in_memory().await.unwrap();
    let report = Crawler::new(&client, &store, CrawlerConfig::default())
      .fetch_new_items()
      .await
      .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.stories, 1);
    assert_eq!(store.story_ids(None).await.unwrap(), vec![2]);
  }

  #[tokio::test]
  async fn missing_item_status_is_skipped_not_failed() {
    let server = MockServer::start().await;
    mount_json(&server, "/v0/maxitem.json", json!(1)).await;
    Mock::given(method("GET"))
      .and(path("/v0/item/1.json"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;

    let client = client_for(&server);
    let store = SqliteStore::open_in_memory().await.unwrap();
    let report = Crawler::new(&client, &store, CrawlerConfig::default())
      .fetch_new_items()
      .await
      .unwrap();

    assert_eq!(report.attempted, 1);
    assert_eq!(report.not_found, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(store.max_item_id().await.unwrap(), 0);
  }
}
