use super::{DocumentStore, Fields, Snapshot, Watch};
use crate::errors::AppError;
use crate::helper;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

const DEFAULT_COLLECTION: &str = "contacts";
const DEFAULT_POLL: Duration = Duration::from_millis(2000);

/// Client for a hosted JSON document store.
///
/// The store speaks plain REST: `GET/POST` on the collection,
/// `GET/PUT/DELETE` on a document, a map of id to document as the
/// collection representation, and an ordered range query via
/// `orderBy`/`startAt`/`endBefore` parameters. An API key, when
/// configured, rides along as a query parameter.
///
/// The store's own change-push protocol is not exposed over REST, so the
/// live subscription is emulated: a background task re-fetches the
/// collection on an interval and delivers a snapshot only when the set
/// actually changed.
#[derive(Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    api_key: Option<String>,
    poll_interval: Duration,
}

impl RestStore {
    pub fn new(base_url: &str, collection: &str) -> Result<Self, AppError> {
        if !helper::is_valid_url(base_url) {
            return Err(AppError::Validation("Not a valid base URL".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            api_key: None,
            poll_interval: DEFAULT_POLL,
        })
    }

    /// Reads `REMOTE_STORE_URL` (required), `REMOTE_COLLECTION`,
    /// `REMOTE_API_KEY` and `REMOTE_POLL_MS` from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = helper::get_env_value_by_key("REMOTE_STORE_URL")?;
        let collection = helper::get_env_value_by_key("REMOTE_COLLECTION")
            .unwrap_or(DEFAULT_COLLECTION.to_string());

        let mut store = Self::new(&base_url, &collection)?;
        store.api_key = helper::get_env_value_by_key("REMOTE_API_KEY").ok();

        if let Ok(ms) = helper::get_env_value_by_key("REMOTE_POLL_MS") {
            let ms: u64 = ms
                .parse()
                .map_err(|_| AppError::Validation("REMOTE_POLL_MS must be a number".to_string()))?;
            store.poll_interval = Duration::from_millis(ms);
        }

        Ok(store)
    }

    pub fn poll_every(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.collection)
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, id)
    }

    fn keyed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.query(&[("apiKey", key)]),
            None => req,
        }
    }

    /// Fetches the whole collection as a map of id to document.
    async fn load_all(&self) -> Result<HashMap<String, Fields>, AppError> {
        let res = self.keyed(self.client.get(self.collection_url())).send().await?;
        let res = res.error_for_status()?;

        Ok(res.json().await?)
    }
}

fn snapshot_of(docs: &HashMap<String, Fields>) -> Snapshot {
    docs.iter()
        .map(|(id, fields)| (id.clone(), fields.clone()))
        .collect()
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn get(&self, id: &str) -> Result<Option<Fields>, AppError> {
        let res = self.keyed(self.client.get(self.document_url(id))).send().await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let res = res.error_for_status()?;
        Ok(Some(res.json().await?))
    }

    async fn add(&self, fields: Fields) -> Result<String, AppError> {
        let res = self
            .keyed(self.client.post(self.collection_url()))
            .json(&fields)
            .send()
            .await?;
        let res = res.error_for_status()?;

        let res_map: HashMap<String, String> = res.json().await?;
        res_map
            .get("id")
            .cloned()
            .ok_or(AppError::NotFound("id in create response".to_string()))
    }

    async fn set(&self, id: &str, fields: Fields) -> Result<(), AppError> {
        let res = self
            .keyed(self.client.put(self.document_url(id)))
            .json(&fields)
            .send()
            .await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Document".to_string()));
        }

        res.error_for_status()?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = self
            .keyed(self.client.delete(self.document_url(id)))
            .send()
            .await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Document".to_string()));
        }

        res.error_for_status()?;
        Ok(())
    }

    async fn range(&self, field: &str, start: &str, end: &str) -> Result<Snapshot, AppError> {
        let res = self
            .keyed(self.client.get(self.collection_url()))
            .query(&[("orderBy", field), ("startAt", start), ("endBefore", end)])
            .send()
            .await?;
        let res = res.error_for_status()?;

        let docs: HashMap<String, Fields> = res.json().await?;
        let mut matches = snapshot_of(&docs);

        // The collection representation is a map, so re-sort by the
        // ordering field on this side.
        matches.sort_by(|(_, a), (_, b)| a.get(field).cmp(&b.get(field)));
        Ok(matches)
    }

    async fn watch(&self) -> Result<Watch, AppError> {
        let mut last = self.load_all().await?;
        let (tx, rx) = watch::channel(snapshot_of(&last));

        let store = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(store.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // immediate first tick

            loop {
                ticker.tick().await;

                match store.load_all().await {
                    Ok(current) => {
                        if current != last {
                            last = current;
                            if tx.send(snapshot_of(&last)).is_err() {
                                break; // subscriber closed the watch
                            }
                        }
                    }
                    // Transient poll failure: the last delivered snapshot
                    // stands until the next successful fetch.
                    Err(err) => log::debug!("contact collection poll failed: {}", err),
                }
            }
        });

        Ok(Watch::with_task(rx, task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn doc(name: &str, email: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("fullName".to_string(), name.to_string());
        fields.insert("email".to_string(), email.to_string());
        fields.insert("phoneNumber".to_string(), "555-0100".to_string());
        fields
    }

    #[tokio::test]
    async fn get_fetches_document_from_remote() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/contacts/abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"fullName":"Ana Li","email":"ana@x.com","phoneNumber":"555-0100"}"#)
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "contacts").unwrap();
        let fields = store.get("abc123").await.unwrap().unwrap();

        assert_eq!(fields.get("fullName").map(String::as_str), Some("Ana Li"));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn get_missing_document_is_absent() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/contacts/ghost")
            .with_status(404)
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "contacts").unwrap();
        assert!(store.get("ghost").await.unwrap().is_none());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn add_returns_store_assigned_id() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/contacts")
            .match_body(Matcher::Json(serde_json::json!({
                "fullName": "Ana Li",
                "email": "ana@x.com",
                "phoneNumber": "555-0100"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"abc123"}"#)
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "contacts").unwrap();
        let id = store.add(doc("Ana Li", "ana@x.com")).await.unwrap();

        assert_eq!(id, "abc123");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn set_on_unknown_id_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("PUT", "/contacts/ghost")
            .with_status(404)
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "contacts").unwrap();
        let err = store.set("ghost", doc("Ana Li", "ana@x.com")).await.unwrap_err();

        assert!(err.is_not_found());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn range_sends_prefix_bounds() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/contacts")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("orderBy".to_string(), "fullName".to_string()),
                Matcher::UrlEncoded("startAt".to_string(), "Ana".to_string()),
                Matcher::UrlEncoded("endBefore".to_string(), "Ana\u{f8ff}".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "id2":{"fullName":"Anaïs","email":"anais@x.com","phoneNumber":"555-0101"},
                    "id1":{"fullName":"Ana Li","email":"ana@x.com","phoneNumber":"555-0100"}
                }"#,
            )
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "contacts").unwrap();
        let matches = store.range("fullName", "Ana", "Ana\u{f8ff}").await.unwrap();

        let names: Vec<&str> = matches
            .iter()
            .map(|(_, fields)| fields.get("fullName").unwrap().as_str())
            .collect();
        assert_eq!(names, vec!["Ana Li", "Anaïs"]);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn api_key_rides_along_as_query_param() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("DELETE", "/contacts/abc123")
            .match_query(Matcher::UrlEncoded("apiKey".to_string(), "sekret".to_string()))
            .with_status(200)
            .create_async()
            .await;

        let mut store = RestStore::new(&server.url(), "contacts").unwrap();
        store.api_key = Some("sekret".to_string());

        store.delete("abc123").await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn watch_starts_from_the_current_collection() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/contacts")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id1":{"fullName":"Ana Li","email":"ana@x.com","phoneNumber":"555-0100"}}"#)
            .create_async()
            .await;

        let store = RestStore::new(&server.url(), "contacts")
            .unwrap()
            .poll_every(Duration::from_secs(3600));
        let watch = store.watch().await.unwrap();

        let snapshot = watch.current();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, "id1");

        watch.close();
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(RestStore::new("not a url", "contacts").is_err());
    }
}
