//! HTTP client for the task collection endpoint.
//!
//! The server keeps the whole collection under one key and exposes it as
//! `GET /tasks` returning `{ "tasks": [...] }` and `POST /tasks` accepting
//! the same shape. Deployments that require a shared secret read it from the
//! `x-api-key` header.

use super::{RemoteError, RemoteStore};
use crate::model::Task;
use async_trait::async_trait;
use log::*;
use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Deserialize)]
struct TasksEnvelope {
    #[serde(default)]
    tasks: Option<Vec<Task>>,
}

#[derive(Serialize)]
struct TasksPayload<'a> {
    tasks: &'a [Task],
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Reads and writes the task collection over HTTP.
///
pub struct HttpStore {
    base_url: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl HttpStore {
    /// Returns a new instance for the given base URL and optional shared
    /// secret.
    ///
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self, RemoteError> {
        Ok(HttpStore {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.map(str::to_owned),
            http_client: reqwest::Client::builder().build()?,
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let url = format!("{}/tasks", self.base_url);
        let request = self.http_client.request(method, &url);
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    /// Turn a non-success response into an API error, using the body's
    /// `error` field as message when present.
    ///
    async fn check(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("Unable to read response"));
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) => text,
        };
        error!("Task endpoint failed with status {}: {}", status, message);
        Err(RemoteError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn get(&self) -> Result<Option<Vec<Task>>, RemoteError> {
        debug!("Requesting task collection from {}...", self.base_url);
        let response = Self::check(self.request(Method::GET).send().await?).await?;
        let bytes = response.bytes().await?;
        let envelope: TasksEnvelope = serde_json::from_slice(&bytes)?;
        Ok(envelope.tasks)
    }

    async fn set(&self, tasks: &[Task]) -> Result<(), RemoteError> {
        debug!(
            "Sending {} tasks to {}...",
            tasks.len(),
            self.base_url
        );
        let request = self.request(Method::POST).json(&TasksPayload { tasks });
        Self::check(request.send().await?).await?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("http {}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::uuid::UUIDv4;
    use fake::{Fake, Faker};
    use httpmock::MockServer;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn get_success() -> Result<(), RemoteError> {
        let key: Uuid = UUIDv4.fake();
        let tasks: Vec<Task> = vec![Faker.fake(), Faker.fake()];

        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/tasks")
                    .header(API_KEY_HEADER, &key.to_string());
                then.status(200).json_body(json!({ "tasks": tasks }));
            })
            .await;

        let store = HttpStore::new(&server.base_url(), Some(&key.to_string()))?;
        assert_eq!(store.get().await?, Some(tasks));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn get_nothing_stored() -> Result<(), RemoteError> {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/tasks");
                then.status(200).json_body(json!({ "tasks": null }));
            })
            .await;

        let store = HttpStore::new(&format!("{}/", server.base_url()), None)?;
        assert_eq!(store.get().await?, None);
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn get_server_error() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/tasks");
                then.status(500)
                    .json_body(json!({ "error": "Failed to load tasks" }));
            })
            .await;

        let store = HttpStore::new(&server.base_url(), None).unwrap();
        match store.get().await {
            Err(RemoteError::ApiError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Failed to load tasks");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_malformed_body() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/tasks");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let store = HttpStore::new(&server.base_url(), None).unwrap();
        assert!(matches!(
            store.get().await,
            Err(RemoteError::Deserialization(_))
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn set_success() -> Result<(), RemoteError> {
        let key: Uuid = UUIDv4.fake();
        let tasks: Vec<Task> = vec![Faker.fake()];

        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/tasks")
                    .header(API_KEY_HEADER, &key.to_string())
                    .json_body(json!({ "tasks": tasks }));
                then.status(200).json_body(json!({ "ok": true }));
            })
            .await;

        let store = HttpStore::new(&server.base_url(), Some(&key.to_string()))?;
        store.set(&tasks).await?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn set_unauthorized() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/tasks");
                then.status(401).json_body(json!({ "error": "Unauthorized" }));
            })
            .await;

        let store = HttpStore::new(&server.base_url(), Some("wrong")).unwrap();
        match store.set(&[]).await {
            Err(RemoteError::ApiError { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthorized");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        mock.assert_async().await;
    }
}
