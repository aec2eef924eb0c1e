//! Remote existence client: asks a peer's read-by-id endpoint.
//!
//! Only the status code matters; the response body is never read.

use std::fmt::Display;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{Existence, ExistenceCheck};

/// HTTP existence client for one resource of one peer service
/// (`GET {base_url}/{resource}/{id}`).
///
/// Cloning shares the underlying connection pool; the client carries no
/// per-call state and is safe to use from concurrent requests.
#[derive(Debug, Clone)]
pub struct HttpExistenceClient {
    client: reqwest::Client,
    base_url: String,
    resource: &'static str,
}

impl HttpExistenceClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, resource: &'static str) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            resource,
        }
    }

    /// Client for a Student service's `/students/{id}`.
    pub fn students(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self::new(client, base_url, "students")
    }

    /// Client for a Course service's `/courses/{id}`.
    pub fn courses(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self::new(client, base_url, "courses")
    }

    pub fn url_for(&self, id: impl Display) -> String {
        format!("{}/{}/{}", self.base_url, self.resource, id)
    }

    /// `true` only for a 2xx answer; absence, error statuses and transport
    /// failures are all `false`.
    pub async fn exists(&self, id: impl Display) -> bool {
        self.probe(id).await.exists()
    }

    async fn probe(&self, id: impl Display) -> Existence {
        let url = self.url_for(id);
        match self.client.get(&url).send().await {
            Ok(resp) => {
                let existence = classify_status(resp.status());
                tracing::debug!(%url, status = %resp.status(), ?existence, "existence probe");
                existence
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "existence probe failed");
                Existence::Unknown(format!("transport error: {e}"))
            }
        }
    }
}

/// Interpret a read-by-id status as an existence answer.
pub fn classify_status(status: StatusCode) -> Existence {
    if status.is_success() {
        Existence::Exists
    } else if status == StatusCode::NOT_FOUND {
        Existence::Absent
    } else {
        Existence::Unknown(format!("unexpected status {status}"))
    }
}

#[async_trait]
impl<Id> ExistenceCheck<Id> for HttpExistenceClient
where
    Id: Display + Send + 'static,
{
    async fn check(&self, id: Id) -> Existence {
        self.probe(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode as AxumStatus, routing::get, Router};
    use ums_core::StudentId;

    async fn stub_student(Path(id): Path<i64>) -> AxumStatus {
        match id {
            1 => AxumStatus::OK,
            500 => AxumStatus::INTERNAL_SERVER_ERROR,
            400 => AxumStatus::BAD_REQUEST,
            _ => AxumStatus::NOT_FOUND,
        }
    }

    async fn spawn_peer() -> String {
        let app = Router::new().route("/students/:id", get(stub_student));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[test]
    fn status_classification() {
        assert_eq!(classify_status(StatusCode::OK), Existence::Exists);
        assert_eq!(classify_status(StatusCode::NO_CONTENT), Existence::Exists);
        assert_eq!(classify_status(StatusCode::NOT_FOUND), Existence::Absent);
        assert!(matches!(classify_status(StatusCode::BAD_GATEWAY), Existence::Unknown(_)));
        assert!(matches!(classify_status(StatusCode::UNAUTHORIZED), Existence::Unknown(_)));
    }

    #[test]
    fn url_drops_trailing_slash() {
        let c = HttpExistenceClient::courses(reqwest::Client::new(), "http://courses:8082/");
        assert_eq!(c.url_for(10), "http://courses:8082/courses/10");
    }

    #[tokio::test]
    async fn answers_follow_peer_status() {
        let base = spawn_peer().await;
        let client = HttpExistenceClient::students(reqwest::Client::new(), base);

        assert_eq!(client.check(StudentId::new(1)).await, Existence::Exists);
        assert_eq!(client.check(StudentId::new(2)).await, Existence::Absent);
        assert!(matches!(client.check(StudentId::new(500)).await, Existence::Unknown(_)));

        // The boolean contract collapses everything but 2xx.
        assert!(client.exists(1).await);
        assert!(!client.exists(2).await);
        assert!(!client.exists(500).await);
        assert!(!client.exists(400).await);
    }

    #[tokio::test]
    async fn unreachable_peer_is_unknown() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpExistenceClient::students(reqwest::Client::new(), format!("http://{addr}"));
        let answer = client.check(StudentId::new(1)).await;
        assert!(matches!(answer, Existence::Unknown(reason) if reason.starts_with("transport error")));
        assert!(!client.exists(1).await);
    }
}
