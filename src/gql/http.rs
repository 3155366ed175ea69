//! `DataSource` backed by a GraphQL endpoint over HTTP.
use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Context;

use super::{
    AddFakeUsersData, DataSource, FetchError, GraphQlResponse, QueryBody, ReadOp, User,
    UserListView, WriteOp,
};

pub struct HttpDataSource {
    endpoint: String,
    client: Client,
}

impl HttpDataSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> crate::error::Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = ClientBuilder::new()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .with_ctx(|| "build http client".to_string())?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    fn post<V: Serialize, T: DeserializeOwned>(&self, body: &QueryBody<V>) -> Result<T, FetchError> {
        tracing::debug!(operation = body.operation_name, endpoint = %self.endpoint, "sending graphql request");
        let response = self
            .client
            .post(&self.endpoint)
            .json(body)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        // GraphQL servers often put a useful `errors` array on 4xx/5xx bodies.
        match serde_json::from_str::<GraphQlResponse<T>>(&text) {
            Ok(envelope) if status.is_success() || !envelope.errors.is_empty() => envelope.into_result(),
            Ok(_) => Err(FetchError::Status(status.as_u16())),
            Err(_) if !status.is_success() => Err(FetchError::Status(status.as_u16())),
            Err(e) => Err(FetchError::Decode(e.to_string())),
        }
    }
}

impl DataSource for HttpDataSource {
    fn all_users(&self) -> Result<UserListView, FetchError> {
        self.post(&ReadOp::AllUsers.body())
    }

    fn add_fake_users(&self, count: u32) -> Result<Vec<User>, FetchError> {
        let data: AddFakeUsersData = self.post(&WriteOp::AddFakeUsers { count }.body())?;
        Ok(data.add_fake_users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    /// Serve one canned HTTP response and hand back the request body.
    fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let trimmed = line.trim_end();
                if trimmed.is_empty() {
                    break;
                }
                if let Some((k, v)) = trimmed.split_once(':') {
                    if k.eq_ignore_ascii_case("content-length") {
                        content_length = v.trim().parse().unwrap();
                    }
                }
            }
            let mut buf = vec![0u8; content_length];
            reader.read_exact(&mut buf).unwrap();
            tx.send(String::from_utf8(buf).unwrap()).unwrap();
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();
        });
        (format!("http://{addr}/graphql"), rx)
    }

    #[test]
    fn all_users_posts_root_query_and_decodes() {
        let (url, rx) = serve_once(
            "200 OK",
            r#"{"data":{"totalUsers":1,"allUsers":[{"githubLogin":"ada","name":"Ada","avatar":"a.png"}]}}"#,
        );
        let source = HttpDataSource::new(url, Duration::from_secs(5)).unwrap();
        let view = source.all_users().unwrap();
        assert_eq!(view.total_users, 1);
        assert_eq!(view.all_users[0].name, "Ada");

        let sent: serde_json::Value = serde_json::from_str(&rx.recv().unwrap()).unwrap();
        assert_eq!(sent["operationName"], "allUsers");
    }

    #[test]
    fn add_fake_users_sends_count() {
        let (url, rx) = serve_once(
            "200 OK",
            r#"{"data":{"addFakeUsers":[{"githubLogin":"x1","name":"X","avatar":"x.png"}]}}"#,
        );
        let source = HttpDataSource::new(url, Duration::from_secs(5)).unwrap();
        let created = source.add_fake_users(1).unwrap();
        assert_eq!(created.len(), 1);

        let sent: serde_json::Value = serde_json::from_str(&rx.recv().unwrap()).unwrap();
        assert_eq!(sent["variables"]["count"], 1);
    }

    #[test]
    fn server_error_status_maps_to_status_error() {
        let (url, _rx) = serve_once("500 Internal Server Error", "oops");
        let source = HttpDataSource::new(url, Duration::from_secs(5)).unwrap();
        let err = source.all_users().unwrap_err();
        assert!(matches!(err, FetchError::Status(500)));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn graphql_errors_on_bad_request_are_surfaced() {
        let (url, _rx) = serve_once("400 Bad Request", r#"{"errors":[{"message":"unknown field"}]}"#);
        let source = HttpDataSource::new(url, Duration::from_secs(5)).unwrap();
        let err = source.all_users().unwrap_err();
        assert_eq!(err.to_string(), "unknown field");
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let source = HttpDataSource::new(format!("http://{addr}/graphql"), Duration::from_secs(2)).unwrap();
        assert!(matches!(source.all_users(), Err(FetchError::Transport(_))));
    }
}
