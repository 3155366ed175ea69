//! GraphQL operations used by the user directory.
//!
//! Holds the two operation documents, their variables and response shapes,
//! and the [`DataSource`] seam the request layer talks to.
//!
pub mod http;

use serde::{Deserialize, Serialize};

pub use http::HttpDataSource;

/// Read operation: total count plus every user.
pub const ROOT_QUERY: &str =
    "query allUsers {\n  totalUsers\n  allUsers {\n    githubLogin\n    name\n    avatar\n  }\n}\n";

/// Write operation: create `count` synthetic users and return them.
pub const ADD_FAKE_USERS_MUTATION: &str = "mutation addFakeUsers($count: Int!) {\n  addFakeUsers(count: $count) {\n    githubLogin\n    name\n    avatar\n  }\n}\n";

/// A user as returned by the service. `github_login` is the unique handle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub github_login: String,
    pub name: String,
    pub avatar: String,
}

/// Count and ordered list from one successful read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListView {
    pub total_users: u32,
    pub all_users: Vec<User>,
}

/// Reads the screen can issue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReadOp {
    AllUsers,
}

/// Writes the screen can issue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    AddFakeUsers { count: u32 },
}

/// JSON body POSTed to the GraphQL endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBody<V> {
    pub query: &'static str,
    pub operation_name: &'static str,
    pub variables: V,
}

#[derive(Debug, Default, Serialize)]
pub struct NoVariables {}

#[derive(Debug, Serialize)]
pub struct AddFakeUsersVariables {
    pub count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFakeUsersData {
    pub add_fake_users: Vec<User>,
}

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl ReadOp {
    pub fn body(self) -> QueryBody<NoVariables> {
        match self {
            ReadOp::AllUsers => QueryBody {
                query: ROOT_QUERY,
                operation_name: "allUsers",
                variables: NoVariables {},
            },
        }
    }
}

impl WriteOp {
    pub fn body(self) -> QueryBody<AddFakeUsersVariables> {
        match self {
            WriteOp::AddFakeUsers { count } => QueryBody {
                query: ADD_FAKE_USERS_MUTATION,
                operation_name: "addFakeUsers",
                variables: AddFakeUsersVariables { count },
            },
        }
    }
}

/// Failure of a remote call. The display text is what the viewer sees.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(String),
    #[error("Response not successful: Received status code {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("{0}")]
    GraphQl(String),
    #[error("response contained no data")]
    MissingData,
}

impl<T> GraphQlResponse<T> {
    /// Collapse the envelope: server errors win over partial data.
    pub fn into_result(self) -> Result<T, FetchError> {
        if !self.errors.is_empty() {
            let joined = self
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(FetchError::GraphQl(joined));
        }
        self.data.ok_or(FetchError::MissingData)
    }
}

/// The remote collaborator behind both operations.
pub trait DataSource: Send + Sync {
    fn all_users(&self) -> Result<UserListView, FetchError>;
    fn add_fake_users(&self, count: u32) -> Result<Vec<User>, FetchError>;

    fn read(&self, op: ReadOp) -> Result<UserListView, FetchError> {
        match op {
            ReadOp::AllUsers => self.all_users(),
        }
    }

    fn write(&self, op: WriteOp) -> Result<Vec<User>, FetchError> {
        match op {
            WriteOp::AddFakeUsers { count } => self.add_fake_users(count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_body_has_no_variables() {
        let v = serde_json::to_value(ReadOp::AllUsers.body()).unwrap();
        assert_eq!(v["operationName"], "allUsers");
        assert_eq!(v["variables"], serde_json::json!({}));
        assert!(v["query"].as_str().unwrap().contains("totalUsers"));
    }

    #[test]
    fn write_body_carries_count() {
        let v = serde_json::to_value(WriteOp::AddFakeUsers { count: 1 }.body()).unwrap();
        assert_eq!(v["operationName"], "addFakeUsers");
        assert_eq!(v["variables"]["count"], 1);
        assert!(v["query"].as_str().unwrap().contains("$count: Int!"));
    }

    #[test]
    fn envelope_prefers_errors_over_data() {
        let raw = r#"{"data":{"totalUsers":0,"allUsers":[]},"errors":[{"message":"boom"},{"message":"again"}]}"#;
        let resp: GraphQlResponse<UserListView> = serde_json::from_str(raw).unwrap();
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.to_string(), "boom; again");
    }

    #[test]
    fn envelope_without_data_is_an_error() {
        let resp: GraphQlResponse<UserListView> = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(matches!(resp.into_result(), Err(FetchError::MissingData)));
    }

    #[test]
    fn user_list_decodes_wire_names() {
        let raw = r#"{"totalUsers":1,"allUsers":[{"githubLogin":"ada","name":"Ada","avatar":"a.png"}]}"#;
        let view: UserListView = serde_json::from_str(raw).unwrap();
        assert_eq!(view.total_users, 1);
        assert_eq!(view.all_users[0].github_login, "ada");
    }
}
