//! Remote GraphQL protocol client.
//!
//! # Architecture
//!
//! - Hand-written query documents (see [`queries`]) posted with `reqwest`;
//!   responses parsed through `graphql_client`'s response envelope
//! - The remote source is authoritative; the stores layer local fallback
//!   behavior on top of this client, never inside it
//! - Product and category list responses are cached in-memory via `moka`
//!   (5 minute TTL)
//!
//! The [`RemoteApi`] trait is the seam between the stores and the wire:
//! production code uses [`GraphqlApi`], tests substitute a scripted fake.

mod client;
pub mod queries;

pub use client::GraphqlApi;

use async_trait::async_trait;
use thiserror::Error;

use shopsync_core::{AuthTokens, Category, CreateUserInput, Product, UpdateUserInput, User};

/// Operations the synchronization layer issues against the remote source.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// List all products.
    async fn products(&self) -> Result<Vec<Product>, ApiError>;

    /// Delete a product by id; returns the backend's success flag.
    async fn delete_product(&self, id: &str) -> Result<bool, ApiError>;

    /// List all categories.
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;

    /// Exchange credentials for a token pair.
    async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, ApiError>;

    /// Create a user; does not authenticate.
    async fn register(&self, input: &CreateUserInput) -> Result<User, ApiError>;

    /// Exchange a refresh token for a new token pair.
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, ApiError>;

    /// Fetch the profile of the bearer of `access_token`.
    async fn profile(&self, access_token: &str) -> Result<User, ApiError>;

    /// Update a user's profile fields.
    async fn update_user(&self, id: &str, changes: &UpdateUserInput) -> Result<User, ApiError>;
}

/// Errors that can occur when talking to the remote source.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (transport, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response carried neither data nor errors.
    #[error("No data in response")]
    NoData,
}

/// A GraphQL error returned by the remote source.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field not found".to_string(),
                locations: vec![],
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                locations: vec![],
                path: vec![],
            },
        ];
        let err = ApiError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("products".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = ApiError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: products.0 at line 5:10"
        );
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ApiError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }
}
