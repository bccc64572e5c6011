//! GraphQL client implementation over `reqwest`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use graphql_client::Response;
use moka::sync::Cache;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

use shopsync_core::{AuthTokens, Category, CreateUserInput, Product, UpdateUserInput, User};

use super::{ApiError, GraphQLError, GraphQLErrorLocation, RemoteApi, queries};
use crate::config::ClientConfig;

const CACHE_CAPACITY: u64 = 100;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

const PRODUCTS_CACHE_KEY: &str = "products";
const CATEGORIES_CACHE_KEY: &str = "categories";

/// Cached list responses.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Vec<Product>),
    Categories(Vec<Category>),
}

/// Client for the remote GraphQL source.
///
/// Product and category listings are cached for 5 minutes; mutations
/// invalidate the affected entry.
#[derive(Clone)]
pub struct GraphqlApi {
    inner: Arc<GraphqlApiInner>,
}

struct GraphqlApiInner {
    client: reqwest::Client,
    endpoint: String,
    cache: Cache<String, CacheValue>,
}

impl GraphqlApi {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .build()?;
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(GraphqlApiInner {
                client,
                endpoint: config.api_endpoint.to_string(),
                cache,
            }),
        })
    }

    /// Execute a GraphQL document.
    async fn execute<D: DeserializeOwned>(
        &self,
        document: &str,
        variables: serde_json::Value,
        access_token: Option<&str>,
    ) -> Result<D, ApiError> {
        let mut request = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("Content-Type", "application/json")
            .json(&json!({ "query": document, "variables": variables }));

        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Remote source returned non-success status"
            );
            return Err(ApiError::GraphQL(vec![GraphQLError {
                message: format!(
                    "HTTP {status}: {}",
                    response_text.chars().take(200).collect::<String>()
                ),
                locations: vec![],
                path: vec![],
            }]));
        }

        let response: Response<D> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse GraphQL response"
                );
                return Err(ApiError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");

            return Err(ApiError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or(ApiError::NoData)
    }
}

#[async_trait]
impl RemoteApi for GraphqlApi {
    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(PRODUCTS_CACHE_KEY) {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let data: queries::ProductsData = self
            .execute(
                &queries::with_product_fields(queries::GET_PRODUCTS),
                json!({}),
                None,
            )
            .await?;

        self.inner.cache.insert(
            PRODUCTS_CACHE_KEY.to_string(),
            CacheValue::Products(data.products.clone()),
        );

        Ok(data.products)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_product(&self, id: &str) -> Result<bool, ApiError> {
        let data: queries::DeleteProductData = self
            .execute(queries::DELETE_PRODUCT, json!({ "id": id }), None)
            .await?;

        self.inner.cache.invalidate(PRODUCTS_CACHE_KEY);

        Ok(data.delete_product)
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(CATEGORIES_CACHE_KEY)
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let data: queries::CategoriesData = self
            .execute(queries::GET_CATEGORIES, json!({}), None)
            .await?;

        self.inner.cache.insert(
            CATEGORIES_CACHE_KEY.to_string(),
            CacheValue::Categories(data.categories.clone()),
        );

        Ok(data.categories)
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, ApiError> {
        let data: queries::LoginData = self
            .execute(
                queries::LOGIN,
                json!({ "email": email, "password": password }),
                None,
            )
            .await?;

        Ok(data.login)
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn register(&self, input: &CreateUserInput) -> Result<User, ApiError> {
        let data: queries::RegisterData = self
            .execute(queries::REGISTER, json!({ "data": input }), None)
            .await?;

        Ok(data.add_user)
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, ApiError> {
        let data: queries::RefreshTokenData = self
            .execute(
                queries::REFRESH_TOKEN,
                json!({ "refreshToken": refresh_token }),
                None,
            )
            .await?;

        Ok(data.refresh_token)
    }

    #[instrument(skip(self, access_token))]
    async fn profile(&self, access_token: &str) -> Result<User, ApiError> {
        let data: queries::MyProfileData = self
            .execute(queries::MY_PROFILE, json!({}), Some(access_token))
            .await?;

        Ok(data.my_profile)
    }

    #[instrument(skip(self, changes), fields(id = %id))]
    async fn update_user(&self, id: &str, changes: &UpdateUserInput) -> Result<User, ApiError> {
        let data: queries::UpdateUserData = self
            .execute(
                queries::UPDATE_USER,
                json!({ "id": id, "changes": changes }),
                None,
            )
            .await?;

        Ok(data.update_user)
    }
}
