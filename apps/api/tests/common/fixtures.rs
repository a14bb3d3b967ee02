//! Test fixtures for API integration tests

#![allow(dead_code)]

use async_graphql::Variables;
use axum::Router;
use serde_json::Value;

use catalog_api::graphql::{build_schema, CatalogSchema};
use catalog_api::middleware::{AuthContext, AuthContextBuilder};
use catalog_api::models::User;
use catalog_api::repositories::Store;
use catalog_api::routes::{build_router, AppState};
use catalog_api::services::{AuthConfig, AuthService, CatalogService, HealthService};

/// JWT secret for testing (must be at least 32 characters)
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-integration-tests-minimum-32-chars";

/// Password given to fixture users
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// A fully wired catalog over one store
#[derive(Clone)]
pub struct TestApp {
    pub store: Store,
    pub auth: AuthService,
    pub catalog: CatalogService,
    pub schema: CatalogSchema,
}

impl TestApp {
    /// App over a fresh in-memory store
    pub fn new() -> Self {
        Self::with_store(Store::in_memory())
    }

    pub fn with_store(store: Store) -> Self {
        let auth = AuthService::new(store.users.clone(), AuthConfig::new(TEST_JWT_SECRET))
            .expect("auth service");
        let catalog = CatalogService::new(store.clone());
        let schema = build_schema(catalog.clone(), auth.clone());
        Self {
            store,
            auth,
            catalog,
            schema,
        }
    }

    /// The HTTP router, as served by the binary (minus CORS)
    pub fn router(&self) -> Router {
        build_router(AppState {
            schema: self.schema.clone(),
            auth_context: AuthContextBuilder::new(self.auth.clone(), self.store.users.clone()),
            health: HealthService::new(self.store.clone()),
        })
    }

    /// Register a user with [`TEST_PASSWORD`] and log them in
    pub async fn register(&self, username: &str) -> (User, String) {
        let user = self
            .auth
            .create_user(username, "refactoring", Some(TEST_PASSWORD))
            .await
            .expect("create user");
        let token = self
            .auth
            .login(username, TEST_PASSWORD)
            .await
            .expect("login");
        (user, token.value)
    }

    /// Execute a GraphQL document against the schema and return the JSON response
    pub async fn execute(&self, query: &str, variables: Value, auth: AuthContext) -> Value {
        let request = async_graphql::Request::new(query)
            .variables(Variables::from_json(variables))
            .data(auth);
        let response = self.schema.execute(request).await;
        serde_json::to_value(&response).expect("serializable response")
    }

    pub async fn execute_anonymous(&self, query: &str, variables: Value) -> Value {
        self.execute(query, variables, AuthContext::anonymous()).await
    }

    pub async fn execute_as(&self, user: &User, query: &str, variables: Value) -> Value {
        self.execute(query, variables, AuthContext::authenticated(user.clone()))
            .await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

pub const ADD_BOOK: &str = r#"
    mutation AddBook($title: String!, $published: Int!, $author: String!, $genres: [String]) {
        addBook(title: $title, published: $published, author: $author, genres: $genres) {
            id
            title
            published
            genres
            author { id name born }
        }
    }
"#;

pub const ALL_BOOKS: &str = r#"
    query AllBooks($author: String, $genre: String) {
        allBooks(author: $author, genre: $genre) {
            title
            genres
            author { name }
        }
    }
"#;

/// Seed books as `user`; each entry is (title, author, genres)
pub async fn seed_books(app: &TestApp, user: &User, books: &[(&str, &str, &[&str])]) {
    for (title, author, genres) in books {
        let response = app
            .execute_as(
                user,
                ADD_BOOK,
                serde_json::json!({
                    "title": title,
                    "published": 2000,
                    "author": author,
                    "genres": genres,
                }),
            )
            .await;
        assert!(
            response.get("errors").is_none(),
            "seeding {} failed: {}",
            title,
            response
        );
    }
}
