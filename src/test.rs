//! Helpers shared by the route tests.

use std::sync::Arc;

pub use axum_test::TestServer;
pub use serde_json::{json, Value};

pub(crate) use crate::session;
use crate::{config::Config, store::MemoryStore, State};

/// Builds the served application on an empty in-memory store, without rate limiting.
pub fn app() -> TestServer {
	let config = Config {
		rate_limit: false,
		..Config::default()
	};

	TestServer::new(crate::service(State::new(Arc::new(MemoryStore::new()), config)))
		.expect("failed to build test server")
}

/// Registers `username` with the email `<username>@example.com` and the
/// password `hunter2hunter`, returning their session cookie.
pub async fn register(app: &TestServer, username: &str) -> cookie::Cookie<'static> {
	let response = app
		.post("/auth/register")
		.json(&json!({
			"email": format!("{username}@example.com"),
			"username": username,
			"password": "hunter2hunter",
		}))
		.await;

	assert_eq!(response.status_code(), 200);

	response.cookie(session::COOKIE_NAME)
}

/// Creates a post as the owner of `cookie`, returning it.
pub async fn create_post(app: &TestServer, cookie: &cookie::Cookie<'static>, post: Value) -> Value {
	let response = app.post("/post/new").add_cookie(cookie.clone()).json(&post).await;

	assert_eq!(response.status_code(), 201);

	response.json()
}
