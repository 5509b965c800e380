use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid username or password")]
	InvalidUsernameOrPassword,
	#[error("password validation error")]
	Argon(#[from] argon2::Error),
	#[error("login required")]
	LoginRequired { location: String },
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/login", post_with(login, login_docs))
		.api_route("/logout", get_with(logout, logout_docs))
		.api_route("/register", post_with(register, register_docs))
		.api_route(
			"/me",
			get_with(get_me, get_me_docs).delete_with(delete_me, delete_me_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidUsernameOrPassword => StatusCode::UNAUTHORIZED,
			Self::LoginRequired { .. } => StatusCode::FOUND,
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::UsernameTaken | Self::EmailTaken => StatusCode::CONFLICT,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		let message = match self {
			Self::InvalidUsernameOrPassword => "invalid_username_or_password",
			Self::Argon(..) => "internal_error",
			Self::LoginRequired { .. } => "login_required",
			Self::UsernameTaken => "username_taken",
			Self::EmailTaken => "email_taken",
		};

		let message = error::Message::new(message);

		match self {
			Self::LoginRequired { location } => message.detail("login", location.as_str()),
			Self::UsernameTaken => message.field("username"),
			Self::EmailTaken => message.field("email"),
			_ => message,
		}
		.into_vec()
	}

	fn headers(&self) -> HeaderMap {
		let mut headers = HeaderMap::new();

		if let Self::LoginRequired { location } = self {
			if let Ok(location) = HeaderValue::from_str(location) {
				headers.insert(header::LOCATION, location);
			}
		}

		headers
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_signup_flow() {
		let app = app();

		let response = app
			.post("/auth/register")
			.json(&json!({
				"email": "john@smith.com",
				"username": "john",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let cookie = response.cookie(session::COOKIE_NAME);
		let response = app.get("/auth/me").add_cookie(cookie).await;

		assert_eq!(response.status_code(), 200);

		assert_eq!(response.json::<Value>()["username"], "john");
	}

	#[tokio::test]
	async fn test_wrong_password() {
		let app = app();
		register(&app, "john").await;

		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@example.com",
				"password": "not-the-password",
			}))
			.await;

		assert_eq!(response.status_code(), 401);
	}

	#[tokio::test]
	async fn test_duplicate_username() {
		let app = app();
		register(&app, "john").await;

		let response = app
			.post("/auth/register")
			.json(&json!({
				"email": "other@example.com",
				"username": "john",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 409);
		assert_eq!(
			response.json::<Value>()["errors"][0]["content"],
			"username_taken"
		);
	}

	#[tokio::test]
	async fn test_logout_invalidates_session() {
		let app = app();
		let cookie = register(&app, "john").await;

		let response = app.get("/auth/logout").add_cookie(cookie.clone()).await;

		assert_eq!(response.status_code(), 204);

		let response = app.get("/auth/me").add_cookie(cookie).await;

		assert_eq!(response.status_code(), 302);
		assert_eq!(
			response.header("location").to_str().unwrap(),
			"/auth/login?next=/auth/me"
		);
	}

	#[tokio::test]
	async fn test_delete_account_removes_posts() {
		let app = app();
		let cookie = register(&app, "john").await;
		create_post(&app, &cookie, json!({ "title": "hello", "content": "world" })).await;

		let response = app.delete("/auth/me").add_cookie(cookie).await;

		assert_eq!(response.status_code(), 204);

		let response = app.get("/").await;

		assert_eq!(response.json::<Value>()["posts"]["count"], 0);
	}
}
