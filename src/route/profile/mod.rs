use aide::axum::{routing::get_with, ApiRouter};

use crate::AppState;

pub mod model;
pub mod route;

pub type RouteError = crate::route::post::RouteError;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", get_with(profile, profile_docs))
		.api_route("/:cats", get_with(profile_category, profile_category_docs))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_profile_lists_own_posts() {
		let app = app();
		let alice = register(&app, "alice").await;
		let bob = register(&app, "bob").await;

		for category in ["rust", "go", "rust"] {
			create_post(&app, &alice, json!({ "title": category, "category": category, "content": "." })).await;
		}

		create_post(&app, &bob, json!({ "title": "bob", "category": "bob", "content": "." })).await;

		let page = app.get("/profile").add_cookie(alice).await.json::<Value>();

		assert_eq!(page["posts"]["count"], 3);
		assert_eq!(page["user_categories"], json!(["rust", "go"]));
		assert!(page.get("cats").is_none());
	}

	#[tokio::test]
	async fn test_profile_category() {
		let app = app();
		let alice = register(&app, "alice").await;
		let bob = register(&app, "bob").await;
		create_post(&app, &alice, json!({ "title": "a", "category": "rust", "content": "." })).await;
		create_post(&app, &alice, json!({ "title": "b", "category": "go", "content": "." })).await;
		create_post(&app, &bob, json!({ "title": "c", "category": "rust", "content": "." })).await;

		let page = app.get("/profile/rust").add_cookie(alice).await.json::<Value>();

		assert_eq!(page["cats"], "Rust");
		assert_eq!(page["posts"]["count"], 1);
		assert_eq!(page["posts"]["items"][0]["title"], "a");
		assert_eq!(page["user_categories"], json!(["go", "rust"]));
	}

	#[tokio::test]
	async fn test_profile_requires_login() {
		let app = app();

		let response = app.get("/profile").await;

		assert_eq!(response.status_code(), 302);
		assert_eq!(
			response.header("location").to_str().unwrap(),
			"/auth/login?next=/profile"
		);
	}

	#[tokio::test]
	async fn test_login_redirect_keeps_full_path_and_query() {
		let app = app();

		let response = app.get("/profile/rust").add_query_param("page", 2).await;

		assert_eq!(response.status_code(), 302);
		assert_eq!(
			response.header("location").to_str().unwrap(),
			"/auth/login?next=/profile/rust%3Fpage%3D2"
		);
	}

	#[tokio::test]
	async fn test_profile_with_trailing_slash() {
		let app = app();
		let cookie = register(&app, "alice").await;
		create_post(&app, &cookie, json!({ "title": "a", "category": "rust", "content": "." })).await;

		let response = app.get("/profile/").add_cookie(cookie.clone()).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["posts"]["count"], 1);

		let response = app.get("/profile/rust/").add_cookie(cookie).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["cats"], "Rust");
	}
}
