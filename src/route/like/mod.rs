use aide::axum::{routing::post_with, ApiRouter};

use crate::AppState;

pub mod model;
pub mod route;

pub type RouteError = crate::route::post::RouteError;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/:id", post_with(toggle_like, toggle_like_docs))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_toggle_like_twice_restores_state() {
		let app = app();
		let alice = register(&app, "alice").await;
		let bob = register(&app, "bob").await;
		let post = create_post(&app, &alice, json!({ "title": "a", "content": "." })).await;
		let id = post["id"].as_str().unwrap();

		let like = app.post(&format!("/like/{id}")).add_cookie(bob.clone()).await.json::<Value>();

		assert_eq!(like["liked"], true);
		assert_eq!(like["total_likes"], 1);

		let like = app.post(&format!("/like/{id}")).add_cookie(alice.clone()).await.json::<Value>();

		assert_eq!(like["total_likes"], 2);

		let detail = app.get(&format!("/post/{id}")).add_cookie(bob.clone()).await.json::<Value>();

		assert_eq!(detail["liked"], true);
		assert_eq!(detail["post"]["total_likes"], 2);

		let like = app.post(&format!("/like/{id}")).add_cookie(bob.clone()).await.json::<Value>();

		assert_eq!(like["liked"], false);
		assert_eq!(like["total_likes"], 1);

		let detail = app.get(&format!("/post/{id}")).add_cookie(bob).await.json::<Value>();

		assert_eq!(detail["liked"], false);

		let detail = app.get(&format!("/post/{id}")).await.json::<Value>();

		assert_eq!(detail["liked"], false);
		assert_eq!(detail["post"]["total_likes"], 1);
	}

	#[tokio::test]
	async fn test_like_unknown_post() {
		let app = app();
		let alice = register(&app, "alice").await;

		let response = app
			.post(&format!("/like/{}", uuid::Uuid::new_v4()))
			.add_cookie(alice)
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[tokio::test]
	async fn test_like_requires_login() {
		let app = app();
		let alice = register(&app, "alice").await;
		let post = create_post(&app, &alice, json!({ "title": "a", "content": "." })).await;

		let response = app
			.post(&format!("/like/{}", post["id"].as_str().unwrap()))
			.await;

		assert_eq!(response.status_code(), 302);
	}
}
