use aide::axum::{routing::get_with, ApiRouter};

use crate::AppState;

pub mod model;
pub mod route;

// Category routes only fail with shared errors
pub type RouteError = crate::route::post::RouteError;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/categories", get_with(categories, categories_docs))
		.api_route(
			"/categories/:cats",
			get_with(category_posts, category_posts_docs),
		)
		.api_route(
			"/add_category",
			get_with(add_category_form, add_category_form_docs)
				.post_with(add_category, add_category_docs),
		)
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_category_filter_is_case_sensitive() {
		let app = app();
		let alice = register(&app, "alice").await;
		create_post(&app, &alice, json!({ "title": "a", "category": "tech", "content": "." })).await;
		create_post(&app, &alice, json!({ "title": "b", "category": "food", "content": "." })).await;

		let page = app.get("/categories/Tech").await.json::<Value>();

		assert_eq!(page["cats"], "Tech");
		assert_eq!(page["posts"]["count"], 0);

		let page = app.get("/categories/tech").await.json::<Value>();

		assert_eq!(page["cats"], "Tech");
		assert_eq!(page["posts"]["count"], 1);
		assert_eq!(page["posts"]["items"][0]["title"], "a");
	}

	#[tokio::test]
	async fn test_category_listing_page_size() {
		let app = app();
		let alice = register(&app, "alice").await;

		for i in 0..6 {
			create_post(&app, &alice, json!({ "title": format!("{i}"), "category": "tech", "content": "." })).await;
		}

		let page = app.get("/categories/tech").await.json::<Value>();

		assert_eq!(page["posts"]["items"].as_array().unwrap().len(), 5);
		assert_eq!(page["posts"]["has_next"], true);
	}

	#[tokio::test]
	async fn test_add_category() {
		let app = app();

		let response = app
			.post("/add_category")
			.json(&json!({ "name": "Travel" }))
			.await;

		assert_eq!(response.status_code(), 201);
		assert_eq!(response.header("location").to_str().unwrap(), "/categories");

		let categories = app.get("/categories").await.json::<Value>();

		assert_eq!(categories["categories"][0]["name"], "Travel");

		let home = app.get("/").await.json::<Value>();

		assert_eq!(home["cat_menu"][0]["name"], "Travel");

		let response = app.post("/add_category").json(&json!({ "name": "" })).await;

		assert_eq!(response.status_code(), 400);
	}
}
