use aide::axum::IntoApiResponse;
use axum::{
	extract::State,
	http::{header, StatusCode},
	response::IntoResponse,
};
use macros::route;

use crate::{
	extract::{CatMenu, Json, Path, Query},
	openapi::tag,
	route::{
		model::{PageInput, PAGE_SIZE},
		post::list_posts,
	},
	store::{prelude::*, PostFilter},
	Store,
};

use super::{model, RouteError};

/// List categories
/// Returns every category.
#[route(tag = tag::CATEGORY)]
pub async fn categories(CatMenu(categories): CatMenu) -> Json<model::Categories> {
	Json(model::Categories { categories })
}

/// Get a category's posts
/// Returns a paginated response of the posts whose category is exactly the given label, newest first.
#[route(tag = tag::CATEGORY)]
pub async fn category_posts(
	State(store): State<Store>,
	CatMenu(cat_menu): CatMenu,
	Path(cats): Path<String>,
	Query(page): Query<PageInput>,
) -> Result<Json<model::CategoryListing>, RouteError> {
	let filter = PostFilter::default().category(cats.as_str());
	let posts = list_posts(&store, &filter, &page, PAGE_SIZE).await?;

	Ok(Json(model::CategoryListing {
		cats: model::title_case(&cats),
		posts,
		cat_menu,
	}))
}

/// Category form
/// Returns the existing categories for the category form.
#[route(tag = tag::CATEGORY)]
pub async fn add_category_form(CatMenu(categories): CatMenu) -> Json<model::Categories> {
	Json(model::Categories { categories })
}

/// Add category
/// Creates a new category.
#[route(tag = tag::CATEGORY, response(status = 201, description = "Created the category.", shape = "Json<model::Category>"))]
pub async fn add_category(
	State(store): State<Store>,
	Json(input): Json<model::CategoryInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let category = store.create_category(&input.name).await?;

	tracing::info!(category = %category, "added category");

	Ok((
		StatusCode::CREATED,
		[(header::LOCATION, "/categories")],
		Json(category),
	)
		.into_response())
}
