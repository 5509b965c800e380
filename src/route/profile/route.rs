use axum::extract::State;
use macros::route;

use crate::{
	extract::{CatMenu, Json, Path, Query, Session},
	openapi::tag,
	route::{
		category::model::title_case,
		model::{PageInput, PAGE_SIZE},
		post::list_posts,
	},
	store::{prelude::*, PostFilter},
	Store,
};

use super::{model, RouteError};

/// Get own posts
/// Returns a paginated response of your posts, newest first, and the categories you have posted in.
#[route(tag = tag::PROFILE)]
pub async fn profile(
	State(store): State<Store>,
	session: Session,
	CatMenu(cat_menu): CatMenu,
	Query(page): Query<PageInput>,
) -> Result<Json<model::ProfileListing>, RouteError> {
	let filter = PostFilter::default().author(session.user.id);
	let posts = list_posts(&store, &filter, &page, PAGE_SIZE).await?;
	let user_categories = store.author_categories(session.user.id).await?;

	Ok(Json(model::ProfileListing {
		cats: None,
		posts,
		user_categories: model::distinct_categories(user_categories),
		cat_menu,
	}))
}

/// Get own posts in a category
/// Returns a paginated response of your posts in a category, newest first, and the categories you have posted in.
#[route(tag = tag::PROFILE)]
pub async fn profile_category(
	State(store): State<Store>,
	session: Session,
	CatMenu(cat_menu): CatMenu,
	Path(cats): Path<String>,
	Query(page): Query<PageInput>,
) -> Result<Json<model::ProfileListing>, RouteError> {
	let filter = PostFilter::default()
		.author(session.user.id)
		.category(cats.as_str());
	let posts = list_posts(&store, &filter, &page, PAGE_SIZE).await?;
	let user_categories = store.author_categories(session.user.id).await?;

	Ok(Json(model::ProfileListing {
		cats: Some(title_case(&cats)),
		posts,
		user_categories: model::distinct_categories(user_categories),
		cat_menu,
	}))
}
