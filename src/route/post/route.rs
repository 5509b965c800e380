use aide::axum::IntoApiResponse;
use axum::{
	extract::State,
	http::{header, StatusCode},
	response::{IntoResponse, Redirect},
};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{CatMenu, Json, OptionalSession, Path, Query, Session},
	openapi::tag,
	route::model::{HOME_PAGE_SIZE, PAGE_SIZE},
	store::{prelude::*, PostFilter},
	Store,
};

use super::{list_posts, model, owned_post, Error, RouteError};

/// Get all posts
/// Returns a paginated response of all posts, newest first, along with the category menu.
#[route(tag = tag::POST)]
pub async fn home(
	State(store): State<Store>,
	CatMenu(cat_menu): CatMenu,
	Query(page): Query<model::PageInput>,
) -> Result<Json<model::Listing>, RouteError> {
	let posts = list_posts(&store, &PostFilter::default(), &page, HOME_PAGE_SIZE).await?;

	Ok(Json(model::Listing { posts, cat_menu }))
}

/// Get a user's posts
/// Returns a paginated response of the posts written by a user, newest first.
#[route(tag = tag::POST)]
pub async fn user_posts(
	State(store): State<Store>,
	CatMenu(cat_menu): CatMenu,
	Path(username): Path<String>,
	Query(page): Query<model::PageInput>,
) -> Result<Json<model::UserListing>, RouteError> {
	let user = store
		.user_by_username(&username)
		.await?
		.ok_or(Error::UnknownUser(username))?;

	let filter = PostFilter::default().author(user.id);
	let posts = list_posts(&store, &filter, &page, PAGE_SIZE).await?;

	Ok(Json(model::UserListing {
		username: user.username,
		posts,
		cat_menu,
	}))
}

/// Get single post
/// Returns a single post by its unique id, and whether the requesting user likes it.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(store): State<Store>,
	CatMenu(cat_menu): CatMenu,
	OptionalSession(session): OptionalSession,
	Path(post_id): Path<Uuid>,
) -> Result<Json<model::PostDetail>, RouteError> {
	let post = store.post(post_id).await?.ok_or(Error::UnknownPost(post_id))?;

	let liked = match session {
		Some(session) => store.contains_like(post.id, session.user.id).await?,
		None => false,
	};

	Ok(Json(model::PostDetail {
		post,
		liked,
		cat_menu,
	}))
}

/// Post form
/// Returns the context needed to create a new post.
#[route(tag = tag::POST)]
pub async fn new_post_form(_session: Session, CatMenu(cat_menu): CatMenu) -> Json<model::PostForm> {
	Json(model::PostForm {
		post: None,
		cat_menu,
	})
}

/// Create post
/// Creates a new post authored by the authenticated user.
#[route(tag = tag::POST, response(status = 201, description = "Created the post.", shape = "Json<model::Post>"))]
pub async fn create_post(
	State(store): State<Store>,
	session: Session,
	Json(input): Json<model::PostInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = store.create_post(session.user.id, &input).await?;

	tracing::info!(post = %post, id = %post.id, author = %session.user.username, "created post");

	Ok((
		StatusCode::CREATED,
		[(header::LOCATION, post.url())],
		Json(post),
	)
		.into_response())
}

/// Update form
/// Returns the context needed to edit a post. Only available to its author.
#[route(tag = tag::POST)]
pub async fn update_post_form(
	State(store): State<Store>,
	session: Session,
	CatMenu(cat_menu): CatMenu,
	Path(post_id): Path<Uuid>,
) -> Result<Json<model::PostForm>, RouteError> {
	let post = owned_post(&store, post_id, &session).await?;

	Ok(Json(model::PostForm {
		post: Some(post),
		cat_menu,
	}))
}

/// Update post
/// Replaces the title and content of a post, and its category when one is given. Only available to its author.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(store): State<Store>,
	session: Session,
	Path(post_id): Path<Uuid>,
	Json(input): Json<model::PostUpdate>,
) -> Result<Json<model::Post>, RouteError> {
	owned_post(&store, post_id, &session).await?;

	let post = store
		.update_post(post_id, &input)
		.await?
		.ok_or(Error::UnknownPost(post_id))?;

	tracing::info!(post = %post, id = %post.id, "updated post");

	Ok(Json(post))
}

/// Delete form
/// Returns the post to confirm its deletion. Only available to its author.
#[route(tag = tag::POST)]
pub async fn delete_post_form(
	State(store): State<Store>,
	session: Session,
	CatMenu(cat_menu): CatMenu,
	Path(post_id): Path<Uuid>,
) -> Result<Json<model::PostForm>, RouteError> {
	let post = owned_post(&store, post_id, &session).await?;

	Ok(Json(model::PostForm {
		post: Some(post),
		cat_menu,
	}))
}

/// Delete post
/// Deletes a post and redirects to the home page. Only available to its author.
#[route(tag = tag::POST, response(status = 303, description = "Deleted the post."))]
pub async fn delete_post(
	State(store): State<Store>,
	session: Session,
	Path(post_id): Path<Uuid>,
) -> Result<impl IntoApiResponse, RouteError> {
	owned_post(&store, post_id, &session).await?;

	if !store.delete_post(post_id).await? {
		return Err(Error::UnknownPost(post_id).into());
	}

	tracing::info!(id = %post_id, "deleted post");

	Ok(Redirect::to("/").into_response())
}

/// Report post
/// Reports a post and redirects back to it. Reports are not recorded yet.
#[route(tag = tag::POST, response(status = 303, description = "Redirect to the post."))]
pub async fn report_post(
	State(store): State<Store>,
	Path(post_id): Path<Uuid>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = store.post(post_id).await?.ok_or(Error::UnknownPost(post_id))?;

	Ok(Redirect::to(&post.url()).into_response())
}
