use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{
	error,
	extract::Session,
	route::model::{Page, PageInput},
	store::{self, prelude::*, PostFilter},
	AppState, Store,
};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("unknown user {0}")]
	UnknownUser(String),
	#[error("post {0} belongs to another user")]
	NotAuthor(Uuid),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", get_with(home, home_docs))
		.api_route("/user/:username", get_with(user_posts, user_posts_docs))
		.api_route(
			"/post/new",
			get_with(new_post_form, new_post_form_docs).post_with(create_post, create_post_docs),
		)
		.api_route("/post/:id", get_with(get_post, get_post_docs))
		.api_route(
			"/post/:id/update",
			get_with(update_post_form, update_post_form_docs)
				.post_with(update_post, update_post_docs),
		)
		.api_route(
			"/post/:id/delete",
			get_with(delete_post_form, delete_post_form_docs)
				.post_with(delete_post, delete_post_docs),
		)
		.api_route("/report/:id", post_with(report_post, report_post_docs))
}

/// Fetches one page of the posts matching `filter`, newest first.
pub async fn list_posts(
	store: &Store,
	filter: &PostFilter,
	input: &PageInput,
	size: i64,
) -> store::Result<Page<model::Post>> {
	let count = store.count_posts(filter).await?;
	let paginate = input.resolve(count, size);
	let posts = store.list_posts(filter, &paginate).await?;

	Ok(Page::new(posts, &paginate, count))
}

/// Fetches a post that the session's user is allowed to change.
pub async fn owned_post(store: &Store, id: Uuid, session: &Session) -> Result<model::Post, RouteError> {
	let post = store.post(id).await?.ok_or(Error::UnknownPost(id))?;

	if post.author_id != session.user.id {
		return Err(Error::NotAuthor(id).into());
	}

	Ok(post)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) | Self::UnknownUser(..) => StatusCode::NOT_FOUND,
			Self::NotAuthor(..) => StatusCode::FORBIDDEN,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownPost(post) => error::Message::new("unknown_post").detail("post", post.to_string()),
			Self::UnknownUser(user) => error::Message::new("unknown_user").detail("username", user.as_str()),
			Self::NotAuthor(post) => error::Message::new("not_author").detail("post", post.to_string()),
		}
		.into_vec()
	}
}
