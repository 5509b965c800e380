use axum::extract::State;
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Path, Session},
	openapi::tag,
	route::post::Error,
	store::prelude::*,
	Store,
};

use super::{model, RouteError};

/// Toggle like
/// Likes the post if you do not like it yet, otherwise removes your like.
#[route(tag = tag::LIKE)]
pub async fn toggle_like(
	State(store): State<Store>,
	session: Session,
	Path(post_id): Path<Uuid>,
) -> Result<Json<model::LikeState>, RouteError> {
	let post = store.post(post_id).await?.ok_or(Error::UnknownPost(post_id))?;
	let user_id = session.user.id;

	let liked = if store.contains_like(post.id, user_id).await? {
		store.remove_like(post.id, user_id).await?;
		false
	} else {
		store.add_like(post.id, user_id).await?;
		true
	};

	let total_likes = store.count_likes(post.id).await?;

	tracing::info!(post = %post.id, user = %session.user.username, liked, "toggled like");

	Ok(Json(model::LikeState {
		post_id: post.id,
		liked,
		total_likes,
	}))
}
