use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

/// The like state of a post after a toggle.
#[derive(Debug, Serialize, JsonSchema)]
pub struct LikeState {
	pub post_id: Uuid,
	/// Whether the authenticated user now likes the post.
	pub liked: bool,
	pub total_likes: i64,
}
