use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use crate::route::model::{Page, PageInput};
use crate::route::category::model::Category;

/// The category given to posts created without one.
pub const DEFAULT_CATEGORY: &str = "none";

fn default_category() -> String {
	DEFAULT_CATEGORY.into()
}

/// A single post, created by a user.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	pub id: Uuid,
	pub title: String,
	pub content: String,
	/// The creation time of the post.
	pub date_posted: chrono::DateTime<chrono::Utc>,
	/// The user that created the post, the only one allowed to change it.
	#[serde(skip)]
	pub author_id: Uuid,
	/// The username of the author.
	pub author: String,
	/// A free-text label. It does not have to match any existing category.
	pub category: String,
	/// Path to the header image, if one was uploaded.
	pub header_image: Option<String>,
	/// The number of users that like the post.
	pub total_likes: i64,
}

impl Post {
	pub fn url(&self) -> String {
		format!("/post/{}", self.id)
	}
}

impl fmt::Display for Post {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.title)
	}
}

/// The fields accepted when creating a post.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct PostInput {
	#[validate(length(min = 1, max = 100))]
	pub title: String,
	/// Defaults to `none`.
	#[serde(default = "default_category")]
	#[validate(length(min = 1, max = 100))]
	pub category: String,
	#[validate(length(min = 1))]
	pub content: String,
}

/// The fields accepted when updating a post.
///
/// A missing category leaves the stored one untouched.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct PostUpdate {
	#[validate(length(min = 1, max = 100))]
	pub title: String,
	#[validate(length(min = 1, max = 100))]
	pub category: Option<String>,
	#[validate(length(min = 1))]
	pub content: String,
}

/// A page of posts together with the category menu.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Listing {
	pub posts: Page<Post>,
	pub cat_menu: Vec<Category>,
}

/// A page of posts written by a single user.
#[derive(Debug, Serialize, JsonSchema)]
pub struct UserListing {
	pub username: String,
	pub posts: Page<Post>,
	pub cat_menu: Vec<Category>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PostDetail {
	pub post: Post,
	/// Whether the requesting user likes the post. Always `false` when anonymous.
	pub liked: bool,
	pub cat_menu: Vec<Category>,
}

/// Context for the create, update and delete forms.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PostForm {
	/// The post being edited or deleted, absent when creating one.
	pub post: Option<Post>,
	pub cat_menu: Vec<Category>,
}
