//! Data access for users, sessions, categories, posts and likes.
//!
//! Handlers only see [`Repository`] through [`crate::Store`], so the Postgres
//! and in-memory backends are interchangeable.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use uuid::Uuid;

use crate::route::{
	auth::model::{Session, User},
	category::model::Category,
	model::Paginate,
	post::model::{Post, PostInput, PostUpdate},
};

/// Imports every repository trait so their methods can be called on [`crate::Store`].
pub mod prelude {
	pub use super::{
		CategoryRepository, LikeRepository, PostRepository, SessionRepository, UserRepository,
	};
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Narrows a post listing. Empty fields do not filter.
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
	pub author_id: Option<Uuid>,
	/// Compared with exact, case-sensitive equality.
	pub category: Option<String>,
}

impl PostFilter {
	#[must_use]
	pub fn author(mut self, author_id: Uuid) -> Self {
		self.author_id = Some(author_id);
		self
	}

	#[must_use]
	pub fn category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}

	pub fn matches(&self, author_id: Uuid, category: &str) -> bool {
		self.author_id.map_or(true, |id| id == author_id)
			&& self.category.as_deref().map_or(true, |c| c == category)
	}
}

/// A user that has not been stored yet. The password is already hashed.
#[derive(Debug)]
pub struct NewUser<'a> {
	pub id: Uuid,
	pub email: &'a str,
	pub username: &'a str,
	pub password: &'a [u8],
}

#[axum::async_trait]
pub trait UserRepository: Send + Sync {
	/// Creates the user together with their first session. Nothing is stored
	/// if either fails.
	///
	/// Fails with [`Error::UsernameTaken`] or [`Error::EmailTaken`] on conflicts.
	async fn create_user(&self, user: NewUser<'_>) -> Result<(User, Session)>;

	async fn user_by_email(&self, email: &str) -> Result<Option<User>>;

	async fn user_by_username(&self, username: &str) -> Result<Option<User>>;

	/// Deletes the user along with their sessions, posts and likes.
	async fn delete_user(&self, id: Uuid) -> Result<()>;
}

#[axum::async_trait]
pub trait SessionRepository: Send + Sync {
	async fn create_session(&self, user_id: Uuid) -> Result<Session>;

	async fn session_user(&self, session_id: Uuid) -> Result<Option<User>>;

	async fn delete_session(&self, session_id: Uuid) -> Result<()>;
}

#[axum::async_trait]
pub trait CategoryRepository: Send + Sync {
	/// All categories in creation order.
	async fn categories(&self) -> Result<Vec<Category>>;

	async fn create_category(&self, name: &str) -> Result<Category>;
}

#[axum::async_trait]
pub trait PostRepository: Send + Sync {
	async fn count_posts(&self, filter: &PostFilter) -> Result<i64>;

	/// Posts matching `filter`, newest first.
	async fn list_posts(&self, filter: &PostFilter, paginate: &Paginate) -> Result<Vec<Post>>;

	async fn post(&self, id: Uuid) -> Result<Option<Post>>;

	async fn create_post(&self, author_id: Uuid, input: &PostInput) -> Result<Post>;

	/// Returns `None` if the post does not exist.
	async fn update_post(&self, id: Uuid, input: &PostUpdate) -> Result<Option<Post>>;

	/// Returns `false` if the post does not exist.
	async fn delete_post(&self, id: Uuid) -> Result<bool>;

	/// The category of every post by `author_id`, newest post first.
	async fn author_categories(&self, author_id: Uuid) -> Result<Vec<String>>;
}

/// The many-to-many relation between posts and the users that like them.
#[axum::async_trait]
pub trait LikeRepository: Send + Sync {
	/// Adding an existing like is a no-op.
	async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<()>;

	async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<()>;

	async fn contains_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool>;

	async fn count_likes(&self, post_id: Uuid) -> Result<i64>;
}

pub trait Repository:
	UserRepository + SessionRepository + CategoryRepository + PostRepository + LikeRepository
{
}

impl<T> Repository for T where
	T: UserRepository + SessionRepository + CategoryRepository + PostRepository + LikeRepository
{
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use super::PostFilter;

	#[test]
	fn test_filter_matches() {
		let author = Uuid::new_v4();
		let other = Uuid::new_v4();

		assert!(PostFilter::default().matches(other, "anything"));

		let filter = PostFilter::default().author(author).category("tech");

		assert!(filter.matches(author, "tech"));
		assert!(!filter.matches(author, "Tech"));
		assert!(!filter.matches(other, "tech"));
	}
}
