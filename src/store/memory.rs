//! In-memory store, used when no database is configured and in tests.
//! Data is lost on process restart.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
	CategoryRepository, Error, LikeRepository, NewUser, PostFilter, PostRepository, Result,
	SessionRepository, UserRepository,
};
use crate::route::{
	auth::model::{Session, User},
	category::model::Category,
	model::Paginate,
	post::model::{Post, PostInput, PostUpdate},
};

struct PostRow {
	id: Uuid,
	title: String,
	content: String,
	date_posted: DateTime<Utc>,
	author_id: Uuid,
	category: String,
	header_image: Option<String>,
}

#[derive(Default)]
struct Tables {
	users: Vec<User>,
	sessions: Vec<Session>,
	categories: Vec<Category>,
	/// Insertion order, oldest first.
	posts: Vec<PostRow>,
	/// `(post_id, user_id)`
	likes: HashSet<(Uuid, Uuid)>,
}

impl Tables {
	fn hydrate(&self, row: &PostRow) -> Post {
		let author = self
			.users
			.iter()
			.find(|user| user.id == row.author_id)
			.map(|user| user.username.clone())
			.unwrap_or_default();

		Post {
			id: row.id,
			title: row.title.clone(),
			content: row.content.clone(),
			date_posted: row.date_posted,
			author_id: row.author_id,
			author,
			category: row.category.clone(),
			header_image: row.header_image.clone(),
			total_likes: self.count_likes(row.id),
		}
	}

	fn count_likes(&self, post_id: Uuid) -> i64 {
		let count = self.likes.iter().filter(|(post, _)| *post == post_id).count();

		i64::try_from(count).unwrap_or(i64::MAX)
	}

	/// Matching rows, newest first. Ties keep the most recently inserted first.
	fn matching<'a>(&'a self, filter: &'a PostFilter) -> Vec<&'a PostRow> {
		let mut rows = self
			.posts
			.iter()
			.rev()
			.filter(|row| filter.matches(row.author_id, &row.category))
			.collect::<Vec<_>>();

		rows.sort_by(|a, b| b.date_posted.cmp(&a.date_posted));
		rows
	}
}

#[derive(Default)]
pub struct MemoryStore {
	tables: RwLock<Tables>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[axum::async_trait]
impl UserRepository for MemoryStore {
	async fn create_user(&self, user: NewUser<'_>) -> Result<(User, Session)> {
		let mut tables = self.tables.write().await;

		if tables.users.iter().any(|u| u.email == user.email) {
			return Err(Error::EmailTaken);
		}

		if tables.users.iter().any(|u| u.username == user.username) {
			return Err(Error::UsernameTaken);
		}

		let user = User {
			id: user.id,
			email: user.email.to_owned(),
			password: user.password.to_vec(),
			username: user.username.to_owned(),
			created_at: Utc::now(),
		};

		let session = Session {
			id: Uuid::new_v4(),
			user_id: user.id,
			created_at: Utc::now(),
		};

		tables.users.push(user.clone());
		tables.sessions.push(session.clone());

		Ok((user, session))
	}

	async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
		let tables = self.tables.read().await;

		Ok(tables.users.iter().find(|u| u.email == email).cloned())
	}

	async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
		let tables = self.tables.read().await;

		Ok(tables.users.iter().find(|u| u.username == username).cloned())
	}

	async fn delete_user(&self, id: Uuid) -> Result<()> {
		let mut tables = self.tables.write().await;

		let deleted_posts = tables
			.posts
			.iter()
			.filter(|row| row.author_id == id)
			.map(|row| row.id)
			.collect::<HashSet<_>>();

		tables.users.retain(|user| user.id != id);
		tables.sessions.retain(|session| session.user_id != id);
		tables.posts.retain(|row| row.author_id != id);
		tables
			.likes
			.retain(|(post, user)| *user != id && !deleted_posts.contains(post));

		Ok(())
	}
}

#[axum::async_trait]
impl SessionRepository for MemoryStore {
	async fn create_session(&self, user_id: Uuid) -> Result<Session> {
		let session = Session {
			id: Uuid::new_v4(),
			user_id,
			created_at: Utc::now(),
		};

		self.tables.write().await.sessions.push(session.clone());
		Ok(session)
	}

	async fn session_user(&self, session_id: Uuid) -> Result<Option<User>> {
		let tables = self.tables.read().await;

		let Some(session) = tables.sessions.iter().find(|s| s.id == session_id) else {
			return Ok(None);
		};

		Ok(tables
			.users
			.iter()
			.find(|user| user.id == session.user_id)
			.cloned())
	}

	async fn delete_session(&self, session_id: Uuid) -> Result<()> {
		self.tables
			.write()
			.await
			.sessions
			.retain(|session| session.id != session_id);

		Ok(())
	}
}

#[axum::async_trait]
impl CategoryRepository for MemoryStore {
	async fn categories(&self) -> Result<Vec<Category>> {
		Ok(self.tables.read().await.categories.clone())
	}

	async fn create_category(&self, name: &str) -> Result<Category> {
		let category = Category {
			id: Uuid::new_v4(),
			name: name.to_owned(),
		};

		self.tables.write().await.categories.push(category.clone());
		Ok(category)
	}
}

#[axum::async_trait]
impl PostRepository for MemoryStore {
	async fn count_posts(&self, filter: &PostFilter) -> Result<i64> {
		let tables = self.tables.read().await;
		let count = tables.matching(filter).len();

		Ok(i64::try_from(count).unwrap_or(i64::MAX))
	}

	async fn list_posts(&self, filter: &PostFilter, paginate: &Paginate) -> Result<Vec<Post>> {
		let tables = self.tables.read().await;
		let offset = usize::try_from(paginate.offset()).unwrap_or(0);
		let limit = usize::try_from(paginate.limit()).unwrap_or(0);

		Ok(tables
			.matching(filter)
			.into_iter()
			.skip(offset)
			.take(limit)
			.map(|row| tables.hydrate(row))
			.collect())
	}

	async fn post(&self, id: Uuid) -> Result<Option<Post>> {
		let tables = self.tables.read().await;

		Ok(tables
			.posts
			.iter()
			.find(|row| row.id == id)
			.map(|row| tables.hydrate(row)))
	}

	async fn create_post(&self, author_id: Uuid, input: &PostInput) -> Result<Post> {
		let mut tables = self.tables.write().await;
		let row = PostRow {
			id: Uuid::new_v4(),
			title: input.title.clone(),
			content: input.content.clone(),
			date_posted: Utc::now(),
			author_id,
			category: input.category.clone(),
			header_image: None,
		};

		let post = tables.hydrate(&row);
		tables.posts.push(row);

		Ok(post)
	}

	async fn update_post(&self, id: Uuid, input: &PostUpdate) -> Result<Option<Post>> {
		let mut tables = self.tables.write().await;

		let Some(row) = tables.posts.iter_mut().find(|row| row.id == id) else {
			return Ok(None);
		};

		row.title.clone_from(&input.title);
		row.content.clone_from(&input.content);
		if let Some(category) = &input.category {
			row.category.clone_from(category);
		}

		let tables = tables.downgrade();

		Ok(tables
			.posts
			.iter()
			.find(|row| row.id == id)
			.map(|row| tables.hydrate(row)))
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool> {
		let mut tables = self.tables.write().await;
		let before = tables.posts.len();

		tables.posts.retain(|row| row.id != id);
		tables.likes.retain(|(post, _)| *post != id);

		Ok(tables.posts.len() != before)
	}

	async fn author_categories(&self, author_id: Uuid) -> Result<Vec<String>> {
		let tables = self.tables.read().await;
		let filter = PostFilter::default().author(author_id);

		Ok(tables
			.matching(&filter)
			.into_iter()
			.map(|row| row.category.clone())
			.collect())
	}
}

#[axum::async_trait]
impl LikeRepository for MemoryStore {
	async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
		self.tables.write().await.likes.insert((post_id, user_id));
		Ok(())
	}

	async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
		self.tables.write().await.likes.remove(&(post_id, user_id));
		Ok(())
	}

	async fn contains_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
		Ok(self.tables.read().await.likes.contains(&(post_id, user_id)))
	}

	async fn count_likes(&self, post_id: Uuid) -> Result<i64> {
		Ok(self.tables.read().await.count_likes(post_id))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn input(title: &str, category: &str) -> PostInput {
		PostInput {
			title: title.into(),
			category: category.into(),
			content: "content".into(),
		}
	}

	async fn user(store: &MemoryStore, username: &str) -> User {
		store
			.create_user(NewUser {
				id: Uuid::new_v4(),
				email: &format!("{username}@example.com"),
				username,
				password: &[0; 32],
			})
			.await
			.unwrap()
			.0
	}

	#[tokio::test]
	async fn test_duplicate_users() {
		let store = MemoryStore::new();
		user(&store, "alice").await;

		let result = store
			.create_user(NewUser {
				id: Uuid::new_v4(),
				email: "other@example.com",
				username: "alice",
				password: &[],
			})
			.await;

		assert!(matches!(result, Err(Error::UsernameTaken)));
		assert_eq!(store.tables.read().await.sessions.len(), 1);
	}

	#[tokio::test]
	async fn test_create_user_opens_session() {
		let store = MemoryStore::new();

		let (user, session) = store
			.create_user(NewUser {
				id: Uuid::new_v4(),
				email: "alice@example.com",
				username: "alice",
				password: &[],
			})
			.await
			.unwrap();

		assert_eq!(session.user_id, user.id);
		assert_eq!(store.session_user(session.id).await.unwrap().unwrap().id, user.id);
	}

	#[tokio::test]
	async fn test_listing_is_newest_first() {
		let store = MemoryStore::new();
		let alice = user(&store, "alice").await;

		for title in ["first", "second", "third"] {
			store.create_post(alice.id, &input(title, "none")).await.unwrap();
		}

		let posts = store
			.list_posts(&PostFilter::default(), &Paginate { page: 1, size: 2 })
			.await
			.unwrap();

		let titles = posts.iter().map(|p| p.title.as_str()).collect::<Vec<_>>();

		assert_eq!(titles, ["third", "second"]);
		assert_eq!(posts[0].author, "alice");
	}

	#[tokio::test]
	async fn test_likes_relation() {
		let store = MemoryStore::new();
		let alice = user(&store, "alice").await;
		let bob = user(&store, "bob").await;
		let post = store.create_post(alice.id, &input("post", "none")).await.unwrap();

		store.add_like(post.id, alice.id).await.unwrap();
		store.add_like(post.id, bob.id).await.unwrap();
		store.add_like(post.id, bob.id).await.unwrap();

		assert_eq!(store.count_likes(post.id).await.unwrap(), 2);
		assert!(store.contains_like(post.id, bob.id).await.unwrap());

		store.remove_like(post.id, bob.id).await.unwrap();

		assert!(!store.contains_like(post.id, bob.id).await.unwrap());
		assert_eq!(store.post(post.id).await.unwrap().unwrap().total_likes, 1);
	}

	#[tokio::test]
	async fn test_delete_user_cascades() {
		let store = MemoryStore::new();
		let alice = user(&store, "alice").await;
		let bob = user(&store, "bob").await;
		let post = store.create_post(alice.id, &input("post", "none")).await.unwrap();
		let other = store.create_post(bob.id, &input("other", "none")).await.unwrap();

		store.add_like(other.id, alice.id).await.unwrap();
		store.add_like(post.id, bob.id).await.unwrap();
		let session = store.create_session(alice.id).await.unwrap();

		store.delete_user(alice.id).await.unwrap();

		assert!(store.post(post.id).await.unwrap().is_none());
		assert!(store.session_user(session.id).await.unwrap().is_none());
		assert_eq!(store.count_likes(other.id).await.unwrap(), 0);
		assert_eq!(store.count_posts(&PostFilter::default()).await.unwrap(), 1);
	}
}
