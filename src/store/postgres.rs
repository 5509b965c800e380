use sqlx::{postgres::PgPoolOptions, PgPool};
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

/// Selects posts along with their author's username and like count.
const SELECT_POST: &str = r#"
	SELECT
		post.id, post.title, post.content, post.date_posted, post.author_id,
		"user".username AS author, post.category, post.header_image,
		(SELECT COUNT(*) FROM post_like WHERE post_like.post_id = post.id) AS total_likes
	FROM post
	JOIN "user" ON "user".id = post.author_id
"#;

const FILTER_POST: &str = r"
	WHERE ($1::uuid IS NULL OR post.author_id = $1)
	AND ($2::text IS NULL OR post.category = $2)
";

pub struct PostgresStore {
	pool: PgPool,
}

impl PostgresStore {
	/// Connects to the database and applies any pending migrations.
	pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(max_connections)
			.connect(url)
			.await?;

		sqlx::migrate!().run(&pool).await?;

		Ok(Self { pool })
	}

	#[cfg(test)]
	pub fn from_pool(pool: PgPool) -> Self {
		Self { pool }
	}
}

#[axum::async_trait]
impl UserRepository for PostgresStore {
	async fn create_user(&self, user: NewUser<'_>) -> Result<(User, Session)> {
		let mut tx = self.pool.begin().await?;

		let user = sqlx::query_as::<_, User>(
			r#"
				INSERT INTO "user" (id, email, username, password) VALUES ($1, $2, $3, $4)
				RETURNING *
			"#,
		)
		.bind(user.id)
		.bind(user.email)
		.bind(user.username)
		.bind(user.password)
		.fetch_one(&mut *tx)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref d) => match d.constraint() {
				Some("user_email_key") => Error::EmailTaken,
				Some("user_username_key") => Error::UsernameTaken,
				_ => Error::Database(e),
			},
			e => Error::Database(e),
		})?;

		let session =
			sqlx::query_as::<_, Session>("INSERT INTO session (user_id) VALUES ($1) RETURNING *")
				.bind(user.id)
				.fetch_one(&mut *tx)
				.await?;

		tx.commit().await?;

		Ok((user, session))
	}

	async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
		Ok(
			sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE email = $1"#)
				.bind(email)
				.fetch_optional(&self.pool)
				.await?,
		)
	}

	async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
		Ok(
			sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE username = $1"#)
				.bind(username)
				.fetch_optional(&self.pool)
				.await?,
		)
	}

	async fn delete_user(&self, id: Uuid) -> Result<()> {
		// Sessions, posts and likes are removed by ON DELETE CASCADE
		sqlx::query(r#"DELETE FROM "user" WHERE id = $1"#)
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(())
	}
}

#[axum::async_trait]
impl SessionRepository for PostgresStore {
	async fn create_session(&self, user_id: Uuid) -> Result<Session> {
		Ok(
			sqlx::query_as::<_, Session>("INSERT INTO session (user_id) VALUES ($1) RETURNING *")
				.bind(user_id)
				.fetch_one(&self.pool)
				.await?,
		)
	}

	async fn session_user(&self, session_id: Uuid) -> Result<Option<User>> {
		Ok(sqlx::query_as::<_, User>(
			r#"
				SELECT * FROM "user" WHERE id = (
					SELECT user_id FROM session WHERE id = $1
				)
			"#,
		)
		.bind(session_id)
		.fetch_optional(&self.pool)
		.await?)
	}

	async fn delete_session(&self, session_id: Uuid) -> Result<()> {
		sqlx::query("DELETE FROM session WHERE id = $1")
			.bind(session_id)
			.execute(&self.pool)
			.await?;

		Ok(())
	}
}

#[axum::async_trait]
impl CategoryRepository for PostgresStore {
	async fn categories(&self) -> Result<Vec<Category>> {
		Ok(
			sqlx::query_as::<_, Category>("SELECT id, name FROM category ORDER BY created_at, id")
				.fetch_all(&self.pool)
				.await?,
		)
	}

	async fn create_category(&self, name: &str) -> Result<Category> {
		Ok(sqlx::query_as::<_, Category>(
			"INSERT INTO category (name) VALUES ($1) RETURNING id, name",
		)
		.bind(name)
		.fetch_one(&self.pool)
		.await?)
	}
}

#[axum::async_trait]
impl PostRepository for PostgresStore {
	async fn count_posts(&self, filter: &PostFilter) -> Result<i64> {
		let query = format!("SELECT COUNT(*) FROM post {FILTER_POST}");

		Ok(sqlx::query_scalar::<_, i64>(&query)
			.bind(filter.author_id)
			.bind(filter.category.as_deref())
			.fetch_one(&self.pool)
			.await?)
	}

	async fn list_posts(&self, filter: &PostFilter, paginate: &Paginate) -> Result<Vec<Post>> {
		let query = format!(
			"{SELECT_POST} {FILTER_POST} ORDER BY post.date_posted DESC, post.id LIMIT $3 OFFSET $4"
		);

		Ok(sqlx::query_as::<_, Post>(&query)
			.bind(filter.author_id)
			.bind(filter.category.as_deref())
			.bind(paginate.limit())
			.bind(paginate.offset())
			.fetch_all(&self.pool)
			.await?)
	}

	async fn post(&self, id: Uuid) -> Result<Option<Post>> {
		let query = format!("{SELECT_POST} WHERE post.id = $1");

		Ok(sqlx::query_as::<_, Post>(&query)
			.bind(id)
			.fetch_optional(&self.pool)
			.await?)
	}

	async fn create_post(&self, author_id: Uuid, input: &PostInput) -> Result<Post> {
		let id = sqlx::query_scalar::<_, Uuid>(
			r"
				INSERT INTO post (author_id, title, category, content)
				VALUES ($1, $2, $3, $4)
				RETURNING id
			",
		)
		.bind(author_id)
		.bind(&input.title)
		.bind(&input.category)
		.bind(&input.content)
		.fetch_one(&self.pool)
		.await?;

		self.post(id)
			.await?
			.ok_or(Error::Database(sqlx::Error::RowNotFound))
	}

	async fn update_post(&self, id: Uuid, input: &PostUpdate) -> Result<Option<Post>> {
		let updated = sqlx::query_scalar::<_, Uuid>(
			r"
				UPDATE post
				SET title = $1, category = COALESCE($2, category), content = $3
				WHERE id = $4
				RETURNING id
			",
		)
		.bind(&input.title)
		.bind(&input.category)
		.bind(&input.content)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		match updated {
			Some(id) => self.post(id).await,
			None => Ok(None),
		}
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool> {
		let status = sqlx::query("DELETE FROM post WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn author_categories(&self, author_id: Uuid) -> Result<Vec<String>> {
		Ok(sqlx::query_scalar::<_, String>(
			"SELECT category FROM post WHERE author_id = $1 ORDER BY date_posted DESC, id",
		)
		.bind(author_id)
		.fetch_all(&self.pool)
		.await?)
	}
}

#[axum::async_trait]
impl LikeRepository for PostgresStore {
	async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
		sqlx::query(
			"INSERT INTO post_like (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
		)
		.bind(post_id)
		.bind(user_id)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
		sqlx::query("DELETE FROM post_like WHERE post_id = $1 AND user_id = $2")
			.bind(post_id)
			.bind(user_id)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	async fn contains_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
		Ok(sqlx::query_scalar::<_, bool>(
			"SELECT EXISTS (SELECT 1 FROM post_like WHERE post_id = $1 AND user_id = $2)",
		)
		.bind(post_id)
		.bind(user_id)
		.fetch_one(&self.pool)
		.await?)
	}

	async fn count_likes(&self, post_id: Uuid) -> Result<i64> {
		Ok(
			sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_like WHERE post_id = $1")
				.bind(post_id)
				.fetch_one(&self.pool)
				.await?,
		)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	async fn user(store: &PostgresStore, username: &str) -> User {
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

	#[sqlx::test]
	#[ignore = "requires DATABASE_URL"]
	async fn test_unique_constraints(pool: PgPool) {
		let store = PostgresStore::from_pool(pool);
		user(&store, "alice").await;

		let result = store
			.create_user(NewUser {
				id: Uuid::new_v4(),
				email: "alice@example.com",
				username: "other",
				password: &[],
			})
			.await;

		assert!(matches!(result, Err(Error::EmailTaken)));
	}

	#[sqlx::test]
	#[ignore = "requires DATABASE_URL"]
	async fn test_post_likes_and_filter(pool: PgPool) {
		let store = PostgresStore::from_pool(pool);
		let alice = user(&store, "alice").await;
		let post = store
			.create_post(
				alice.id,
				&PostInput {
					title: "title".into(),
					category: "tech".into(),
					content: "content".into(),
				},
			)
			.await
			.unwrap();

		store.add_like(post.id, alice.id).await.unwrap();
		store.add_like(post.id, alice.id).await.unwrap();

		let post = store.post(post.id).await.unwrap().unwrap();

		assert_eq!(post.total_likes, 1);
		assert_eq!(post.author, "alice");

		let upper = PostFilter::default().category("Tech");

		assert_eq!(store.count_posts(&upper).await.unwrap(), 0);

		store.delete_user(alice.id).await.unwrap();

		assert!(store.post(post.id).await.unwrap().is_none());
	}
}
