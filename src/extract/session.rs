use std::sync::Arc;

use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts, OriginalUri},
	http::{header, request, Uri},
};
use uuid::Uuid;

use crate::{
	config::Config,
	error::RouteError,
	openapi::SECURITY_SCHEME_SESSION,
	route::auth,
	session,
	store::prelude::*,
	Store,
};

/// Extracts the session and related user from the request.
///
/// If the session cookie is missing or does not belong to a user, an
/// [`auth::Error::LoginRequired`] is returned, which redirects to the login page.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub id: Uuid,
	pub user: auth::model::User,
}

/// Builds the login redirect for this request, keeping the full path and query
/// as the `next` parameter.
///
/// Nested routers only see the path below their prefix, so the original URI
/// is preferred when axum recorded one.
fn login_location(login_url: &str, parts: &request::Parts) -> String {
	let uri: &Uri = parts
		.extensions
		.get::<OriginalUri>()
		.map_or(&parts.uri, |original| &original.0);

	let next = uri.path_and_query().map_or("/", |path| path.as_str());

	format!(
		"{login_url}?next={}",
		urlencoding::encode(next).replace("%2F", "/")
	)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Store: FromRef<S>,
	Arc<Config>: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let location = login_location(&Arc::<Config>::from_ref(state).login_url, parts);
		let login_required = || auth::Error::LoginRequired { location };

		let session_id = parts
			.headers
			.get_all(header::COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(cookie::Cookie::split_parse)
			.filter_map(Result::ok)
			.find(|cookie| cookie.name() == session::COOKIE_NAME)
			.and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

		let Some(session_id) = session_id else {
			return Err(login_required().into());
		};

		let store = Store::from_ref(state);
		let user = store
			.session_user(session_id)
			.await?
			.ok_or_else(login_required)?;

		Ok(Self {
			user,
			id: session_id,
		})
	}
}

impl OperationInput for Session {
	/// Operation input for the session extractor.
	///
	/// This adds a session cookie requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.push(
			[(SECURITY_SCHEME_SESSION.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}

/// Like [`Session`], but anonymous requests are let through as `None`.
#[derive(Debug)]
pub struct OptionalSession(pub Option<Session>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalSession
where
	Store: FromRef<S>,
	Arc<Config>: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		match Session::from_request_parts(parts, state).await {
			Ok(session) => Ok(Self(Some(session))),
			Err(RouteError::Route(auth::Error::LoginRequired { .. })) => Ok(Self(None)),
			Err(error) => Err(error),
		}
	}
}

impl OperationInput for OptionalSession {}
