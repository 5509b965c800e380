use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection::{JsonRejection, PathRejection, QueryRejection},
	http::{HeaderMap, Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorError;

use crate::store;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message sent to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A machine-readable description of the error.
	pub content: Cow<'a, str>,
	/// The input field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Additional context about the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

impl<'a> Message<'a> {
	pub fn new(content: impl Into<Cow<'a, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}

	#[must_use]
	pub fn field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	#[must_use]
	pub fn detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(Default::default)
			.to_mut()
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
	errors: Vec<Message<'a>>,
}

/// Describes how a route-specific error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn errors(&self) -> Vec<Message<'_>> {
		Message::new(self.to_string()).into_vec()
	}

	/// Extra headers sent alongside the error, such as a redirect location.
	fn headers(&self) -> HeaderMap {
		HeaderMap::new()
	}
}

/// Errors shared by every route.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] PathRejection),
	#[error("store error: {0}")]
	Store(#[from] store::Error),
	#[error("too many requests, retry in {0}s")]
	TooManyRequests(u64),
	#[error("unable to identify the client")]
	UnknownClient,
}

impl From<GovernorError> for AppError {
	fn from(error: GovernorError) -> Self {
		match error {
			GovernorError::TooManyRequests { wait_time, .. } => Self::TooManyRequests(wait_time),
			_ => Self::UnknownClient,
		}
	}
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Query(..) | Self::Path(..) => {
				StatusCode::BAD_REQUEST
			}
			Self::TooManyRequests(..) => StatusCode::TOO_MANY_REQUESTS,
			Self::Store(..) | Self::UnknownClient => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| {
						Message::new(error.code.clone()).field(field.clone())
					})
				})
				.collect(),
			Self::Json(rejection) => Message::new(rejection.body_text()).into_vec(),
			Self::Query(rejection) => Message::new(rejection.body_text()).into_vec(),
			Self::Path(rejection) => Message::new(rejection.body_text()).into_vec(),
			Self::TooManyRequests(wait) => Message::new("too_many_requests")
				.detail("retry_after", *wait)
				.into_vec(),
			// Internal details stay in the logs
			Self::Store(..) | Self::UnknownClient => Message::new("internal_error").into_vec(),
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		(status, Json(ErrorResponse { errors: self.errors() })).into_response()
	}
}

/// The error type returned by route handlers, generic over the errors
/// specific to a group of routes.
#[derive(Debug)]
pub enum RouteError<E> {
	App(AppError),
	Route(E),
}

impl<E: ErrorShape> From<E> for RouteError<E> {
	fn from(error: E) -> Self {
		Self::Route(error)
	}
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<store::Error> for RouteError<E> {
	fn from(error: store::Error) -> Self {
		Self::App(error.into())
	}
}

impl<E> From<validator::ValidationErrors> for RouteError<E> {
	fn from(error: validator::ValidationErrors) -> Self {
		Self::App(error.into())
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => {
				let status = error.status();
				let headers = error.headers();
				let body = Json(ErrorResponse {
					errors: error.errors(),
				})
				.into_response();

				(status, headers, body).into_response()
			}
		}
	}
}

impl<E> OperationOutput for RouteError<E> {
	type Inner = Self;
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_message_details() {
		let message = Message::new("unknown_post").detail("post", "abc");

		let value = serde_json::to_value(&message).unwrap();

		assert_eq!(value["content"], "unknown_post");
		assert_eq!(value["details"]["post"], "abc");
		assert!(value.get("field").is_none());
	}

	#[test]
	fn test_too_many_requests_status() {
		let error = AppError::TooManyRequests(3);

		assert_eq!(error.status(), StatusCode::TOO_MANY_REQUESTS);
		assert_eq!(error.errors()[0].content, "too_many_requests");
	}
}
