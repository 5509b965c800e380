use aide::axum::{routing::get_with, ApiRouter};
use macros::route;
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorLayer;

use crate::{extract::Json, openapi::tag, ratelimit, AppState};

pub mod auth;
pub mod category;
pub mod docs;
pub mod like;
pub mod model;
pub mod post;
pub mod profile;

/// Every route of the blog, rate limited per client IP when `rate_limit` is set.
pub fn routes(rate_limit: bool) -> ApiRouter<AppState> {
	let router = ApiRouter::new()
		.merge(post::routes())
		.merge(category::routes())
		.nest("/profile", profile::routes())
		.nest("/like", like::routes())
		.api_route("/about", get_with(about, about_docs));

	if !rate_limit {
		return router.nest("/auth", auth::routes());
	}

	let default = ratelimit::default();
	let secure = ratelimit::secure();

	ratelimit::cleanup_old_limits(&[&default, &secure]);

	router
		.nest(
			"/auth",
			auth::routes().layer(GovernorLayer { config: secure }),
		)
		.layer(GovernorLayer { config: default })
}

#[derive(Serialize, JsonSchema)]
pub struct About {
	pub title: &'static str,
	pub name: &'static str,
	pub version: &'static str,
}

/// About
/// Returns static information about the blog.
#[route(tag = tag::PAGE)]
pub async fn about() -> Json<About> {
	Json(About {
		title: "About",
		name: env!("CARGO_PKG_NAME"),
		version: env!("CARGO_PKG_VERSION"),
	})
}
