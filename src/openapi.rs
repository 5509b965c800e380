use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json, session};

pub const SECURITY_SCHEME_SESSION: &str = "Session";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const POST: &str = "Post";
	pub const CATEGORY: &str = "Category";
	pub const PROFILE: &str = "Profile";
	pub const LIKE: &str = "Like";
	pub const PAGE: &str = "Page";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Blog")
		.summary("A blog with categories, likes and user profiles")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::AUTH.into(),
			description: Some("User authentication".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post listings and management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::CATEGORY.into(),
			description: Some("Categories and their posts".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::PROFILE.into(),
			description: Some("The authenticated user's own posts".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::LIKE.into(),
			description: Some("Liking posts".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::PAGE.into(),
			description: Some("Static pages".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("A user session cookie".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::Message<'static>>, _>(|res| {
			res.example(
				error::Message::new("unknown_post").detail("post", "00000000-0000-0000-0000-000000000000"),
			)
		})
}
