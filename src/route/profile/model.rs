use std::collections::HashSet;

use schemars::JsonSchema;
use serde::Serialize;

use crate::route::{category::model::Category, model::Page, post::model::Post};

/// The authenticated user's posts and the categories they have written in.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ProfileListing {
	/// The selected category label, title-cased, when filtering by category.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cats: Option<String>,
	pub posts: Page<Post>,
	/// Distinct categories of the user's posts, most recently used first.
	pub user_categories: Vec<String>,
	pub cat_menu: Vec<Category>,
}

/// Removes repeated labels, keeping the first occurrence of each.
pub fn distinct_categories(categories: Vec<String>) -> Vec<String> {
	let mut seen = HashSet::new();

	categories
		.into_iter()
		.filter(|category| seen.insert(category.clone()))
		.collect()
}
