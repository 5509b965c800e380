use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::route::{model::Page, post::model::Post};

/// A named grouping of posts, used to build the category menu.
///
/// Posts refer to categories by name only, so names are not required to be unique.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Category {
	pub id: Uuid,
	pub name: String,
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CategoryInput {
	#[validate(length(min = 1, max = 100))]
	pub name: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct Categories {
	pub categories: Vec<Category>,
}

/// The posts filed under a single category label.
#[derive(Debug, Serialize, JsonSchema)]
pub struct CategoryListing {
	/// The label for display, title-cased.
	pub cats: String,
	pub posts: Page<Post>,
	pub cat_menu: Vec<Category>,
}

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A word is a run of letters, so `"rust-lang 2nd"` becomes `"Rust-Lang 2Nd"`.
pub fn title_case(label: &str) -> String {
	let mut output = String::with_capacity(label.len());
	let mut in_word = false;

	for c in label.chars() {
		if c.is_alphabetic() {
			if in_word {
				output.extend(c.to_lowercase());
			} else {
				output.extend(c.to_uppercase());
			}

			in_word = true;
		} else {
			output.push(c);
			in_word = false;
		}
	}

	output
}

#[cfg(test)]
mod test {
	use super::title_case;

	#[test]
	fn test_title_case() {
		assert_eq!(title_case("tech"), "Tech");
		assert_eq!(title_case("web DEVELOPMENT"), "Web Development");
		assert_eq!(title_case("rust-lang 2nd"), "Rust-Lang 2Nd");
		assert_eq!(title_case(""), "");
	}
}
