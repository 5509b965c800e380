use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Posts per page on the home listing.
pub const HOME_PAGE_SIZE: i64 = 7;
/// Posts per page on every other listing.
pub const PAGE_SIZE: i64 = 5;

/// The `?page=` query of a paginated listing.
///
/// Lookups are lenient: anything that is not a number selects the first page,
/// `last` selects the last page and numbers past the end are clamped to it.
#[derive(Debug, Default, Deserialize, Validate, JsonSchema)]
pub struct PageInput {
	/// The page number to return (1-indexed), or `last`.
	pub page: Option<String>,
}

impl PageInput {
	/// Resolves the requested page against a listing of `count` items.
	pub fn resolve(&self, count: i64, size: i64) -> Paginate {
		let last = num_pages(count, size);
		let page = match self.page.as_deref().map(str::trim) {
			Some("last") => last,
			Some(page) => page.parse::<i64>().map_or(1, |page| page.clamp(1, last)),
			None => 1,
		};

		Paginate { page, size }
	}
}

/// An empty listing still has a single, empty page.
fn num_pages(count: i64, size: i64) -> i64 {
	if count <= 0 {
		1
	} else {
		(count + size - 1) / size
	}
}

#[derive(Debug, Clone, Copy)]
pub struct Paginate {
	pub page: i64,
	pub size: i64,
}

impl Paginate {
	pub fn offset(&self) -> i64 {
		(self.page - 1) * self.size
	}

	pub fn limit(&self) -> i64 {
		self.size
	}
}

/// A single page of a listing.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Page<T> {
	pub items: Vec<T>,
	/// The 1-indexed number of this page.
	pub number: i64,
	pub num_pages: i64,
	/// The number of items across all pages.
	pub count: i64,
	pub has_next: bool,
	pub has_previous: bool,
}

impl<T> Page<T> {
	pub fn new(items: Vec<T>, paginate: &Paginate, count: i64) -> Self {
		let num_pages = num_pages(count, paginate.size);

		Self {
			items,
			number: paginate.page,
			num_pages,
			count,
			has_next: paginate.page < num_pages,
			has_previous: paginate.page > 1,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn input(page: &str) -> PageInput {
		PageInput {
			page: Some(page.into()),
		}
	}

	#[test]
	fn test_paginate_offset() {
		let mut paginate = Paginate { page: 1, size: 10 };

		assert_eq!(paginate.offset(), 0);

		paginate.page = 2;

		assert_eq!(paginate.offset(), 10);

		paginate.size = 5;

		assert_eq!(paginate.offset(), 5);
	}

	#[test]
	fn test_resolve_clamps_to_last_page() {
		assert_eq!(input("99").resolve(12, 5).page, 3);
		assert_eq!(input("last").resolve(12, 5).page, 3);
		assert_eq!(input("2").resolve(12, 5).page, 2);
	}

	#[test]
	fn test_resolve_malformed_is_first_page() {
		assert_eq!(input("abc").resolve(12, 5).page, 1);
		assert_eq!(input("").resolve(12, 5).page, 1);
		assert_eq!(input("-4").resolve(12, 5).page, 1);
		assert_eq!(PageInput::default().resolve(12, 5).page, 1);
	}

	#[test]
	fn test_empty_listing_has_one_page() {
		let paginate = input("3").resolve(0, 7);
		let page = Page::<()>::new(Vec::new(), &paginate, 0);

		assert_eq!(page.number, 1);
		assert_eq!(page.num_pages, 1);
		assert!(!page.has_next);
		assert!(!page.has_previous);
	}
}
