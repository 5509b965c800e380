use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::request,
};

use crate::{error::AppError, route::category::model::Category, store::prelude::*, Store};

/// The category menu shown on every page.
#[derive(Debug)]
pub struct CatMenu(pub Vec<Category>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CatMenu
where
	Store: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = AppError;

	async fn from_request_parts(
		_parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let categories = Store::from_ref(state).categories().await?;

		Ok(Self(categories))
	}
}

impl OperationInput for CatMenu {}
