#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod openapi;
mod ratelimit;
mod route;
mod session;
mod store;
#[cfg(test)]
mod test;
mod trace;

use std::{net::SocketAddr, sync::Arc};

use aide::openapi::OpenApi;
use argon2::Argon2;
use axum::{Extension, Router};
use tower::Layer;
use tower_http::{
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use config::Config;

/// The data store shared by every handler.
pub type Store = Arc<dyn store::Repository>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the data store, a hash configuration (if it's expensive to create),
/// or the configuration.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Store,
	pub hasher: Argon2<'static>,
	pub config: Arc<Config>,
}

impl State {
	pub fn new(store: Store, config: Config) -> Self {
		Self {
			store,
			hasher: Argon2::default(),
			config: Arc::new(config),
		}
	}

	/// Connects to Postgres when a database is configured, and falls back to
	/// an in-memory store otherwise.
	async fn connect(config: Config) -> Result<Self, store::Error> {
		let store: Store = match config.database_url.as_deref() {
			Some(url) => Arc::new(store::PostgresStore::connect(url, config.max_connections).await?),
			None => {
				tracing::warn!("DATABASE_URL is not set, data will be lost on restart");
				Arc::new(store::MemoryStore::new())
			}
		};

		Ok(Self::new(store, config))
	}
}

/// Builds the application router, including the `OpenAPI` documentation.
pub fn app(state: State) -> Router {
	let mut api = OpenApi::default();

	route::routes(state.config.rate_limit)
		.nest_api_service("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(TraceLayer::new_for_http())
		.layer(PropagateRequestIdLayer::x_request_id())
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.with_state(state)
}

/// Wraps [`app`] so that a trailing slash routes the same as the bare path.
///
/// Normalization has to run before routing, so the application is mounted as
/// the fallback of an otherwise empty router.
pub fn service(state: State) -> Router {
	Router::new().fallback_service(NormalizePathLayer::trim_trailing_slash().layer(app(state)))
}

#[tokio::main]
async fn main() {
	let config = Config::from_env().expect("invalid configuration");
	let _guard = trace::init_tracing_subscriber(&config).expect("failed to initialize tracing");

	let addr = (config.host.clone(), config.port);
	let state = State::connect(config)
		.await
		.expect("failed to connect to database");

	let listener = tokio::net::TcpListener::bind(addr)
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on {}", listener.local_addr().expect("bound listener has an address"));

	axum::serve(
		listener,
		service(state).into_make_service_with_connect_info::<SocketAddr>(),
	)
	.await
	.expect("server error");
}
