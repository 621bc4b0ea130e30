use std::sync::Arc;

use axum::{
    middleware::map_response,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::TokenVerifier;
use crate::database::DataStore;
use crate::handlers::{protected, public};
use crate::middleware::{json_method_not_allowed, not_found};

pub const RESTAURANTS_API_BASE: &str = "/restaurants";
pub const REVIEWS_API_BASE: &str = "/reviews";

/// Shared handles every handler and middleware reads from
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn DataStore>, verifier: TokenVerifier) -> Self {
        Self {
            store,
            verifier: Arc::new(verifier),
        }
    }
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::index))
        .route("/health", get(public::health))
        // Protected: handlers authenticate through the `Claims` extractor
        .merge(restaurant_routes())
        .merge(review_routes())
        .fallback(not_found)
        // Global middleware
        .layer(map_response(json_method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn restaurant_routes() -> Router<AppState> {
    use protected::{restaurants, reviews};

    Router::new()
        .route(RESTAURANTS_API_BASE, get(restaurants::list))
        .route(
            &format!("{}/create", RESTAURANTS_API_BASE),
            post(restaurants::create),
        )
        .route(
            &format!("{}/:id", RESTAURANTS_API_BASE),
            get(restaurants::get)
                .put(restaurants::update)
                .delete(restaurants::delete),
        )
        .route(
            &format!("{}/:id/reviews", RESTAURANTS_API_BASE),
            get(reviews::list_for_restaurant),
        )
}

fn review_routes() -> Router<AppState> {
    use protected::reviews;

    Router::new()
        .route(REVIEWS_API_BASE, get(reviews::list))
        .route(&format!("{}/create", REVIEWS_API_BASE), post(reviews::create))
        .route(
            &format!("{}/:id", REVIEWS_API_BASE),
            get(reviews::get).put(reviews::update).delete(reviews::delete),
        )
}
