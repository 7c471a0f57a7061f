pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /profile                 GET   caller's profile (provision on first sight)
///
/// /templates               GET   active style templates
///
/// /generations             POST  submit a generation batch
/// /generations             GET   paginated generation history
///
/// /prompts/enhance         POST  rewrite a concept for the image model
/// /analysis                POST  CTR-score a thumbnail
/// ```
///
/// Every route requires a Bearer JWT; there are no public API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(handlers::profile::get_profile))
        .route("/templates", get(handlers::templates::list_templates))
        .route(
            "/generations",
            post(handlers::generation::submit_generation)
                .get(handlers::generation::list_generations),
        )
        .route("/prompts/enhance", post(handlers::prompts::enhance_prompt))
        .route("/analysis", post(handlers::analysis::analyze_thumbnail))
}
