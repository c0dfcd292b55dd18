//! JSON REST API handler modules.
//!
//! Routes are not generated per resource: `/{name}` and `/{name}/{id}` match
//! any top-level key of the document, so adding a key to the seed exposes a
//! new resource without code changes.

pub mod body;
#[allow(clippy::missing_errors_doc)]
pub mod database;
#[allow(clippy::missing_errors_doc)]
pub mod resources;

use axum::Router;
use axum::routing::get;

use mockdb_app::ports::DocumentRouter;

use crate::state::AppState;

/// Build the REST routes, rooted at `/`.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: DocumentRouter + Send + Sync + 'static,
{
    Router::new()
        .route("/db", get(database::get::<R>))
        .route(
            "/{name}",
            get(resources::read::<R>)
                .post(resources::create::<R>)
                .put(resources::replace_singular::<R>)
                .patch(resources::patch_singular::<R>),
        )
        .route(
            "/{name}/{id}",
            get(resources::find::<R>)
                .put(resources::replace::<R>)
                .patch(resources::patch::<R>)
                .delete(resources::delete::<R>),
        )
}
