pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::{self, require_hunter};
use crate::hunters::{self, avatar::AVATAR_BODY_LIMIT};
use crate::rate_limit;
use crate::resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/v1/auth/register", post(auth::handlers::handle_register))
        .route("/api/v1/auth/login", post(auth::handlers::handle_login));

    let protected = Router::new()
        // Auth
        .route("/api/v1/auth/me", get(auth::handlers::handle_me))
        // Hunter profile
        .route(
            "/api/v1/users/profile",
            get(hunters::handlers::handle_get_profile).put(hunters::handlers::handle_update_profile),
        )
        .route(
            "/api/v1/users/avatar",
            post(hunters::avatar::handle_upload_avatar)
                .layer(DefaultBodyLimit::max(AVATAR_BODY_LIMIT)),
        )
        .route("/api/v1/users/deactivate", post(hunters::handlers::handle_deactivate))
        .route("/api/v1/users/dashboard", get(hunters::handlers::handle_dashboard))
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handlers::handle_list).post(resumes::handlers::handle_create),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handlers::handle_get)
                .put(resumes::handlers::handle_update)
                .delete(resumes::handlers::handle_delete),
        )
        .route(
            "/api/v1/resumes/:id/duplicate",
            post(resumes::handlers::handle_duplicate),
        )
        .route(
            "/api/v1/resumes/:id/download",
            post(resumes::handlers::handle_download),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_hunter));

    let api = public
        .merge(protected)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit::enforce));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(api)
        .with_state(state)
}
