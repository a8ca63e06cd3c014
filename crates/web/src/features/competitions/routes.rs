use axum::{
    Router, middleware,
    routing::{get, post},
};
use lifecycle::services::LifecycleService;

use super::handlers::{
    confirm_transition, execute_transition, get_competition, list_competitions,
    propose_transition,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<LifecycleService> {
    let protected = Router::new()
        .route("/:id/transitions/propose", post(propose_transition))
        .route("/:id/transitions/confirm", post(confirm_transition))
        .route("/:id/transitions/execute", post(execute_transition))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_competitions))
        .route("/:id", get(get_competition))
        .merge(protected)
}
