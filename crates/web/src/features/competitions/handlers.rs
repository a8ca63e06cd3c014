use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lifecycle::{
    dto::{
        common::{PaginatedResponse, PaginationParams},
        competition::{CompetitionView, ExecuteTransitionRequest, TransitionRequest},
    },
    models::CompetitionRecord,
    services::{LifecycleService, TransitionProposal},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

#[utoipa::path(
    get,
    path = "/api/competitions",
    params(PaginationParams),
    responses(
        (status = 200, description = "Competitions with their computed phase and drift status", body = PaginatedResponse<CompetitionView>),
        (status = 400, description = "Invalid pagination parameters")
    ),
    tag = "competitions"
)]
pub async fn list_competitions(
    State(service): State<LifecycleService>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<CompetitionView>>, WebError> {
    params.validate()?;

    let (views, total) = service.list(params.offset(), params.limit()).await?;

    Ok(Json(PaginatedResponse::new(views, &params, total)))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Competition found", body = CompetitionView),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(service): State<LifecycleService>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompetitionView>, WebError> {
    Ok(Json(service.view(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/transitions/propose",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = TransitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Validation result and whether confirmation is needed", body = TransitionProposal),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found")
    ),
    tag = "transitions"
)]
pub async fn propose_transition(
    State(service): State<LifecycleService>,
    Path(id): Path<Uuid>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<TransitionProposal>, WebError> {
    Ok(Json(service.propose(id, req.status).await?))
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/transitions/confirm",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = TransitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Transition may be executed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found"),
        (status = 422, description = "Transition is not allowed")
    ),
    tag = "transitions"
)]
pub async fn confirm_transition(
    State(service): State<LifecycleService>,
    Path(id): Path<Uuid>,
    Json(req): Json<TransitionRequest>,
) -> Result<Response, WebError> {
    service.confirm(id, req.status).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/transitions/execute",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = ExecuteTransitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Status updated", body = CompetitionRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Competition changed since it was read"),
        (status = 422, description = "Transition is not allowed"),
        (status = 428, description = "Transition must be confirmed first")
    ),
    tag = "transitions"
)]
pub async fn execute_transition(
    State(service): State<LifecycleService>,
    Path(id): Path<Uuid>,
    Json(req): Json<ExecuteTransitionRequest>,
) -> Result<Json<CompetitionRecord>, WebError> {
    let record = service
        .execute_manual(id, req.status, req.expected_updated_at, req.confirmed)
        .await?;

    Ok(Json(record))
}
