//! Handler functions: parse/validate input, dispatch to the engine or query
//! service, serialize the canonical response shapes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::db::{NewUser, SessionFilter};
use crate::engine::CreateSessionInput;
use crate::error::{EngineError, ValidationKind};
use crate::facade::dto::{
    CreateSessionRequest, CreateUserRequest, JoinRequest, LeaderboardEntryDto, LeaderboardQuery,
    ListSessionsQuery, MoveRequest, SessionResponse, SessionsPageResponse, UserResponse,
};
use crate::facade::extract::ValidatedJson;
use crate::facade::routes::AppState;
use crate::rules::GameType;

const MAX_LIST_LIMIT: i64 = 100;
const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LEADERBOARD_LIMIT: usize = 100;
const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[instrument(skip(state, req), fields(name = %req.name))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), EngineError> {
    if req.name.trim().is_empty() {
        return Err(EngineError::validation(
            ValidationKind::InvalidName,
            "name must not be empty",
        ));
    }
    let new_user = NewUser::new(Uuid::new_v4().to_string(), req.name, req.icon);
    let store = state.store.clone();
    let user = tokio::task::spawn_blocking(move || store.create_user(new_user))
        .await
        .map_err(|e| EngineError::internal(format!("create_user join error: {e}")))?
        .map_err(EngineError::from)?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, req), fields(host_id = %req.host_id))]
pub async fn create_session(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), EngineError> {
    let input = CreateSessionInput {
        host_id: req.host_id,
        host_name: req.host_name,
        host_icon: req.host_icon,
        game_icon: req.game_icon,
        game_type: req.game_type.unwrap_or(GameType::TicTacToe),
    };
    let session = state.engine.create_session(input).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, EngineError> {
    let session = state.query.get_session(&session_id)?;
    Ok(Json(session.into()))
}

#[instrument(skip(state, query))]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<SessionsPageResponse>, EngineError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(EngineError::validation(
            ValidationKind::InvalidLimit,
            format!("limit must be between 1 and {MAX_LIST_LIMIT}"),
        ));
    }
    let filter = SessionFilter {
        status: query.status,
        host_id: query.host_id,
        limit,
        cursor: query.cursor,
    };
    let page = state.query.list_sessions(filter)?;
    Ok(Json(page.into()))
}

#[instrument(skip(state, req), fields(session_id = %session_id, player_id = %req.player_id))]
pub async fn join_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    ValidatedJson(req): ValidatedJson<JoinRequest>,
) -> Result<Json<SessionResponse>, EngineError> {
    let session = state.engine.join_session(&session_id, &req.player_id).await?;
    Ok(Json(session.into()))
}

#[instrument(skip(state, req), fields(session_id = %session_id, player_id = %req.player_id, row = req.row, col = req.col))]
pub async fn submit_move(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    ValidatedJson(req): ValidatedJson<MoveRequest>,
) -> Result<Json<SessionResponse>, EngineError> {
    let row = usize::try_from(req.row)
        .map_err(|_| EngineError::validation(ValidationKind::InvalidCoordinates, "invalid_coordinates"))?;
    let col = usize::try_from(req.col)
        .map_err(|_| EngineError::validation(ValidationKind::InvalidCoordinates, "invalid_coordinates"))?;
    let session = state
        .engine
        .submit_move(&session_id, &req.player_id, row, col)
        .await?;
    Ok(Json(session.into()))
}

#[instrument(skip(state, query))]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntryDto>>, EngineError> {
    let metric = query.metric()?;
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    if limit == 0 || limit > MAX_LEADERBOARD_LIMIT {
        return Err(EngineError::validation(
            ValidationKind::InvalidLimit,
            format!("limit must be between 1 and {MAX_LEADERBOARD_LIMIT}"),
        ));
    }
    let entries = state.query.leaderboard(metric, limit)?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Liveness probe.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
