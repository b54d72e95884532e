use crate::models::ErrorResponse;
use crate::state::AppState;
use crate::validation::validate_draft;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cachet::{ItemDraft, ItemDto, ItemId, ItemOperations};
use tracing::{error, info};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn error_response(err: shared::Error) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        shared::Error::NotFound => (StatusCode::NOT_FOUND, Json(ErrorResponse::new("not found"))),
        other => {
            error!("Item operation failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal error")),
            )
        }
    }
}

/// POST /items
pub async fn create_item(
    State(state): State<AppState>,
    Json(draft): Json<ItemDraft>,
) -> ApiResult<ItemDto> {
    info!("CREATE: name={}", draft.name);

    validate_draft(&draft)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))))?;

    state.items.create(draft).await.map(Json).map_err(error_response)
}

/// GET /items
pub async fn read_all_items(State(state): State<AppState>) -> ApiResult<Vec<ItemDto>> {
    info!("READ ALL");
    state.items.read_all().await.map(Json).map_err(error_response)
}

/// GET /items/{id}
pub async fn read_item(State(state): State<AppState>, Path(id): Path<ItemId>) -> ApiResult<ItemDto> {
    info!("READ: id={}", id);
    state.items.read_one(id).await.map(Json).map_err(error_response)
}

/// GET /items/{id}/manual
pub async fn read_item_manual(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> ApiResult<ItemDto> {
    info!("READ MANUAL: id={}", id);
    state.items.read_one_manual(id).await.map(Json).map_err(error_response)
}
