use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::map::dtos::{PendingPinResponseDto, SetPinDto};
use crate::features::map::models::{LatLng, MapView};
use crate::features::map::services::MapService;
use crate::shared::types::ApiResponse;

/// Current map state: viewport, report markers and pending pin
#[utoipa::path(
    get,
    path = "/api/map",
    responses(
        (status = 200, description = "Map state", body = ApiResponse<MapView>)
    ),
    tag = "map"
)]
pub async fn get_map_view(
    State(service): State<Arc<MapService>>,
) -> Result<Json<ApiResponse<MapView>>> {
    Ok(Json(ApiResponse::success(
        Some(service.view().await),
        None,
        None,
    )))
}

/// Place the pending pin where the user clicked
#[utoipa::path(
    put,
    path = "/api/map/pin",
    request_body = SetPinDto,
    responses(
        (status = 200, description = "Pin placed", body = ApiResponse<PendingPinResponseDto>),
        (status = 400, description = "Invalid coordinates")
    ),
    tag = "map"
)]
pub async fn set_pending_pin(
    State(service): State<Arc<MapService>>,
    AppJson(dto): AppJson<SetPinDto>,
) -> Result<Json<ApiResponse<PendingPinResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let location = service.set_pending_pin(dto.lat, dto.lng).await;
    Ok(Json(ApiResponse::success(
        Some(PendingPinResponseDto {
            pin: LatLng::new(dto.lat, dto.lng),
            location,
        }),
        None,
        None,
    )))
}

/// Remove the pending pin
#[utoipa::path(
    delete,
    path = "/api/map/pin",
    responses(
        (status = 200, description = "Pin removed")
    ),
    tag = "map"
)]
pub async fn clear_pending_pin(
    State(service): State<Arc<MapService>>,
) -> Result<Json<ApiResponse<()>>> {
    service.clear_pending_pin().await;
    Ok(Json(ApiResponse::success(None, None, None)))
}
