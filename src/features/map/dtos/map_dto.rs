use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::map::models::LatLng;

/// Request DTO for a click on the map
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetPinDto {
    #[validate(range(min = -90.0, max = 90.0, message = "lat must be between -90 and 90"))]
    #[schema(example = 19.076)]
    pub lat: f64,
    #[schema(example = 72.8777)]
    pub lng: f64,
}

/// Response DTO for the pending pin
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PendingPinResponseDto {
    pub pin: LatLng,
    /// Text for the form's location field, "lat, lng" at 5 decimals
    #[schema(example = "19.07600, 72.87770")]
    pub location: String,
}
