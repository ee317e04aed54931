use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::models::Severity;

const RED_DOT: &str = "https://maps.google.com/mapfiles/ms/icons/red-dot.png";
const ORANGE_DOT: &str = "https://maps.google.com/mapfiles/ms/icons/orange-dot.png";
const GREEN_DOT: &str = "https://maps.google.com/mapfiles/ms/icons/green-dot.png";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Axis-aligned box around a set of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Smallest box containing every point, `None` for no points
    pub fn around(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            south_west: first,
            north_east: first,
        };
        for p in iter {
            bounds.south_west.lat = bounds.south_west.lat.min(p.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(p.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(p.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(p.lng);
        }
        Some(bounds)
    }

    /// Grow each side by `ratio` times the box's height or width
    pub fn pad(&self, ratio: f64) -> Self {
        let height_buffer = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let width_buffer = (self.north_east.lng - self.south_west.lng).abs() * ratio;
        Bounds {
            south_west: LatLng::new(
                self.south_west.lat - height_buffer,
                self.south_west.lng - width_buffer,
            ),
            north_east: LatLng::new(
                self.north_east.lat + height_buffer,
                self.north_east.lng + width_buffer,
            ),
        }
    }
}

/// The three marker colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Orange,
    Green,
}

impl From<Severity> for MarkerColor {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::High => MarkerColor::Red,
            Severity::Medium => MarkerColor::Orange,
            Severity::Low => MarkerColor::Green,
        }
    }
}

/// Icon options passed to the map widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarkerIcon {
    pub color: MarkerColor,
    pub icon_url: String,
    #[schema(value_type = Vec<u32>)]
    pub icon_size: [u32; 2],
    #[schema(value_type = Vec<i32>)]
    pub icon_anchor: [i32; 2],
    #[schema(value_type = Vec<i32>)]
    pub popup_anchor: [i32; 2],
}

impl MarkerIcon {
    pub fn for_severity(severity: Severity) -> Self {
        let color = MarkerColor::from(severity);
        let icon_url = match color {
            MarkerColor::Red => RED_DOT,
            MarkerColor::Orange => ORANGE_DOT,
            MarkerColor::Green => GREEN_DOT,
        };
        Self {
            color,
            icon_url: icon_url.to_string(),
            icon_size: [32, 32],
            icon_anchor: [16, 32],
            popup_anchor: [0, -28],
        }
    }
}

/// Popup text; the page builds the markup from these fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarkerPopup {
    /// "City, State" for reports from the static data file
    pub heading: Option<String>,
    pub severity: Severity,
    pub description: String,
    /// "lat, lng" at 3 decimals for reports submitted in this session
    pub coordinates: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Marker {
    pub report_id: i64,
    pub position: LatLng,
    pub icon: MarkerIcon,
    pub popup: MarkerPopup,
}

/// Layer state held by a map canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MapLayers {
    pub markers: Vec<Marker>,
    pub fitted_bounds: Option<Bounds>,
    pub pending_pin: Option<LatLng>,
}

/// Everything the browser needs to draw the map
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    #[serde(flatten)]
    pub layers: MapLayers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_by_severity() {
        assert_eq!(MarkerIcon::for_severity(Severity::High).icon_url, RED_DOT);
        assert_eq!(MarkerIcon::for_severity(Severity::Medium).icon_url, ORANGE_DOT);
        assert_eq!(MarkerIcon::for_severity(Severity::Low).icon_url, GREEN_DOT);
    }

    #[test]
    fn test_bounds_around_points() {
        let bounds = Bounds::around(vec![
            LatLng::new(10.0, 20.0),
            LatLng::new(-5.0, 30.0),
            LatLng::new(2.0, 25.0),
        ])
        .unwrap();

        assert_eq!(bounds.south_west, LatLng::new(-5.0, 20.0));
        assert_eq!(bounds.north_east, LatLng::new(10.0, 30.0));
    }

    #[test]
    fn test_bounds_around_nothing() {
        assert!(Bounds::around(Vec::new()).is_none());
    }

    #[test]
    fn test_pad() {
        let bounds = Bounds {
            south_west: LatLng::new(0.0, 0.0),
            north_east: LatLng::new(10.0, 20.0),
        };
        let padded = bounds.pad(0.2);

        assert_eq!(padded.south_west, LatLng::new(-2.0, -4.0));
        assert_eq!(padded.north_east, LatLng::new(12.0, 24.0));
    }
}
