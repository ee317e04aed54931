use tokio::sync::RwLock;

use crate::core::config::MapConfig;
use crate::features::map::models::{Bounds, LatLng, MapView, Marker, MarkerIcon, MarkerPopup};
use crate::features::map::services::MapCanvas;
use crate::features::reports::models::Report;
use crate::shared::constants::PIN_LOCATION_PRECISION;
use crate::shared::validation::format_location;

/// Padding applied around the markers when fitting the viewport
const FIT_PADDING: f64 = 0.2;

/// Service for the map display: report markers, viewport and pending pin
pub struct MapService {
    config: MapConfig,
    canvas: RwLock<Box<dyn MapCanvas>>,
}

impl MapService {
    pub fn new(config: MapConfig, canvas: Box<dyn MapCanvas>) -> Self {
        Self {
            config,
            canvas: RwLock::new(canvas),
        }
    }

    /// Place one marker per report and fit the viewport around this batch
    pub async fn place_report_markers(&self, reports: &[Report]) {
        if reports.is_empty() {
            return;
        }

        let markers: Vec<Marker> = reports.iter().map(seed_marker).collect();
        let bounds = Bounds::around(markers.iter().map(|m| m.position));

        let mut canvas = self.canvas.write().await;
        for marker in markers {
            canvas.add_marker(marker);
        }
        if let Some(bounds) = bounds {
            canvas.fit_bounds(bounds.pad(FIT_PADDING));
        }

        tracing::debug!("Placed {} report markers", reports.len());
    }

    /// Marker for a report submitted in this session; the viewport stays put
    pub async fn place_submitted_marker(&self, report: &Report) -> Marker {
        let marker = submitted_marker(report);
        self.canvas.write().await.add_marker(marker.clone());
        marker
    }

    /// Replace the pending pin and return the text for the form's location field
    pub async fn set_pending_pin(&self, lat: f64, lng: f64) -> String {
        self.canvas.write().await.place_pin(LatLng::new(lat, lng));
        format_location(lat, lng, PIN_LOCATION_PRECISION)
    }

    pub async fn clear_pending_pin(&self) {
        self.canvas.write().await.remove_pin();
    }

    pub async fn pending_pin(&self) -> Option<LatLng> {
        self.canvas.read().await.layers().pending_pin
    }

    /// Location field text for the current pending pin
    pub async fn pending_location(&self) -> Option<String> {
        self.pending_pin()
            .await
            .map(|p| format_location(p.lat, p.lng, PIN_LOCATION_PRECISION))
    }

    pub async fn marker_count(&self) -> usize {
        self.canvas.read().await.markers().len()
    }

    pub async fn view(&self) -> MapView {
        MapView {
            center: LatLng::new(self.config.center_lat, self.config.center_lng),
            zoom: self.config.zoom,
            tile_url: self.config.tile_url.clone(),
            attribution: self.config.attribution.clone(),
            layers: self.canvas.read().await.layers(),
        }
    }
}

fn seed_marker(report: &Report) -> Marker {
    let heading = [report.city.as_deref(), report.state.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    Marker {
        report_id: report.id,
        position: LatLng::new(report.lat, report.lng),
        icon: MarkerIcon::for_severity(report.severity),
        popup: MarkerPopup {
            heading: (!heading.is_empty()).then_some(heading),
            severity: report.severity,
            description: report.comments.clone(),
            coordinates: None,
        },
    }
}

fn submitted_marker(report: &Report) -> Marker {
    Marker {
        report_id: report.id,
        position: LatLng::new(report.lat, report.lng),
        icon: MarkerIcon::for_severity(report.severity),
        popup: MarkerPopup {
            heading: None,
            severity: report.severity,
            description: report.comments.clone(),
            coordinates: Some(format_location(report.lat, report.lng, 3)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::map::models::MarkerColor;
    use crate::features::map::services::LeafletCanvas;
    use crate::features::reports::models::{ReportStatus, Severity};

    fn service() -> MapService {
        MapService::new(MapConfig::default(), Box::new(LeafletCanvas::new()))
    }

    fn report(id: i64, lat: f64, lng: f64, severity: Severity) -> Report {
        Report {
            id,
            lat,
            lng,
            severity,
            comments: "flood".to_string(),
            photo_url: String::new(),
            status: ReportStatus::Submitted,
            timestamp: "01/01/2026, 10:00:00".to_string(),
            photo_file: None,
            city: Some("X".to_string()),
            state: Some("Y".to_string()),
        }
    }

    #[tokio::test]
    async fn test_single_high_report_gets_one_red_marker() {
        let map = service();
        map.place_report_markers(&[report(1, 10.0, 20.0, Severity::High)])
            .await;

        let view = map.view().await;
        assert_eq!(view.layers.markers.len(), 1);
        let marker = &view.layers.markers[0];
        assert_eq!(marker.icon.color, MarkerColor::Red);
        assert_eq!(marker.popup.heading.as_deref(), Some("X, Y"));
        assert!(view.layers.fitted_bounds.is_some());
    }

    #[tokio::test]
    async fn test_seed_popup_heading_skips_missing_parts() {
        let map = service();
        let mut city_only = report(1, 10.0, 20.0, Severity::High);
        city_only.state = None;
        let mut unnamed = report(2, 11.0, 21.0, Severity::Low);
        unnamed.city = None;
        unnamed.state = Some(String::new());

        map.place_report_markers(&[city_only, unnamed]).await;

        let markers = map.view().await.layers.markers;
        assert_eq!(markers[0].popup.heading.as_deref(), Some("X"));
        assert!(markers[1].popup.heading.is_none());
    }

    #[tokio::test]
    async fn test_fit_bounds_is_padded() {
        let map = service();
        map.place_report_markers(&[
            report(1, 0.0, 0.0, Severity::Low),
            report(2, 10.0, 20.0, Severity::Medium),
        ])
        .await;

        let bounds = map.view().await.layers.fitted_bounds.unwrap();
        assert_eq!(bounds.south_west, LatLng::new(-2.0, -4.0));
        assert_eq!(bounds.north_east, LatLng::new(12.0, 24.0));
    }

    #[tokio::test]
    async fn test_no_reports_leaves_viewport_alone() {
        let map = service();
        map.place_report_markers(&[]).await;

        let view = map.view().await;
        assert!(view.layers.markers.is_empty());
        assert!(view.layers.fitted_bounds.is_none());
        assert_eq!(view.zoom, 5);
    }

    #[tokio::test]
    async fn test_new_pin_replaces_previous() {
        let map = service();
        map.set_pending_pin(1.0, 2.0).await;
        let location = map.set_pending_pin(19.076, 72.8777).await;

        assert_eq!(location, "19.07600, 72.87770");
        assert_eq!(map.pending_pin().await, Some(LatLng::new(19.076, 72.8777)));
        assert_eq!(map.marker_count().await, 0);
    }

    #[tokio::test]
    async fn test_clear_pending_pin() {
        let map = service();
        map.set_pending_pin(1.0, 2.0).await;
        map.clear_pending_pin().await;
        assert!(map.pending_pin().await.is_none());
        assert!(map.pending_location().await.is_none());
    }

    #[tokio::test]
    async fn test_submitted_marker_popup_has_coordinates() {
        let map = service();
        let mut submitted = report(5, 12.34567, 76.54321, Severity::Low);
        submitted.city = None;
        submitted.state = None;
        map.place_submitted_marker(&submitted).await;

        let view = map.view().await;
        let marker = &view.layers.markers[0];
        assert_eq!(marker.icon.color, MarkerColor::Green);
        assert_eq!(marker.popup.coordinates.as_deref(), Some("12.346, 76.543"));
        assert!(marker.popup.heading.is_none());
        assert!(view.layers.fitted_bounds.is_none());
    }
}
