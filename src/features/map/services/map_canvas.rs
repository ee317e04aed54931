use crate::features::map::models::{Bounds, LatLng, MapLayers, Marker};

/// Seam to the map widget that draws markers in the browser.
pub trait MapCanvas: Send + Sync {
    fn add_marker(&mut self, marker: Marker);

    fn fit_bounds(&mut self, bounds: Bounds);

    /// Place the pending pin, replacing any previous one
    fn place_pin(&mut self, position: LatLng);

    fn remove_pin(&mut self);

    fn markers(&self) -> &[Marker];

    fn layers(&self) -> MapLayers;
}

/// Keeps Leaflet layer state server-side; the page script replays it
#[derive(Debug, Default)]
pub struct LeafletCanvas {
    layers: MapLayers,
}

impl LeafletCanvas {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MapCanvas for LeafletCanvas {
    fn add_marker(&mut self, marker: Marker) {
        self.layers.markers.push(marker);
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.layers.fitted_bounds = Some(bounds);
    }

    fn place_pin(&mut self, position: LatLng) {
        self.layers.pending_pin = Some(position);
    }

    fn remove_pin(&mut self) {
        self.layers.pending_pin = None;
    }

    fn markers(&self) -> &[Marker] {
        &self.layers.markers
    }

    fn layers(&self) -> MapLayers {
        self.layers.clone()
    }
}
