mod map;

pub use map::{Bounds, LatLng, MapLayers, MapView, Marker, MarkerColor, MarkerIcon, MarkerPopup};
