mod map_canvas;
mod map_service;

pub use map_canvas::{LeafletCanvas, MapCanvas};
pub use map_service::MapService;
