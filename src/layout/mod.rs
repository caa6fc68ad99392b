//! Street layout module
//!
//! All the layout math that runs independently of any drawing surface:
//! width/warning recalculation, per-segment pixel positions (including
//! drag-time repositioning), and the popup hover polygon.

mod catalog;
mod hover;
mod position;
mod types;
mod width;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use catalog::{
    building_info, building_sprite_id, segment_variant_info, BuildingInfo, SegmentVariantInfo,
    BUILDINGS, DEFAULT_OVERHANG_WIDTH, SEGMENT_VARIANTS,
};
#[allow(unused_imports)]
pub use hover::{
    hover_polygon, point_in_polygon, Bounds, HoverPolygonDebouncer, Point,
    HOVER_POLYGON_DEBOUNCE,
};
#[allow(unused_imports)]
pub use position::{segment_pixel_width, segment_position};
#[allow(unused_imports)]
pub use types::{
    normalize_street_width, BuildingSide, DraggingState, Segment, SegmentId, SegmentWarnings,
    Street, Units, DEFAULT_STREET_WIDTH, DRAGGING_MOVE_HOLE_WIDTH, GROUND_BASELINE_HEIGHT,
    MAX_BUILDING_HEIGHT, MAX_CUSTOM_STREET_WIDTH, MIN_CUSTOM_STREET_WIDTH,
    TILESET_POINT_PER_PIXEL, TILE_SIZE, WIDTH_ROUNDING,
};
#[allow(unused_imports)]
pub use width::{recalculate, recalculate_width, WidthCalculation};
