//! Procedural rendering module
//!
//! Sprite compositing for buildings and segments, the whole-street
//! thumbnail renderer, and the drawing-surface/atlas seams they draw
//! through.

mod compositor;
mod surface;
mod thumbnail;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use compositor::{
    building_image_height, building_real_height, draw_building, draw_segment_contents,
    draw_segment_image, shade_in_surface, Destination, RenderContext,
};
#[allow(unused_imports)]
pub use surface::{
    Color, CompositeMode, DrawSurface, Font, PlaceholderAtlas, Raster, Sprite, SpriteAtlas,
};
#[allow(unused_imports)]
pub use thumbnail::{
    draw_street_thumbnail, needs_unicode_font, prettify_width, truncate_label, ThumbnailOptions,
};
