//! Core types for street layout
//!
//! These are standalone data records that don't depend on any rendering
//! backend. Derived values (occupied/remaining width, warnings) are always
//! recomputed, never treated as authoritative storage.

/// A stable identity token for a segment
///
/// Survives reorders so that an external UI layer can keep animations
/// continuous. This is a simple wrapper around a u64 for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId(pub u64);

/// Measurement units used for label formatting
///
/// Widths are always stored in tile units; units only affect how widths
/// are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Imperial,
    Metric,
}

/// Which side of the street a building stands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingSide {
    Left,
    Right,
}

impl BuildingSide {
    /// Suffix appended to sprite id prefixes for side-specific artwork
    pub fn sprite_suffix(self) -> &'static str {
        match self {
            BuildingSide::Left => "-left",
            BuildingSide::Right => "-right",
        }
    }
}

/// Per-segment warnings, freshly derived on every recalculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentWarnings {
    /// Some portion of the segment lies outside the street width
    pub outside: bool,
    /// Segment is narrower than the variant's minimum width
    pub width_too_small: bool,
    /// Segment is wider than the variant's maximum width
    pub width_too_large: bool,
}

impl SegmentWarnings {
    pub fn any(&self) -> bool {
        self.outside || self.width_too_small || self.width_too_large
    }
}

/// One slice of the street cross-section
#[derive(Debug, Clone)]
pub struct Segment {
    pub id: SegmentId,
    /// Catalog key for the segment kind, e.g. "sidewalk"
    pub kind: String,
    /// Composite sub-variant key, e.g. "inbound|regular"
    pub variant_string: String,
    /// Width in tile units
    pub width: f64,
    /// Seed for deterministic per-segment procedural variation
    pub rand_seed: u64,
    pub warnings: SegmentWarnings,
}

impl Segment {
    pub fn new(id: SegmentId, kind: &str, variant_string: &str, width: f64, rand_seed: u64) -> Self {
        Self {
            id,
            kind: kind.to_string(),
            variant_string: variant_string.to_string(),
            width,
            rand_seed,
            warnings: SegmentWarnings::default(),
        }
    }
}

/// A street: overall width, ordered segments, and a building on each edge
#[derive(Debug, Clone)]
pub struct Street {
    pub name: Option<String>,
    /// Total street width in tile units
    pub width: f64,
    pub units: Units,
    pub segments: Vec<Segment>,
    /// Building catalog key for the left edge
    pub left_building_variant: String,
    /// Building catalog key for the right edge
    pub right_building_variant: String,
    /// Floor count for the left building, minimum 1
    pub left_building_height: u32,
    /// Floor count for the right building, minimum 1
    pub right_building_height: u32,
    /// Derived: sum of all segment widths
    pub occupied_width: f64,
    /// Derived: street width minus occupied width, snapped to 0 near zero
    pub remaining_width: f64,
}

impl Street {
    pub fn new(width: f64, units: Units) -> Self {
        Self {
            name: None,
            width,
            units,
            segments: Vec::new(),
            left_building_variant: "grass".to_string(),
            right_building_variant: "grass".to_string(),
            left_building_height: 1,
            right_building_height: 1,
            occupied_width: 0.0,
            remaining_width: width,
        }
    }

    /// Building variant key for the given side
    pub fn building_variant(&self, side: BuildingSide) -> &str {
        match side {
            BuildingSide::Left => &self.left_building_variant,
            BuildingSide::Right => &self.right_building_variant,
        }
    }

    /// Floor count for the given side
    pub fn building_floors(&self, side: BuildingSide) -> u32 {
        match side {
            BuildingSide::Left => self.left_building_height,
            BuildingSide::Right => self.right_building_height,
        }
    }
}

/// Ephemeral drag state, owned by the UI session and never persisted
#[derive(Debug, Clone, Copy)]
pub struct DraggingState {
    /// Index of the segment currently lifted out of flow
    pub dragged_segment: usize,
    /// Index of the segment just before the drop target, if any
    pub segment_before: Option<usize>,
    /// Index of the segment just after the drop target, if any
    pub segment_after: Option<usize>,
    /// Whether the pointer is currently within the street canvas bounds
    pub within_canvas: bool,
}

/// Clamp a street width into the allowed custom range and round it to the
/// given unit resolution.
pub fn normalize_street_width(width: f64, resolution: f64) -> f64 {
    let clamped = width.clamp(MIN_CUSTOM_STREET_WIDTH, MAX_CUSTOM_STREET_WIDTH);
    (clamped / resolution).round() * resolution
}

/// Design-space pixels per tile unit
pub const TILE_SIZE: f64 = 12.0;

/// Scale factor between sprite source pixels and design pixels
pub const TILESET_POINT_PER_PIXEL: f64 = 2.0;

/// Width in pixels of the hole left open for a dragged segment
pub const DRAGGING_MOVE_HOLE_WIDTH: f64 = 40.0;

/// Tolerance for snapping remaining width to zero
pub const WIDTH_ROUNDING: f64 = 0.01;

/// Default street width in tile units
pub const DEFAULT_STREET_WIDTH: f64 = 80.0;

pub const MIN_CUSTOM_STREET_WIDTH: f64 = 10.0;
pub const MAX_CUSTOM_STREET_WIDTH: f64 = 400.0;

/// Maximum floor count a building can be set to
pub const MAX_BUILDING_HEIGHT: u32 = 20;

/// Height of the ground strip below the street baseline, in design pixels
pub const GROUND_BASELINE_HEIGHT: f64 = 44.0;
