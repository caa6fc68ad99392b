//! Immutable building and segment catalogs
//!
//! Static tables describing the stock buildings and segment variants.
//! Lookups by key return errors for unknown keys so that bad street data
//! surfaces as a configuration error instead of undefined behavior.

use anyhow::{anyhow, Result};

use super::types::BuildingSide;

/// Catalog entry describing one building kind
#[derive(Debug, Clone, Copy)]
pub struct BuildingInfo {
    /// Key used in street data
    pub id: &'static str,
    /// English fallback label
    pub label: &'static str,
    /// Sprite id prefix; `-left`/`-right` is appended unless
    /// `same_on_both_sides` is set
    pub sprite_id: &'static str,
    /// True if the building stacks multiple floors
    pub has_floors: bool,
    /// True if one sprite serves both sides of the street
    pub same_on_both_sides: bool,
    /// True if only half of the sprite repeats while the other half
    /// anchors to the street edge
    pub repeat_half: bool,
    /// True if the sprite bottom sits at the baseline rather than the
    /// ground plane
    pub align_at_baseline: bool,
    /// Number of middle-floor artwork variants (0 = single variant)
    pub variants_count: u32,
    /// Height of intermediate floors, in feet
    pub floor_height: f64,
    /// Height of the ground floor, in feet
    pub main_floor_height: f64,
    /// Height of the roof structure, in feet
    pub roof_height: f64,
    /// Amount the building overhangs the street edge, in design pixels;
    /// `None` uses [`DEFAULT_OVERHANG_WIDTH`]
    pub overhang_width: Option<f64>,
}

/// Default building overhang past the paved street edge, in design pixels
pub const DEFAULT_OVERHANG_WIDTH: f64 = 25.0;

const FLAT: BuildingInfo = BuildingInfo {
    id: "",
    label: "",
    sprite_id: "",
    has_floors: false,
    same_on_both_sides: false,
    repeat_half: false,
    align_at_baseline: false,
    variants_count: 0,
    floor_height: 0.0,
    main_floor_height: 0.0,
    roof_height: 0.0,
    overhang_width: None,
};

/// The stock building catalog
pub const BUILDINGS: &[BuildingInfo] = &[
    BuildingInfo {
        id: "grass",
        label: "Grass",
        sprite_id: "buildings--grass",
        same_on_both_sides: true,
        ..FLAT
    },
    BuildingInfo {
        id: "fence",
        label: "Empty lot",
        sprite_id: "buildings--fenced-lot",
        ..FLAT
    },
    BuildingInfo {
        id: "parking-lot",
        label: "Parking lot",
        sprite_id: "buildings--parking-lot",
        repeat_half: true,
        ..FLAT
    },
    BuildingInfo {
        id: "waterfront",
        label: "Waterfront",
        sprite_id: "buildings--waterfront",
        align_at_baseline: true,
        repeat_half: true,
        ..FLAT
    },
    BuildingInfo {
        id: "residential",
        label: "Home",
        sprite_id: "buildings--residential",
        has_floors: true,
        variants_count: 0,
        floor_height: 10.0,
        roof_height: 20.0,
        main_floor_height: 11.5,
        ..FLAT
    },
    BuildingInfo {
        id: "narrow",
        label: "Building",
        sprite_id: "buildings--apartments-narrow",
        has_floors: true,
        variants_count: 1,
        floor_height: 10.0,
        roof_height: 2.0,
        main_floor_height: 14.0,
        overhang_width: Some(9.0),
        ..FLAT
    },
    BuildingInfo {
        id: "wide",
        label: "Building",
        sprite_id: "buildings--apartments-wide",
        has_floors: true,
        variants_count: 1,
        floor_height: 10.0,
        roof_height: 2.0,
        main_floor_height: 14.0,
        overhang_width: Some(5.0),
        ..FLAT
    },
];

/// Look up a building by its catalog key
pub fn building_info(variant: &str) -> Result<&'static BuildingInfo> {
    BUILDINGS
        .iter()
        .find(|b| b.id == variant)
        .ok_or_else(|| anyhow!("Unknown building variant '{}'", variant))
}

/// Sprite id for a building on the given side of the street
pub fn building_sprite_id(building: &BuildingInfo, side: BuildingSide) -> String {
    if building.same_on_both_sides {
        building.sprite_id.to_string()
    } else {
        format!("{}{}", building.sprite_id, side.sprite_suffix())
    }
}

/// Catalog entry describing one segment variant
#[derive(Debug, Clone, Copy)]
pub struct SegmentVariantInfo {
    /// Segment kind key used in street data
    pub kind: &'static str,
    /// Variant string this entry matches; the first entry for a kind is
    /// the fallback for unknown variant strings
    pub variant: &'static str,
    /// English fallback name
    pub name: &'static str,
    pub sprite_id: &'static str,
    /// Minimum sensible width in tile units, if any
    pub min_width: Option<f64>,
    /// Maximum sensible width in tile units, if any
    pub max_width: Option<f64>,
    /// Draw-order layer; higher draws later. Ties draw in array order.
    pub z_index: f32,
    /// Horizontal offset of the artwork relative to the segment's left
    /// edge, in tile units (negative means artwork extends past the edge)
    pub graphics_left: f64,
    /// Number of tile variants packed side by side in the source image;
    /// a segment's rand seed picks among them per tile
    pub graphics_variants: u32,
}

/// The stock segment catalog
pub const SEGMENT_VARIANTS: &[SegmentVariantInfo] = &[
    SegmentVariantInfo {
        kind: "sidewalk",
        variant: "dense",
        name: "Sidewalk",
        sprite_id: "segments--sidewalk",
        min_width: Some(6.0),
        max_width: None,
        z_index: 2.0,
        graphics_left: 0.0,
        graphics_variants: 2,
    },
    SegmentVariantInfo {
        kind: "sidewalk-tree",
        variant: "big",
        name: "Sidewalk with a tree",
        sprite_id: "segments--sidewalk-tree",
        min_width: None,
        max_width: None,
        z_index: 2.0,
        graphics_left: -0.5,
        graphics_variants: 1,
    },
    SegmentVariantInfo {
        kind: "bike-lane",
        variant: "inbound|regular",
        name: "Bike lane",
        sprite_id: "segments--bike-lane-inbound",
        min_width: Some(5.0),
        max_width: Some(7.0),
        z_index: 2.0,
        graphics_left: 0.0,
        graphics_variants: 1,
    },
    SegmentVariantInfo {
        kind: "bike-lane",
        variant: "outbound|regular",
        name: "Bike lane",
        sprite_id: "segments--bike-lane-outbound",
        min_width: Some(5.0),
        max_width: Some(7.0),
        z_index: 2.0,
        graphics_left: 0.0,
        graphics_variants: 1,
    },
    SegmentVariantInfo {
        kind: "drive-lane",
        variant: "inbound|car",
        name: "Drive lane",
        sprite_id: "segments--drive-lane-inbound",
        min_width: Some(9.0),
        max_width: Some(11.9),
        z_index: 2.0,
        graphics_left: 0.0,
        graphics_variants: 1,
    },
    SegmentVariantInfo {
        kind: "drive-lane",
        variant: "outbound|car",
        name: "Drive lane",
        sprite_id: "segments--drive-lane-outbound",
        min_width: Some(9.0),
        max_width: Some(11.9),
        z_index: 2.0,
        graphics_left: 0.0,
        graphics_variants: 1,
    },
    SegmentVariantInfo {
        kind: "parking-lane",
        variant: "inbound|left",
        name: "Parking lane",
        sprite_id: "segments--parking-lane",
        min_width: Some(7.0),
        max_width: Some(10.0),
        z_index: 2.0,
        graphics_left: 0.0,
        graphics_variants: 1,
    },
    SegmentVariantInfo {
        kind: "bus-lane",
        variant: "inbound|regular",
        name: "Bus lane",
        sprite_id: "segments--bus-lane",
        min_width: Some(10.0),
        max_width: Some(12.0),
        z_index: 2.0,
        graphics_left: 0.0,
        graphics_variants: 1,
    },
    SegmentVariantInfo {
        kind: "divider",
        variant: "median",
        name: "Median",
        sprite_id: "segments--divider-median",
        min_width: None,
        max_width: None,
        z_index: 1.0,
        graphics_left: 0.0,
        graphics_variants: 1,
    },
    SegmentVariantInfo {
        kind: "turn-lane",
        variant: "inbound|left",
        name: "Turn lane",
        sprite_id: "segments--turn-lane-left",
        min_width: Some(9.0),
        max_width: Some(12.0),
        z_index: 3.0,
        graphics_left: 0.0,
        graphics_variants: 1,
    },
];

/// Look up a segment variant. Unknown kinds are an error; an unknown
/// variant string falls back to the kind's first catalog entry.
pub fn segment_variant_info(kind: &str, variant_string: &str) -> Result<&'static SegmentVariantInfo> {
    let mut fallback = None;
    for info in SEGMENT_VARIANTS {
        if info.kind != kind {
            continue;
        }
        if info.variant == variant_string {
            return Ok(info);
        }
        fallback.get_or_insert(info);
    }
    fallback.ok_or_else(|| anyhow!("Unknown segment kind '{}'", kind))
}
