//! Procedural sprite compositing for buildings and segments
//!
//! One parameterized path serves every render destination; the only
//! destination-specific behavior is the on-screen over-occupancy tint.
//! All procedural variation comes from explicitly seeded RNG instances so
//! identical inputs always produce identical draws.

use anyhow::Result;
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::layout::{
    building_info, building_sprite_id, segment_variant_info, BuildingInfo, BuildingSide, Segment,
    Street, DEFAULT_OVERHANG_WIDTH, GROUND_BASELINE_HEIGHT, MAX_BUILDING_HEIGHT, TILE_SIZE,
};
use super::surface::{Color, CompositeMode, DrawSurface, SpriteAtlas};

/// Where the render output is headed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The live on-screen canvas
    Screen,
    /// A static thumbnail or file export
    Thumbnail,
    /// The preview that follows a dragged segment
    DragPreview,
}

/// Parameters shared by every draw in one render pass
///
/// `multiplier` is the design-to-output scale and affects layout math;
/// `dpi` is device pixel density and affects only raster resolution. The
/// two are applied separately everywhere so multi-resolution export stays
/// consistent.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub destination: Destination,
    pub multiplier: f64,
    pub dpi: f64,
}

impl RenderContext {
    pub fn new(destination: Destination, multiplier: f64, dpi: f64) -> Self {
        Self {
            destination,
            multiplier,
            dpi,
        }
    }
}

/// Middle-floor variant sequences are reseeded to this fixed value on
/// every render call, keeping the per-floor pattern stable across
/// re-renders of the same building.
const MIDDLE_FLOOR_SEED: u64 = 0;

/// Translucent tint composited over drawn pixels when the street is
/// over-occupied
const OVER_OCCUPANCY_TINT: Color = Color::rgba(204, 163, 173, 230);

/// Blit a sprite sub-region through the render context's scaling.
///
/// `sx`/`sy` are in source pixels. `sw`/`sh` are in design pixels and
/// default to the sprite's full size; `dw`/`dh` default to `sw`/`sh`.
/// `dx`/`dy` are output design-pixel positions (the caller applies the
/// multiplier to positions); destination sizes are multiplied here, and
/// everything is scaled by dpi last.
///
/// A sprite id missing from the atlas skips the draw with a warning.
#[allow(clippy::too_many_arguments)]
pub fn draw_segment_image(
    atlas: &dyn SpriteAtlas,
    surface: &mut dyn DrawSurface,
    sprite_id: &str,
    sx: f64,
    sy: f64,
    sw: Option<f64>,
    sh: Option<f64>,
    dx: f64,
    dy: f64,
    dw: Option<f64>,
    dh: Option<f64>,
    ctx: &RenderContext,
) {
    let Some(sprite) = atlas.get(sprite_id) else {
        warn!("Sprite '{}' not in atlas, skipping draw", sprite_id);
        return;
    };

    let sw = sw.unwrap_or(sprite.width / sprite.scale);
    let sh = sh.unwrap_or(sprite.height / sprite.scale);
    let dw = dw.unwrap_or(sw);
    let dh = dh.unwrap_or(sh);

    surface.draw_image(
        sprite,
        sx,
        sy,
        sw * sprite.scale,
        sh * sprite.scale,
        dx * ctx.dpi,
        dy * ctx.dpi,
        dw * ctx.multiplier * ctx.dpi,
        dh * ctx.multiplier * ctx.dpi,
    );
}

/// Rendered height of a building in design pixels.
///
/// Floored buildings are computed from floor specifications; single-slab
/// buildings use the sprite's intrinsic height. Floor counts below 1 are
/// clamped to 1.
pub fn building_image_height(
    atlas: &dyn SpriteAtlas,
    building: &BuildingInfo,
    side: BuildingSide,
    floors: u32,
) -> f64 {
    let floors = floors.max(1) as f64;
    if building.has_floors {
        (building.roof_height + building.floor_height * (floors - 1.0) + building.main_floor_height)
            * TILE_SIZE
    } else {
        let id = building_sprite_id(building, side);
        match atlas.get(&id) {
            Some(sprite) => sprite.height / sprite.scale,
            None => {
                warn!("Sprite '{}' not in atlas, building height unknown", id);
                0.0
            }
        }
    }
}

/// Real-world height of a building in tile units, measured from the top of
/// the curb.
pub fn building_real_height(
    atlas: &dyn SpriteAtlas,
    building: &BuildingInfo,
    side: BuildingSide,
    floors: u32,
) -> f64 {
    const CURB_HEIGHT: f64 = 6.0;
    (building_image_height(atlas, building, side, floors) - CURB_HEIGHT) / TILE_SIZE
}

/// Draw one edge building: tiled single-slab sprites or a floored
/// ground/middle/roof stack, shifted so the building overhangs the street
/// edge by its catalog overhang.
#[allow(clippy::too_many_arguments)]
pub fn draw_building(
    atlas: &dyn SpriteAtlas,
    surface: &mut dyn DrawSurface,
    ctx: &RenderContext,
    street: &Street,
    side: BuildingSide,
    total_width: f64,
    total_height: f64,
    offset_left: f64,
) -> Result<()> {
    let variant = street.building_variant(side);
    let floors = street.building_floors(side).clamp(1, MAX_BUILDING_HEIGHT);
    let building = building_info(variant)?;
    let sprite_id = building_sprite_id(building, side);

    let Some(sprite) = atlas.get(&sprite_id) else {
        warn!("Sprite '{}' not in atlas, skipping building", sprite_id);
        return Ok(());
    };

    let m = ctx.multiplier;
    let building_height = building_image_height(atlas, building, side, floors);

    let mut offset_top = total_height - building_height * m;
    if building.align_at_baseline {
        offset_top += GROUND_BASELINE_HEIGHT;
    }

    // Some building sprites tile as a whole; repeat-half sprites tile one
    // half and anchor the other half at the street edge.
    let (width, x, first_x, last_x) = if building.repeat_half {
        let width = sprite.width / sprite.scale / 2.0;
        match side {
            BuildingSide::Left => (width, 0.0, None, Some(sprite.width / 2.0)),
            BuildingSide::Right => (width, sprite.width / 2.0, Some(0.0), None),
        }
    } else {
        (sprite.width / sprite.scale, 0.0, None, None)
    };

    let overhang = building.overhang_width.unwrap_or(DEFAULT_OVERHANG_WIDTH);
    let left_pos_shift = match side {
        BuildingSide::Left => {
            if building.has_floors {
                total_width - (width + overhang)
            } else {
                // Account for tiling so the last tile's right edge lands
                // on the street edge
                (total_width % width) - (width + width + overhang)
            }
        }
        BuildingSide::Right => overhang,
    };

    if building.has_floors {
        let main_floor = building.main_floor_height;
        let floor_height = building.floor_height;
        let roof = building.roof_height;

        // Ground floor
        draw_segment_image(
            atlas,
            surface,
            &sprite_id,
            0.0,
            sprite.height - main_floor * TILE_SIZE * sprite.scale,
            None,
            Some(main_floor * TILE_SIZE),
            offset_left + left_pos_shift * m,
            offset_top + (building_height - main_floor * TILE_SIZE) * m,
            None,
            Some(main_floor * TILE_SIZE),
            ctx,
        );

        // Middle floors, variant sequence reseeded per render call
        let mut rng = StdRng::seed_from_u64(MIDDLE_FLOOR_SEED);
        for i in 1..floors {
            let floor_variant = if building.variants_count == 0 {
                0
            } else {
                (rng.random::<f64>() * building.variants_count as f64).floor() as u32 + 1
            };

            draw_segment_image(
                atlas,
                surface,
                &sprite_id,
                0.0,
                sprite.height
                    - main_floor * TILE_SIZE * sprite.scale
                    - floor_height * TILE_SIZE * floor_variant as f64 * sprite.scale,
                None,
                Some(floor_height * TILE_SIZE),
                offset_left + left_pos_shift * m,
                offset_top + building_height * m
                    - (main_floor + floor_height * i as f64) * TILE_SIZE * m,
                None,
                Some(floor_height * TILE_SIZE),
                ctx,
            );
        }

        // Roof
        draw_segment_image(
            atlas,
            surface,
            &sprite_id,
            0.0,
            0.0,
            None,
            Some(roof * TILE_SIZE),
            offset_left + left_pos_shift * m,
            offset_top + building_height * m
                - (main_floor + floor_height * (floors - 1) as f64 + roof) * TILE_SIZE * m,
            None,
            Some(roof * TILE_SIZE),
            ctx,
        );
    } else {
        // Over-draw one tile on each edge so fractional remainders never
        // leave a gap
        let count = (total_width / width).floor() as i64 + 2;

        for i in 0..count {
            let current_x = if i == 0 && first_x.is_some() {
                first_x.unwrap_or(x)
            } else if i == count - 1 && last_x.is_some() {
                last_x.unwrap_or(x)
            } else {
                x
            };

            draw_segment_image(
                atlas,
                surface,
                &sprite_id,
                current_x,
                0.0,
                Some(width),
                None,
                offset_left + (left_pos_shift + i as f64 * width) * m,
                offset_top,
                Some(width),
                None,
                ctx,
            );
        }
    }

    // Over-occupancy cue, live canvas only; shading a large export canvas
    // would tint the entire background
    if street.remaining_width < 0.0 && ctx.destination == Destination::Screen {
        shade_in_surface(surface);
    }

    Ok(())
}

/// Composite the over-occupancy tint over already-drawn opaque pixels
pub fn shade_in_surface(surface: &mut dyn DrawSurface) {
    surface.set_composite_mode(CompositeMode::SourceAtop);
    let w = surface.width() as f64;
    let h = surface.height() as f64;
    surface.fill_rect(0.0, 0.0, w, h, OVER_OCCUPANCY_TINT);
    surface.set_composite_mode(CompositeMode::SourceOver);
}

/// Tile a segment's artwork across its width, bottoms aligned to the
/// ground line `ground_y` (an output design-pixel position).
///
/// The segment's `rand_seed` seeds variant choice for artwork with more
/// than one packed tile variant, so the same segment always renders the
/// same tile sequence.
pub fn draw_segment_contents(
    atlas: &dyn SpriteAtlas,
    surface: &mut dyn DrawSurface,
    ctx: &RenderContext,
    segment: &Segment,
    offset_left: f64,
    ground_y: f64,
) -> Result<()> {
    let info = segment_variant_info(&segment.kind, &segment.variant_string)?;

    let Some(sprite) = atlas.get(info.sprite_id) else {
        warn!("Sprite '{}' not in atlas, skipping segment", info.sprite_id);
        return Ok(());
    };

    let m = ctx.multiplier;
    let offset_top = ground_y - (sprite.height / sprite.scale) * m;
    let total = segment.width * TILE_SIZE;
    let variants = info.graphics_variants.max(1);
    let variant_src_width = sprite.width / variants as f64;
    let tile_width = variant_src_width / sprite.scale;

    if tile_width <= 0.0 {
        warn!("Sprite '{}' has no tile width, skipping segment", info.sprite_id);
        return Ok(());
    }

    let mut rng = StdRng::seed_from_u64(segment.rand_seed);
    let mut drawn = 0.0;
    while drawn < total {
        // Clip the last tile to the remaining segment width
        let dw = tile_width.min(total - drawn);
        let pick = if variants > 1 {
            rng.random_range(0..variants)
        } else {
            0
        };

        draw_segment_image(
            atlas,
            surface,
            info.sprite_id,
            pick as f64 * variant_src_width,
            0.0,
            Some(dw),
            None,
            offset_left + drawn * m,
            offset_top,
            Some(dw),
            None,
            ctx,
        );
        drawn += tile_width;
    }

    Ok(())
}
