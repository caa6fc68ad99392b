//! Static street raster composition
//!
//! Renders a whole street back to front — sky, dirt, buildings, segments,
//! optional labels, silhouette, and name plate — onto one surface. Used
//! for both on-screen preview cards and file export; `multiplier` scales
//! the layout while `dpi` scales only raster resolution.

use anyhow::Result;
use log::warn;
use ordered_float::OrderedFloat;

use crate::layout::{
    segment_variant_info, BuildingSide, Street, Units, GROUND_BASELINE_HEIGHT, TILE_SIZE,
};

use super::compositor::{draw_building, draw_segment_contents, Destination, RenderContext};
use super::surface::{Color, CompositeMode, DrawSurface, Font, SpriteAtlas};

const SKY_COLOUR: Color = Color::rgb(169, 204, 219);
/// Width of one tiled sky band, in design pixels
const SKY_WIDTH: f64 = 250.0;
const SKY_FRONT_HEIGHT: f64 = 280.0;
const SKY_REAR_HEIGHT: f64 = 120.0;
const BOTTOM_BACKGROUND: Color = Color::rgb(216, 211, 203);
const BACKGROUND_DIRT_COLOUR: Color = Color::rgb(53, 45, 39);
const SILHOUETTE_FILL: Color = Color::rgb(240, 240, 240);

/// Vertical padding added below the street when labels are requested
const NAMES_WIDTHS_PADDING: f64 = 65.0;

const LABEL_FONT_SIZE: f64 = 26.0;
const NAMEPLATE_FONT_SIZE: f64 = 160.0;
const NAMEPLATE_UNICODE_FONT_SIZE: f64 = 140.0;

/// Toggles for [`draw_street_thumbnail`]
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailOptions {
    /// Design-to-output scale applied to layout math
    pub multiplier: f64,
    /// Flatten the finished image to a single tint
    pub silhouette: bool,
    /// Anchor the street near the bottom edge instead of centering
    pub bottom_aligned: bool,
    /// Skip the sky fill and horizon bands
    pub transparent_sky: bool,
    /// Draw per-segment width and name labels below the street
    pub segment_names_and_widths: bool,
    /// Draw the street name plate at the top
    pub street_name: bool,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            silhouette: false,
            bottom_aligned: false,
            transparent_sky: false,
            segment_names_and_widths: false,
            street_name: false,
        }
    }
}

/// Render a complete street onto the surface.
///
/// `thumbnail_width`/`thumbnail_height` are in design pixels; the surface
/// is expected to be that size times `dpi`.
pub fn draw_street_thumbnail(
    atlas: &dyn SpriteAtlas,
    surface: &mut dyn DrawSurface,
    street: &Street,
    thumbnail_width: f64,
    thumbnail_height: f64,
    dpi: f64,
    options: &ThumbnailOptions,
) -> Result<()> {
    let multiplier = options.multiplier;
    let ctx = RenderContext::new(Destination::Thumbnail, multiplier, dpi);

    let occupied_width: f64 = street.segments.iter().map(|s| s.width).sum();

    let mut offset_top = if options.bottom_aligned {
        thumbnail_height - 180.0 * multiplier
    } else {
        (thumbnail_height + 5.0 * TILE_SIZE * multiplier) / 2.0
    };
    if options.segment_names_and_widths {
        offset_top -= NAMES_WIDTHS_PADDING * multiplier;
    }

    let offset_left = (thumbnail_width - occupied_width * TILE_SIZE * multiplier) / 2.0;
    let building_offset_left = (thumbnail_width - street.width * TILE_SIZE * multiplier) / 2.0;

    let ground_level = offset_top + 135.0 * multiplier;

    // Sky

    if !options.transparent_sky {
        surface.fill_rect(
            0.0,
            0.0,
            thumbnail_width * dpi,
            (ground_level + 20.0 * multiplier) * dpi,
            SKY_COLOUR,
        );

        let band_count = (thumbnail_width / SKY_WIDTH).floor() as i64 + 1;

        let y1 = ground_level - SKY_FRONT_HEIGHT;
        if let Some(sprite) = atlas.get("sky--front") {
            for i in 0..band_count {
                surface.draw_image(
                    sprite,
                    0.0,
                    0.0,
                    SKY_WIDTH * 2.0,
                    SKY_FRONT_HEIGHT * 2.0,
                    i as f64 * SKY_WIDTH * dpi,
                    y1 * dpi,
                    SKY_WIDTH * dpi,
                    SKY_FRONT_HEIGHT * dpi,
                );
            }
        } else {
            warn!("Sprite 'sky--front' not in atlas, skipping horizon");
        }

        let y2 = ground_level - SKY_FRONT_HEIGHT - SKY_REAR_HEIGHT;
        if let Some(sprite) = atlas.get("sky--rear") {
            for i in 0..band_count {
                surface.draw_image(
                    sprite,
                    0.0,
                    0.0,
                    SKY_WIDTH * 2.0,
                    SKY_REAR_HEIGHT * 2.0,
                    i as f64 * SKY_WIDTH * dpi,
                    y2 * dpi,
                    SKY_WIDTH * dpi,
                    SKY_REAR_HEIGHT * dpi,
                );
            }
        } else {
            warn!("Sprite 'sky--rear' not in atlas, skipping horizon");
        }
    }

    // Dirt: a strip under the whole image, plus the two shoulders outside
    // the paved street width

    surface.fill_rect(
        0.0,
        (ground_level + 20.0 * multiplier) * dpi,
        thumbnail_width * dpi,
        25.0 * multiplier * dpi,
        BACKGROUND_DIRT_COLOUR,
    );

    let paved_half = street.width * TILE_SIZE * multiplier / 2.0;

    surface.fill_rect(
        0.0,
        ground_level * dpi,
        (thumbnail_width / 2.0 - paved_half) * dpi,
        20.0 * multiplier * dpi,
        BACKGROUND_DIRT_COLOUR,
    );

    surface.fill_rect(
        (thumbnail_width / 2.0 + paved_half) * dpi,
        ground_level * dpi,
        thumbnail_width * dpi,
        20.0 * multiplier * dpi,
        BACKGROUND_DIRT_COLOUR,
    );

    // Buildings

    let building_width = building_offset_left / multiplier;

    let x1 = thumbnail_width / 2.0 - paved_half;
    draw_building(
        atlas,
        surface,
        &ctx,
        street,
        BuildingSide::Left,
        building_width,
        ground_level,
        x1 - (building_width - 25.0) * multiplier,
    )?;

    let x2 = thumbnail_width / 2.0 + paved_half;
    draw_building(
        atlas,
        surface,
        &ctx,
        street,
        BuildingSide::Right,
        building_width,
        ground_level,
        x2 - 25.0 * multiplier,
    )?;

    // Segments, grouped by z-index layer in ascending order; within a
    // layer, array order wins

    let mut z_indexes: Vec<OrderedFloat<f32>> = Vec::new();
    for segment in &street.segments {
        let z = OrderedFloat(segment_variant_info(&segment.kind, &segment.variant_string)?.z_index);
        if !z_indexes.contains(&z) {
            z_indexes.push(z);
        }
    }
    z_indexes.sort();

    let segment_ground = ground_level + 20.0 * multiplier;

    for z in &z_indexes {
        let mut seg_left = offset_left;
        for segment in &street.segments {
            let info = segment_variant_info(&segment.kind, &segment.variant_string)?;
            if OrderedFloat(info.z_index) == *z {
                draw_segment_contents(
                    atlas,
                    surface,
                    &ctx,
                    segment,
                    seg_left + info.graphics_left * TILE_SIZE * multiplier,
                    segment_ground,
                )?;
            }
            seg_left += segment.width * TILE_SIZE * multiplier;
        }
    }

    // Background panel for the label area

    if options.segment_names_and_widths || options.silhouette {
        surface.fill_rect(
            0.0,
            (ground_level + GROUND_BASELINE_HEIGHT * multiplier) * dpi,
            thumbnail_width * dpi,
            (thumbnail_height - ground_level - GROUND_BASELINE_HEIGHT * multiplier) * dpi,
            BOTTOM_BACKGROUND,
        );
    }

    // Per-segment labels

    if options.segment_names_and_widths {
        draw_segment_labels(surface, street, offset_left, ground_level, multiplier, dpi);
    }

    // Silhouette flatten

    if options.silhouette {
        surface.set_composite_mode(CompositeMode::SourceAtop);
        surface.fill_rect(
            0.0,
            0.0,
            thumbnail_width * dpi,
            thumbnail_height * dpi,
            SILHOUETTE_FILL,
        );
        surface.set_composite_mode(CompositeMode::SourceOver);
    }

    // Name plate

    if options.street_name {
        draw_name_plate(surface, street, thumbnail_width, dpi);
    }

    Ok(())
}

const LABEL_COLOR: Color = Color::rgb(0, 0, 0);

fn draw_segment_labels(
    surface: &mut dyn DrawSurface,
    street: &Street,
    offset_left: f64,
    ground_level: f64,
    multiplier: f64,
    dpi: f64,
) {
    let font = Font::new(LABEL_FONT_SIZE * dpi, "Lato");
    let rule_top = ground_level + GROUND_BASELINE_HEIGHT * multiplier;
    let rule_bottom = ground_level + 125.0 * multiplier;

    let mut seg_left = offset_left;
    for (i, segment) in street.segments.iter().enumerate() {
        let available = segment.width * TILE_SIZE * multiplier;

        let mut rule_x = seg_left;
        if i == 0 {
            rule_x -= 1.0;
        }
        surface.stroke_line(
            rule_x * dpi,
            rule_top * dpi,
            rule_x * dpi,
            rule_bottom * dpi,
            1.0,
            LABEL_COLOR,
        );

        let x = (seg_left + available / 2.0) * dpi;
        let max_width = (available - 10.0 * multiplier) * dpi;

        let text = truncate_label(
            surface,
            &prettify_width(segment.width, street.units),
            max_width,
            &font,
        );
        surface.fill_text(&text, x, (ground_level + 60.0 * multiplier) * dpi, &font, LABEL_COLOR);

        // The segment name is all-or-nothing; it never truncates
        if let Ok(info) = segment_variant_info(&segment.kind, &segment.variant_string) {
            if surface.measure_text(info.name, &font) <= max_width {
                surface.fill_text(
                    info.name,
                    x,
                    (ground_level + 83.0 * multiplier) * dpi,
                    &font,
                    LABEL_COLOR,
                );
            }
        }

        seg_left += available;
    }

    let rule_x = seg_left + 1.0;
    surface.stroke_line(
        rule_x * dpi,
        rule_top * dpi,
        rule_x * dpi,
        rule_bottom * dpi,
        1.0,
        LABEL_COLOR,
    );
}

fn draw_name_plate(surface: &mut dyn DrawSurface, street: &Street, thumbnail_width: f64, dpi: f64) {
    let mut text = street
        .name
        .clone()
        .unwrap_or_else(|| "Unnamed St".to_string());

    let font = if needs_unicode_font(&text) {
        Font::new(NAMEPLATE_UNICODE_FONT_SIZE * dpi, "sans-serif")
    } else {
        Font::new(NAMEPLATE_FONT_SIZE * dpi, "Roadgeek")
    };

    let max_width = (thumbnail_width - 200.0) * dpi;
    let mut measurement = surface.measure_text(&text, &font);
    let mut elided = false;
    while measurement > max_width && !text.is_empty() {
        text.pop();
        measurement = surface.measure_text(&text, &font);
        elided = true;
    }
    if elided {
        text.push('…');
        measurement = surface.measure_text(&text, &font);
    }

    let center_x = thumbnail_width * dpi / 2.0;
    let x1 = center_x - (measurement / 2.0 + 75.0 * dpi);
    let x2 = center_x + (measurement / 2.0 + 75.0 * dpi);
    let y1 = (75.0 - 60.0) * dpi;
    let y2 = (75.0 + 60.0) * dpi;

    surface.fill_rect(x1, y1, x2 - x1, y2 - y1, Color::rgb(255, 255, 255));
    surface.stroke_rect(
        x1 + 20.0 * dpi,
        y1 + 20.0 * dpi,
        (x2 - x1) - 40.0 * dpi,
        (y2 - y1) - 40.0 * dpi,
        10.0 * dpi,
        LABEL_COLOR,
    );

    // Vertically center the text within the plate
    let top_y = 75.0 * dpi - font.size * 0.31;
    surface.fill_text(&text, center_x, top_y, &font, LABEL_COLOR);
}

/// Drop trailing words from `text` until it fits in `max_width` device
/// pixels (or no spaces remain).
pub fn truncate_label(
    surface: &dyn DrawSurface,
    text: &str,
    max_width: f64,
    font: &Font,
) -> String {
    let mut text = text.to_string();
    while surface.measure_text(&text, font) > max_width {
        match text.rfind(' ') {
            Some(i) => text.truncate(i),
            None => break,
        }
    }
    text
}

/// Format a width in tile units for display
pub fn prettify_width(width: f64, units: Units) -> String {
    match units {
        Units::Imperial => {
            let whole = width.trunc();
            let frac = width - whole;
            let whole = whole as i64;
            if (frac - 0.25).abs() < 0.01 {
                format!("{whole}\u{00bc}'")
            } else if (frac - 0.5).abs() < 0.01 {
                format!("{whole}\u{00bd}'")
            } else if (frac - 0.75).abs() < 0.01 {
                format!("{whole}\u{00be}'")
            } else if frac.abs() < 0.01 {
                format!("{whole}'")
            } else {
                format!("{width}'")
            }
        }
        Units::Metric => {
            let meters = width * 0.3048;
            let mut s = format!("{meters:.3}");
            while s.ends_with('0') {
                s.pop();
            }
            if s.ends_with('.') {
                s.pop();
            }
            format!("{s} m")
        }
    }
}

/// Whether the name plate needs the extended-coverage fallback font
pub fn needs_unicode_font(text: &str) -> bool {
    !text.chars().all(|c| {
        let u = c as u32;
        u < 0x0250 || (0x2000..=0x206F).contains(&u)
    })
}
