//! Rendering validation tests
//!
//! Draw-call counts and determinism are asserted with a recording surface;
//! pixel-level compositing is asserted against the software raster.

use streetscape::layout::{
    building_info, BuildingSide, Segment, SegmentId, Street, Units, MAX_BUILDING_HEIGHT,
};
use streetscape::render::{
    building_image_height, draw_building, draw_segment_contents, draw_street_thumbnail,
    needs_unicode_font, prettify_width, truncate_label, Color, CompositeMode, Destination,
    DrawSurface, Font, PlaceholderAtlas, Raster, RenderContext, Sprite, ThumbnailOptions,
};

#[derive(Debug, Clone, PartialEq)]
enum Op {
    FillRect { color: Color, composite: CompositeMode },
    DrawImage { sx: f64, sy: f64, sw: f64, sh: f64, dx: f64, dw: f64 },
    Text(String),
    Line,
    StrokeRect,
}

/// Records draw operations instead of rasterizing them
struct RecordingSurface {
    width: u32,
    height: u32,
    composite: CompositeMode,
    ops: Vec<Op>,
}

impl RecordingSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            composite: CompositeMode::SourceOver,
            ops: Vec::new(),
        }
    }

    fn image_ops(&self) -> Vec<&Op> {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::DrawImage { .. }))
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.composite = mode;
    }

    fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64, color: Color) {
        self.ops.push(Op::FillRect {
            color,
            composite: self.composite,
        });
    }

    fn draw_image(
        &mut self,
        _sprite: &Sprite,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
        dx: f64,
        _dy: f64,
        dw: f64,
        _dh: f64,
    ) {
        self.ops.push(Op::DrawImage {
            sx,
            sy,
            sw,
            sh,
            dx,
            dw,
        });
    }

    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        text.chars()
            .map(|c| {
                let em = if c.is_whitespace() { 0.3 } else { 0.6 };
                em * font.size
            })
            .sum()
    }

    fn fill_text(&mut self, text: &str, _x: f64, _y: f64, _font: &Font, _color: Color) {
        self.ops.push(Op::Text(text.to_string()));
    }

    fn stroke_line(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64, _lw: f64, _color: Color) {
        self.ops.push(Op::Line);
    }

    fn stroke_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64, _lw: f64, _color: Color) {
        self.ops.push(Op::StrokeRect);
    }
}

fn building_street(variant: &str, floors: u32) -> Street {
    let mut street = Street::new(80.0, Units::Imperial);
    street.left_building_variant = variant.to_string();
    street.left_building_height = floors;
    street.right_building_variant = variant.to_string();
    street.right_building_height = floors;
    street.occupied_width = 0.0;
    street.remaining_width = 80.0;
    street
}

fn thumbnail_ctx() -> RenderContext {
    RenderContext::new(Destination::Thumbnail, 1.0, 1.0)
}

#[test]
fn test_single_floor_building_issues_two_draw_calls() {
    let atlas = PlaceholderAtlas::demo();
    let street = building_street("residential", 1);
    let mut surface = RecordingSurface::new(800, 600);

    draw_building(
        &atlas,
        &mut surface,
        &thumbnail_ctx(),
        &street,
        BuildingSide::Left,
        300.0,
        400.0,
        0.0,
    )
    .unwrap();

    // Ground floor + roof, no middle floors
    assert_eq!(surface.image_ops().len(), 2);
}

#[test]
fn test_three_floor_building_issues_four_draw_calls() {
    let atlas = PlaceholderAtlas::demo();
    let street = building_street("residential", 3);
    let mut surface = RecordingSurface::new(800, 600);

    draw_building(
        &atlas,
        &mut surface,
        &thumbnail_ctx(),
        &street,
        BuildingSide::Left,
        300.0,
        400.0,
        0.0,
    )
    .unwrap();

    // Ground floor + 2 middle floors + roof
    assert_eq!(surface.image_ops().len(), 4);
}

#[test]
fn test_zero_floor_count_clamps_to_one() {
    let atlas = PlaceholderAtlas::demo();
    let street = building_street("residential", 0);
    let mut surface = RecordingSurface::new(800, 600);

    draw_building(
        &atlas,
        &mut surface,
        &thumbnail_ctx(),
        &street,
        BuildingSide::Left,
        300.0,
        400.0,
        0.0,
    )
    .unwrap();

    assert_eq!(surface.image_ops().len(), 2);
}

#[test]
fn test_middle_floor_sequence_is_stable_across_renders() {
    let atlas = PlaceholderAtlas::demo();
    let street = building_street("narrow", 6);

    let render = || {
        let mut surface = RecordingSurface::new(800, 1200);
        draw_building(
            &atlas,
            &mut surface,
            &thumbnail_ctx(),
            &street,
            BuildingSide::Right,
            300.0,
            900.0,
            0.0,
        )
        .unwrap();
        surface.ops
    };

    assert_eq!(render(), render());
}

#[test]
fn test_single_slab_tiling_overdraws_by_two() {
    let atlas = PlaceholderAtlas::demo();
    let street = building_street("grass", 1);
    let mut surface = RecordingSurface::new(800, 600);

    // Grass source is 290 px at 2 source px per design px: 145-wide tiles
    draw_building(
        &atlas,
        &mut surface,
        &thumbnail_ctx(),
        &street,
        BuildingSide::Left,
        300.0,
        400.0,
        0.0,
    )
    .unwrap();

    assert_eq!(surface.image_ops().len(), (300.0_f64 / 145.0).floor() as usize + 2);
}

#[test]
fn test_repeat_half_anchors_one_edge_tile() {
    let atlas = PlaceholderAtlas::demo();
    let street = building_street("parking-lot", 1);

    // Parking lot source is 608 px wide; the repeating half is 304
    let half = 304.0;

    let render = |side| {
        let mut surface = RecordingSurface::new(800, 600);
        draw_building(
            &atlas,
            &mut surface,
            &thumbnail_ctx(),
            &street,
            side,
            400.0,
            400.0,
            0.0,
        )
        .unwrap();
        surface
    };

    // Right building: the first tile anchors the left half of the sprite,
    // the rest repeat the right half
    let right = render(BuildingSide::Right);
    let sxs: Vec<f64> = right
        .image_ops()
        .iter()
        .map(|op| match op {
            Op::DrawImage { sx, .. } => *sx,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(sxs[0], 0.0);
    assert!(sxs[1..].iter().all(|&sx| sx == half));

    // Left building: the last tile anchors the right half
    let left = render(BuildingSide::Left);
    let sxs: Vec<f64> = left
        .image_ops()
        .iter()
        .map(|op| match op {
            Op::DrawImage { sx, .. } => *sx,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(*sxs.last().unwrap(), half);
    assert!(sxs[..sxs.len() - 1].iter().all(|&sx| sx == 0.0));
}

#[test]
fn test_over_occupancy_tint_applies_on_screen_only() {
    let atlas = PlaceholderAtlas::demo();
    let mut street = building_street("grass", 1);
    street.remaining_width = -5.0;

    let render = |destination| {
        let mut surface = RecordingSurface::new(800, 600);
        let ctx = RenderContext::new(destination, 1.0, 1.0);
        draw_building(
            &atlas,
            &mut surface,
            &ctx,
            &street,
            BuildingSide::Left,
            300.0,
            400.0,
            0.0,
        )
        .unwrap();
        surface.ops
    };

    let screen = render(Destination::Screen);
    assert!(screen
        .iter()
        .any(|op| matches!(op, Op::FillRect { composite: CompositeMode::SourceAtop, .. })));

    let thumbnail = render(Destination::Thumbnail);
    assert!(!thumbnail
        .iter()
        .any(|op| matches!(op, Op::FillRect { composite: CompositeMode::SourceAtop, .. })));
}

#[test]
fn test_unknown_building_variant_is_an_error() {
    let atlas = PlaceholderAtlas::demo();
    let street = building_street("hotel", 1);
    let mut surface = RecordingSurface::new(800, 600);

    let result = draw_building(
        &atlas,
        &mut surface,
        &thumbnail_ctx(),
        &street,
        BuildingSide::Left,
        300.0,
        400.0,
        0.0,
    );
    assert!(result.is_err());
}

#[test]
fn test_missing_sprite_skips_draw_without_failing() {
    let atlas = PlaceholderAtlas::new();
    let street = building_street("residential", 3);
    let mut surface = RecordingSurface::new(800, 600);

    draw_building(
        &atlas,
        &mut surface,
        &thumbnail_ctx(),
        &street,
        BuildingSide::Left,
        300.0,
        400.0,
        0.0,
    )
    .unwrap();

    assert!(surface.image_ops().is_empty());
}

#[test]
fn test_building_image_height_formula() {
    let atlas = PlaceholderAtlas::demo();
    let residential = building_info("residential").unwrap();

    // (roof 20 + floor 10 * 2 + main 11.5) * 12
    let height = building_image_height(&atlas, residential, BuildingSide::Left, 3);
    assert_eq!(height, (20.0 + 10.0 * 2.0 + 11.5) * 12.0);

    // Single-slab buildings use the sprite's intrinsic height: 90 source
    // px at 2 source px per design px
    let grass = building_info("grass").unwrap();
    let height = building_image_height(&atlas, grass, BuildingSide::Left, 1);
    assert_eq!(height, 45.0);
}

#[test]
fn test_floor_count_clamps_to_catalog_maximum() {
    let atlas = PlaceholderAtlas::demo();
    let street = building_street("residential", 50);
    let mut surface = RecordingSurface::new(800, 600);

    draw_building(
        &atlas,
        &mut surface,
        &thumbnail_ctx(),
        &street,
        BuildingSide::Left,
        300.0,
        400.0,
        0.0,
    )
    .unwrap();

    // Ground floor + middle floors + roof at the maximum floor count
    assert_eq!(surface.image_ops().len(), MAX_BUILDING_HEIGHT as usize + 1);
}

#[test]
fn test_dpi_scales_positions_and_multiplier_scales_sizes() {
    let atlas = PlaceholderAtlas::demo();
    // Drive lane tiles are 96 design px wide (192 source px at 2 source px
    // per design px); a 16-unit segment is exactly two tiles.
    let segment = Segment::new(SegmentId(7), "drive-lane", "inbound|car", 16.0, 3);

    let render = |multiplier: f64, dpi: f64| {
        let mut surface = RecordingSurface::new(2000, 800);
        let ctx = RenderContext::new(Destination::Thumbnail, multiplier, dpi);
        draw_segment_contents(&atlas, &mut surface, &ctx, &segment, 100.0, 400.0).unwrap();
        surface
            .image_ops()
            .iter()
            .map(|op| match op {
                Op::DrawImage { dx, dw, .. } => (*dx, *dw),
                _ => unreachable!(),
            })
            .collect::<Vec<_>>()
    };

    let baseline = render(1.0, 1.0);
    assert_eq!(baseline, vec![(100.0, 96.0), (196.0, 96.0)]);

    let scaled = render(0.5, 2.0);
    // The segment's left edge scales by dpi alone
    assert_eq!(scaled[0].0, 100.0 * 2.0);
    // Tile advance and tile size scale by multiplier times dpi
    assert_eq!(scaled[1].0 - scaled[0].0, 96.0 * 0.5 * 2.0);
    assert!(scaled.iter().all(|&(_, dw)| dw == 96.0 * 0.5 * 2.0));
}

#[test]
fn test_zero_width_sprite_skips_segment_tiling() {
    let mut atlas = PlaceholderAtlas::new();
    atlas.insert_flat("segments--sidewalk", 0, 480, Color::rgb(0, 0, 0));
    let segment = Segment::new(SegmentId(0), "sidewalk", "dense", 12.0, 0);
    let mut surface = RecordingSurface::new(200, 200);

    draw_segment_contents(&atlas, &mut surface, &thumbnail_ctx(), &segment, 0.0, 100.0).unwrap();

    assert!(surface.image_ops().is_empty());
}

#[test]
fn test_segment_contents_are_seed_deterministic() {
    let atlas = PlaceholderAtlas::demo();
    let segment = Segment::new(SegmentId(1), "sidewalk", "dense", 12.0, 42);

    let render = || {
        let mut surface = RecordingSurface::new(800, 600);
        draw_segment_contents(&atlas, &mut surface, &thumbnail_ctx(), &segment, 0.0, 400.0)
            .unwrap();
        surface.ops
    };

    assert_eq!(render(), render());
    assert!(!render().is_empty());
}

#[test]
fn test_segments_draw_in_ascending_z_order() {
    let atlas = PlaceholderAtlas::demo();
    let mut street = Street::new(20.0, Units::Imperial);
    // Turn lane (overlay layer) listed before the divider (base layer)
    street
        .segments
        .push(Segment::new(SegmentId(0), "turn-lane", "inbound|left", 10.0, 0));
    street
        .segments
        .push(Segment::new(SegmentId(1), "divider", "median", 10.0, 1));
    street.remaining_width = 0.0;
    street.occupied_width = 20.0;

    let mut surface = RecordingSurface::new(1200, 600);
    let options = ThumbnailOptions {
        transparent_sky: true,
        ..ThumbnailOptions::default()
    };
    draw_street_thumbnail(&atlas, &mut surface, &street, 1200.0, 600.0, 1.0, &options).unwrap();

    // Divider tiles are 24 design px wide (48 source px), turn lane tiles
    // 96; the divider must be drawn first despite its array position.
    let widths: Vec<f64> = surface
        .image_ops()
        .iter()
        .filter_map(|op| match op {
            Op::DrawImage { sw, .. } => Some(*sw),
            _ => None,
        })
        .filter(|&sw| sw == 48.0 || sw == 192.0)
        .collect();

    let first_divider = widths.iter().position(|&w| w == 48.0).unwrap();
    let first_turn_lane = widths.iter().position(|&w| w == 192.0).unwrap();
    assert!(first_divider < first_turn_lane);
}

#[test]
fn test_nameplate_elides_long_names() {
    let atlas = PlaceholderAtlas::demo();
    let mut street = Street::new(20.0, Units::Imperial);
    street.name = Some("An Extremely Long Street Name That Cannot Possibly Fit".to_string());

    let mut surface = RecordingSurface::new(800, 400);
    let options = ThumbnailOptions {
        street_name: true,
        ..ThumbnailOptions::default()
    };
    draw_street_thumbnail(&atlas, &mut surface, &street, 800.0, 400.0, 1.0, &options).unwrap();

    let plate_text = surface
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Text(t) => Some(t.clone()),
            _ => None,
        })
        .last()
        .unwrap();
    assert!(plate_text.ends_with('…'));
    assert!(plate_text.len() < street.name.as_ref().unwrap().len());
}

#[test]
fn test_truncate_label_drops_trailing_words() {
    let surface = RecordingSurface::new(100, 100);
    let font = Font::new(26.0, "Lato");

    let full = "Sidewalk with a tree";
    let wide = truncate_label(&surface, full, 10_000.0, &font);
    assert_eq!(wide, full);

    let narrow = truncate_label(&surface, full, surface.measure_text("Sidewalk", &font), &font);
    assert_eq!(narrow, "Sidewalk");
}

#[test]
fn test_raster_source_atop_preserves_transparency() {
    let mut raster = Raster::new(10, 10);
    raster.fill_rect(2.0, 2.0, 4.0, 4.0, Color::rgb(10, 20, 30));

    raster.set_composite_mode(CompositeMode::SourceAtop);
    raster.fill_rect(0.0, 0.0, 10.0, 10.0, Color::rgba(240, 240, 240, 255));
    raster.set_composite_mode(CompositeMode::SourceOver);

    // Untouched background stays fully transparent
    assert_eq!(raster.pixel(0, 0).a, 0);
    // Previously opaque pixels take the tint
    assert_eq!(raster.pixel(3, 3), Color::rgb(240, 240, 240));
}

#[test]
fn test_silhouette_thumbnail_flattens_drawn_pixels_only() {
    let atlas = PlaceholderAtlas::demo();
    let mut street = Street::new(20.0, Units::Imperial);
    street
        .segments
        .push(Segment::new(SegmentId(0), "sidewalk", "dense", 20.0, 0));
    street.occupied_width = 20.0;
    street.remaining_width = 0.0;

    let mut raster = Raster::new(600, 400);
    let options = ThumbnailOptions {
        silhouette: true,
        transparent_sky: true,
        ..ThumbnailOptions::default()
    };
    draw_street_thumbnail(&atlas, &mut raster, &street, 600.0, 400.0, 1.0, &options).unwrap();

    // Sky was skipped, so the top-left corner was never drawn and the
    // silhouette must not have touched it
    assert_eq!(raster.pixel(0, 0).a, 0);
}

#[test]
fn test_prettify_width_formats() {
    assert_eq!(prettify_width(10.0, Units::Imperial), "10'");
    assert_eq!(prettify_width(9.5, Units::Imperial), "9\u{00bd}'");
    assert_eq!(prettify_width(6.25, Units::Imperial), "6\u{00bc}'");
    assert_eq!(prettify_width(6.75, Units::Imperial), "6\u{00be}'");
    assert_eq!(prettify_width(10.0, Units::Metric), "3.048 m");
    assert_eq!(prettify_width(5.0, Units::Metric), "1.524 m");
}

#[test]
fn test_needs_unicode_font() {
    assert!(!needs_unicode_font("Main Street"));
    assert!(!needs_unicode_font("Rue de l'Église"));
    assert!(needs_unicode_font("улица Ленина"));
    assert!(needs_unicode_font("中山路"));
}

#[test]
fn test_thumbnail_draws_sky_and_dirt_without_options() {
    let atlas = PlaceholderAtlas::demo();
    let mut street = Street::new(20.0, Units::Imperial);
    street
        .segments
        .push(Segment::new(SegmentId(0), "sidewalk", "dense", 20.0, 0));
    street.occupied_width = 20.0;
    street.remaining_width = 0.0;

    let mut raster = Raster::new(600, 400);
    draw_street_thumbnail(
        &atlas,
        &mut raster,
        &street,
        600.0,
        400.0,
        1.0,
        &ThumbnailOptions::default(),
    )
    .unwrap();

    // Sky fill reaches the top-left corner
    assert!(raster.pixel(0, 0).a > 0);
}
