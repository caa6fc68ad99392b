//! Drawing surface and sprite atlas seams
//!
//! The compositor and thumbnail renderer draw through the [`DrawSurface`]
//! trait and look up artwork through [`SpriteAtlas`]. A host application
//! supplies its own canvas by implementing `DrawSurface`; [`Raster`] is the
//! built-in software implementation used by the export binary and tests.

use std::collections::HashMap;

use image::RgbaImage;

use crate::layout::TILESET_POINT_PER_PIXEL;

/// An RGBA color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// How drawing operations combine with existing surface contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    /// Normal alpha blending over whatever is there
    SourceOver,
    /// Draw only over already-opaque pixels; fully transparent pixels are
    /// left untouched
    SourceAtop,
}

/// A font request for text operations
///
/// `size` is in device pixels; callers apply dpi scaling before handing
/// the font to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f64,
    pub family: &'static str,
}

impl Font {
    pub fn new(size: f64, family: &'static str) -> Self {
        Self { size, family }
    }
}

/// A sprite handle: intrinsic source dimensions, the source-to-design
/// scale constant, and the drawable pixel data.
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Intrinsic width in source pixels
    pub width: f64,
    /// Intrinsic height in source pixels
    pub height: f64,
    /// Source pixels per design pixel
    pub scale: f64,
    pixels: RgbaImage,
}

impl Sprite {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            width: pixels.width() as f64,
            height: pixels.height() as f64,
            scale: TILESET_POINT_PER_PIXEL,
            pixels,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Sprite lookup keyed by string id
///
/// An absent id is not a failure; draw steps for missing art are skipped.
pub trait SpriteAtlas {
    fn get(&self, id: &str) -> Option<&Sprite>;
}

/// A 2D drawing surface in device-pixel coordinates
///
/// Mirrors the subset of a canvas context the renderers need: rectangle
/// fill, sub-region image blit, text measure/fill, line stroke, and a
/// compositing-mode toggle.
pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn set_composite_mode(&mut self, mode: CompositeMode);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);

    /// Blit a source sub-region of a sprite to a destination rectangle,
    /// scaling as needed. All source values are in source pixels; all
    /// destination values are in device pixels.
    #[allow(clippy::too_many_arguments)]
    fn draw_image(
        &mut self,
        sprite: &Sprite,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    );

    /// Width the given text would occupy, in device pixels
    fn measure_text(&self, text: &str, font: &Font) -> f64;

    /// Draw text horizontally centered on `x` with its top at `y`
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, color: Color);

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64, color: Color);

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, line_width: f64, color: Color);
}

/// Software RGBA raster surface
///
/// Nearest-neighbor blits, straight-alpha blending, and a box-glyph text
/// placeholder whose measurement is deterministic. Text measurement is the
/// contract layout math depends on; the glyph pixels themselves are
/// stand-ins for a host text renderer.
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    composite: CompositeMode,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
            composite: CompositeMode::SourceOver,
        }
    }

    /// Color of the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let i = ((y * self.width + x) * 4) as usize;
        Color::rgba(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    /// Consume the raster into an image buffer for encoding
    pub fn into_image(self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.pixels)
            .unwrap_or_else(|| RgbaImage::new(0, 0))
    }

    fn blend_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;

        let sa = color.a as f64 / 255.0;
        let da = self.pixels[i + 3] as f64 / 255.0;

        match self.composite {
            CompositeMode::SourceOver => {
                let out_a = sa + da * (1.0 - sa);
                if out_a <= 0.0 {
                    return;
                }
                for (c, s) in [(0, color.r), (1, color.g), (2, color.b)] {
                    let dc = self.pixels[i + c] as f64 / 255.0;
                    let sc = s as f64 / 255.0;
                    let out = (sc * sa + dc * da * (1.0 - sa)) / out_a;
                    self.pixels[i + c] = (out * 255.0).round() as u8;
                }
                self.pixels[i + 3] = (out_a * 255.0).round() as u8;
            }
            CompositeMode::SourceAtop => {
                // Destination alpha is preserved; transparent pixels stay
                // transparent.
                if da <= 0.0 {
                    return;
                }
                for (c, s) in [(0, color.r), (1, color.g), (2, color.b)] {
                    let dc = self.pixels[i + c] as f64 / 255.0;
                    let sc = s as f64 / 255.0;
                    let out = sc * sa + dc * (1.0 - sa);
                    self.pixels[i + c] = (out * 255.0).round() as u8;
                }
            }
        }
    }

    fn fill_rect_internal(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        let x0 = x.round() as i64;
        let y0 = y.round() as i64;
        let x1 = (x + w).round() as i64;
        let y1 = (y + h).round() as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color);
            }
        }
    }
}

/// Advance width of one character, in ems
fn char_advance(c: char) -> f64 {
    if c.is_whitespace() {
        0.3
    } else {
        0.6
    }
}

impl DrawSurface for Raster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.composite = mode;
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.fill_rect_internal(x, y, w, h, color);
    }

    fn draw_image(
        &mut self,
        sprite: &Sprite,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) {
        if dw <= 0.0 || dh <= 0.0 || sw <= 0.0 || sh <= 0.0 {
            return;
        }
        let src = sprite.pixels();
        let x0 = dx.round() as i64;
        let y0 = dy.round() as i64;
        let x1 = (dx + dw).round() as i64;
        let y1 = (dy + dh).round() as i64;

        for py in y0..y1 {
            for px in x0..x1 {
                let u = (px as f64 + 0.5 - dx) / dw;
                let v = (py as f64 + 0.5 - dy) / dh;
                let src_x = (sx + u * sw).floor();
                let src_y = (sy + v * sh).floor();
                if src_x < 0.0
                    || src_y < 0.0
                    || src_x >= src.width() as f64
                    || src_y >= src.height() as f64
                {
                    continue;
                }
                let p = src.get_pixel(src_x as u32, src_y as u32);
                if p.0[3] == 0 {
                    continue;
                }
                self.blend_pixel(px, py, Color::rgba(p.0[0], p.0[1], p.0[2], p.0[3]));
            }
        }
    }

    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        text.chars().map(|c| char_advance(c) * font.size).sum()
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, color: Color) {
        let total = self.measure_text(text, font);
        let mut pen = x - total / 2.0;
        let glyph_height = font.size * 0.62;
        for c in text.chars() {
            let advance = char_advance(c) * font.size;
            if !c.is_whitespace() {
                self.fill_rect_internal(pen + advance * 0.1, y, advance * 0.8, glyph_height, color);
            }
            pen += advance;
        }
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64, color: Color) {
        let dx = x2 - x1;
        let dy = y2 - y1;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= 0.0 {
            return;
        }
        let steps = len.ceil() as i64;
        let half = (line_width / 2.0).max(0.5);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let cx = x1 + dx * t;
            let cy = y1 + dy * t;
            self.fill_rect_internal(cx - half, cy - half, half * 2.0, half * 2.0, color);
        }
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, line_width: f64, color: Color) {
        self.fill_rect_internal(x, y, w, line_width, color);
        self.fill_rect_internal(x, y + h - line_width, w, line_width, color);
        self.fill_rect_internal(x, y, line_width, h, color);
        self.fill_rect_internal(x + w - line_width, y, line_width, h, color);
    }
}

/// Procedurally generated flat-color sprites for demos and tests
///
/// Stands in for loading a real tileset; each sprite is a solid color at
/// a plausible source size.
#[derive(Default)]
pub struct PlaceholderAtlas {
    sprites: HashMap<String, Sprite>,
}

impl PlaceholderAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flat-color sprite at the given source pixel size
    pub fn insert_flat(&mut self, id: &str, width: u32, height: u32, color: Color) {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([color.r, color.g, color.b, color.a]));
        self.sprites.insert(id.to_string(), Sprite::new(img));
    }

    /// Atlas covering the stock building and segment catalog plus the sky
    pub fn demo() -> Self {
        let mut atlas = Self::new();

        // Sky horizon bands
        atlas.insert_flat("sky--front", 500, 560, Color::rgba(205, 225, 235, 255));
        atlas.insert_flat("sky--rear", 500, 240, Color::rgba(190, 215, 230, 255));

        // Buildings; floored sprites are tall enough for every floor band
        atlas.insert_flat("buildings--grass", 290, 90, Color::rgb(89, 148, 81));
        for side in ["left", "right"] {
            atlas.insert_flat(
                &format!("buildings--fenced-lot-{side}"),
                384,
                160,
                Color::rgb(172, 151, 120),
            );
            atlas.insert_flat(
                &format!("buildings--parking-lot-{side}"),
                608,
                160,
                Color::rgb(120, 122, 124),
            );
            atlas.insert_flat(
                &format!("buildings--waterfront-{side}"),
                420,
                220,
                Color::rgb(72, 118, 140),
            );
            atlas.insert_flat(
                &format!("buildings--residential-{side}"),
                384,
                1600,
                Color::rgb(185, 140, 108),
            );
            atlas.insert_flat(
                &format!("buildings--apartments-narrow-{side}"),
                240,
                1600,
                Color::rgb(150, 118, 96),
            );
            atlas.insert_flat(
                &format!("buildings--apartments-wide-{side}"),
                384,
                1600,
                Color::rgb(136, 130, 120),
            );
        }

        // Segments
        atlas.insert_flat("segments--sidewalk", 96, 480, Color::rgb(206, 201, 189));
        atlas.insert_flat("segments--sidewalk-tree", 96, 480, Color::rgb(100, 144, 90));
        atlas.insert_flat("segments--bike-lane-inbound", 96, 480, Color::rgb(86, 138, 94));
        atlas.insert_flat("segments--bike-lane-outbound", 96, 480, Color::rgb(86, 138, 94));
        atlas.insert_flat("segments--drive-lane-inbound", 192, 480, Color::rgb(96, 96, 100));
        atlas.insert_flat("segments--drive-lane-outbound", 192, 480, Color::rgb(96, 96, 100));
        atlas.insert_flat("segments--parking-lane", 144, 480, Color::rgb(106, 106, 110));
        atlas.insert_flat("segments--bus-lane", 240, 480, Color::rgb(148, 60, 58));
        atlas.insert_flat("segments--divider-median", 48, 480, Color::rgb(116, 150, 108));
        atlas.insert_flat("segments--turn-lane-left", 192, 480, Color::rgb(240, 236, 220));

        atlas
    }
}

impl SpriteAtlas for PlaceholderAtlas {
    fn get(&self, id: &str) -> Option<&Sprite> {
        self.sprites.get(id)
    }
}
