//! Hover polygon for popup dismissal
//!
//! Computes the pointer-tracking region that keeps a detail popup open
//! while the pointer stays inside it. The polygon is recomputed per render
//! cycle and has no identity beyond the current cycle; the only mutable
//! state is the pointer-move debouncer.

use std::time::{Duration, Instant};

/// A 2D point in page pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in page pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Margin around the popup itself
const MARGIN_BUBBLE: f64 = 20.0;
/// Margin around the pointer in following mode
const MARGIN_MOUSE: f64 = 10.0;
/// Widened margin while the detail panel is open
const PANEL_OPEN_MARGIN: f64 = 200.0;
/// Extra downward extension of the panel-open rectangle
const PANEL_OPEN_DEPTH: f64 = 300.0;

/// Compute the hover polygon for the popup.
///
/// Three modes:
/// - `panel_open`: a plain rectangle extended below the popup; pointer
///   position is ignored entirely.
/// - `pointer_over_popup`: a fixed trapezoidal funnel connecting the
///   popup's lower edge to the tracked element, so the pointer can travel
///   between them.
/// - otherwise: a funnel from the popup toward the pointer, skewed toward
///   the pointer's apparent direction of travel.
///
/// The returned sequence is closed (last point equals the first).
pub fn hover_polygon(
    popup: Bounds,
    tracked: Bounds,
    mouse_x: f64,
    mouse_y: f64,
    pointer_over_popup: bool,
    panel_open: bool,
) -> Vec<Point> {
    let bx = popup.x;
    let by = popup.y;
    let bw = popup.width;
    let bh = popup.height;

    if panel_open {
        let m = PANEL_OPEN_MARGIN;
        return vec![
            Point::new(bx - m, by - m),
            Point::new(bx - m, by + bh + m + PANEL_OPEN_DEPTH),
            Point::new(bx + bw + m, by + bh + m + PANEL_OPEN_DEPTH),
            Point::new(bx + bw + m, by - m),
            Point::new(bx - m, by - m),
        ];
    }

    let m = MARGIN_BUBBLE;

    if pointer_over_popup {
        let segment_x1 = tracked.x - MARGIN_BUBBLE;
        let segment_x2 = tracked.x + tracked.width + MARGIN_BUBBLE;
        let segment_y = tracked.y + tracked.height + MARGIN_BUBBLE;

        return vec![
            Point::new(bx - m, by - m),
            Point::new(bx - m, by + bh + m),
            Point::new(segment_x1, by + bh + m + 120.0),
            Point::new(segment_x1, segment_y),
            Point::new(segment_x2, segment_y),
            Point::new(segment_x2, by + bh + m + 120.0),
            Point::new(bx + bw + m, by + bh + m),
            Point::new(bx + bw + m, by - m),
            Point::new(bx - m, by - m),
        ];
    }

    // Funnel floor follows the pointer but never rises above the popup's
    // lower margin edge.
    let floor = by + bh + MARGIN_BUBBLE;
    let bottom_y = (mouse_y - MARGIN_MOUSE).max(floor);
    let bottom_y2 = (mouse_y + MARGIN_MOUSE).max(floor);

    // Horizontal skew grows as the pointer is nearer to the popup,
    // clamped to 0..=50 so the funnel only leans so far.
    let diff_x = (60.0 - (mouse_y - by) / 5.0).clamp(0.0, 50.0);

    let shoulder_y = bottom_y + (by + bh + m - bottom_y) * 0.2;

    vec![
        Point::new(bx - m, by - m),
        Point::new(bx - m, by + bh + m),
        Point::new(
            (bx - m + mouse_x - MARGIN_MOUSE - diff_x) / 2.0,
            shoulder_y,
        ),
        Point::new(mouse_x - MARGIN_MOUSE - diff_x, bottom_y),
        Point::new(mouse_x - MARGIN_MOUSE, bottom_y2),
        Point::new(mouse_x + MARGIN_MOUSE, bottom_y2),
        Point::new(mouse_x + MARGIN_MOUSE + diff_x, bottom_y),
        Point::new(
            (bx + bw + m + mouse_x + MARGIN_MOUSE + diff_x) / 2.0,
            shoulder_y,
        ),
        Point::new(bx + bw + m, by + bh + m),
        Point::new(bx + bw + m, by - m),
        Point::new(bx - m, by - m),
    ]
}

/// Even-odd ray-cast point-in-polygon test.
///
/// Works on open or closed point sequences; the closing edge is implied.
pub fn point_in_polygon(polygon: &[Point], x: f64, y: f64) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > y) != (pj.y > y)
            && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Delay between a pointer-move event and the hover polygon recomputation
pub const HOVER_POLYGON_DEBOUNCE: Duration = Duration::from_millis(50);

/// Replace-on-arrival debouncer for pointer-move recomputation.
///
/// Each new pointer position cancels any pending recomputation and
/// schedules a fresh one, bounding recomputation frequency without ever
/// dropping the final event. The clock is passed in explicitly so hosts
/// and tests control time.
#[derive(Debug, Default)]
pub struct HoverPolygonDebouncer {
    pending: Option<(Point, Instant)>,
}

impl HoverPolygonDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer move, replacing any pending recomputation
    pub fn pointer_moved(&mut self, x: f64, y: f64, now: Instant) {
        self.pending = Some((Point::new(x, y), now + HOVER_POLYGON_DEBOUNCE));
    }

    /// Take the pending pointer position if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<Point> {
        match self.pending {
            Some((point, deadline)) if now >= deadline => {
                self.pending = None;
                Some(point)
            }
            _ => None,
        }
    }

    /// Drop any pending recomputation
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
