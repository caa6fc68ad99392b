//! Occupied/remaining width calculation and per-segment warnings
//!
//! Pure and order-sensitive: reordering segments changes which ones fall
//! outside the street even with identical widths.

use log::warn;

use super::catalog::segment_variant_info;
use super::types::{Segment, SegmentWarnings, Street, WIDTH_ROUNDING};

/// Result of a width recalculation
#[derive(Debug, Clone)]
pub struct WidthCalculation {
    /// Sum of all segment widths, 0 for an empty street
    pub occupied_width: f64,
    /// Street width minus occupied width, snapped to 0 within tolerance
    pub remaining_width: f64,
    /// Clone of the street's segments with warnings freshly derived
    pub segments: Vec<Segment>,
}

/// Sum of all segment widths. An empty street occupies 0.
fn calculate_occupied_width(segments: &[Segment]) -> f64 {
    segments.iter().map(|s| s.width).sum()
}

/// Street width minus occupied width, snapped to 0 when within the
/// floating-point rounding tolerance.
fn calculate_remaining_width(street_width: f64, occupied_width: f64) -> f64 {
    let remaining = street_width - occupied_width;
    if remaining.abs() < WIDTH_ROUNDING {
        0.0
    } else {
        remaining
    }
}

/// Recalculate a street's occupied width, remaining width, and per-segment
/// warnings.
///
/// The contiguous block of segments is centered on the street, so the walk
/// starts at `street.width / 2 - occupied / 2` and advances by each
/// segment's width. A segment warns `outside` only while the street is
/// over-occupied and some portion of it crosses either street edge.
pub fn recalculate_width(street: &Street) -> WidthCalculation {
    let occupied_width = calculate_occupied_width(&street.segments);
    let remaining_width = calculate_remaining_width(street.width, occupied_width);

    // Left edge of the first segment, in tile units.
    let mut position = street.width / 2.0 - occupied_width / 2.0;

    let mut segments = Vec::with_capacity(street.segments.len());
    for segment in &street.segments {
        let mut warnings = SegmentWarnings::default();

        warnings.outside = remaining_width < 0.0
            && (position < 0.0 || position + segment.width > street.width);

        match segment_variant_info(&segment.kind, &segment.variant_string) {
            Ok(info) => {
                if let Some(min_width) = info.min_width {
                    warnings.width_too_small = segment.width < min_width;
                }
                if let Some(max_width) = info.max_width {
                    warnings.width_too_large = segment.width > max_width;
                }
            }
            Err(err) => {
                // Unknown kinds still lay out; they just can't be checked
                // against catalog width limits.
                warn!("Skipping width limit check: {}", err);
            }
        }

        position += segment.width;

        let mut updated = segment.clone();
        updated.warnings = warnings;
        segments.push(updated);
    }

    WidthCalculation {
        occupied_width,
        remaining_width,
        segments,
    }
}

/// Recalculate and write the derived values back onto the street
pub fn recalculate(street: &mut Street) {
    let calc = recalculate_width(street);
    street.occupied_width = calc.occupied_width;
    street.remaining_width = calc.remaining_width;
    street.segments = calc.segments;
}
