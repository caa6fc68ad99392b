//! Per-segment pixel positions, including drag-time repositioning
//!
//! Positions are recomputed from scratch on every call; nothing here is
//! cached across reorders or drag-state transitions.

use super::types::{DraggingState, Segment, DRAGGING_MOVE_HOLE_WIDTH, TILE_SIZE};

/// Extra gap, in design pixels, inserted before the segment at `index` to
/// reserve room for the segment being dropped between the drop target's
/// neighbors.
///
/// One move hole opens on each side of the insertion point; when the drop
/// target has no neighbor on one side (insertion at an end of the street),
/// the remaining side absorbs both holes so the reserved room stays equal
/// to one dragged segment.
fn space_between_segments(index: usize, dragging: &DraggingState) -> f64 {
    let mut space = 0.0;

    if let Some(before) = dragging.segment_before {
        if index >= before {
            space += DRAGGING_MOVE_HOLE_WIDTH;
            if dragging.segment_after.is_none() {
                space += DRAGGING_MOVE_HOLE_WIDTH;
            }
        }
    }

    if let Some(after) = dragging.segment_after {
        if index > after {
            space += DRAGGING_MOVE_HOLE_WIDTH;
            if dragging.segment_before.is_none() {
                space += DRAGGING_MOVE_HOLE_WIDTH;
            }
        }
    }

    space
}

/// Left pixel position of the segment at `index`.
///
/// The dragged segment's width counts as 0 so its neighbors visually close
/// the gap it left, while the centering term adds the dragged width back so
/// the street's centerline doesn't shift. While the pointer is within the
/// canvas, a fixed move hole is subtracted and an inter-segment gap sized
/// for the drop target is added.
///
/// Total over all inputs: a dragged index that doesn't refer to a real
/// segment (remove/insert race mid-transition) degrades to the no-drag
/// math instead of being trusted.
pub fn segment_position(
    index: usize,
    segments: &[Segment],
    remaining_width: f64,
    dragging: Option<&DraggingState>,
) -> i32 {
    let dragged = dragging
        .map(|d| d.dragged_segment)
        .filter(|&i| i < segments.len());

    let mut curr_pos = 0.0;
    for (i, segment) in segments.iter().take(index).enumerate() {
        if Some(i) != dragged {
            curr_pos += segment.width * TILE_SIZE;
        }
    }

    let mut main_left = remaining_width;
    if let Some(i) = dragged {
        main_left += segments[i].width;
    }
    main_left = main_left * TILE_SIZE / 2.0;

    match dragging {
        Some(d) if d.within_canvas => {
            main_left -= DRAGGING_MOVE_HOLE_WIDTH;
            let space = space_between_segments(index, d);
            (main_left + curr_pos + space).round() as i32
        }
        _ => (main_left + curr_pos).round() as i32,
    }
}

/// Pixel width of a segment, before any dpi scaling
pub fn segment_pixel_width(segment: &Segment) -> f64 {
    segment.width * TILE_SIZE
}
