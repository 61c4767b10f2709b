use crate::geometry::{BoundsBox, ElementBox, Position};

/// Correct `candidate` so the element stays inside `bounds`.
///
/// `element` is the box as currently rendered, which already includes the
/// `applied` translation. Subtracting it gives the element's base box, and the
/// base box moved by `candidate` is what gets checked against `bounds`.
///
/// Each axis is handled on its own. The leading edge (left/top) is checked
/// first, then the trailing edge (right/bottom). When the element is wider or
/// taller than the bounds the leading edge stays pinned, so the top-left of
/// the element remains visible.
///
/// The result is always finite: a non-finite candidate axis falls back to the
/// applied translation on that axis.
pub fn clamp(
    candidate: Position,
    element: ElementBox,
    applied: Position,
    bounds: Option<BoundsBox>,
) -> Position {
    let applied = applied.finite_or(Position::ORIGIN);
    let candidate = candidate.finite_or(applied);
    let Some(bounds) = bounds else {
        return candidate;
    };
    let base = element.translated(Position::ORIGIN - applied);
    Position {
        x: clamp_axis(
            candidate.x,
            base.left,
            element.width,
            bounds.left,
            bounds.right,
        ),
        y: clamp_axis(
            candidate.y,
            base.top,
            element.height,
            bounds.top,
            bounds.bottom,
        ),
    }
    .finite_or(candidate)
}

fn clamp_axis(offset: f64, base_lead: f64, extent: f64, lead: f64, trail: f64) -> f64 {
    let projected = base_lead + offset;
    if projected < lead {
        lead - base_lead
    } else if projected + extent > trail {
        // Aligning the trailing edge of an oversized element would push its
        // leading edge out, so the leading edge wins.
        let aligned = trail - extent - base_lead;
        if base_lead + aligned < lead {
            lead - base_lead
        } else {
            aligned
        }
    } else {
        offset
    }
}
