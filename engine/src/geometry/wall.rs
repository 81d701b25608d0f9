//! Cutting a wall span into solid pieces around openings
//!
//! Works entirely in wall-local coordinates: positions run along the wall
//! axis, heights are measured from the floor. The room compiler maps the
//! resulting pieces back into world space.

use super::room::Opening;

/// One wall face: `[start, end]` along its axis, extruded up to `height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSpan {
    pub start: f32,
    pub end: f32,
    pub height: f32,
    pub thickness: f32,
}

impl WallSpan {
    pub fn length(&self) -> f32 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallPieceKind {
    /// Full-height run of wall between openings
    Solid,
    /// Wall remaining above an opening
    Lintel,
    /// Wall remaining below an opening
    Sill,
}

/// Rectangular piece of a segmented wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPiece {
    pub kind: WallPieceKind,
    pub start: f32,
    pub end: f32,
    pub bottom: f32,
    pub top: f32,
}

impl WallPiece {
    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn center_along(&self) -> f32 {
        (self.start + self.end) * 0.5
    }

    pub fn center_height(&self) -> f32 {
        (self.bottom + self.top) * 0.5
    }
}

/// Cut `span` around `openings`
///
/// Openings are visited in order of their position along the wall. Pieces whose
/// length or height does not exceed `epsilon` are dropped. Overlapping
/// openings are not detected.
pub fn segment_wall(span: &WallSpan, openings: &[&Opening], epsilon: f32) -> Vec<WallPiece> {
    let mut sorted: Vec<&Opening> = openings.to_vec();
    sorted.sort_by(|a, b| a.position.total_cmp(&b.position));

    let mut pieces = Vec::with_capacity(sorted.len() * 3 + 1);
    let mut cursor = span.start;

    let mut push = |kind, start: f32, end: f32, bottom: f32, top: f32| {
        let piece = WallPiece {
            kind,
            start,
            end,
            bottom,
            top,
        };
        if piece.length() > epsilon && piece.height() > epsilon {
            pieces.push(piece);
        }
    };

    for opening in sorted {
        let center = span.start + opening.position * span.length();
        let opening_start = center - opening.width * 0.5;
        let opening_end = center + opening.width * 0.5;

        push(WallPieceKind::Solid, cursor, opening_start, 0.0, span.height);

        let opening_top = opening.bottom_offset + opening.height;
        if opening_top < span.height {
            push(
                WallPieceKind::Lintel,
                opening_start,
                opening_end,
                opening_top,
                span.height,
            );
        }
        if opening.bottom_offset > 0.0 {
            push(
                WallPieceKind::Sill,
                opening_start,
                opening_end,
                0.0,
                opening.bottom_offset,
            );
        }

        cursor = opening_end;
    }

    push(WallPieceKind::Solid, cursor, span.end, 0.0, span.height);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::room::Side;

    const EPSILON: f32 = 0.01;

    fn span(start: f32, end: f32) -> WallSpan {
        WallSpan {
            start,
            end,
            height: 5.0,
            thickness: 0.2,
        }
    }

    fn solids(pieces: &[WallPiece]) -> Vec<&WallPiece> {
        pieces
            .iter()
            .filter(|p| p.kind == WallPieceKind::Solid)
            .collect()
    }

    #[test]
    fn test_centered_door_scenario() {
        let door = Opening::new(Side::North, 2.0, 2.2);
        let pieces = segment_wall(&span(0.0, 10.0), &[&door], EPSILON);

        let solid = solids(&pieces);
        assert_eq!(solid.len(), 2);
        assert!((solid[0].length() - 4.0).abs() < 1e-5);
        assert!((solid[1].length() - 4.0).abs() < 1e-5);

        let lintels: Vec<_> = pieces
            .iter()
            .filter(|p| p.kind == WallPieceKind::Lintel)
            .collect();
        assert_eq!(lintels.len(), 1);
        assert!((lintels[0].height() - 2.8).abs() < 1e-5);
        assert!((lintels[0].length() - 2.0).abs() < 1e-5);

        assert!(pieces.iter().all(|p| p.kind != WallPieceKind::Sill));
    }

    #[test]
    fn test_no_openings_is_one_solid() {
        let pieces = segment_wall(&span(-3.0, 7.0), &[], EPSILON);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].kind, WallPieceKind::Solid);
        assert!((pieces[0].length() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_solid_lengths_sum_to_span_minus_openings() {
        let openings = [
            Opening::new(Side::East, 1.5, 2.0).with_position(0.8),
            Opening::new(Side::East, 1.0, 1.0)
                .with_position(0.2)
                .with_bottom_offset(1.0),
            Opening::new(Side::East, 2.5, 2.0).with_position(0.5),
        ];
        let refs: Vec<&Opening> = openings.iter().collect();
        let wall = span(2.0, 14.0);

        let pieces = segment_wall(&wall, &refs, EPSILON);
        let solid_total: f32 = solids(&pieces).iter().map(|p| p.length()).sum();
        let opening_total: f32 = openings.iter().map(|o| o.width).sum();

        assert!((solid_total - (wall.length() - opening_total)).abs() < 0.02);
    }

    #[test]
    fn test_window_gets_lintel_and_sill() {
        let window = Opening::new(Side::South, 1.0, 1.0).with_bottom_offset(1.2);
        let pieces = segment_wall(&span(0.0, 6.0), &[&window], EPSILON);

        let sill = pieces
            .iter()
            .find(|p| p.kind == WallPieceKind::Sill)
            .unwrap();
        assert_eq!(sill.bottom, 0.0);
        assert!((sill.top - 1.2).abs() < 1e-6);

        let lintel = pieces
            .iter()
            .find(|p| p.kind == WallPieceKind::Lintel)
            .unwrap();
        assert!((lintel.bottom - 2.2).abs() < 1e-6);
        assert_eq!(lintel.top, 5.0);
    }

    #[test]
    fn test_pieces_below_epsilon_are_dropped() {
        // Opening flush against the wall start and reaching the ceiling
        let door = Opening::new(Side::West, 2.0, 5.0).with_position(0.1);
        let pieces = segment_wall(&span(0.0, 10.0), &[&door], EPSILON);

        assert_eq!(pieces.len(), 1);
        assert!((pieces[0].start - 2.0).abs() < 1e-5);
        assert_eq!(pieces[0].end, 10.0);
    }

    #[test]
    fn test_openings_visited_in_position_order() {
        let right = Opening::new(Side::North, 1.0, 5.0).with_position(0.75);
        let left = Opening::new(Side::North, 1.0, 5.0).with_position(0.25);
        let pieces = segment_wall(&span(0.0, 8.0), &[&right, &left], EPSILON);

        let starts: Vec<f32> = pieces.iter().map(|p| p.start).collect();
        assert_eq!(pieces.len(), 3);
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
    }
}
