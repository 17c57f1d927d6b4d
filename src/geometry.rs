//! Collision kernel for axis-aligned boxes.
//!
//! Boxes use a top-left origin with floating-point positions and integer
//! extents (sprite pixels already multiplied by the render scale).

// ── Boxes ────────────────────────────────────────────────────────────────────

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
}

/// Whether touching edges count as contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// `>=` / `<=`: an edge shared with the other box is a collision.
    Inclusive,
    /// `>` / `<`: the corner must lie strictly inside the other box.
    Exclusive,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: u32, height: u32) -> Rect {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + f64::from(self.width)
    }

    pub fn bottom(&self) -> f64 {
        self.y + f64::from(self.height)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.x + f64::from(self.width) / 2.0,
            self.y + f64::from(self.height) / 2.0,
        )
    }

    /// The same box moved by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [(f64, f64); 4] {
        let (r, b) = (self.right(), self.bottom());
        [(self.x, self.y), (r, self.y), (self.x, b), (r, b)]
    }

    pub fn contains(&self, x: f64, y: f64, boundary: Boundary) -> bool {
        match boundary {
            Boundary::Inclusive => {
                y >= self.y && y <= self.bottom() && x >= self.x && x <= self.right()
            }
            Boundary::Exclusive => {
                y > self.y && y < self.bottom() && x > self.x && x < self.right()
            }
        }
    }

    /// True when the whole box lies on a `width` × `height` screen.
    pub fn within(&self, width: f64, height: f64) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

// ── Overlap tests ────────────────────────────────────────────────────────────

/// Does any corner of `b` lie inside `a`?
///
/// This is a corner-containment approximation, not a full rectangle
/// intersection: two boxes crossing like a plus sign share area without
/// any corner of `b` inside `a`. Callers that need both directions run
/// the test twice with the arguments swapped.
pub fn overlaps(a: &Rect, b: &Rect, boundary: Boundary) -> bool {
    b.corners()
        .iter()
        .any(|&(x, y)| a.contains(x, y, boundary))
}

/// Loose spawn-time proximity test between an `existing` unit and a
/// `candidate` about to be placed.
///
/// The candidate is too close when the squared distance between the two
/// centres does not exceed `w² + h²` of the existing unit's box.
pub fn too_close(existing: &Rect, candidate: &Rect) -> bool {
    let (x1, y1) = existing.center();
    let (x2, y2) = candidate.center();
    let w = f64::from(existing.width);
    let h = f64::from(existing.height);
    (x1 - x2).powi(2) + (y1 - y2).powi(2) <= w * w + h * h
}
