// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use kurbo::{ParamCurve, Shape as _};
use tiny_skia::{FillRule, Path, PathSegment, Point, Rect, Transform};

/// Additional `Rect` methods.
pub trait RectExt: Sized {
    /// Checks that the point is inside the rect.
    ///
    /// The left and top edges are inclusive, the right and bottom ones are not.
    fn contains_point(&self, p: Point) -> bool;

    /// Checks that interiors of two rects overlap.
    fn intersects(&self, other: &Rect) -> bool;

    /// Returns a rect that contains both rects.
    fn union(&self, other: &Rect) -> Self;

    /// Maps a rect defined in `objectBoundingBox` units onto `bbox`.
    fn map_to_bbox(&self, bbox: Rect) -> Option<Self>;

    /// Returns the bounding box of the rect after transformation.
    fn transform_bbox(&self, ts: Transform) -> Option<Self>;
}

impl RectExt for Rect {
    #[inline]
    fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    #[inline]
    fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    fn union(&self, other: &Rect) -> Self {
        Rect::from_ltrb(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
        .unwrap_or(*self)
    }

    fn map_to_bbox(&self, bbox: Rect) -> Option<Self> {
        let x = self.x() * bbox.width() + bbox.x();
        let y = self.y() * bbox.height() + bbox.y();
        let w = self.width() * bbox.width();
        let h = self.height() * bbox.height();
        Rect::from_xywh(x, y, w, h)
    }

    fn transform_bbox(&self, ts: Transform) -> Option<Self> {
        if ts.is_identity() {
            return Some(*self);
        }

        let mut points = [
            Point::from_xy(self.left(), self.top()),
            Point::from_xy(self.right(), self.top()),
            Point::from_xy(self.right(), self.bottom()),
            Point::from_xy(self.left(), self.bottom()),
        ];
        ts.map_points(&mut points);

        let mut left = points[0].x;
        let mut top = points[0].y;
        let mut right = points[0].x;
        let mut bottom = points[0].y;
        for p in &points[1..] {
            left = left.min(p.x);
            top = top.min(p.y);
            right = right.max(p.x);
            bottom = bottom.max(p.y);
        }

        Rect::from_ltrb(left, top, right, bottom)
    }
}

/// An area actually covered by a painted shape.
///
/// A union of filled outlines. For a fill it's the shape itself,
/// for a stroke it's the stroke outline.
#[derive(Clone, Debug)]
pub struct PaintedArea {
    parts: Vec<AreaPart>,
}

#[derive(Clone, Debug)]
struct AreaPart {
    path: Arc<Path>,
    rule: FillRule,
    // Cached flattened representation used for hit testing.
    bez: kurbo::BezPath,
}

impl PaintedArea {
    /// Creates a new area from a filled outline.
    pub fn new(path: Arc<Path>, rule: FillRule) -> Self {
        let bez = to_bez_path(&path);
        PaintedArea {
            parts: vec![AreaPart { path, rule, bez }],
        }
    }

    /// Merges two areas.
    pub fn union(mut self, other: PaintedArea) -> Self {
        self.parts.extend(other.parts);
        self
    }

    /// Returns the area bounding box.
    pub fn bounds(&self) -> Option<Rect> {
        let mut iter = self.parts.iter().map(|p| p.path.bounds());
        let first = iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(&r)))
    }

    /// Checks that the point is inside the area.
    pub fn contains(&self, p: Point) -> bool {
        let pt = kurbo::Point::new(p.x as f64, p.y as f64);
        self.parts.iter().any(|part| part.contains(pt))
    }

    /// Checks that the rect interior intersects the area.
    pub fn intersects(&self, r: &Rect) -> bool {
        self.parts.iter().any(|part| part.intersects(r))
    }
}

impl AreaPart {
    fn contains(&self, pt: kurbo::Point) -> bool {
        let winding = self.bez.winding(pt);
        match self.rule {
            FillRule::Winding => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }

    fn intersects(&self, r: &Rect) -> bool {
        if !self.path.bounds().intersects(r) {
            return false;
        }

        let rect = kurbo::Rect::new(
            r.left() as f64,
            r.top() as f64,
            r.right() as f64,
            r.bottom() as f64,
        );

        // The rect is either inside the outline or crosses it.
        if self.contains(rect.center()) {
            return true;
        }

        let edges = [
            kurbo::Line::new((rect.x0, rect.y0), (rect.x1, rect.y0)),
            kurbo::Line::new((rect.x1, rect.y0), (rect.x1, rect.y1)),
            kurbo::Line::new((rect.x1, rect.y1), (rect.x0, rect.y1)),
            kurbo::Line::new((rect.x0, rect.y1), (rect.x0, rect.y0)),
        ];

        for seg in self.bez.segments() {
            if rect.contains(seg.start()) {
                return true;
            }

            if edges.iter().any(|edge| !seg.intersect_line(*edge).is_empty()) {
                return true;
            }
        }

        false
    }
}

/// Converts a path into a `kurbo` one, closing all subpaths.
///
/// Hit testing treats every subpath as filled, therefore as closed.
fn to_bez_path(path: &Path) -> kurbo::BezPath {
    fn pt(p: Point) -> kurbo::Point {
        kurbo::Point::new(p.x as f64, p.y as f64)
    }

    let mut bez = kurbo::BezPath::new();
    let mut is_open = false;
    for seg in path.segments() {
        match seg {
            PathSegment::MoveTo(p) => {
                if is_open {
                    bez.close_path();
                }

                bez.move_to(pt(p));
                is_open = true;
            }
            PathSegment::LineTo(p) => bez.line_to(pt(p)),
            PathSegment::QuadTo(p1, p) => bez.quad_to(pt(p1), pt(p)),
            PathSegment::CubicTo(p1, p2, p) => bez.curve_to(pt(p1), pt(p2), pt(p)),
            PathSegment::Close => {
                bez.close_path();
                is_open = false;
            }
        }
    }

    if is_open {
        bez.close_path();
    }

    bez
}
