// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Basic shapes to outlines conversion.

use svgscene_tree::{ApproxEqUlps, PathBuilder, Rect, Shape};
use svgtypes::Length;

use crate::svgtree::{AId, EId, SvgNode};
use crate::units::{self, State};

/// Converts a basic shape element into an outline.
///
/// Returns `None` for non-shape elements and for invalid shapes.
pub(crate) fn convert(node: SvgNode, state: &State) -> Option<Shape> {
    match node.tag_name()? {
        EId::Rect => convert_rect(node, state),
        EId::Circle => convert_circle(node, state),
        EId::Ellipse => convert_ellipse(node, state),
        EId::Line => convert_line(node, state),
        EId::Polyline => convert_points(node, false),
        EId::Polygon => convert_points(node, true),
        EId::Path => convert_path(node),
        _ => None,
    }
}

/// Checks that a shape element is supported.
pub(crate) fn is_shape(eid: EId) -> bool {
    matches!(
        eid,
        EId::Rect
            | EId::Circle
            | EId::Ellipse
            | EId::Line
            | EId::Polyline
            | EId::Polygon
            | EId::Path
    )
}

fn user_length(node: SvgNode, aid: AId, state: &State) -> f32 {
    node.convert_user_length(aid, state, Length::zero())
}

/// Resolves a length that must be positive.
fn positive_length(node: SvgNode, aid: AId, state: &State) -> Option<f32> {
    let n = user_length(node, aid, state);
    if n.is_finite() && n > 0.0 {
        Some(n)
    } else {
        log::warn!(
            "{} '{}' has an invalid '{}' value. Skipped.",
            node.tag_name().map(|t| t.to_str()).unwrap_or(""),
            node.element_id(),
            aid
        );
        None
    }
}

fn convert_path(node: SvgNode) -> Option<Shape> {
    let value: &str = node.attribute(AId::D)?;

    let mut builder = PathBuilder::new();
    for segment in svgtypes::SimplifyingPathParser::from(value) {
        // Render everything up to the first error.
        let segment = match segment {
            Ok(v) => v,
            Err(_) => break,
        };

        match segment {
            svgtypes::SimplePathSegment::MoveTo { x, y } => {
                builder.move_to(x as f32, y as f32);
            }
            svgtypes::SimplePathSegment::LineTo { x, y } => {
                builder.line_to(x as f32, y as f32);
            }
            svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                builder.quad_to(x1 as f32, y1 as f32, x as f32, y as f32);
            }
            svgtypes::SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                builder.cubic_to(
                    x1 as f32, y1 as f32, x2 as f32, y2 as f32, x as f32, y as f32,
                );
            }
            svgtypes::SimplePathSegment::ClosePath => {
                builder.close();
            }
        }
    }

    builder.finish().map(Shape::new)
}

fn convert_rect(node: SvgNode, state: &State) -> Option<Shape> {
    let width = positive_length(node, AId::Width, state)?;
    let height = positive_length(node, AId::Height, state)?;
    let x = user_length(node, AId::X, state);
    let y = user_length(node, AId::Y, state);

    let (rx, ry) = radii(node, state);
    let rx = rx.min(width / 2.0);
    let ry = ry.min(height / 2.0);

    if rx.approx_eq_ulps(&0.0, 4) || ry.approx_eq_ulps(&0.0, 4) {
        let rect = Rect::from_xywh(x, y, width, height)?;
        return Some(Shape::new(PathBuilder::from_rect(rect)));
    }

    let mut builder = PathBuilder::new();
    builder.move_to(x + rx, y);
    builder.line_to(x + width - rx, y);
    arc_to(&mut builder, rx, ry, x + width, y + ry);
    builder.line_to(x + width, y + height - ry);
    arc_to(&mut builder, rx, ry, x + width - rx, y + height);
    builder.line_to(x + rx, y + height);
    arc_to(&mut builder, rx, ry, x, y + height - ry);
    builder.line_to(x, y + ry);
    arc_to(&mut builder, rx, ry, x + rx, y);
    builder.close();
    builder.finish().map(Shape::new)
}

/// Resolves `rx` and `ry`, where a missing or negative radius is taken from the other one.
fn radii(node: SvgNode, state: &State) -> (f32, f32) {
    let resolve = |aid| {
        node.attribute::<Length>(aid)
            .filter(|l| !l.number.is_sign_negative())
            .map(|l| units::convert_user_length(l, aid, state))
    };

    match (resolve(AId::Rx), resolve(AId::Ry)) {
        (None, None) => (0.0, 0.0),
        (Some(rx), None) => (rx, rx),
        (None, Some(ry)) => (ry, ry),
        (Some(rx), Some(ry)) => (rx, ry),
    }
}

fn convert_line(node: SvgNode, state: &State) -> Option<Shape> {
    let mut builder = PathBuilder::new();
    builder.move_to(
        user_length(node, AId::X1, state),
        user_length(node, AId::Y1, state),
    );
    builder.line_to(
        user_length(node, AId::X2, state),
        user_length(node, AId::Y2, state),
    );
    builder.finish().map(Shape::new)
}

fn convert_points(node: SvgNode, closed: bool) -> Option<Shape> {
    let text: &str = match node.attribute(AId::Points) {
        Some(v) => v,
        None => {
            log::warn!(
                "'{}' has no 'points' attribute. Skipped.",
                node.element_id()
            );
            return None;
        }
    };

    let mut builder = PathBuilder::new();
    for (x, y) in svgtypes::PointsParser::from(text) {
        if builder.is_empty() {
            builder.move_to(x as f32, y as f32);
        } else {
            builder.line_to(x as f32, y as f32);
        }
    }

    // At least two points are required.
    if builder.len() < 2 {
        log::warn!("'{}' has less than 2 points. Skipped.", node.element_id());
        return None;
    }

    if closed {
        builder.close();
    }

    builder.finish().map(Shape::new)
}

fn convert_circle(node: SvgNode, state: &State) -> Option<Shape> {
    let cx = user_length(node, AId::Cx, state);
    let cy = user_length(node, AId::Cy, state);
    let r = positive_length(node, AId::R, state)?;
    ellipse_to_path(cx, cy, r, r)
}

fn convert_ellipse(node: SvgNode, state: &State) -> Option<Shape> {
    let cx = user_length(node, AId::Cx, state);
    let cy = user_length(node, AId::Cy, state);
    let (rx, ry) = radii(node, state);

    if !(rx > 0.0 && ry > 0.0 && rx.is_finite() && ry.is_finite()) {
        log::warn!(
            "Ellipse '{}' has an invalid radius. Skipped.",
            node.element_id()
        );
        return None;
    }

    ellipse_to_path(cx, cy, rx, ry)
}

fn ellipse_to_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<Shape> {
    let mut builder = PathBuilder::new();
    builder.move_to(cx + rx, cy);
    arc_to(&mut builder, rx, ry, cx, cy + ry);
    arc_to(&mut builder, rx, ry, cx - rx, cy);
    arc_to(&mut builder, rx, ry, cx, cy - ry);
    arc_to(&mut builder, rx, ry, cx + rx, cy);
    builder.close();
    builder.finish().map(Shape::new)
}

/// Appends a quarter-like elliptical arc with a positive sweep and no rotation.
fn arc_to(builder: &mut PathBuilder, rx: f32, ry: f32, x: f32, y: f32) {
    let prev = match builder.last_point() {
        Some(v) => v,
        None => return,
    };

    let svg_arc = kurbo::SvgArc {
        from: kurbo::Point::new(prev.x as f64, prev.y as f64),
        to: kurbo::Point::new(x as f64, y as f64),
        radii: kurbo::Vec2::new(rx as f64, ry as f64),
        x_rotation: 0.0,
        large_arc: false,
        sweep: true,
    };

    match kurbo::Arc::from_svg_arc(&svg_arc) {
        Some(arc) => {
            arc.to_cubic_beziers(0.1, |p1, p2, p| {
                builder.cubic_to(
                    p1.x as f32,
                    p1.y as f32,
                    p2.x as f32,
                    p2.y as f32,
                    p.x as f32,
                    p.y as f32,
                );
            });
        }
        None => builder.line_to(x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svgtree::Document;
    use crate::Options;

    fn outline(text: &str) -> Option<Shape> {
        let svg = format!("<svg xmlns='http://www.w3.org/2000/svg'>{}</svg>", text);
        let doc = Document::from_str(&svg, &Options::default()).unwrap();
        let state = State::new(&doc, &Options::default());
        convert(doc.root_element().first_element_child().unwrap(), &state)
    }

    #[test]
    fn rect_bounds() {
        let path = outline("<rect x='10' y='20' width='30' height='40' rx='5'/>").unwrap();
        let b = path.bounds();
        assert_eq!((b.x(), b.y(), b.width(), b.height()), (10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn invalid_shapes() {
        assert!(outline("<rect width='0' height='10'/>").is_none());
        assert!(outline("<circle r='-1'/>").is_none());
        assert!(outline("<polyline points='10 20'/>").is_none());
        assert!(outline("<g/>").is_none());
    }

    #[test]
    fn percent_lengths() {
        let path = outline("<rect width='50%' height='10'/>").unwrap();
        assert_eq!(path.bounds().width(), 50.0);
    }

    #[test]
    fn polygon_is_closed() {
        let path = outline("<polygon points='0 0 10 0 10 10'/>").unwrap();
        assert_eq!(path.segments().last(), Some(tiny_skia::PathSegment::Close));
    }
}
