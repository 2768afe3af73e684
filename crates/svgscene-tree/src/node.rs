// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cell::RefCell;
use std::sync::Arc;

use strict_num::NormalizedF32;
use tiny_skia::{Pixmap, PixmapMut, PixmapPaint, Point, Rect, Transform};

use crate::{CancellationToken, FilterChain, PaintedArea, RectExt, Shape, ShapePainter};

/// Properties shared by all graphics nodes.
#[derive(Clone, Debug)]
pub struct NodeState {
    /// Element's ID.
    ///
    /// Taken from the SVG itself. Can be empty.
    pub id: String,

    /// Node visibility.
    ///
    /// A hidden node is not painted, but still has bounds.
    pub visible: bool,

    /// Node transform, relative to the canvas.
    pub transform: Transform,

    /// Node opacity.
    pub opacity: NormalizedF32,

    /// A filter chain applied to the node.
    pub filter: Option<Arc<FilterChain>>,
}

impl Default for NodeState {
    fn default() -> Self {
        NodeState {
            id: String::new(),
            visible: true,
            transform: Transform::default(),
            opacity: NormalizedF32::ONE,
            filter: None,
        }
    }
}

/// A scene graph node.
///
/// All geometry is in the node's user space, i.e. before `transform`.
pub trait GraphicsNode: std::fmt::Debug {
    /// Returns common node properties.
    fn state(&self) -> &NodeState;

    /// Paints the node, applying transform and opacity.
    fn render(&self, canvas: &mut PixmapMut, transform: Transform);

    /// Paints the node content only.
    ///
    /// Transform, opacity and filter are not applied.
    fn primitive_render(&self, canvas: &mut PixmapMut, transform: Transform);

    /// Returns the bounds of the area covered by the node's primitive paint.
    fn primitive_bounds(&self) -> Option<Rect>;

    /// Returns the bounds of the node geometry, ignoring any painting attributes.
    fn geometry_bounds(&self) -> Option<Rect>;

    /// Checks that the point is inside the node.
    fn contains(&self, p: Point) -> bool;

    /// Checks that the rect intersects the node.
    fn intersects(&self, r: &Rect) -> bool;

    /// Returns the node outline.
    fn outline(&self) -> Option<Shape>;

    /// Returns the bounds of the area covered by the node.
    ///
    /// This is the filter chain region when a filter is set.
    fn bounds(&self) -> Option<Rect> {
        match self.state().filter {
            Some(ref filter) => Some(filter.rect()),
            None => self.primitive_bounds(),
        }
    }

    /// Returns the node bounds in canvas coordinates.
    fn abs_bounds(&self) -> Option<Rect> {
        self.bounds()?.transform_bbox(self.state().transform)
    }
}

/// Paints a node with its transform and opacity applied.
pub fn paint_node(node: &dyn GraphicsNode, canvas: &mut PixmapMut, transform: Transform) {
    let state = node.state();
    let ts = transform.pre_concat(state.transform);

    if state.opacity == NormalizedF32::ONE {
        node.primitive_render(canvas, ts);
        return;
    }

    let mut layer = match Pixmap::new(canvas.width(), canvas.height()) {
        Some(v) => v,
        None => {
            log::warn!("Failed to allocate a layer for '{}'.", state.id);
            return;
        }
    };

    node.primitive_render(&mut layer.as_mut(), ts);

    let paint = PixmapPaint {
        opacity: state.opacity.get(),
        ..PixmapPaint::default()
    };
    canvas.draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);
}

#[derive(Clone, Default, Debug)]
struct GeometryCache {
    primitive_bounds: Option<Rect>,
    geometry_bounds: Option<Rect>,
    painted_area: Option<PaintedArea>,
}

/// A graphics node that represents a shape.
///
/// Bounds and the painted area are computed lazily and cached.
/// Any change to the shape or the painter invalidates all caches at once.
///
/// Caches use interior mutability, so a node must be owned by a single
/// rendering thread.
#[derive(Debug, Default)]
pub struct ShapeNode {
    state: NodeState,
    shape: Option<Shape>,
    painter: Option<Box<dyn ShapePainter>>,
    cache: RefCell<GeometryCache>,
    cancellation: Option<CancellationToken>,
}

impl ShapeNode {
    /// Constructs a new empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns common node properties for editing.
    ///
    /// Changing them doesn't affect cached geometry, which is in the user space.
    pub fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    /// Returns the shape.
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// Sets the shape.
    ///
    /// The shape is propagated to the current painter.
    pub fn set_shape(&mut self, shape: Option<Shape>) {
        self.invalidate_geometry_cache();
        self.shape = shape;
        if let Some(ref mut painter) = self.painter {
            painter.set_shape(self.shape.clone());
        }
    }

    /// Returns the painter.
    pub fn painter(&self) -> Option<&dyn ShapePainter> {
        self.painter.as_deref()
    }

    /// Sets the painter used to render the shape.
    ///
    /// The node's shape is pushed onto the painter if the painter paints a different one.
    pub fn set_painter(&mut self, painter: Option<Box<dyn ShapePainter>>) {
        self.invalidate_geometry_cache();
        self.painter = painter;
        if let Some(ref mut painter) = self.painter {
            if !same_shape(painter.shape(), self.shape.as_ref()) {
                painter.set_shape(self.shape.clone());
            }
        }
    }

    /// Sets a token checked during bounds computation.
    pub fn set_cancellation_token(&mut self, token: Option<CancellationToken>) {
        self.cancellation = token;
    }

    /// Returns the painted area, computing it when needed.
    pub fn painted_area(&self) -> Option<PaintedArea> {
        self.primitive_bounds()?;
        self.cache.borrow().painted_area.clone()
    }

    fn invalidate_geometry_cache(&self) {
        *self.cache.borrow_mut() = GeometryCache::default();
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|t| t.is_cancelled())
            .unwrap_or(false)
    }
}

fn same_shape(a: Option<&Shape>, b: Option<&Shape>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl GraphicsNode for ShapeNode {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn render(&self, canvas: &mut PixmapMut, transform: Transform) {
        if self.state.visible {
            paint_node(self, canvas, transform);
        }
    }

    fn primitive_render(&self, canvas: &mut PixmapMut, transform: Transform) {
        if let Some(ref painter) = self.painter {
            painter.paint(canvas, transform);
        }
    }

    fn primitive_bounds(&self) -> Option<Rect> {
        if let Some(bounds) = self.cache.borrow().primitive_bounds {
            return Some(bounds);
        }

        self.shape.as_ref()?;
        let painter = self.painter.as_ref()?;

        let area = painter.painted_area()?;
        let bounds = area.bounds()?;

        // Publish either everything or nothing.
        if self.is_cancelled() {
            self.invalidate_geometry_cache();
            return None;
        }

        let mut cache = self.cache.borrow_mut();
        cache.painted_area = Some(area);
        cache.primitive_bounds = Some(bounds);
        Some(bounds)
    }

    fn geometry_bounds(&self) -> Option<Rect> {
        if let Some(bounds) = self.cache.borrow().geometry_bounds {
            return Some(bounds);
        }

        let bounds = self.shape.as_ref()?.bounds();
        self.cache.borrow_mut().geometry_bounds = Some(bounds);
        Some(bounds)
    }

    fn contains(&self, p: Point) -> bool {
        match self.bounds() {
            Some(bounds) if bounds.contains_point(p) => {}
            _ => return false,
        }

        match self.painted_area() {
            Some(area) => area.contains(p),
            None => false,
        }
    }

    fn intersects(&self, r: &Rect) -> bool {
        match self.bounds() {
            Some(bounds) if bounds.intersects(r) => {}
            _ => return false,
        }

        match self.painted_area() {
            Some(area) => area.intersects(r),
            None => false,
        }
    }

    fn outline(&self) -> Option<Shape> {
        self.shape.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FillShapePainter;
    use tiny_skia::{FillRule, PathBuilder};

    fn rect_shape(x: f32, y: f32, w: f32, h: f32) -> Shape {
        Arc::new(PathBuilder::from_rect(Rect::from_xywh(x, y, w, h).unwrap()))
    }

    #[test]
    fn painter_receives_node_shape() {
        let shape = rect_shape(0.0, 0.0, 10.0, 10.0);
        let mut node = ShapeNode::new();
        node.set_shape(Some(shape.clone()));
        node.set_painter(Some(Box::new(FillShapePainter::new(
            svgtypes::Color::black(),
            FillRule::Winding,
        ))));

        let painter_shape = node.painter().unwrap().shape().unwrap();
        assert!(Arc::ptr_eq(painter_shape, &shape));
    }

    #[test]
    fn cancelled_computation_is_not_published() {
        let token = CancellationToken::new();
        let mut node = ShapeNode::new();
        node.set_shape(Some(rect_shape(0.0, 0.0, 10.0, 10.0)));
        node.set_painter(Some(Box::new(FillShapePainter::new(
            svgtypes::Color::black(),
            FillRule::Winding,
        ))));
        node.set_cancellation_token(Some(token.clone()));

        token.cancel();
        assert_eq!(node.primitive_bounds(), None);
        assert!(node.cache.borrow().painted_area.is_none());
        assert!(node.cache.borrow().primitive_bounds.is_none());

        token.reset();
        assert_eq!(node.primitive_bounds(), Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        assert!(node.cache.borrow().painted_area.is_some());
    }
}
