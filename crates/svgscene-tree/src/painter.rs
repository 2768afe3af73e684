// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use svgtypes::Color;
use tiny_skia::{FillRule, PixmapMut, Stroke, Transform};

use crate::{PaintedArea, Shape};

/// A shape painting capability.
///
/// A painter keeps its own reference to the shape it paints.
/// [`ShapeNode`](crate::ShapeNode) keeps it in sync with the node's shape.
pub trait ShapePainter: std::fmt::Debug {
    /// Returns the shape this painter paints.
    fn shape(&self) -> Option<&Shape>;

    /// Sets the shape this painter paints.
    fn set_shape(&mut self, shape: Option<Shape>);

    /// Paints the shape onto the canvas.
    fn paint(&self, canvas: &mut PixmapMut, transform: Transform);

    /// Returns the area actually covered by the paint.
    ///
    /// Returns `None` when there is no shape or nothing would be painted.
    fn painted_area(&self) -> Option<PaintedArea>;
}

fn make_paint(color: Color, anti_alias: bool) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(color.red, color.green, color.blue, color.alpha);
    paint.anti_alias = anti_alias;
    paint
}

/// Fills a shape with a solid color.
#[derive(Clone, Debug)]
pub struct FillShapePainter {
    shape: Option<Shape>,
    /// Fill color, including alpha.
    pub color: Color,
    /// Fill rule.
    pub rule: FillRule,
    /// Shape anti-aliasing.
    pub anti_alias: bool,
}

impl FillShapePainter {
    /// Creates a new painter without a shape.
    pub fn new(color: Color, rule: FillRule) -> Self {
        FillShapePainter {
            shape: None,
            color,
            rule,
            anti_alias: true,
        }
    }
}

impl ShapePainter for FillShapePainter {
    fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    fn set_shape(&mut self, shape: Option<Shape>) {
        self.shape = shape;
    }

    fn paint(&self, canvas: &mut PixmapMut, transform: Transform) {
        if let Some(ref shape) = self.shape {
            let paint = make_paint(self.color, self.anti_alias);
            canvas.fill_path(shape, &paint, self.rule, transform, None);
        }
    }

    fn painted_area(&self) -> Option<PaintedArea> {
        let shape = self.shape.as_ref()?;
        Some(PaintedArea::new(shape.clone(), self.rule))
    }
}

/// Strokes a shape with a solid color.
#[derive(Clone, Debug)]
pub struct StrokeShapePainter {
    shape: Option<Shape>,
    /// Stroke color, including alpha.
    pub color: Color,
    /// Stroke properties.
    pub stroke: Stroke,
    /// Shape anti-aliasing.
    pub anti_alias: bool,
}

impl StrokeShapePainter {
    /// Creates a new painter without a shape.
    pub fn new(color: Color, stroke: Stroke) -> Self {
        StrokeShapePainter {
            shape: None,
            color,
            stroke,
            anti_alias: true,
        }
    }
}

impl ShapePainter for StrokeShapePainter {
    fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    fn set_shape(&mut self, shape: Option<Shape>) {
        self.shape = shape;
    }

    fn paint(&self, canvas: &mut PixmapMut, transform: Transform) {
        if let Some(ref shape) = self.shape {
            let paint = make_paint(self.color, self.anti_alias);
            canvas.stroke_path(shape, &paint, &self.stroke, transform, None);
        }
    }

    fn painted_area(&self) -> Option<PaintedArea> {
        let shape = self.shape.as_ref()?;
        // A stroke outline is always filled using the nonzero rule.
        let outline = shape.stroke(&self.stroke, 1.0)?;
        Some(PaintedArea::new(Arc::new(outline), FillRule::Winding))
    }
}

/// Paints a shape with a list of painters, in order.
///
/// Usually a fill followed by a stroke.
#[derive(Debug, Default)]
pub struct CompositeShapePainter {
    shape: Option<Shape>,
    painters: Vec<Box<dyn ShapePainter>>,
}

impl CompositeShapePainter {
    /// Creates a new, empty, painter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a painter.
    ///
    /// The painter will receive the composite's shape.
    pub fn push(&mut self, mut painter: Box<dyn ShapePainter>) {
        painter.set_shape(self.shape.clone());
        self.painters.push(painter);
    }
}

impl ShapePainter for CompositeShapePainter {
    fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    fn set_shape(&mut self, shape: Option<Shape>) {
        for painter in &mut self.painters {
            painter.set_shape(shape.clone());
        }

        self.shape = shape;
    }

    fn paint(&self, canvas: &mut PixmapMut, transform: Transform) {
        for painter in &self.painters {
            painter.paint(canvas, transform);
        }
    }

    fn painted_area(&self) -> Option<PaintedArea> {
        self.painters
            .iter()
            .filter_map(|p| p.painted_area())
            .reduce(PaintedArea::union)
    }
}
