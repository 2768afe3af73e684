// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgscene-tree` is a retained-mode scene graph.

It contains shape nodes, painters that know how to draw them
and image operators produced by SVG filter elements.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]

mod cancel;
pub mod filter;
mod geom;
mod node;
mod painter;
mod scene;

use std::sync::Arc;

pub use strict_num::{self, ApproxEqUlps, NonZeroPositiveF32, NormalizedF32, PositiveF32};
pub use svgtypes::Color;
pub use tiny_skia::{
    self, FillRule, LineCap, LineJoin, NonZeroRect, Path, PathBuilder, Pixmap, PixmapMut, Point,
    Rect, Size, Stroke, Transform,
};

pub use cancel::CancellationToken;
pub use filter::{Filter, FilterChain, FilterResolution};
pub use geom::{PaintedArea, RectExt};
pub use node::{paint_node, GraphicsNode, NodeState, ShapeNode};
pub use painter::{CompositeShapePainter, FillShapePainter, ShapePainter, StrokeShapePainter};
pub use scene::Scene;

/// A shared shape outline.
///
/// Shape identity is pointer identity.
pub type Shape = Arc<Path>;
