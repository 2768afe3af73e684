// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tiny_skia::{PixmapMut, Point, Size, Transform};

use crate::{GraphicsNode, ShapeNode};

/// A flat list of shape nodes in paint order.
#[derive(Debug)]
pub struct Scene {
    /// Canvas size.
    pub size: Size,

    /// Nodes, back to front.
    pub nodes: Vec<ShapeNode>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new(size: Size) -> Self {
        Scene {
            size,
            nodes: Vec::new(),
        }
    }

    /// Paints all nodes onto the canvas.
    pub fn render(&self, canvas: &mut PixmapMut, transform: Transform) {
        for node in &self.nodes {
            node.render(canvas, transform);
        }
    }

    /// Returns the topmost visible node under the point.
    ///
    /// The point is in canvas coordinates.
    pub fn node_at(&self, p: Point) -> Option<&ShapeNode> {
        self.nodes.iter().rev().find(|node| {
            if !node.state().visible {
                return false;
            }

            let ts = match node.state().transform.invert() {
                Some(v) => v,
                None => return false,
            };

            let mut points = [p];
            ts.map_points(&mut points);
            node.contains(points[0])
        })
    }
}
