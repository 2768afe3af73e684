// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgscene` builds a retained-mode scene graph from SVG documents.

Filter elements, including filters inherited via `xlink:href`,
are resolved into graphs of image operators attached to scene nodes.

```
use svgscene::{GraphicsNode, Options, Scene, SceneParsing};

let svg = "
<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
    <filter id='blur'><feGaussianBlur stdDeviation='2'/></filter>
    <rect filter='url(#blur)' width='50' height='50'/>
</svg>
";

let scene = Scene::from_str(svg, &Options::default()).unwrap();
assert!(scene.nodes[0].state().filter.is_some());
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use svgscene_bridge as bridge;
pub use svgscene_tree as tree;

pub use svgscene_bridge::{BridgeContext, Document, Error, Options, SceneParsing};
pub use svgscene_tree::{
    CancellationToken, CompositeShapePainter, FillShapePainter, Filter, FilterChain,
    GraphicsNode, Scene, ShapeNode, ShapePainter, StrokeShapePainter,
};
