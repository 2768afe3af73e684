// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgscene-bridge` translates [SVG] documents into an [`svgscene_tree`] scene graph.

The most interesting part is the [`filter`] module, which resolves filter
elements, including filters inherited via `xlink:href`, into image operators.

[SVG]: https://en.wikipedia.org/wiki/Scalable_Vector_Graphics
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::question_mark)]
#![allow(clippy::too_many_arguments)]

pub mod attributes;
mod context;
mod converter;
mod error;
pub mod filter;
mod options;
mod shapes;
pub mod svgtree;
mod units;

pub use context::{is_same_file, is_same_reference, BridgeContext};
pub use converter::SceneParsing;
pub use error::Error;
pub use options::Options;
pub use svgtree::{decompress_svgz, AId, Document, EId, SvgNode};
pub use units::Units;

pub use roxmltree;
pub use svgscene_tree;
pub use url;
