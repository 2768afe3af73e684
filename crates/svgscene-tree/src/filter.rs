// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Renderable image operators produced by filter elements.

use std::sync::Arc;

use strict_num::{NormalizedF32, PositiveF32};
use svgtypes::Color;
use tiny_skia::Rect;

/// An image-producing operator.
///
/// Operators form a graph: each one holds its inputs by a shared pointer.
/// Operator identity is pointer identity, see [`Arc::ptr_eq`].
#[derive(Debug)]
pub struct Filter {
    kind: Kind,
    rect: Rect,
}

impl Filter {
    /// Creates a new shared operator.
    pub fn new(kind: Kind, rect: Rect) -> Arc<Self> {
        Arc::new(Filter { kind, rect })
    }

    /// Operator kind.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Operator subregion.
    ///
    /// `x`, `y`, `width` and `height` in the SVG.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Returns operator inputs.
    pub fn inputs(&self) -> Vec<&Arc<Filter>> {
        match self.kind {
            Kind::SourceGraphic | Kind::Turbulence(_) | Kind::Flood(_) => Vec::new(),
            Kind::SourceAlpha(ref fe) => vec![&fe.input],
            Kind::Offset(ref fe) => vec![&fe.input],
            Kind::GaussianBlur(ref fe) => vec![&fe.input],
            Kind::Merge(ref fe) => fe.inputs.iter().collect(),
        }
    }

    /// Returns the SVG name of the operator.
    pub fn name(&self) -> &'static str {
        match self.kind {
            Kind::SourceGraphic => "SourceGraphic",
            Kind::SourceAlpha(_) => "SourceAlpha",
            Kind::Turbulence(_) => "feTurbulence",
            Kind::Flood(_) => "feFlood",
            Kind::Offset(_) => "feOffset",
            Kind::GaussianBlur(_) => "feGaussianBlur",
            Kind::Merge(_) => "feMerge",
        }
    }
}

/// An operator kind.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub enum Kind {
    SourceGraphic,
    SourceAlpha(SourceAlpha),
    Turbulence(Turbulence),
    Flood(Flood),
    Offset(Offset),
    GaussianBlur(GaussianBlur),
    Merge(Merge),
}

/// The alpha channel of a source graphic.
#[derive(Clone, Debug)]
pub struct SourceAlpha {
    /// The source graphic.
    pub input: Arc<Filter>,
}

/// A turbulence generation filter primitive.
///
/// `feTurbulence` element in the SVG.
#[derive(Clone, Copy, Debug)]
pub struct Turbulence {
    /// Identifies the base frequency for the noise function.
    ///
    /// `baseFrequency` in the SVG.
    pub base_frequency_x: PositiveF32,

    /// Identifies the base frequency for the noise function.
    ///
    /// `baseFrequency` in the SVG.
    pub base_frequency_y: PositiveF32,

    /// Identifies the number of octaves for the noise function.
    ///
    /// `numOctaves` in the SVG.
    pub num_octaves: u32,

    /// The starting number for the pseudo random number generator.
    ///
    /// `seed` in the SVG.
    pub seed: i32,

    /// Smooth transitions at the border of tiles.
    ///
    /// `stitchTiles` in the SVG.
    pub stitch_tiles: bool,

    /// Indicates whether the filter primitive should perform a noise or turbulence function.
    ///
    /// `type` in the SVG.
    pub kind: TurbulenceKind,
}

impl Turbulence {
    /// Checks that this is a fractal noise.
    #[inline]
    pub fn is_fractal_noise(&self) -> bool {
        self.kind == TurbulenceKind::FractalNoise
    }
}

/// A turbulence kind for the `feTurbulence` filter.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TurbulenceKind {
    FractalNoise,
    Turbulence,
}

impl Default for TurbulenceKind {
    fn default() -> Self {
        TurbulenceKind::Turbulence
    }
}

/// A flood filter primitive.
///
/// `feFlood` element in the SVG.
#[derive(Clone, Copy, Debug)]
pub struct Flood {
    /// A flood color.
    ///
    /// `flood-color` in the SVG.
    pub color: Color,

    /// A flood opacity.
    ///
    /// `flood-opacity` in the SVG.
    pub opacity: NormalizedF32,
}

/// An offset filter primitive.
///
/// `feOffset` element in the SVG.
#[derive(Clone, Debug)]
pub struct Offset {
    /// `in` in the SVG.
    pub input: Arc<Filter>,

    /// The amount to offset the input graphic along the x-axis.
    pub dx: f32,

    /// The amount to offset the input graphic along the y-axis.
    pub dy: f32,
}

/// A Gaussian blur filter primitive.
///
/// `feGaussianBlur` element in the SVG.
#[derive(Clone, Debug)]
pub struct GaussianBlur {
    /// `in` in the SVG.
    pub input: Arc<Filter>,

    /// A standard deviation along the X-axis.
    ///
    /// `stdDeviation` in the SVG.
    pub std_dev_x: PositiveF32,

    /// A standard deviation along the Y-axis.
    ///
    /// `stdDeviation` in the SVG.
    pub std_dev_y: PositiveF32,
}

/// A merge filter primitive.
///
/// `feMerge` element in the SVG.
#[derive(Clone, Debug)]
pub struct Merge {
    /// List of input layers that should be merged.
    ///
    /// List of `feMergeNode`'s in the SVG.
    pub inputs: Vec<Arc<Filter>>,
}

/// A filter resolution.
///
/// `filterRes` in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FilterResolution {
    pub x: u32,
    pub y: u32,
}

/// A resolved filter chain attached to a graphics node.
#[derive(Clone, Debug)]
pub struct FilterChain {
    source: Arc<Filter>,
    output: Arc<Filter>,
    rect: Rect,
    resolution: Option<FilterResolution>,
}

impl FilterChain {
    /// Creates a new chain.
    pub fn new(source: Arc<Filter>, output: Arc<Filter>, rect: Rect) -> Self {
        FilterChain {
            source,
            output,
            rect,
            resolution: None,
        }
    }

    /// Sets the filter resolution.
    pub fn with_resolution(mut self, resolution: Option<FilterResolution>) -> Self {
        self.resolution = resolution;
        self
    }

    /// The source graphic operator.
    pub fn source(&self) -> &Arc<Filter> {
        &self.source
    }

    /// The last operator of the chain.
    pub fn output(&self) -> &Arc<Filter> {
        &self.output
    }

    /// Filter chain region.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Filter resolution.
    pub fn resolution(&self) -> Option<FilterResolution> {
        self.resolution
    }

    /// Returns all operators reachable from the output.
    ///
    /// Inputs always precede operators that use them.
    /// Shared operators are listed once.
    pub fn operators(&self) -> Vec<Arc<Filter>> {
        fn visit(filter: &Arc<Filter>, list: &mut Vec<Arc<Filter>>) {
            if list.iter().any(|f| Arc::ptr_eq(f, filter)) {
                return;
            }

            for input in filter.inputs() {
                visit(input, list);
            }

            list.push(filter.clone());
        }

        let mut list = Vec::new();
        visit(&self.output, &mut list);
        list
    }
}
