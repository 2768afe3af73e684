// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

macro_rules! names {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:expr,)+ }) => {
        $(#[$meta])*
        #[allow(missing_docs)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Parses a name from a string.
            pub fn from_str(text: &str) -> Option<Self> {
                match text {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Returns the name as it appears in the SVG.
            pub fn to_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.to_str())
            }
        }
    };
}

names!(
    /// An element name.
    EId {
        Circle => "circle",
        Defs => "defs",
        Ellipse => "ellipse",
        FeFlood => "feFlood",
        FeGaussianBlur => "feGaussianBlur",
        FeMerge => "feMerge",
        FeMergeNode => "feMergeNode",
        FeOffset => "feOffset",
        FeTurbulence => "feTurbulence",
        Filter => "filter",
        G => "g",
        Line => "line",
        Path => "path",
        Polygon => "polygon",
        Polyline => "polyline",
        Rect => "rect",
        Style => "style",
        Svg => "svg",
    }
);

names!(
    /// An attribute name.
    AId {
        BaseFrequency => "baseFrequency",
        Class => "class",
        Cx => "cx",
        Cy => "cy",
        D => "d",
        Display => "display",
        Dx => "dx",
        Dy => "dy",
        Fill => "fill",
        FillOpacity => "fill-opacity",
        FillRule => "fill-rule",
        Filter => "filter",
        FilterRes => "filterRes",
        FilterUnits => "filterUnits",
        FloodColor => "flood-color",
        FloodOpacity => "flood-opacity",
        Height => "height",
        Href => "href",
        Id => "id",
        In => "in",
        NumOctaves => "numOctaves",
        Opacity => "opacity",
        Points => "points",
        PrimitiveUnits => "primitiveUnits",
        R => "r",
        Result => "result",
        Rx => "rx",
        Ry => "ry",
        Seed => "seed",
        StdDeviation => "stdDeviation",
        StitchTiles => "stitchTiles",
        Stroke => "stroke",
        StrokeLinecap => "stroke-linecap",
        StrokeLinejoin => "stroke-linejoin",
        StrokeMiterlimit => "stroke-miterlimit",
        StrokeOpacity => "stroke-opacity",
        StrokeWidth => "stroke-width",
        Style => "style",
        Transform => "transform",
        Type => "type",
        ViewBox => "viewBox",
        Visibility => "visibility",
        Width => "width",
        X => "x",
        X1 => "x1",
        X2 => "x2",
        Y => "y",
        Y1 => "y1",
        Y2 => "y2",
    }
);
