// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgscene_tree::{Rect, Size};
use svgtypes::{Length, LengthUnit as Unit};

use crate::svgtree::{AId, Document, FromValue, SvgNode};
use crate::Options;

/// A coordinate system units.
///
/// `*Units` attributes in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Units {
    UserSpaceOnUse,
    ObjectBoundingBox,
}

impl<'a> FromValue<'a> for Units {
    fn parse(_: SvgNode, _: AId, value: &str) -> Option<Self> {
        match value {
            "userSpaceOnUse" => Some(Units::UserSpaceOnUse),
            "objectBoundingBox" => Some(Units::ObjectBoundingBox),
            _ => None,
        }
    }
}

/// Values required to resolve lengths inside a document.
#[derive(Clone, Copy, Debug)]
pub(crate) struct State {
    pub dpi: f32,
    pub view_box: Rect,
}

impl State {
    pub fn new(doc: &Document, opt: &Options) -> Self {
        State {
            dpi: opt.dpi,
            view_box: viewport(doc, opt),
        }
    }
}

/// Returns the root `svg` viewport.
///
/// Uses `viewBox` when set, then `width` and `height`, then `Options::default_size`.
pub(crate) fn viewport(doc: &Document, opt: &Options) -> Rect {
    let svg = doc.root_element();

    if let Some(vb) = svg.attribute::<svgtypes::ViewBox>(AId::ViewBox) {
        // A tiny `viewBox` may become empty after the conversion to `f32`.
        if let Some(r) = Rect::from_xywh(vb.x as f32, vb.y as f32, vb.w as f32, vb.h as f32) {
            if r.width() > 0.0 && r.height() > 0.0 {
                return r;
            }
        }
    }

    let def = opt.default_size;
    let state = State {
        dpi: opt.dpi,
        view_box: default_rect(def),
    };

    let resolve = |aid, def_value: f32| match svg.attribute::<Length>(aid) {
        Some(length) if length.unit != Unit::Percent => {
            convert_length(length, aid, Units::UserSpaceOnUse, &state)
        }
        _ => def_value,
    };

    let width = resolve(AId::Width, def.width());
    let height = resolve(AId::Height, def.height());
    Size::from_wh(width, height)
        .map(default_rect)
        .unwrap_or_else(|| default_rect(def))
}

fn default_rect(size: Size) -> Rect {
    // `unwrap` is safe, because `Size` is always positive.
    Rect::from_xywh(0.0, 0.0, size.width(), size.height()).unwrap()
}

#[inline(never)]
pub(crate) fn convert_length(length: Length, aid: AId, object_units: Units, state: &State) -> f32 {
    let dpi = state.dpi;
    let n = length.number as f32;
    match length.unit {
        Unit::None | Unit::Px => n,
        // Fonts are not supported, use the default `font-size`.
        Unit::Em => n * 12.0,
        Unit::Ex => n * 6.0,
        Unit::In => n * dpi,
        Unit::Cm => n * dpi / 2.54,
        Unit::Mm => n * dpi / 25.4,
        Unit::Pt => n * dpi / 72.0,
        Unit::Pc => n * dpi / 6.0,
        Unit::Percent => {
            if object_units == Units::ObjectBoundingBox {
                n / 100.0
            } else {
                let view_box = state.view_box;

                match aid {
                    AId::Cx | AId::Dx | AId::Rx | AId::Width | AId::X | AId::X1 | AId::X2 => {
                        convert_percent(length, view_box.width())
                    }
                    AId::Cy | AId::Dy | AId::Height | AId::Ry | AId::Y | AId::Y1 | AId::Y2 => {
                        convert_percent(length, view_box.height())
                    }
                    _ => {
                        let mut vb_len = view_box.width().powi(2) + view_box.height().powi(2);
                        vb_len = (vb_len / 2.0).sqrt();
                        convert_percent(length, vb_len)
                    }
                }
            }
        }
    }
}

pub(crate) fn convert_user_length(length: Length, aid: AId, state: &State) -> f32 {
    convert_length(length, aid, Units::UserSpaceOnUse, state)
}

fn convert_percent(length: Length, base: f32) -> f32 {
    base * (length.number as f32) / 100.0
}

impl<'a> SvgNode<'a> {
    /// Converts a length attribute into user units.
    ///
    /// Returns `None` when the attribute is not set or invalid.
    pub(crate) fn try_convert_length(&self, aid: AId, units: Units, state: &State) -> Option<f32> {
        Some(convert_length(self.attribute(aid)?, aid, units, state))
    }

    /// Converts a length attribute into user units, falling back to `def` when not set.
    pub(crate) fn convert_user_length(&self, aid: AId, state: &State, def: Length) -> f32 {
        let length = self.attribute(aid).unwrap_or(def);
        convert_user_length(length, aid, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State {
        State {
            dpi: 96.0,
            view_box: Rect::from_xywh(0.0, 0.0, 200.0, 100.0).unwrap(),
        }
    }

    #[test]
    fn percent_in_user_space() {
        let l = Length::new(50.0, Unit::Percent);
        assert_eq!(convert_length(l, AId::X, Units::UserSpaceOnUse, &state()), 100.0);
        assert_eq!(convert_length(l, AId::Height, Units::UserSpaceOnUse, &state()), 50.0);
    }

    #[test]
    fn percent_in_bbox_units() {
        let l = Length::new(-10.0, Unit::Percent);
        assert_eq!(convert_length(l, AId::X, Units::ObjectBoundingBox, &state()), -0.1);
    }

    #[test]
    fn absolute_units() {
        let l = Length::new(1.0, Unit::In);
        assert_eq!(convert_length(l, AId::X, Units::UserSpaceOnUse, &state()), 96.0);
    }
}
