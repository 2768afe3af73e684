// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use svgscene_tree::filter::{Flood, Kind};
use svgscene_tree::{Color, Filter, NormalizedF32};

use super::PrimitiveContext;
use crate::attributes;
use crate::svgtree::AId;
use crate::Error;

pub(super) fn create(primitive: &PrimitiveContext) -> Result<Option<Arc<Filter>>, Error> {
    let fe = primitive.fe;

    let mut color = attributes::convert_color(fe, AId::FloodColor, Color::black())?;
    let mut opacity = attributes::convert_opacity(fe, AId::FloodOpacity)?;

    // A color alpha, like in `rgba()`, is applied to the opacity.
    if color.alpha != u8::MAX {
        opacity = NormalizedF32::new_clamped(opacity.get() * (color.alpha as f32 / 255.0));
        color.alpha = u8::MAX;
    }

    let rect = match primitive.subregion(primitive.filter_region)? {
        Some(v) => v,
        None => return Ok(None),
    };

    Ok(Some(Filter::new(Kind::Flood(Flood { color, opacity }), rect)))
}
