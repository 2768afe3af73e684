// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use svgscene_tree::filter::{Kind, Turbulence, TurbulenceKind};
use svgscene_tree::{Filter, PositiveF32};

use super::PrimitiveContext;
use crate::attributes;
use crate::svgtree::{AId, SvgNode};
use crate::Error;

pub(super) fn create(primitive: &PrimitiveContext) -> Result<Option<Arc<Filter>>, Error> {
    let turbulence = convert_turbulence(primitive.fe)?;

    let rect = match primitive.subregion(primitive.filter_region)? {
        Some(v) => v,
        None => return Ok(None),
    };

    Ok(Some(Filter::new(Kind::Turbulence(turbulence), rect)))
}

/// Parses `feTurbulence` attributes.
///
/// - `baseFrequency` defaults to `0 0`, a single number is used for both axes
/// - `numOctaves` defaults to `1`
/// - `seed` defaults to `0`, a fractional part is dropped
/// - `stitchTiles` is `stitch` or `noStitch` (default)
/// - `type` is `fractalNoise` or `turbulence` (default)
pub fn convert_turbulence(fe: SvgNode) -> Result<Turbulence, Error> {
    let (fx, fy) =
        attributes::convert_non_negative_pair(fe, AId::BaseFrequency)?.unwrap_or_default();
    let invalid_frequency = || {
        let text = fe.raw_attribute(AId::BaseFrequency).unwrap_or("");
        attributes::invalid_value(fe, AId::BaseFrequency, text)
    };
    let base_frequency_x = PositiveF32::new(fx).ok_or_else(invalid_frequency)?;
    let base_frequency_y = PositiveF32::new(fy).ok_or_else(invalid_frequency)?;

    let num_octaves = attributes::convert_non_negative_integer(fe, AId::NumOctaves, 1)?;
    let seed = attributes::convert_number(fe, AId::Seed, 0.0)?.trunc() as i32;

    let stitch_tiles = attributes::convert_keyword(
        fe,
        AId::StitchTiles,
        &[("stitch", true), ("noStitch", false)],
        false,
    )?;

    let kind = attributes::convert_keyword(
        fe,
        AId::Type,
        &[
            ("fractalNoise", TurbulenceKind::FractalNoise),
            ("turbulence", TurbulenceKind::Turbulence),
        ],
        TurbulenceKind::default(),
    )?;

    Ok(Turbulence {
        base_frequency_x,
        base_frequency_y,
        num_octaves,
        seed,
        stitch_tiles,
        kind,
    })
}
