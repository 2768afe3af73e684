// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use svgscene_tree::filter::{GaussianBlur, Kind};
use svgscene_tree::{Filter, PositiveF32};

use super::{resolve_input, FilterNodeMap, PrimitiveContext};
use crate::attributes;
use crate::svgtree::AId;
use crate::Error;

pub(super) fn create(
    primitive: &PrimitiveContext,
    input: &Arc<Filter>,
    node_map: &FilterNodeMap,
) -> Result<Option<Arc<Filter>>, Error> {
    let fe = primitive.fe;

    let input = match resolve_input(fe, AId::In, input, node_map) {
        Some(v) => v,
        None => return Ok(None),
    };

    let (sx, sy) = match primitive.units_scale()? {
        Some(v) => v,
        None => return Ok(None),
    };

    let (std_dev_x, std_dev_y) =
        attributes::convert_non_negative_pair(fe, AId::StdDeviation)?.unwrap_or_default();

    // `unwrap_or` is fine, because the pair is already checked to be non-negative.
    let std_dev_x = PositiveF32::new(std_dev_x * sx).unwrap_or(PositiveF32::ZERO);
    let std_dev_y = PositiveF32::new(std_dev_y * sy).unwrap_or(PositiveF32::ZERO);

    let rect = match primitive.subregion(input.rect())? {
        Some(v) => v,
        None => return Ok(None),
    };

    Ok(Some(Filter::new(
        Kind::GaussianBlur(GaussianBlur {
            input,
            std_dev_x,
            std_dev_y,
        }),
        rect,
    )))
}
