// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use svgscene_tree::filter::{Kind, Offset};
use svgscene_tree::Filter;

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

    let dx = attributes::convert_number(fe, AId::Dx, 0.0)? * sx;
    let dy = attributes::convert_number(fe, AId::Dy, 0.0)? * sy;

    let rect = match primitive.subregion(input.rect())? {
        Some(v) => v,
        None => return Ok(None),
    };

    Ok(Some(Filter::new(Kind::Offset(Offset { input, dx, dy }), rect)))
}
