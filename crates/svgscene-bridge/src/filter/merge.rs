// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use svgscene_tree::filter::{Kind, Merge};
use svgscene_tree::{Filter, RectExt};

use super::{resolve_input, FilterNodeMap, PrimitiveContext};
use crate::svgtree::{AId, EId};
use crate::Error;

pub(super) fn create(
    primitive: &PrimitiveContext,
    input: &Arc<Filter>,
    node_map: &FilterNodeMap,
) -> Result<Option<Arc<Filter>>, Error> {
    let fe = primitive.fe;

    let mut inputs = Vec::new();
    for child in fe.children() {
        if child.tag_name() != Some(EId::FeMergeNode) {
            continue;
        }

        match resolve_input(child, AId::In, input, node_map) {
            Some(v) => inputs.push(v),
            None => return Ok(None),
        }
    }

    let default_region = match inputs.iter().map(|f| f.rect()).reduce(|a, b| a.union(&b)) {
        Some(v) => v,
        None => {
            log::warn!("'feMerge' without 'feMergeNode' children. The filter is disabled.");
            return Ok(None);
        }
    };

    let rect = match primitive.subregion(default_region)? {
        Some(v) => v,
        None => return Ok(None),
    };

    Ok(Some(Filter::new(Kind::Merge(Merge { inputs }), rect)))
}
