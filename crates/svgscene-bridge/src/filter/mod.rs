// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Filter elements to image operators conversion.

use std::collections::HashMap;
use std::sync::Arc;

use svgscene_tree::filter::{FilterChain, FilterResolution, Kind, SourceAlpha};
use svgscene_tree::{Filter, GraphicsNode, Rect, RectExt};
use svgtypes::{Length, LengthUnit as Unit};
use url::Url;

use crate::attributes;
use crate::context::{is_same_reference, BridgeContext};
use crate::svgtree::{AId, EId, SvgNode};
use crate::units::{self, Units};
use crate::Error;

mod flood;
mod gaussian_blur;
mod merge;
mod offset;
mod turbulence;

pub use turbulence::convert_turbulence;

/// Named operators available to filter primitives.
///
/// Created for a single filter chain resolution and never reused.
pub type FilterNodeMap = HashMap<String, Arc<Filter>>;

/// A supported filter primitive.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PrimitiveKind {
    Turbulence,
    Flood,
    Offset,
    GaussianBlur,
    Merge,
}

impl PrimitiveKind {
    /// Returns a primitive kind for an element.
    ///
    /// Returns `None` for elements that are not filter primitives.
    pub fn from_element(eid: EId) -> Option<Self> {
        match eid {
            EId::FeTurbulence => Some(PrimitiveKind::Turbulence),
            EId::FeFlood => Some(PrimitiveKind::Flood),
            EId::FeOffset => Some(PrimitiveKind::Offset),
            EId::FeGaussianBlur => Some(PrimitiveKind::GaussianBlur),
            EId::FeMerge => Some(PrimitiveKind::Merge),
            _ => None,
        }
    }

    /// Creates an operator for the primitive element `fe`.
    ///
    /// `input` is the output of the previous primitive in the chain.
    /// Returns `Ok(None)` when the primitive cannot be created,
    /// which disables the whole filter chain.
    pub fn create<'a>(
        &self,
        ctx: &BridgeContext<'a>,
        fe: SvgNode<'a>,
        filtered_element: SvgNode<'a>,
        filtered_node: &dyn GraphicsNode,
        input: &Arc<Filter>,
        filter_region: Rect,
        node_map: &mut FilterNodeMap,
    ) -> Result<Option<Arc<Filter>>, Error> {
        let primitive = PrimitiveContext {
            ctx,
            fe,
            filtered_element,
            filtered_node,
            filter_region,
        };

        let filter = match self {
            PrimitiveKind::Turbulence => turbulence::create(&primitive)?,
            PrimitiveKind::Flood => flood::create(&primitive)?,
            PrimitiveKind::Offset => offset::create(&primitive, input, node_map)?,
            PrimitiveKind::GaussianBlur => gaussian_blur::create(&primitive, input, node_map)?,
            PrimitiveKind::Merge => merge::create(&primitive, input, node_map)?,
        };

        if let Some(ref filter) = filter {
            publish_result(fe, filter, node_map);
        }

        Ok(filter)
    }

    /// Updates an operator after the primitive element was changed.
    ///
    /// Live document updates are not supported.
    pub fn update(&self, event: &MutationEvent) -> ! {
        update(event)
    }
}

/// A change of a filter element.
#[derive(Clone, Copy, Debug)]
pub struct MutationEvent<'a> {
    /// The changed element.
    pub element: SvgNode<'a>,
    /// The changed attribute, if any.
    pub attribute: Option<AId>,
}

/// Updates a filter chain after a filter element was changed.
///
/// Live document updates are not supported.
pub fn update(event: &MutationEvent) -> ! {
    unimplemented!(
        "updating '{}' after a mutation",
        event.element.tag_name().map(|t| t.to_str()).unwrap_or("")
    )
}

/// Data shared by all primitive constructors.
struct PrimitiveContext<'a, 'b> {
    ctx: &'b BridgeContext<'a>,
    fe: SvgNode<'a>,
    filtered_element: SvgNode<'a>,
    filtered_node: &'b dyn GraphicsNode,
    filter_region: Rect,
}

impl PrimitiveContext<'_, '_> {
    /// Returns `primitiveUnits` of the filter element that contains the primitive.
    fn primitive_units(&self) -> Result<Units, Error> {
        match self.fe.parent_element() {
            Some(filter) => {
                attributes::convert_units(filter, AId::PrimitiveUnits, Units::UserSpaceOnUse)
            }
            None => Ok(Units::UserSpaceOnUse),
        }
    }

    /// Returns a scale for numbers defined in `primitiveUnits`.
    ///
    /// Returns `None` when units are `objectBoundingBox` and the filtered node has no bbox.
    fn units_scale(&self) -> Result<Option<(f32, f32)>, Error> {
        if self.primitive_units()? == Units::ObjectBoundingBox {
            match self.filtered_node.geometry_bounds() {
                Some(bbox) => Ok(Some((bbox.width(), bbox.height()))),
                None => {
                    log::warn!(
                        "Filter primitive '{}' on a zero-sized element '{}' is not allowed.",
                        self.fe.tag_name().map(|t| t.to_str()).unwrap_or(""),
                        self.filtered_element.element_id()
                    );
                    Ok(None)
                }
            }
        } else {
            Ok(Some((1.0, 1.0)))
        }
    }

    /// Resolves the primitive subregion.
    ///
    /// Each of `x`, `y`, `width` and `height` defaults to the `default_region` one.
    /// The result is clipped by the filter region.
    fn subregion(&self, default_region: Rect) -> Result<Option<Rect>, Error> {
        let units = self.primitive_units()?;
        let state = self.ctx.state(self.fe.document());
        let fe = self.fe;

        let mut x = fe.try_convert_length(AId::X, units, &state);
        let mut y = fe.try_convert_length(AId::Y, units, &state);
        let mut width = fe.try_convert_length(AId::Width, units, &state);
        let mut height = fe.try_convert_length(AId::Height, units, &state);

        if units == Units::ObjectBoundingBox {
            let bbox = match self.filtered_node.geometry_bounds() {
                Some(v) => v,
                None => {
                    log::warn!(
                        "Filters on a zero-sized element '{}' are not allowed.",
                        self.filtered_element.element_id()
                    );
                    return Ok(None);
                }
            };

            x = x.map(|n| bbox.x() + n * bbox.width());
            y = y.map(|n| bbox.y() + n * bbox.height());
            width = width.map(|n| n * bbox.width());
            height = height.map(|n| n * bbox.height());
        }

        let region = Rect::from_xywh(
            x.unwrap_or(default_region.x()),
            y.unwrap_or(default_region.y()),
            width.unwrap_or(default_region.width()),
            height.unwrap_or(default_region.height()),
        )
        .and_then(|r| r.intersect(&self.filter_region));

        if region.is_none() {
            log::warn!(
                "Filter primitive '{}' has an invalid region. The filter is disabled.",
                fe.tag_name().map(|t| t.to_str()).unwrap_or("")
            );
        }

        Ok(region)
    }
}

/// Resolves a primitive input.
///
/// An absent or empty attribute references the previous primitive output.
/// Returns `None` and logs a warning when the referenced result doesn't exist.
fn resolve_input(
    fe: SvgNode,
    aid: AId,
    input: &Arc<Filter>,
    node_map: &FilterNodeMap,
) -> Option<Arc<Filter>> {
    let name = match fe.raw_attribute(aid).map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return Some(input.clone()),
    };

    match node_map.get(name) {
        Some(filter) => Some(filter.clone()),
        None => {
            log::warn!(
                "'{}' references an unknown filter result '{}'. The filter is disabled.",
                fe.tag_name().map(|t| t.to_str()).unwrap_or(""),
                name
            );
            None
        }
    }
}

/// Makes the primitive output available to subsequent primitives via its `result` name.
fn publish_result(fe: SvgNode, filter: &Arc<Filter>, node_map: &mut FilterNodeMap) {
    if let Some(name) = fe.raw_attribute(AId::Result).map(str::trim) {
        if !name.is_empty() {
            node_map.insert(name.to_string(), filter.clone());
        }
    }
}

/// Creates the output operator of a filter element.
///
/// Primitives are searched in `filter_element` first. When it has none,
/// the filter referenced via `xlink:href` is used instead, and so on.
///
/// Returns `Ok(None)` when a primitive cannot be created.
/// Returns the `input` itself when no primitives were found.
pub fn build_filter_primitives<'a>(
    ctx: &BridgeContext<'a>,
    filter_element: SvgNode<'a>,
    filter_region: Rect,
    filtered_element: SvgNode<'a>,
    filtered_node: &dyn GraphicsNode,
    input: &Arc<Filter>,
    node_map: &mut FilterNodeMap,
) -> Result<Option<Arc<Filter>>, Error> {
    let mut filter_element = filter_element;
    let mut refs: Vec<Url> = Vec::new();

    loop {
        let output = match build_local_filter_primitives(
            ctx,
            filter_element,
            filter_region,
            filtered_element,
            filtered_node,
            input,
            node_map,
        )? {
            Some(v) => v,
            None => return Ok(None),
        };

        if !Arc::ptr_eq(&output, input) {
            return Ok(Some(output));
        }

        let href = match filter_element.href() {
            Some(v) => v,
            None => return Ok(Some(output)),
        };

        let url = ctx.resolve_href(filter_element, href)?;
        if refs.iter().any(|u| is_same_reference(u, &url)) {
            return Err(Error::CircularReference {
                href: url.to_string(),
            });
        }

        let link = ctx.referenced_element(filter_element, &url)?;
        if link.tag_name() != Some(EId::Filter) {
            return Err(Error::InvalidReference {
                href: url.to_string(),
            });
        }

        log::debug!(
            "Filter '{}' has no primitives. Using '{}' instead.",
            filter_element.element_id(),
            url
        );

        refs.push(url);
        filter_element = link;
    }
}

/// Creates operators for the primitives of `filter_element` only.
///
/// Returns the `input` itself when there are no primitives.
pub fn build_local_filter_primitives<'a>(
    ctx: &BridgeContext<'a>,
    filter_element: SvgNode<'a>,
    filter_region: Rect,
    filtered_element: SvgNode<'a>,
    filtered_node: &dyn GraphicsNode,
    input: &Arc<Filter>,
    node_map: &mut FilterNodeMap,
) -> Result<Option<Arc<Filter>>, Error> {
    let mut current = input.clone();
    for child in filter_element.children() {
        let kind = match child.tag_name().and_then(PrimitiveKind::from_element) {
            Some(v) => v,
            None => continue,
        };

        current = match kind.create(
            ctx,
            child,
            filtered_element,
            filtered_node,
            &current,
            filter_region,
            node_map,
        )? {
            Some(v) => v,
            None => return Ok(None),
        };
    }

    Ok(Some(current))
}

/// Creates a filter chain for an element that references `filter_element`.
///
/// Returns `Ok(None)` when the filter is disabled, including the case
/// when neither the filter nor the filters it references have primitives.
pub fn create_filter<'a>(
    ctx: &BridgeContext<'a>,
    filter_element: SvgNode<'a>,
    filtered_element: SvgNode<'a>,
    filtered_node: &dyn GraphicsNode,
) -> Result<Option<FilterChain>, Error> {
    let region = match filter_region(ctx, filter_element, filtered_node)? {
        Some(v) => v,
        None => return Ok(None),
    };

    let resolution = match attributes::convert_integer_pair(filter_element, AId::FilterRes)? {
        Some((x, y)) if x == 0 || y == 0 => {
            log::debug!(
                "Filter '{}' has a zero resolution. The filter is disabled.",
                filter_element.element_id()
            );
            return Ok(None);
        }
        Some((x, y)) => Some(FilterResolution { x, y }),
        None => None,
    };

    let source = Filter::new(Kind::SourceGraphic, region);
    let source_alpha = Filter::new(
        Kind::SourceAlpha(SourceAlpha {
            input: source.clone(),
        }),
        region,
    );

    let mut node_map = FilterNodeMap::new();
    node_map.insert("SourceGraphic".to_string(), source.clone());
    node_map.insert("SourceAlpha".to_string(), source_alpha);

    let output = build_filter_primitives(
        ctx,
        filter_element,
        region,
        filtered_element,
        filtered_node,
        &source,
        &mut node_map,
    )?;

    match output {
        Some(output) if Arc::ptr_eq(&output, &source) => {
            log::debug!(
                "Filter '{}' has no primitives. The filter is disabled.",
                filter_element.element_id()
            );
            Ok(None)
        }
        Some(output) => Ok(Some(
            FilterChain::new(source, output, region).with_resolution(resolution),
        )),
        None => Ok(None),
    }
}

/// Resolves the filter chain region.
fn filter_region(
    ctx: &BridgeContext,
    filter_element: SvgNode,
    filtered_node: &dyn GraphicsNode,
) -> Result<Option<Rect>, Error> {
    let filter_units =
        attributes::convert_units(filter_element, AId::FilterUnits, Units::ObjectBoundingBox)?;
    let state = ctx.state(filter_element.document());

    let resolve = |aid, def: Length| {
        let length = filter_element.attribute(aid).unwrap_or(def);
        units::convert_length(length, aid, filter_units, &state)
    };

    let rect = Rect::from_xywh(
        resolve(AId::X, Length::new(-10.0, Unit::Percent)),
        resolve(AId::Y, Length::new(-10.0, Unit::Percent)),
        resolve(AId::Width, Length::new(120.0, Unit::Percent)),
        resolve(AId::Height, Length::new(120.0, Unit::Percent)),
    );

    let rect = match rect {
        Some(r) if r.width() > 0.0 && r.height() > 0.0 => r,
        _ => {
            log::warn!(
                "Filter '{}' has an invalid region. Skipped.",
                filter_element.element_id()
            );
            return Ok(None);
        }
    };

    if filter_units == Units::ObjectBoundingBox {
        let bbox = match filtered_node.geometry_bounds() {
            Some(v) => v,
            None => {
                log::warn!("Filters on zero-sized shapes are not allowed.");
                return Ok(None);
            }
        };

        return Ok(rect.map_to_bbox(bbox));
    }

    Ok(Some(rect))
}
