// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use svgscene_tree::{
    Color, CompositeShapePainter, FillRule, FillShapePainter, LineCap, LineJoin, NormalizedF32,
    Scene, ShapeNode, ShapePainter, Size, Stroke, StrokeShapePainter, Transform,
};
use svgtypes::{Length, Paint};

use crate::context::BridgeContext;
use crate::svgtree::{AId, Document, EId, SvgNode};
use crate::units::State;
use crate::{filter, shapes, Error, Options};

/// Builds a scene from an SVG document.
pub trait SceneParsing: Sized {
    /// Parses a scene from an SVG data.
    ///
    /// Can contain an SVG string or a gzip compressed data.
    fn from_data(data: &[u8], opt: &Options) -> Result<Self, Error>;

    /// Parses a scene from an SVG string.
    fn from_str(text: &str, opt: &Options) -> Result<Self, Error>;

    /// Builds a scene from a parsed document.
    fn from_document(ctx: &BridgeContext) -> Result<Self, Error>;
}

impl SceneParsing for Scene {
    fn from_data(data: &[u8], opt: &Options) -> Result<Self, Error> {
        let doc = Document::from_data(data, opt)?;
        Self::from_document(&BridgeContext::new(&doc, opt))
    }

    fn from_str(text: &str, opt: &Options) -> Result<Self, Error> {
        let doc = Document::from_str(text, opt)?;
        Self::from_document(&BridgeContext::new(&doc, opt))
    }

    fn from_document(ctx: &BridgeContext) -> Result<Self, Error> {
        convert_doc(ctx)
    }
}

#[derive(Clone, Copy)]
struct GroupState {
    transform: Transform,
    opacity: f32,
}

fn convert_doc(ctx: &BridgeContext) -> Result<Scene, Error> {
    let doc = ctx.document();
    let state = ctx.state(doc);

    let view_box = state.view_box;
    let size = Size::from_wh(view_box.width(), view_box.height())
        .unwrap_or(ctx.options().default_size);
    let mut scene = Scene::new(size);

    let root = doc.root_element();
    let group = GroupState {
        transform: Transform::from_translate(-view_box.x(), -view_box.y()),
        opacity: 1.0,
    };

    convert_children(ctx, root, group, &state, &mut scene)?;
    Ok(scene)
}

fn convert_children(
    ctx: &BridgeContext,
    parent: SvgNode,
    group: GroupState,
    state: &State,
    scene: &mut Scene,
) -> Result<(), Error> {
    for node in parent.children() {
        let tag_name = match node.tag_name() {
            Some(v) => v,
            None => continue,
        };

        if matches!(tag_name, EId::Defs | EId::Filter | EId::Style) {
            continue;
        }

        if node.raw_attribute(AId::Display) == Some("none") {
            continue;
        }

        let transform: Transform = node.attribute(AId::Transform).unwrap_or_default();
        let opacity: NormalizedF32 = node.attribute(AId::Opacity).unwrap_or(NormalizedF32::ONE);
        let sub_group = GroupState {
            transform: group.transform.pre_concat(transform),
            opacity: group.opacity * opacity.get(),
        };

        match tag_name {
            EId::G | EId::Svg => convert_children(ctx, node, sub_group, state, scene)?,
            eid if shapes::is_shape(eid) => {
                if let Some(shape_node) = convert_shape(ctx, node, sub_group, state)? {
                    scene.nodes.push(shape_node);
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn convert_shape(
    ctx: &BridgeContext,
    node: SvgNode,
    group: GroupState,
    state: &State,
) -> Result<Option<ShapeNode>, Error> {
    let shape = match shapes::convert(node, state) {
        Some(v) => v,
        None => return Ok(None),
    };

    let mut shape_node = ShapeNode::new();
    {
        let node_state = shape_node.state_mut();
        node_state.id = node.element_id().to_string();
        node_state.transform = group.transform;
        node_state.opacity = NormalizedF32::new_clamped(group.opacity);
        node_state.visible = !matches!(
            node.find_attribute::<&str>(AId::Visibility),
            Some("hidden") | Some("collapse")
        );
    }

    shape_node.set_shape(Some(shape));
    shape_node.set_painter(convert_painter(node, state));

    if let Some(filter_element) = referenced_filter(ctx, node)? {
        if let Some(chain) = filter::create_filter(ctx, filter_element, node, &shape_node)? {
            shape_node.state_mut().filter = Some(Arc::new(chain));
        }
    }

    Ok(Some(shape_node))
}

/// Returns a filter element referenced by the `filter` attribute.
fn referenced_filter<'a>(
    ctx: &BridgeContext<'a>,
    node: SvgNode<'a>,
) -> Result<Option<SvgNode<'a>>, Error> {
    let value = match node.raw_attribute(AId::Filter) {
        Some(v) if v.trim() != "none" => v,
        _ => return Ok(None),
    };

    let id = match svgtypes::FuncIRI::from_str(value) {
        Ok(v) => v.0,
        Err(_) => {
            log::warn!(
                "'{}' has an unsupported filter value '{}'. Skipped.",
                node.element_id(),
                value
            );
            return Ok(None);
        }
    };

    let url = ctx.resolve_href(node, &format!("#{}", id))?;
    let link = ctx.referenced_element(node, &url)?;
    if link.tag_name() != Some(EId::Filter) {
        return Err(Error::InvalidReference {
            href: url.to_string(),
        });
    }

    Ok(Some(link))
}

fn convert_painter(node: SvgNode, state: &State) -> Option<Box<dyn ShapePainter>> {
    let fill = convert_fill(node);
    let stroke = convert_stroke(node, state);

    match (fill, stroke) {
        (Some(fill), Some(stroke)) => {
            let mut painter = CompositeShapePainter::new();
            painter.push(Box::new(fill));
            painter.push(Box::new(stroke));
            Some(Box::new(painter))
        }
        (Some(fill), None) => Some(Box::new(fill)),
        (None, Some(stroke)) => Some(Box::new(stroke)),
        (None, None) => None,
    }
}

fn convert_fill(node: SvgNode) -> Option<FillShapePainter> {
    let color = match node.find_attribute::<Paint>(AId::Fill) {
        Some(paint) => convert_paint(node, AId::Fill, paint)?,
        None => Color::black(),
    };
    let color = apply_opacity(node, AId::FillOpacity, color);

    let rule = match node.find_attribute::<&str>(AId::FillRule) {
        Some("evenodd") => FillRule::EvenOdd,
        _ => FillRule::Winding,
    };

    Some(FillShapePainter::new(color, rule))
}

fn convert_stroke(node: SvgNode, state: &State) -> Option<StrokeShapePainter> {
    let paint = node.find_attribute::<Paint>(AId::Stroke)?;
    let color = convert_paint(node, AId::Stroke, paint)?;
    let color = apply_opacity(node, AId::StrokeOpacity, color);

    let width = node
        .ancestors()
        .find(|n| n.has_attribute(AId::StrokeWidth))
        .map(|n| n.convert_user_length(AId::StrokeWidth, state, Length::new_number(1.0)))
        .unwrap_or(1.0);

    // Must be bigger than 0.
    if !(width > 0.0 && width.is_finite()) {
        return None;
    }

    let line_cap = match node.find_attribute::<&str>(AId::StrokeLinecap) {
        Some("round") => LineCap::Round,
        Some("square") => LineCap::Square,
        _ => LineCap::Butt,
    };

    let line_join = match node.find_attribute::<&str>(AId::StrokeLinejoin) {
        Some("round") => LineJoin::Round,
        Some("bevel") => LineJoin::Bevel,
        _ => LineJoin::Miter,
    };

    // Must be bigger than 1.
    let miter_limit = node
        .find_attribute::<f32>(AId::StrokeMiterlimit)
        .unwrap_or(4.0)
        .max(1.0);

    let stroke = Stroke {
        width,
        miter_limit,
        line_cap,
        line_join,
        dash: None,
    };

    Some(StrokeShapePainter::new(color, stroke))
}

fn convert_paint(node: SvgNode, aid: AId, paint: Paint) -> Option<Color> {
    match paint {
        Paint::None => None,
        Paint::Color(color) => Some(color),
        Paint::CurrentColor => Some(Color::black()),
        Paint::FuncIRI(_, fallback) => {
            log::warn!(
                "Paint servers are not supported. '{}' of '{}' uses a fallback.",
                aid,
                node.element_id()
            );

            match fallback {
                Some(svgtypes::PaintFallback::Color(color)) => Some(color),
                Some(svgtypes::PaintFallback::CurrentColor) => Some(Color::black()),
                _ => None,
            }
        }
        _ => None,
    }
}

fn apply_opacity(node: SvgNode, aid: AId, mut color: Color) -> Color {
    let opacity: NormalizedF32 = node.find_attribute(aid).unwrap_or(NormalizedF32::ONE);
    color.alpha = (color.alpha as f32 * opacity.get()).round() as u8;
    color
}
