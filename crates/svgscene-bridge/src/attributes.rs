// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Strict attribute parsing.
//!
//! Unlike [`SvgNode::attribute`], which ignores invalid values,
//! functions here report them as [`Error::AttributeValue`].
//! An absent or empty attribute always resolves to the provided default.

use std::str::FromStr;

use svgscene_tree::{Color, NormalizedF32};

use crate::svgtree::{AId, SvgNode};
use crate::units::Units;
use crate::Error;

/// Returns a non-empty attribute value.
fn value<'a>(node: SvgNode<'a>, aid: AId) -> Option<&'a str> {
    let text = node.raw_attribute(aid)?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Creates an [`Error::AttributeValue`] for the node attribute.
pub fn invalid_value(node: SvgNode, aid: AId, value: &str) -> Error {
    Error::AttributeValue {
        element: node.tag_name().map(|t| t.to_str()).unwrap_or("").to_string(),
        attribute: aid,
        value: value.to_string(),
    }
}

fn parse_numbers(node: SvgNode, aid: AId, text: &str) -> Result<Vec<f32>, Error> {
    let mut list = Vec::new();
    for n in svgtypes::NumberListParser::from(text) {
        match n {
            Ok(n) => list.push(n as f32),
            Err(_) => return Err(invalid_value(node, aid, text)),
        }
    }

    Ok(list)
}

/// Parses one or two numbers separated by whitespace or comma.
///
/// When only one number is set, it's used for both values.
/// Returns `None` for an absent or empty attribute.
pub fn convert_float_pair(node: SvgNode, aid: AId) -> Result<Option<(f32, f32)>, Error> {
    let text = match value(node, aid) {
        Some(v) => v,
        None => return Ok(None),
    };

    match parse_numbers(node, aid, text)?.as_slice() {
        &[x] => Ok(Some((x, x))),
        &[x, y] => Ok(Some((x, y))),
        _ => Err(invalid_value(node, aid, text)),
    }
}

/// Same as [`convert_float_pair`], but rejects negative values.
pub fn convert_non_negative_pair(node: SvgNode, aid: AId) -> Result<Option<(f32, f32)>, Error> {
    let pair = convert_float_pair(node, aid)?;
    match pair {
        Some((x, y)) if x.is_sign_negative() || y.is_sign_negative() => {
            Err(invalid_value(node, aid, node.raw_attribute(aid).unwrap_or("")))
        }
        _ => Ok(pair),
    }
}

/// Parses a non-negative integer.
pub fn convert_non_negative_integer(node: SvgNode, aid: AId, def: u32) -> Result<u32, Error> {
    match value(node, aid) {
        Some(text) => match i32::from_str(text) {
            Ok(n) if n >= 0 => Ok(n as u32),
            _ => Err(invalid_value(node, aid, text)),
        },
        None => Ok(def),
    }
}

/// Parses a list of one or two non-negative integers.
///
/// When only one integer is set, it's used for both values.
pub fn convert_integer_pair(node: SvgNode, aid: AId) -> Result<Option<(u32, u32)>, Error> {
    let text = match value(node, aid) {
        Some(v) => v,
        None => return Ok(None),
    };

    let mut list = Vec::new();
    for token in text.split(|c: char| c == ',' || c.is_ascii_whitespace()) {
        if token.is_empty() {
            continue;
        }

        match u32::from_str(token) {
            Ok(n) => list.push(n),
            Err(_) => return Err(invalid_value(node, aid, text)),
        }
    }

    match list.as_slice() {
        &[x] => Ok(Some((x, x))),
        &[x, y] => Ok(Some((x, y))),
        _ => Err(invalid_value(node, aid, text)),
    }
}

/// Parses a number.
pub fn convert_number(node: SvgNode, aid: AId, def: f32) -> Result<f32, Error> {
    match value(node, aid) {
        Some(text) => svgtypes::Number::from_str(text)
            .map(|n| n.0 as f32)
            .map_err(|_| invalid_value(node, aid, text)),
        None => Ok(def),
    }
}

/// Parses one of the enumerated keywords.
///
/// Surrounding whitespace is ignored, so ` stitch ` matches `stitch`.
/// An empty value is the same as a missing one.
pub fn convert_keyword<T: Copy>(
    node: SvgNode,
    aid: AId,
    keywords: &[(&str, T)],
    def: T,
) -> Result<T, Error> {
    let text = match value(node, aid) {
        Some(v) => v,
        None => return Ok(def),
    };

    keywords
        .iter()
        .find(|(name, _)| *name == text)
        .map(|(_, v)| *v)
        .ok_or_else(|| invalid_value(node, aid, text))
}

/// Parses a coordinate system units keyword.
pub fn convert_units(node: SvgNode, aid: AId, def: Units) -> Result<Units, Error> {
    convert_keyword(
        node,
        aid,
        &[
            ("userSpaceOnUse", Units::UserSpaceOnUse),
            ("objectBoundingBox", Units::ObjectBoundingBox),
        ],
        def,
    )
}

/// Parses an opacity, either a number or a percentage.
///
/// The value is clamped to the 0..1 range.
pub fn convert_opacity(node: SvgNode, aid: AId) -> Result<NormalizedF32, Error> {
    match value(node, aid) {
        Some(text) => node
            .try_attribute::<NormalizedF32>(aid)
            .ok_or_else(|| invalid_value(node, aid, text)),
        None => Ok(NormalizedF32::ONE),
    }
}

/// Parses a color.
pub fn convert_color(node: SvgNode, aid: AId, def: Color) -> Result<Color, Error> {
    match value(node, aid) {
        Some(text) => Color::from_str(text).map_err(|_| invalid_value(node, aid, text)),
        None => Ok(def),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svgtree::Document;
    use crate::Options;

    fn parse(attrs: &str) -> Document {
        let text = format!(
            "<svg xmlns='http://www.w3.org/2000/svg'><rect {}/></svg>",
            attrs
        );
        Document::from_str(&text, &Options::default()).unwrap()
    }

    fn rect(doc: &Document) -> SvgNode<'_> {
        doc.root_element().first_element_child().unwrap()
    }

    #[test]
    fn float_pair() {
        let doc = parse("x='0.5' y='0.1, 0.2' width='' height='1 2 3' rx='a'");
        let node = rect(&doc);
        assert_eq!(convert_float_pair(node, AId::X).unwrap(), Some((0.5, 0.5)));
        assert_eq!(convert_float_pair(node, AId::Y).unwrap(), Some((0.1, 0.2)));
        assert_eq!(convert_float_pair(node, AId::Width).unwrap(), None);
        assert_eq!(convert_float_pair(node, AId::Ry).unwrap(), None);
        assert!(convert_float_pair(node, AId::Height).is_err());
        assert!(convert_float_pair(node, AId::Rx).is_err());
    }

    #[test]
    fn non_negative_pair() {
        let doc = parse("x='1 -1'");
        assert!(convert_non_negative_pair(rect(&doc), AId::X).is_err());
    }

    #[test]
    fn integer() {
        let doc = parse("x='3' y='1.5' width='-2'");
        let node = rect(&doc);
        assert_eq!(convert_non_negative_integer(node, AId::X, 1).unwrap(), 3);
        assert_eq!(convert_non_negative_integer(node, AId::Height, 1).unwrap(), 1);
        assert!(convert_non_negative_integer(node, AId::Y, 1).is_err());
        assert!(convert_non_negative_integer(node, AId::Width, 1).is_err());
    }

    #[test]
    fn integer_pair() {
        let doc = parse("x='10' y='10,20' width='1 2 3' height='-1'");
        let node = rect(&doc);
        assert_eq!(convert_integer_pair(node, AId::X).unwrap(), Some((10, 10)));
        assert_eq!(convert_integer_pair(node, AId::Y).unwrap(), Some((10, 20)));
        assert!(convert_integer_pair(node, AId::Width).is_err());
        assert!(convert_integer_pair(node, AId::Height).is_err());
    }

    #[test]
    fn number() {
        let doc = parse("x='2.7' y='1e1' width='px'");
        let node = rect(&doc);
        assert_eq!(convert_number(node, AId::X, 0.0).unwrap(), 2.7);
        assert_eq!(convert_number(node, AId::Y, 0.0).unwrap(), 10.0);
        assert_eq!(convert_number(node, AId::Height, 4.0).unwrap(), 4.0);
        assert!(convert_number(node, AId::Width, 0.0).is_err());
    }

    #[test]
    fn keyword() {
        let doc = parse("x='on' y='maybe'");
        let node = rect(&doc);
        let keywords = &[("on", true), ("off", false)];
        assert!(convert_keyword(node, AId::X, keywords, false).unwrap());
        assert!(!convert_keyword(node, AId::Width, keywords, false).unwrap());

        match convert_keyword(node, AId::Y, keywords, false) {
            Err(Error::AttributeValue {
                element,
                attribute,
                value,
            }) => {
                assert_eq!(element, "rect");
                assert_eq!(attribute, AId::Y);
                assert_eq!(value, "maybe");
            }
            _ => panic!("an error expected"),
        }
    }

    #[test]
    fn opacity_and_color() {
        let doc = parse("opacity='50%' fill='red' stroke='#zz' fill-opacity='2'");
        let node = rect(&doc);
        assert_eq!(convert_opacity(node, AId::Opacity).unwrap().get(), 0.5);
        assert_eq!(convert_opacity(node, AId::FillOpacity).unwrap().get(), 1.0);
        assert_eq!(convert_opacity(node, AId::StrokeOpacity).unwrap().get(), 1.0);
        assert_eq!(
            convert_color(node, AId::Fill, Color::black()).unwrap(),
            Color::new_rgb(255, 0, 0)
        );
        assert!(convert_color(node, AId::Stroke, Color::black()).is_err());
    }
}
