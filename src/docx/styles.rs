use crate::model::{Attribute, AttributeFault, StyleRecord};

use super::{WML_NS, twips_to_pts, wml, wml_attr};

/// Paragraph `w:style` elements of a styles part, with their display names.
pub(super) fn paragraph_styles<'a, 'i: 'a>(
    xml: &'a roxmltree::Document<'i>,
) -> impl Iterator<Item = (String, roxmltree::Node<'a, 'i>)> {
    xml.root_element()
        .children()
        .filter(|n| n.tag_name().name() == "style" && n.tag_name().namespace() == Some(WML_NS))
        .filter(|n| n.attribute((WML_NS, "type")) == Some("paragraph"))
        .filter_map(|n| style_name(n).map(|name| (name, n)))
}

/// `w:name` if present, else the style id.
fn style_name(style: roxmltree::Node) -> Option<String> {
    wml_attr(style, "name")
        .or_else(|| style.attribute((WML_NS, "styleId")))
        .map(str::to_string)
}

/// Snapshot every paragraph style in catalog order.
///
/// Only what the style itself sets is read; `basedOn` parents are not
/// consulted, so an unset font size stays `None`.
pub(crate) fn parse_catalog(xml: &roxmltree::Document) -> Vec<StyleRecord> {
    paragraph_styles(xml)
        .map(|(name, node)| snapshot(&name, node))
        .collect()
}

fn snapshot(name: &str, style: roxmltree::Node) -> StyleRecord {
    let mut record = StyleRecord::new(name);
    let faults = &mut record.faults;

    let rpr = wml(style, "rPr");
    let ppr = wml(style, "pPr");
    let ind = ppr.and_then(|n| wml(n, "ind"));
    let spacing = ppr.and_then(|n| wml(n, "spacing"));

    record.font_size = rpr
        .and_then(|n| wml(n, "sz"))
        .and_then(|n| measure(n, "val", Attribute::FontSize, faults))
        .map(|hp| hp / 2.0);

    record.leading = spacing.and_then(|n| leading(n, faults));

    if let Some(ind) = ind {
        record.left_indent = ["left", "start"]
            .iter()
            .find_map(|a| twips(ind, a, Attribute::LeftIndent, faults))
            .unwrap_or(0.0);
        record.right_indent = ["right", "end"]
            .iter()
            .find_map(|a| twips(ind, a, Attribute::RightIndent, faults))
            .unwrap_or(0.0);
        record.first_line_indent = match twips(ind, "hanging", Attribute::FirstLineIndent, faults)
        {
            Some(hanging) => -hanging,
            None => twips(ind, "firstLine", Attribute::FirstLineIndent, faults).unwrap_or(0.0),
        };
    }

    if let Some(spacing) = spacing {
        record.space_before =
            twips(spacing, "before", Attribute::SpaceBefore, faults).unwrap_or(0.0);
        record.space_after = twips(spacing, "after", Attribute::SpaceAfter, faults).unwrap_or(0.0);
    }

    record
}

/// Absolute line height from `w:spacing`. `auto` spacing is a multiple of
/// the font's line height, not a leading, and reads as unset.
fn leading(spacing: roxmltree::Node, faults: &mut Vec<AttributeFault>) -> Option<f32> {
    match spacing.attribute((WML_NS, "lineRule")) {
        Some("exact") | Some("atLeast") => twips(spacing, "line", Attribute::Leading, faults),
        None | Some("auto") => None,
        Some(other) => {
            faults.push(AttributeFault::new(
                Attribute::Leading,
                format!("unknown line rule {other:?}"),
            ));
            None
        }
    }
}

fn twips(
    node: roxmltree::Node,
    attr: &str,
    target: Attribute,
    faults: &mut Vec<AttributeFault>,
) -> Option<f32> {
    measure(node, attr, target, faults).map(twips_to_pts)
}

/// A numeric `w:` attribute. Present but unreadable values are faults.
fn measure(
    node: roxmltree::Node,
    attr: &str,
    target: Attribute,
    faults: &mut Vec<AttributeFault>,
) -> Option<f32> {
    let raw = node.attribute((WML_NS, attr))?;
    match raw.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            faults.push(AttributeFault::new(
                target,
                format!("cannot read w:{attr}={raw:?}"),
            ));
            None
        }
    }
}
