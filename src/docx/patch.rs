//! Write style updates back into `styles.xml` text.
//!
//! roxmltree is read-only, so updates are applied as text edits at the source
//! positions it reports for nodes and attributes. Only attribute values of
//! `w:ind` and `w:spacing` and newly inserted elements change; all other bytes
//! of the part pass through untouched.

use std::collections::HashMap;
use std::ops::Range;

use crate::error::Error;
use crate::model::StyleUpdate;

use super::styles::paragraph_styles;
use super::{WML_NS, pts_to_twips, wml};

/// CT_PPr children that must follow `w:spacing`, in schema order.
const SPACING_FOLLOWERS: &[&str] = &[
    "ind",
    "contextualSpacing",
    "mirrorIndents",
    "suppressOverlap",
    "jc",
    "textDirection",
    "textAlignment",
    "textboxTightWrap",
    "outlineLvl",
    "divId",
    "cnfStyle",
    "rPr",
    "sectPr",
    "pPrChange",
];

/// CT_Style children that must follow `w:pPr`.
const PPR_FOLLOWERS: &[&str] = &["rPr", "tblPr", "trPr", "tcPr", "tblStylePr"];

pub(crate) struct Patched {
    pub(crate) xml: String,
    pub(crate) applied: usize,
    pub(crate) unapplied: Vec<String>,
}

struct Edit {
    at: Range<usize>,
    text: String,
}

impl Edit {
    fn insert(at: usize, text: String) -> Self {
        Edit { at: at..at, text }
    }
}

/// `None` removes the attribute.
type AttrChange = (String, Option<String>);

/// Apply `(catalog index, name, update)` entries to the paragraph styles of `xml`.
///
/// Indices refer to catalog order as read by `parse_catalog`. When several
/// paragraph styles share a name only the first of them is patched.
pub(crate) fn apply_updates(
    xml: &str,
    updates: &[(usize, String, StyleUpdate)],
) -> Result<Patched, Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let styles: Vec<_> = paragraph_styles(&doc).collect();

    let mut first_index: HashMap<&str, usize> = HashMap::new();
    for (i, (name, _)) in styles.iter().enumerate() {
        first_index.entry(name.as_str()).or_insert(i);
    }

    // Edits tagged with the position of their update in `updates`.
    let mut edits: Vec<(usize, Edit)> = Vec::new();
    let mut accepted = vec![false; updates.len()];
    let mut unapplied = Vec::new();
    for (owner, (index, name, update)) in updates.iter().enumerate() {
        let Some((_, style)) = styles.get(*index).filter(|(n, _)| n == name) else {
            log::warn!("No paragraph style {name:?} at catalog index {index}; not applied");
            unapplied.push(name.clone());
            continue;
        };
        if first_index.get(name.as_str()) != Some(index) {
            log::warn!(
                "Paragraph style {name:?} at catalog index {index} repeats an earlier name; \
                 only the first is updated"
            );
            unapplied.push(name.clone());
            continue;
        }
        match style_edits(xml, *style, update) {
            Ok(style_edits) => {
                edits.extend(style_edits.into_iter().map(|e| (owner, e)));
                accepted[owner] = true;
            }
            Err(reason) => {
                log::warn!("Cannot update style {name:?}: {reason}");
                unapplied.push(name.clone());
            }
        }
    }

    // Inserts sort ahead of a replacement starting at the same offset.
    edits.sort_by_key(|(_, e)| (e.at.start, e.at.end));

    // An edit starting inside an earlier one rejects both styles.
    let mut reach: Option<(usize, usize)> = None;
    for (owner, edit) in &edits {
        if let Some((end, by)) = reach
            && edit.at.start < end
        {
            accepted[by] = false;
            accepted[*owner] = false;
        }
        if reach.is_none_or(|(end, _)| edit.at.end >= end) {
            reach = Some((edit.at.end, *owner));
        }
    }
    for (owner, (_, name, _)) in updates.iter().enumerate() {
        let had_edits = edits.iter().any(|(o, _)| *o == owner);
        if had_edits && !accepted[owner] {
            log::warn!("Conflicting edits for style {name:?}; update not applied");
            unapplied.push(name.clone());
        }
    }

    let mut out = String::with_capacity(xml.len() + edits.len() * 32);
    let mut cursor = 0;
    for (_, edit) in edits.iter().filter(|(owner, _)| accepted[*owner]) {
        out.push_str(&xml[cursor..edit.at.start]);
        out.push_str(&edit.text);
        cursor = edit.at.end;
    }
    out.push_str(&xml[cursor..]);

    Ok(Patched {
        xml: out,
        applied: accepted.iter().filter(|a| **a).count(),
        unapplied,
    })
}

fn style_edits(
    xml: &str,
    style: roxmltree::Node,
    update: &StyleUpdate,
) -> Result<Vec<Edit>, String> {
    let prefix = wml_prefix(style)?;
    let ppr = wml(style, "pPr");
    let spacing = ppr.and_then(|n| wml(n, "spacing"));
    let ind = ppr.and_then(|n| wml(n, "ind"));

    let spacing_changes = spacing_changes(update);
    let ind_changes = ind_changes(ind, update);

    let mut edits = Vec::new();
    // New elements, in schema order, keyed by the position they go in front of.
    let mut inserts: Vec<(Option<usize>, String)> = Vec::new();

    for (local, existing, changes, followers) in [
        ("spacing", spacing, &spacing_changes, SPACING_FOLLOWERS),
        ("ind", ind, &ind_changes, &SPACING_FOLLOWERS[1..]),
    ] {
        if changes.is_empty() {
            continue;
        }
        match existing {
            Some(el) => edits.extend(attribute_edits(xml, el, &prefix, changes)),
            None => {
                let anchor = ppr.and_then(|p| first_child_of(p, followers));
                inserts.push((anchor, empty_element(&prefix, local, changes)));
            }
        }
    }

    if inserts.is_empty() {
        return Ok(edits);
    }

    let Some(ppr) = ppr else {
        let body: String = inserts.into_iter().map(|(_, text)| text).collect();
        let text = format!("<{prefix}pPr>{body}</{prefix}pPr>");
        let at = match first_child_of(style, PPR_FOLLOWERS) {
            Some(pos) => pos,
            None => content_end(xml, style)?,
        };
        edits.push(Edit::insert(at, text));
        return Ok(edits);
    };

    let (close, self_closing) = start_tag_close(xml, ppr);
    if self_closing {
        let body: String = inserts.into_iter().map(|(_, text)| text).collect();
        edits.push(Edit {
            at: close..close + 2,
            text: format!(">{body}</{}>", qname(xml, ppr)),
        });
        return Ok(edits);
    }

    let end = content_end(xml, ppr)?;
    for (anchor, text) in inserts {
        edits.push(Edit::insert(anchor.unwrap_or(end), text));
    }
    Ok(edits)
}

fn spacing_changes(update: &StyleUpdate) -> Vec<AttrChange> {
    let mut changes = Vec::new();
    for (side, value) in [("before", update.space_before), ("after", update.space_after)] {
        let Some(v) = value else { continue };
        changes.push((side.to_string(), Some(pts_to_twips(v).to_string())));
        changes.push((format!("{side}Lines"), None));
        changes.push((format!("{side}Autospacing"), None));
    }
    changes
}

fn ind_changes(ind: Option<roxmltree::Node>, update: &StyleUpdate) -> Vec<AttrChange> {
    let has = |attr: &str| ind.is_some_and(|n| n.has_attribute((WML_NS, attr)));
    let mut changes = Vec::new();

    for (value, name, bidi) in [
        (update.left_indent, "left", "start"),
        (update.right_indent, "right", "end"),
    ] {
        let Some(v) = value else { continue };
        let side = if has(bidi) && !has(name) { bidi } else { name };
        changes.push((side.to_string(), Some(pts_to_twips(v).to_string())));
        changes.push((format!("{side}Chars"), None));
    }

    if let Some(v) = update.first_line_indent {
        let (set, clear) = if v < 0.0 {
            ("hanging", "firstLine")
        } else {
            ("firstLine", "hanging")
        };
        changes.push((set.to_string(), Some(pts_to_twips(v.abs()).to_string())));
        changes.push((clear.to_string(), None));
        changes.push(("firstLineChars".to_string(), None));
        changes.push(("hangingChars".to_string(), None));
    }
    changes
}

/// `"w:"` for the usual binding. WML attributes are always prefixed, so a
/// document binding WML only as the default namespace cannot be written to.
fn wml_prefix(node: roxmltree::Node) -> Result<String, String> {
    match node.lookup_prefix(WML_NS) {
        Some(p) if !p.is_empty() => Ok(format!("{p}:")),
        _ => Err("WordprocessingML namespace has no prefix".into()),
    }
}

fn first_child_of(parent: roxmltree::Node, names: &[&str]) -> Option<usize> {
    parent
        .children()
        .find(|n| n.tag_name().namespace() == Some(WML_NS) && names.contains(&n.tag_name().name()))
        .map(|n| n.range().start)
}

/// Element name as written in the source, prefix included.
fn qname<'x>(xml: &'x str, node: roxmltree::Node) -> &'x str {
    let rest = &xml[node.range().start + 1..];
    let len = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    &rest[..len]
}

/// Offset of the `/>` or `>` closing the start tag of `node`, and whether
/// the element is self-closing.
fn start_tag_close(xml: &str, node: roxmltree::Node) -> (usize, bool) {
    let range = node.range();
    if let Some(child) = node.first_child() {
        return (child.range().start - 1, false);
    }
    let source = &xml[range.clone()];
    if source.ends_with("/>") {
        return (range.end - 2, true);
    }
    // `<x ...></x>`: the last `</` opens the end tag.
    let end_tag = source.rfind("</").map_or(range.end, |i| range.start + i);
    (end_tag - 1, false)
}

/// Offset of the end tag of a non-empty element.
fn content_end(xml: &str, node: roxmltree::Node) -> Result<usize, String> {
    if let Some(last) = node.last_child() {
        return Ok(last.range().end);
    }
    match start_tag_close(xml, node) {
        (_, true) => Err(format!("<{}/> has no content to extend", qname(xml, node))),
        (close, false) => Ok(close + 1),
    }
}

fn empty_element(prefix: &str, local: &str, changes: &[AttrChange]) -> String {
    let mut out = format!("<{prefix}{local}");
    for (attr, value) in changes {
        if let Some(v) = value {
            out.push_str(&format!(" {prefix}{attr}=\"{v}\""));
        }
    }
    out.push_str("/>");
    out
}

/// Edits setting or removing `w:` attributes on an existing element.
///
/// Existing attributes keep their prefix and quote style; new ones go at the
/// end of the start tag.
fn attribute_edits(
    xml: &str,
    node: roxmltree::Node,
    prefix: &str,
    changes: &[AttrChange],
) -> Vec<Edit> {
    let (close, _) = start_tag_close(xml, node);
    let mut edits = Vec::new();

    for (local, value) in changes {
        let existing = node
            .attributes()
            .find(|a| a.namespace() == Some(WML_NS) && a.name() == local.as_str());
        match (existing, value) {
            (Some(attr), Some(v)) => edits.push(Edit {
                at: attr.range_value(),
                text: v.clone(),
            }),
            (Some(attr), None) => {
                let range = attr.range();
                let start = xml[..range.start].trim_end().len();
                edits.push(Edit {
                    at: start..range.end,
                    text: String::new(),
                });
            }
            (None, Some(v)) => {
                edits.push(Edit::insert(close, format!(" {prefix}{local}=\"{v}\"")));
            }
            (None, None) => {}
        }
    }
    edits
}
