use crate::model::{Attribute, StyleRecord, StyleUpdate};

use super::{Exclusions, Outcome, settle};

const CONSULTED: [Attribute; 4] = [
    Attribute::Name,
    Attribute::LeftIndent,
    Attribute::RightIndent,
    Attribute::FirstLineIndent,
];

/// Derive left, right and first-line indents from the style's font size.
///
/// A level number in the name scales the left indent to `size * level`
/// whatever its current value. Without one, any nonzero left or right indent
/// becomes exactly one font size; zero indents are intentionally flush and
/// stay. A first-line indent keeps its sign and is rescaled to one font size.
pub fn normalize_indents(record: &StyleRecord, exclusions: &Exclusions) -> Outcome {
    if exclusions.is_excluded(record.name.as_str()) {
        return Outcome::Excluded;
    }
    if let Some(fault) = record.fault_on(&[Attribute::FontSize]) {
        return Outcome::Errored {
            fault: fault.clone(),
        };
    }
    let Some(size) = record.font_size else {
        return Outcome::MissingPrerequisite {
            attribute: Attribute::FontSize,
        };
    };
    if let Some(fault) = record.fault_on(&CONSULTED) {
        return Outcome::Errored {
            fault: fault.clone(),
        };
    }

    let mut update = StyleUpdate::default();

    match record.name.level_multiplier {
        Some(level) => update.left_indent = Some(size * level as f32),
        None => update.left_indent = one_unit(record.left_indent, size),
    }

    update.right_indent = one_unit(record.right_indent, size);

    let first = record.first_line_indent;
    if first < 0.0 && first != -size {
        update.first_line_indent = Some(-size);
    } else if first > 0.0 && first != size {
        update.first_line_indent = Some(size);
    }

    // A level assignment equal to the current value is not a change.
    if update.left_indent == Some(record.left_indent) {
        update.left_indent = None;
    }

    settle(update)
}

/// `Some(size)` when `current` is set and differs from one font size.
fn one_unit(current: f32, size: f32) -> Option<f32> {
    (current != 0.0 && current != size).then_some(size)
}
