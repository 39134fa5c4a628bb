use crate::model::{Attribute, StyleRecord, StyleUpdate};

use super::{Exclusions, Outcome, settle};

/// Name of the style that frames a break rule with equal space on both sides.
const BREAK_STYLE: &str = "break";

/// Set space before to the style's leading.
///
/// Exclusions are checked before anything else, so "Footnote Break" is
/// excluded rather than treated as the break style. A zero space before
/// means "no gap" and is kept as [`Outcome::NotApplicable`].
pub fn normalize_spacing(record: &StyleRecord, exclusions: &Exclusions) -> Outcome {
    let name = record.name.as_str();
    if exclusions.is_excluded(name) {
        return Outcome::Excluded;
    }
    if let Some(fault) = record.fault_on(&[Attribute::Leading]) {
        return Outcome::Errored {
            fault: fault.clone(),
        };
    }
    let Some(leading) = record.leading else {
        return Outcome::MissingPrerequisite {
            attribute: Attribute::Leading,
        };
    };

    let mut update = StyleUpdate::default();

    if name.to_lowercase() == BREAK_STYLE {
        if record.space_before != leading {
            update.space_before = Some(leading);
        }
        if record.space_after != leading {
            update.space_after = Some(leading);
        }
        return settle(update);
    }

    if let Some(fault) = record.fault_on(&[Attribute::SpaceBefore]) {
        return Outcome::Errored {
            fault: fault.clone(),
        };
    }
    if record.space_before == 0.0 {
        return Outcome::NotApplicable;
    }
    if record.space_before != leading {
        update.space_before = Some(leading);
    }

    settle(update)
}
