//! Rule engine deriving paragraph indents and spacing from font size and leading.
//!
//! Both passes read the same immutable catalog snapshot and are independent
//! of each other: no style's result depends on any other style, or on the
//! other pass's output.

pub mod exclusion;
mod indent;
mod spacing;

use std::fmt;

use serde::Serialize;

use crate::model::{Attribute, AttributeFault, StyleRecord, StyleUpdate};

pub use exclusion::{ExclusionRule, Exclusions, NO_PARAGRAPH_STYLE};
pub use indent::normalize_indents;
pub use spacing::normalize_spacing;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Indent,
    Spacing,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Indent => f.write_str("indent"),
            Pass::Spacing => f.write_str("spacing"),
        }
    }
}

/// Terminal state of one style in one pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Name matched an exclusion rule. Never reported.
    Excluded,
    /// The attribute the pass derives from is not set on the style.
    MissingPrerequisite { attribute: Attribute },
    /// A rule applied and the style already holds its result.
    Unchanged,
    /// Evaluated; no rule applies to the current values.
    NotApplicable,
    Updated { update: StyleUpdate },
    Errored { fault: AttributeFault },
}

impl Outcome {
    pub fn update(&self) -> Option<&StyleUpdate> {
        match self {
            Outcome::Updated { update } => Some(update),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StyleOutcome {
    pub name: String,
    pub outcome: Outcome,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PassReport {
    pub pass: Pass,
    pub styles: Vec<StyleOutcome>,
}

impl PassReport {
    fn run(pass: Pass, records: &[StyleRecord], eval: impl Fn(&StyleRecord) -> Outcome) -> Self {
        let styles = records
            .iter()
            .map(|record| StyleOutcome {
                name: record.name.raw.clone(),
                outcome: eval(record),
            })
            .collect();
        PassReport { pass, styles }
    }

    fn empty(pass: Pass) -> Self {
        PassReport {
            pass,
            styles: Vec::new(),
        }
    }

    /// One log line per reportable outcome, in catalog order.
    pub fn diagnostics(&self) -> Vec<String> {
        self.styles
            .iter()
            .filter_map(|s| diagnostic(self.pass, s))
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.styles.iter().filter(|s| pred(&s.outcome)).count()
    }
}

fn diagnostic(pass: Pass, style: &StyleOutcome) -> Option<String> {
    let name = &style.name;
    match (&style.outcome, pass) {
        (Outcome::Excluded | Outcome::NotApplicable, _) => None,
        (Outcome::MissingPrerequisite { .. }, Pass::Indent) => None,
        (Outcome::MissingPrerequisite { .. }, Pass::Spacing) => {
            Some(format!("skipping, no leading set: {name}"))
        }
        (Outcome::Unchanged, _) => Some(format!("updated: {name}")),
        (Outcome::Updated { update }, _) => Some(format!("updated: {name} | {update}")),
        (Outcome::Errored { fault }, _) => Some(format!("error: {name}, {fault}")),
    }
}

/// Rule parameters for a run. `Default` is the stock policy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizeConfig {
    pub indents: bool,
    pub spacing: bool,
    pub indent_exclusions: Exclusions,
    pub spacing_exclusions: Exclusions,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            indents: true,
            spacing: true,
            indent_exclusions: Exclusions::indent_defaults(),
            spacing_exclusions: Exclusions::spacing_defaults(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub indent: PassReport,
    pub spacing: PassReport,
}

impl Report {
    /// Non-empty updates merged across both passes, in catalog order.
    pub fn updates(&self) -> Vec<(String, StyleUpdate)> {
        self.indexed_updates()
            .into_iter()
            .map(|(_, name, update)| (name, update))
            .collect()
    }

    /// [`Report::updates`] with each style's catalog index.
    ///
    /// Both pass reports hold one entry per catalog record, so index `i`
    /// names the same style in each.
    pub fn indexed_updates(&self) -> Vec<(usize, String, StyleUpdate)> {
        let len = self.indent.styles.len().max(self.spacing.styles.len());
        let mut out = Vec::new();
        for i in 0..len {
            let mut name = None;
            let mut merged = StyleUpdate::default();
            for style in [self.indent.styles.get(i), self.spacing.styles.get(i)]
                .into_iter()
                .flatten()
            {
                name = Some(&style.name);
                if let Some(update) = style.outcome.update() {
                    merged = merged.merge(*update);
                }
            }
            if let Some(name) = name
                && !merged.is_empty()
            {
                out.push((i, name.clone(), merged));
            }
        }
        out
    }

    pub fn diagnostics(&self) -> Vec<String> {
        let mut lines = self.indent.diagnostics();
        lines.extend(self.spacing.diagnostics());
        lines
    }

    pub fn errored(&self) -> usize {
        let is_err = |o: &Outcome| matches!(o, Outcome::Errored { .. });
        self.indent.count(is_err) + self.spacing.count(is_err)
    }
}

/// Run both passes over `records`.
pub fn normalize(records: &[StyleRecord], config: &NormalizeConfig) -> Report {
    let indent = if config.indents {
        PassReport::run(Pass::Indent, records, |r| {
            normalize_indents(r, &config.indent_exclusions)
        })
    } else {
        PassReport::empty(Pass::Indent)
    };
    let spacing = if config.spacing {
        PassReport::run(Pass::Spacing, records, |r| {
            normalize_spacing(r, &config.spacing_exclusions)
        })
    } else {
        PassReport::empty(Pass::Spacing)
    };
    Report { indent, spacing }
}

/// Shared tail of both passes: wrap a computed update into an outcome.
fn settle(update: StyleUpdate) -> Outcome {
    if update.is_empty() {
        Outcome::Unchanged
    } else {
        Outcome::Updated { update }
    }
}
