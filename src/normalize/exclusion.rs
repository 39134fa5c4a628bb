use serde::Serialize;

/// Sentinel catalog entry that no pass ever touches.
pub const NO_PARAGRAPH_STYLE: &str = "[No Paragraph Style]";

/// A case-insensitive predicate over style names.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "match", content = "text", rename_all = "snake_case")]
pub enum ExclusionRule {
    Equals(String),
    Contains(String),
}

impl ExclusionRule {
    pub fn equals(text: &str) -> Self {
        ExclusionRule::Equals(text.to_lowercase())
    }

    pub fn contains(text: &str) -> Self {
        ExclusionRule::Contains(text.to_lowercase())
    }

    /// `lower_name` must already be lowercased.
    fn matches_lower(&self, lower_name: &str) -> bool {
        match self {
            ExclusionRule::Equals(text) => lower_name == text.to_lowercase(),
            ExclusionRule::Contains(text) => lower_name.contains(&text.to_lowercase()),
        }
    }
}

/// Ordered set of exclusion rules; a name matching any rule is skipped.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Exclusions {
    rules: Vec<ExclusionRule>,
}

impl Exclusions {
    pub fn new(rules: Vec<ExclusionRule>) -> Self {
        Self { rules }
    }

    pub fn indent_defaults() -> Self {
        Self::new(vec![ExclusionRule::equals(NO_PARAGRAPH_STYLE)])
    }

    pub fn spacing_defaults() -> Self {
        Self::new(vec![
            ExclusionRule::equals(NO_PARAGRAPH_STYLE),
            ExclusionRule::equals("Basic Paragraph Small"),
            ExclusionRule::contains("footnote"),
            ExclusionRule::contains("endnote"),
            ExclusionRule::contains("caption"),
            ExclusionRule::contains("table"),
        ])
    }

    pub fn push(&mut self, rule: ExclusionRule) {
        self.rules.push(rule);
    }

    /// The first rule matching `name`, if any.
    pub fn matching(&self, name: &str) -> Option<&ExclusionRule> {
        let lower = name.to_lowercase();
        self.rules.iter().find(|r| r.matches_lower(&lower))
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.matching(name).is_some()
    }
}
