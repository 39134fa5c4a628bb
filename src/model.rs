use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static LEVEL_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9]+").expect("static pattern"));

/// A style name and the first digit run it carries.
///
/// "Body 2" parses to level multiplier 2. The multiplier is the indent
/// depth of numbered styles such as list levels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StyleName {
    pub raw: String,
    pub level_multiplier: Option<u32>,
}

impl StyleName {
    /// Parse a raw name. A digit run too large for `u32` yields an
    /// [`AttributeFault`] on [`Attribute::Name`] and no multiplier.
    pub fn parse(raw: &str) -> (StyleName, Option<AttributeFault>) {
        let Some(m) = LEVEL_DIGITS.find(raw) else {
            let name = StyleName {
                raw: raw.to_string(),
                level_multiplier: None,
            };
            return (name, None);
        };

        let (level_multiplier, fault) = match m.as_str().parse::<u32>() {
            Ok(n) => (Some(n), None),
            Err(e) => (
                None,
                Some(AttributeFault::new(
                    Attribute::Name,
                    format!("level number {:?} out of range ({e})", m.as_str()),
                )),
            ),
        };

        let name = StyleName {
            raw: raw.to_string(),
            level_multiplier,
        };
        (name, fault)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Name,
    FontSize,
    Leading,
    LeftIndent,
    RightIndent,
    FirstLineIndent,
    SpaceBefore,
    SpaceAfter,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Attribute::Name => "name",
            Attribute::FontSize => "font size",
            Attribute::Leading => "leading",
            Attribute::LeftIndent => "left indent",
            Attribute::RightIndent => "right indent",
            Attribute::FirstLineIndent => "first line indent",
            Attribute::SpaceBefore => "space before",
            Attribute::SpaceAfter => "space after",
        };
        f.write_str(s)
    }
}

/// An attribute that is present on a style but could not be interpreted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttributeFault {
    pub attribute: Attribute,
    pub cause: String,
}

impl AttributeFault {
    pub fn new(attribute: Attribute, cause: impl Into<String>) -> Self {
        Self {
            attribute,
            cause: cause.into(),
        }
    }
}

impl fmt::Display for AttributeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.attribute, self.cause)
    }
}

/// Read-only snapshot of one paragraph style. All lengths are points.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StyleRecord {
    pub name: StyleName,
    pub font_size: Option<f32>, // None = not set on this style
    pub leading: Option<f32>,   // None = not set, or not an absolute leading
    pub left_indent: f32,
    pub right_indent: f32,
    pub first_line_indent: f32, // negative = hanging
    pub space_before: f32,
    pub space_after: f32,
    pub faults: Vec<AttributeFault>,
}

impl StyleRecord {
    /// A record with no attributes set. Name parse faults are recorded.
    pub fn new(name: &str) -> Self {
        let (name, fault) = StyleName::parse(name);
        Self {
            name,
            font_size: None,
            leading: None,
            left_indent: 0.0,
            right_indent: 0.0,
            first_line_indent: 0.0,
            space_before: 0.0,
            space_after: 0.0,
            faults: fault.into_iter().collect(),
        }
    }

    /// First fault on any of `attributes`, in record order.
    pub fn fault_on(&self, attributes: &[Attribute]) -> Option<&AttributeFault> {
        self.faults
            .iter()
            .find(|f| attributes.contains(&f.attribute))
    }
}

/// Fields a pass decided to change. `None` leaves the field as is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StyleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_indent: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_indent: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_line_indent: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_before: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_after: Option<f32>,
}

impl StyleUpdate {
    pub fn is_empty(&self) -> bool {
        *self == StyleUpdate::default()
    }

    /// Fields set in `other` take precedence.
    pub fn merge(self, other: StyleUpdate) -> StyleUpdate {
        StyleUpdate {
            left_indent: other.left_indent.or(self.left_indent),
            right_indent: other.right_indent.or(self.right_indent),
            first_line_indent: other.first_line_indent.or(self.first_line_indent),
            space_before: other.space_before.or(self.space_before),
            space_after: other.space_after.or(self.space_after),
        }
    }

    /// Apply to a snapshot, producing what the style would read as afterwards.
    pub fn apply_to(&self, record: &StyleRecord) -> StyleRecord {
        let mut out = record.clone();
        if let Some(v) = self.left_indent {
            out.left_indent = v;
        }
        if let Some(v) = self.right_indent {
            out.right_indent = v;
        }
        if let Some(v) = self.first_line_indent {
            out.first_line_indent = v;
        }
        if let Some(v) = self.space_before {
            out.space_before = v;
        }
        if let Some(v) = self.space_after {
            out.space_after = v;
        }
        out
    }
}

impl fmt::Display for StyleUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("leftIndent", self.left_indent),
            ("rightIndent", self.right_indent),
            ("firstLineIndent", self.first_line_indent),
            ("spaceBefore", self.space_before),
            ("spaceAfter", self.space_after),
        ];
        let mut first = true;
        for (label, value) in fields {
            let Some(v) = value else { continue };
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{label} = {v}")?;
            first = false;
        }
        Ok(())
    }
}
