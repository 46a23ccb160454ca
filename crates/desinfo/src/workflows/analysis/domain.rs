use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Closed set of labels the classifier assigns to a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Falsch,
    Delegitimierung,
    Verzerrung,
    Frame,
    Wahr,
}

impl Category {
    /// Fixed presentation order used by every report section.
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Falsch,
            Self::Delegitimierung,
            Self::Verzerrung,
            Self::Frame,
            Self::Wahr,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Falsch => "FALSCH",
            Self::Delegitimierung => "DELEGITIMIERUNG",
            Self::Verzerrung => "VERZERRUNG",
            Self::Frame => "FRAME",
            Self::Wahr => "WAHR",
        }
    }

    /// Matches a classifier label, ignoring surrounding whitespace and case.
    pub fn from_label(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_uppercase();
        Self::ordered()
            .into_iter()
            .find(|category| category.label() == normalized)
    }

    pub const fn marker(self) -> MarkerGlyph {
        match self {
            Self::Wahr => MarkerGlyph::Check,
            _ => MarkerGlyph::Square,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerGlyph {
    Square,
    Check,
}

impl MarkerGlyph {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Square => "■",
            Self::Check => "✓",
        }
    }
}

/// One value per category, addressable by [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable<T> {
    #[serde(rename = "FALSCH")]
    pub falsch: T,
    #[serde(rename = "DELEGITIMIERUNG")]
    pub delegitimierung: T,
    #[serde(rename = "VERZERRUNG")]
    pub verzerrung: T,
    #[serde(rename = "FRAME")]
    pub frame: T,
    #[serde(rename = "WAHR")]
    pub wahr: T,
}

impl<T> CategoryTable<T> {
    pub fn from_fn(mut value_for: impl FnMut(Category) -> T) -> Self {
        Self {
            falsch: value_for(Category::Falsch),
            delegitimierung: value_for(Category::Delegitimierung),
            verzerrung: value_for(Category::Verzerrung),
            frame: value_for(Category::Frame),
            wahr: value_for(Category::Wahr),
        }
    }

    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::Falsch => &self.falsch,
            Category::Delegitimierung => &self.delegitimierung,
            Category::Verzerrung => &self.verzerrung,
            Category::Frame => &self.frame,
            Category::Wahr => &self.wahr,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ordered()
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}

/// Category as returned by the classifier. Labels outside the closed set are
/// kept verbatim so they can be flagged instead of silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryLabel {
    Known(Category),
    Unrecognized(String),
}

impl CategoryLabel {
    pub fn parse(raw: &str) -> Self {
        match Category::from_label(raw) {
            Some(category) => Self::Known(category),
            None => Self::Unrecognized(raw.trim().to_string()),
        }
    }

    pub fn known(&self) -> Option<Category> {
        match self {
            Self::Known(category) => Some(*category),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(category) => category.label(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<Category> for CategoryLabel {
    fn from(value: Category) -> Self {
        Self::Known(value)
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CategoryLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategoryLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// A single trimmed, non-empty unit of input text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Statement(String);

impl Statement {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classifier verdict for one statement. `points` is the value reported by
/// the classifier, or the configured category weight when it sent none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedStatement {
    pub text: String,
    pub category: CategoryLabel,
    pub justification: String,
    #[serde(default)]
    pub points: u32,
}

impl ClassifiedStatement {
    pub fn new(
        text: impl Into<String>,
        category: impl Into<CategoryLabel>,
        justification: impl Into<String>,
        points: u32,
    ) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            justification: justification.into(),
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_case_insensitively_after_trimming() {
        assert_eq!(Category::from_label(" falsch "), Some(Category::Falsch));
        assert_eq!(Category::from_label("Wahr"), Some(Category::Wahr));
        assert_eq!(Category::from_label("UNKNOWN"), None);
    }

    #[test]
    fn unrecognized_labels_are_preserved() {
        let label = CategoryLabel::parse("  SATIRE ");
        assert_eq!(label, CategoryLabel::Unrecognized("SATIRE".to_string()));
        assert_eq!(label.known(), None);
        assert_eq!(label.as_str(), "SATIRE");
    }

    #[test]
    fn only_wahr_uses_the_checkmark() {
        for category in Category::ordered() {
            let expected = if category == Category::Wahr {
                MarkerGlyph::Check
            } else {
                MarkerGlyph::Square
            };
            assert_eq!(category.marker(), expected);
        }
    }

    #[test]
    fn category_label_serializes_as_plain_string() {
        let json = serde_json::to_string(&CategoryLabel::Known(Category::Delegitimierung))
            .expect("serializes");
        assert_eq!(json, "\"DELEGITIMIERUNG\"");
        let parsed: CategoryLabel = serde_json::from_str("\"frame\"").expect("deserializes");
        assert_eq!(parsed, CategoryLabel::Known(Category::Frame));
    }

    #[test]
    fn statements_reject_blank_text() {
        assert!(Statement::new("   ").is_none());
        assert_eq!(Statement::new("  A  ").expect("statement").text(), "A");
    }
}
