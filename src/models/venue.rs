use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::BTreeSet, fmt::Display};

/// A set of lowercase attribute tokens (moods, companions or needs).
///
/// The vocabulary is open: the catalog defines which tokens exist.
pub type TokenSet = BTreeSet<String>;

/// Identifier for a venue, unique within its source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VenueId {
    /// Numeric id used by the bundled catalog
    Numeric(u64),
    /// Opaque id handed out by an external places API
    Text(String),
}

impl Display for VenueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VenueId::Numeric(id) => write!(f, "{}", id),
            VenueId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<u64> for VenueId {
    fn from(id: u64) -> Self {
        VenueId::Numeric(id)
    }
}

impl From<&str> for VenueId {
    fn from(id: &str) -> Self {
        match id.parse::<u64>() {
            Ok(n) => VenueId::Numeric(n),
            Err(_) => VenueId::Text(id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Cafe,
    Place,
    Activity,
    Entertainment,
}

impl Category {
    /// Display string shown next to the venue and matched by search
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Restaurant",
            Category::Cafe => "Cafe",
            Category::Place => "Place",
            Category::Activity => "Activity",
            Category::Entertainment => "Entertainment",
        }
    }

    /// Glyph used for records that do not bring their own
    pub fn default_icon(&self) -> &'static str {
        match self {
            Category::Food => "🍽️",
            Category::Cafe => "☕",
            Category::Place => "📍",
            Category::Activity => "🎯",
            Category::Entertainment => "🎭",
        }
    }

    /// Need tokens a venue of this category serves when nothing more specific is known
    pub fn default_needs(&self) -> &'static [&'static str] {
        match self {
            Category::Food => &["eat"],
            Category::Cafe => &["drink", "relax"],
            Category::Place => &["explore", "relax"],
            Category::Activity => &["explore"],
            Category::Entertainment => &["drink", "explore"],
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "food" => Some(Category::Food),
            "cafe" => Some(Category::Cafe),
            "place" => Some(Category::Place),
            "activity" => Some(Category::Activity),
            "entertainment" => Some(Category::Entertainment),
            _ => None,
        }
    }
}

/// Where a venue record came from
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Source {
    #[serde(rename = "external-api")]
    ExternalApi,
    #[default]
    #[serde(rename = "catalog")]
    Catalog,
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::ExternalApi => write!(f, "external-api"),
            Source::Catalog => write!(f, "catalog"),
        }
    }
}

/// A venue that can be recommended
///
/// Attribute sets are never absent: a missing set deserializes as empty,
/// and an empty set matches nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VenueRecord {
    pub id: VenueId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub icon: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub moods: TokenSet,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub companions: TokenSet,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub needs: TokenSet,
    /// Address, rating, price tier. Shown to users, never matched against.
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Treats an explicit `null` attribute set the same as a missing one
pub(super) fn null_as_empty<'de, D>(deserializer: D) -> Result<TokenSet, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TokenSet>::deserialize(deserializer)?.unwrap_or_default())
}

impl VenueRecord {
    pub fn category_label(&self) -> &'static str {
        self.category.label()
    }
}

/// A venue with the relevance score it earned for one query.
///
/// Scores exist only while ranking; they are never stored on the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredVenueRecord {
    #[serde(flatten)]
    pub venue: VenueRecord,
    pub score: u32,
}
