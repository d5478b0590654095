use serde::{Deserialize, Serialize};

use super::{venue::null_as_empty, TokenSet, VenueRecord};

/// One of the three independent attribute dimensions a venue is tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Mood,
    Companion,
    Need,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Mood, Channel::Companion, Channel::Need];

    /// Tokens the venue carries on this channel
    pub fn venue_tokens<'a>(&self, venue: &'a VenueRecord) -> &'a TokenSet {
        match self {
            Channel::Mood => &venue.moods,
            Channel::Companion => &venue.companions,
            Channel::Need => &venue.needs,
        }
    }
}

/// What a caller wants matched: moods, companion types and needs
///
/// Every set may be empty. A query with all three sets empty means
/// "no preference".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueQuery {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub moods: TokenSet,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub companions: TokenSet,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub needs: TokenSet,
}

impl VenueQuery {
    /// Creates an empty ("no preference") query
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_moods<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.moods.extend(normalize_tokens(tokens));
        self
    }

    pub fn with_companions<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.companions.extend(normalize_tokens(tokens));
        self
    }

    pub fn with_needs<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.needs.extend(normalize_tokens(tokens));
        self
    }

    /// Tokens the query asks for on a channel
    pub fn tokens(&self, channel: Channel) -> &TokenSet {
        match channel {
            Channel::Mood => &self.moods,
            Channel::Companion => &self.companions,
            Channel::Need => &self.needs,
        }
    }

    /// True when no channel carries a token
    pub fn is_empty(&self) -> bool {
        self.moods.is_empty() && self.companions.is_empty() && self.needs.is_empty()
    }

    pub fn has_moods(&self) -> bool {
        !self.moods.is_empty()
    }

    /// The same query with companion and need constraints dropped
    pub fn moods_only(&self) -> Self {
        Self {
            moods: self.moods.clone(),
            ..Self::default()
        }
    }

    /// Re-applies token normalization, for queries built straight from a request body
    pub fn normalized(self) -> Self {
        Self::new()
            .with_moods(self.moods)
            .with_companions(self.companions)
            .with_needs(self.needs)
    }
}

/// Trims and lowercases tokens, dropping any that end up empty
pub fn normalize_tokens<I, S>(tokens: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_query_is_empty() {
        let query = VenueQuery::new();
        assert!(query.is_empty());
        assert!(!query.has_moods());
    }

    #[test]
    fn test_builder_normalizes_tokens() {
        let query = VenueQuery::new()
            .with_moods(["  Happy ", "happy", ""])
            .with_companions(["FRIENDS"]);

        assert_eq!(query.moods.len(), 1);
        assert!(query.moods.contains("happy"));
        assert!(query.companions.contains("friends"));
        assert!(!query.is_empty());
    }

    #[test]
    fn test_moods_only_drops_other_channels() {
        let query = VenueQuery::new()
            .with_moods(["tired"])
            .with_companions(["partner"])
            .with_needs(["relax"]);

        let relaxed = query.moods_only();
        assert_eq!(relaxed.moods, query.moods);
        assert!(relaxed.companions.is_empty());
        assert!(relaxed.needs.is_empty());
    }

    #[test]
    fn test_normalized_lowercases_deserialized_query() {
        let query: VenueQuery =
            serde_json::from_str(r#"{"moods": ["Excited "], "needs": ["EAT"]}"#).unwrap();
        let query = query.normalized();

        assert!(query.moods.contains("excited"));
        assert!(query.needs.contains("eat"));
        assert!(query.companions.is_empty());
    }

    #[test]
    fn test_null_channels_deserialize_as_empty() {
        let query: VenueQuery =
            serde_json::from_str(r#"{"moods": null, "companions": ["alone"], "needs": null}"#)
                .unwrap();

        assert!(query.moods.is_empty());
        assert!(query.needs.is_empty());
        assert!(query.companions.contains("alone"));
    }

    #[test]
    fn test_channel_tokens_lookup() {
        let query = VenueQuery::new().with_needs(["drink"]);
        assert!(query.tokens(Channel::Need).contains("drink"));
        assert!(query.tokens(Channel::Mood).is_empty());
    }
}
