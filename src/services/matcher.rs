use crate::models::{Channel, TokenSet, VenueQuery, VenueRecord};

/// True when the two sets share at least one token.
///
/// An empty `query_set` is an absent filter and passes vacuously. An empty
/// `venue_set` against a non-empty query never matches.
pub fn intersects(venue_set: &TokenSet, query_set: &TokenSet) -> bool {
    query_set.is_empty() || query_set.iter().any(|t| venue_set.contains(t))
}

/// Number of query tokens the venue carries
pub fn overlap_count(venue_set: &TokenSet, query_set: &TokenSet) -> usize {
    query_set.iter().filter(|t| venue_set.contains(*t)).count()
}

/// Plain filter: every channel the query constrains must intersect.
///
/// Used by category and single-attribute lookups and by the relaxed fallback
/// tier. The ranked path goes through the scorer instead.
pub fn matches(venue: &VenueRecord, query: &VenueQuery) -> bool {
    Channel::ALL
        .iter()
        .all(|channel| intersects(channel.venue_tokens(venue), query.tokens(*channel)))
}
