//! Weighted relevance scoring of venues against a multi-channel query

use crate::{
    models::{Channel, ScoredVenueRecord, VenueQuery, VenueRecord},
    services::matcher,
};

/// Points per matching mood token
pub const MOOD_WEIGHT: u32 = 3;
/// Points per matching companion token
pub const COMPANION_WEIGHT: u32 = 2;
/// Points per matching need token
pub const NEED_WEIGHT: u32 = 2;

pub fn channel_weight(channel: Channel) -> u32 {
    match channel {
        Channel::Mood => MOOD_WEIGHT,
        Channel::Companion => COMPANION_WEIGHT,
        Channel::Need => NEED_WEIGHT,
    }
}

/// Sum over channels of (matching tokens × channel weight).
///
/// Matches within a channel accumulate without a cap. An empty sub-query
/// contributes nothing, so an empty query scores every venue 0.
pub fn score(venue: &VenueRecord, query: &VenueQuery) -> u32 {
    Channel::ALL
        .iter()
        .map(|&channel| {
            let hits = matcher::overlap_count(channel.venue_tokens(venue), query.tokens(channel));
            hits as u32 * channel_weight(channel)
        })
        .sum()
}

/// Scores every venue, keeps those scoring above 0, and returns the best `limit`.
///
/// Ordering is by descending score; equal scores keep their input order.
pub fn rank(venues: &[VenueRecord], query: &VenueQuery, limit: usize) -> Vec<ScoredVenueRecord> {
    let mut scored: Vec<ScoredVenueRecord> = venues
        .iter()
        .filter_map(|venue| {
            let score = score(venue, query);
            (score > 0).then(|| ScoredVenueRecord {
                venue: venue.clone(),
                score,
            })
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}
