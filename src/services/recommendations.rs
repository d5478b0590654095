use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    models::{ScoredVenueRecord, VenueQuery, VenueRecord},
    services::{
        catalog::Catalog,
        daily, matcher, merge,
        providers::{PlacesProvider, PlacesSearch},
        scorer, search,
    },
};

/// Size of the random-sample tier when nothing else is configured
pub const DEFAULT_RANDOM_SAMPLE_SIZE: usize = 30;

/// The strategy that produced a recommendation list, strictest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackTier {
    /// Weighted match over all three channels
    Smart,
    /// Venues sharing a mood with the query, catalog order
    MoodOnly,
    /// Plain filter with companion and need constraints dropped
    Relaxed,
    /// Uniform sample of the whole catalog
    RandomSample,
}

/// Ranked venues plus the tier that produced them
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub tier: FallbackTier,
    pub venues: Vec<ScoredVenueRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub random_sample_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            random_sample_size: DEFAULT_RANDOM_SAMPLE_SIZE,
        }
    }
}

/// Runs the fallback chain: smart → mood-only → relaxed → random sample.
///
/// Stops at the first tier with results, so a non-empty catalog always
/// yields a non-empty list when `limit > 0`. Every tier honours `limit`.
pub fn recommend<R>(
    venues: &[VenueRecord],
    query: &VenueQuery,
    limit: usize,
    settings: &EngineSettings,
    rng: &mut R,
) -> Recommendation
where
    R: Rng + ?Sized,
{
    if limit == 0 {
        return Recommendation {
            tier: FallbackTier::Smart,
            venues: Vec::new(),
        };
    }

    let smart = scorer::rank(venues, query, limit);
    if !smart.is_empty() {
        return tiered(FallbackTier::Smart, smart);
    }

    let mood_only = mood_only_match(venues, query, limit);
    if !mood_only.is_empty() {
        return tiered(FallbackTier::MoodOnly, mood_only);
    }

    let relaxed = relaxed_match(venues, query, limit);
    if !relaxed.is_empty() {
        return tiered(FallbackTier::Relaxed, relaxed);
    }

    let sample_size = settings.random_sample_size.min(limit);
    tiered(
        FallbackTier::RandomSample,
        random_sample(venues, query, sample_size, rng),
    )
}

fn tiered(tier: FallbackTier, venues: Vec<ScoredVenueRecord>) -> Recommendation {
    tracing::debug!(tier = ?tier, results = venues.len(), "Fallback chain resolved");
    Recommendation { tier, venues }
}

/// Venues whose moods intersect the query's moods, ignoring the other channels
fn mood_only_match(
    venues: &[VenueRecord],
    query: &VenueQuery,
    limit: usize,
) -> Vec<ScoredVenueRecord> {
    if !query.has_moods() {
        return Vec::new();
    }

    unscored(
        venues
            .iter()
            .filter(|v| matcher::intersects(&v.moods, &query.moods)),
        query,
        limit,
    )
}

/// Reruns the plain filter over the query reduced to its moods.
///
/// Needs mood tokens: with none left the reduced query would match the
/// whole catalog and hide the random-sample tier.
fn relaxed_match(venues: &[VenueRecord], query: &VenueQuery, limit: usize) -> Vec<ScoredVenueRecord> {
    if !query.has_moods() {
        return Vec::new();
    }

    let relaxed = query.moods_only();
    unscored(
        venues.iter().filter(|v| matcher::matches(v, &relaxed)),
        query,
        limit,
    )
}

/// Up to `size` distinct venues, uniformly chosen, no ordering guarantee
fn random_sample<R>(
    venues: &[VenueRecord],
    query: &VenueQuery,
    size: usize,
    rng: &mut R,
) -> Vec<ScoredVenueRecord>
where
    R: Rng + ?Sized,
{
    unscored(venues.choose_multiple(rng, size), query, size)
}

/// Keeps input order; scores are reported against the original query
fn unscored<'a, I>(venues: I, query: &VenueQuery, limit: usize) -> Vec<ScoredVenueRecord>
where
    I: Iterator<Item = &'a VenueRecord>,
{
    venues
        .take(limit)
        .map(|venue| ScoredVenueRecord {
            score: scorer::score(venue, query),
            venue: venue.clone(),
        })
        .collect()
}

/// Stateless recommendation service over a shared, read-only catalog
///
/// Built once at startup and handed to request handlers through the
/// application state.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    settings: EngineSettings,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<Catalog>, settings: EngineSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn recommend(&self, query: &VenueQuery, limit: usize) -> Recommendation {
        self.recommend_with_rng(query, limit, &mut rand::thread_rng())
    }

    pub fn recommend_with_rng<R>(&self, query: &VenueQuery, limit: usize, rng: &mut R) -> Recommendation
    where
        R: Rng + ?Sized,
    {
        recommend(self.catalog.venues(), query, limit, &self.settings, rng)
    }

    pub fn search(&self, text: &str) -> Vec<&VenueRecord> {
        search::search(self.catalog.venues(), text)
    }

    /// `None` only when the catalog is empty
    pub fn todays_pick(&self, date: NaiveDate) -> Option<&VenueRecord> {
        daily::todays_pick(self.catalog.venues(), date)
    }
}

/// Catalog recommendations merged with live results from an external provider.
///
/// Provider failures are logged and the catalog answer is returned alone.
/// External venues carry the query's moods, so they score like catalog
/// venues. The merged list is ranked by score, with external venues ahead of
/// catalog ones only among equal scores.
pub async fn recommend_with_places(
    engine: &RecommendationEngine,
    provider: &dyn PlacesProvider,
    query: &VenueQuery,
    near: Option<&str>,
    limit: usize,
) -> Recommendation {
    let local = engine.recommend(query, limit);

    let places_search = PlacesSearch::from_query(query, near);
    let external = match provider.search_places(&places_search).await {
        Ok(venues) => venues,
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = provider.name(),
                "External places lookup failed, serving catalog results only"
            );
            Vec::new()
        }
    };

    let external_count = external.len();
    let local_records = local.venues.into_iter().map(|scored| scored.venue).collect();
    let merged = merge::merge([external, local_records]);

    tracing::info!(
        provider = provider.name(),
        external = external_count,
        merged = merged.len(),
        "Merged catalog and external venues"
    );

    let mut venues: Vec<ScoredVenueRecord> = merged
        .into_iter()
        .map(|venue| ScoredVenueRecord {
            score: scorer::score(&venue, query),
            venue,
        })
        .collect();
    // score first; source order only breaks ties
    venues.sort_by(|a, b| {
        let by_source = merge::display_rank(a.venue.source).cmp(&merge::display_rank(b.venue.source));
        b.score.cmp(&a.score).then(by_source)
    });
    venues.truncate(limit);

    Recommendation {
        tier: local.tier,
        venues,
    }
}
