//! The bundled venue catalog
//!
//! Loaded once at startup and shared read-only between requests. Attribute
//! tokens are normalised here, at the boundary, so the matching code can
//! rely on lowercase, non-empty tokens and never sees an absent set.

use crate::{
    error::{AppError, AppResult},
    models::{normalize_tokens, Category, Source, VenueId, VenueQuery, VenueRecord},
    services::matcher,
};
use std::collections::HashSet;
use std::path::Path;

const BUNDLED_CATALOG: &str = include_str!("../../data/venues.json");

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    venues: Vec<VenueRecord>,
}

impl Catalog {
    /// Builds a catalog from already-constructed records, normalising and validating them
    pub fn new(venues: Vec<VenueRecord>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(venues.len());

        for venue in venues {
            if venue.title.trim().is_empty() {
                return Err(AppError::Catalog(format!("venue {} has an empty title", venue.id)));
            }
            if !seen.insert(venue.id.clone()) {
                return Err(AppError::Catalog(format!("duplicate venue id {}", venue.id)));
            }

            let venue = normalize_venue(venue);
            if venue.moods.is_empty() {
                tracing::warn!(
                    venue_id = %venue.id,
                    title = %venue.title,
                    "Catalog venue has no mood tokens and will only surface through search or sampling"
                );
            }
            normalized.push(venue);
        }

        Ok(Self { venues: normalized })
    }

    /// Parses a JSON array of venue records
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let venues: Vec<VenueRecord> = serde_json::from_str(json)
            .map_err(|e| AppError::Catalog(format!("Failed to parse catalog: {}", e)))?;
        Self::new(venues)
    }

    /// Reads a catalog file from disk
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Catalog(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// The catalog compiled into the binary
    pub fn bundled() -> AppResult<Self> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    /// Loads the catalog at `path` if given, otherwise the bundled one
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let catalog = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::bundled()?,
        };

        tracing::info!(
            venues = catalog.len(),
            source = path.unwrap_or("bundled"),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    pub fn venues(&self) -> &[VenueRecord] {
        &self.venues
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn get(&self, id: &VenueId) -> Option<&VenueRecord> {
        self.venues.iter().find(|v| &v.id == id)
    }

    /// Catalog-order filter by optional category and single-attribute tokens.
    ///
    /// Every constrained channel must intersect; an empty token set is an
    /// absent filter and passes every venue.
    pub fn lookup(&self, category: Option<Category>, filter: &VenueQuery) -> Vec<&VenueRecord> {
        self.venues
            .iter()
            .filter(|v| category.map_or(true, |c| v.category == c))
            .filter(|v| matcher::matches(v, filter))
            .collect()
    }
}

fn normalize_venue(mut venue: VenueRecord) -> VenueRecord {
    venue.moods = normalize_tokens(std::mem::take(&mut venue.moods)).collect();
    venue.companions = normalize_tokens(std::mem::take(&mut venue.companions)).collect();
    venue.needs = normalize_tokens(std::mem::take(&mut venue.needs)).collect();
    venue.source = Source::Catalog;
    if venue.icon.is_empty() {
        venue.icon = venue.category.default_icon().to_string();
    }
    venue
}
