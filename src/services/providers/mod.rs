//! External places providers
//!
//! Live venue lookups that complement the bundled catalog. Providers reshape
//! their API responses into `VenueRecord`s tagged `external-api`; those
//! records live for one request and are never written back to the catalog.

use crate::{
    error::AppResult,
    models::{TokenSet, VenueQuery, VenueRecord},
};

pub mod google_places;

pub use google_places::GooglePlacesProvider;

/// Keyword sent to the provider when the query names no known need
const FALLBACK_KEYWORD: &str = "things to do";

/// A provider-agnostic place lookup derived from a venue query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacesSearch {
    /// Free-text search string, e.g. "restaurant near Hongdae"
    pub text: String,
    /// Moods the results are fetched for; copied onto every returned record
    pub moods: TokenSet,
}

impl PlacesSearch {
    pub fn from_query(query: &VenueQuery, near: Option<&str>) -> Self {
        let keywords: Vec<&str> = query.needs.iter().filter_map(|n| need_keyword(n)).collect();

        let mut text = if keywords.is_empty() {
            FALLBACK_KEYWORD.to_string()
        } else {
            keywords.join(" ")
        };

        if let Some(area) = near.map(str::trim).filter(|a| !a.is_empty()) {
            text.push_str(" near ");
            text.push_str(area);
        }

        Self {
            text,
            moods: query.moods.clone(),
        }
    }
}

fn need_keyword(need: &str) -> Option<&'static str> {
    match need {
        "eat" => Some("restaurant"),
        "drink" => Some("bar"),
        "relax" => Some("cafe"),
        "explore" => Some("tourist attraction"),
        _ => None,
    }
}

/// Trait for external places providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Search for places matching `request`
    ///
    /// Returned records carry `source = external-api` and the request's moods.
    async fn search_places(&self, request: &PlacesSearch) -> AppResult<Vec<VenueRecord>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_text_from_needs() {
        let query = VenueQuery::new().with_moods(["happy"]).with_needs(["eat"]);
        let search = PlacesSearch::from_query(&query, None);

        assert_eq!(search.text, "restaurant");
        assert!(search.moods.contains("happy"));
    }

    #[test]
    fn test_search_text_joins_needs_in_token_order() {
        let query = VenueQuery::new().with_needs(["relax", "drink"]);
        let search = PlacesSearch::from_query(&query, None);

        // token sets are ordered, so "drink" comes first
        assert_eq!(search.text, "bar cafe");
    }

    #[test]
    fn test_search_text_falls_back_without_known_needs() {
        let query = VenueQuery::new().with_needs(["sleep"]);
        assert_eq!(PlacesSearch::from_query(&query, None).text, "things to do");
        assert_eq!(
            PlacesSearch::from_query(&VenueQuery::new(), None).text,
            "things to do"
        );
    }

    #[test]
    fn test_search_text_appends_area() {
        let query = VenueQuery::new().with_needs(["explore"]);
        let search = PlacesSearch::from_query(&query, Some(" Hongdae "));
        assert_eq!(search.text, "tourist attraction near Hongdae");

        let search = PlacesSearch::from_query(&query, Some("   "));
        assert_eq!(search.text, "tourist attraction");
    }
}
