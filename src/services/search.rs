use crate::models::VenueRecord;

/// Case-insensitive substring search over title, description and category label.
///
/// The text is matched as given, surrounding whitespace included.
/// Blank input returns nothing (unlike an empty recommendation query, which
/// means "anything"). Results keep catalog order and are not limited.
pub fn search<'a>(venues: &'a [VenueRecord], text: &str) -> Vec<&'a VenueRecord> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let needle = text.to_lowercase();

    let results: Vec<&VenueRecord> = venues
        .iter()
        .filter(|venue| {
            venue.title.to_lowercase().contains(&needle)
                || venue.description.to_lowercase().contains(&needle)
                || venue.category_label().to_lowercase().contains(&needle)
        })
        .collect();

    tracing::debug!(query = %needle, results = results.len(), "Venue search completed");

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Source, TokenSet, VenueId};

    fn venue(id: u64, title: &str, description: &str, category: Category) -> VenueRecord {
        VenueRecord {
            id: VenueId::Numeric(id),
            title: title.to_string(),
            description: description.to_string(),
            category,
            icon: String::new(),
            moods: TokenSet::new(),
            companions: TokenSet::new(),
            needs: TokenSet::new(),
            details: vec!["Seongsu-dong".to_string()],
            link: None,
            source: Source::Catalog,
            rating: None,
        }
    }

    fn catalog() -> Vec<VenueRecord> {
        vec![
            venue(1, "Moonlight Rooftop", "Cocktails above the city", Category::Entertainment),
            venue(2, "Paper Cup Roasters", "Slow drip coffee", Category::Cafe),
            venue(3, "Han River Picnic", "Grass, wind and a rooftop view", Category::Place),
        ]
    }

    #[test]
    fn test_search_matches_title_case_insensitively() {
        let venues = catalog();
        let results = search(&venues, "MOONLIGHT");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, VenueId::Numeric(1));
    }

    #[test]
    fn test_search_matches_description() {
        let venues = catalog();
        let results = search(&venues, "drip");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, VenueId::Numeric(2));
    }

    #[test]
    fn test_search_matches_category_label() {
        let venues = catalog();
        let results = search(&venues, "cafe");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, VenueId::Numeric(2));
    }

    #[test]
    fn test_search_ors_across_fields_in_catalog_order() {
        let venues = catalog();
        let results = search(&venues, "rooftop");
        let ids: Vec<_> = results.iter().map(|v| v.id.clone()).collect();
        assert_eq!(ids, vec![VenueId::Numeric(1), VenueId::Numeric(3)]);
    }

    #[test]
    fn test_search_ignores_details() {
        assert!(search(&catalog(), "seongsu").is_empty());
    }

    #[test]
    fn test_search_blank_input_returns_nothing() {
        assert!(search(&catalog(), "").is_empty());
        assert!(search(&catalog(), "   ").is_empty());
    }

    #[test]
    fn test_search_matches_raw_text() {
        let venues = catalog();
        assert!(search(&venues, "  paper cup ").is_empty());
        assert_eq!(search(&venues, "paper cup").len(), 1);
        // inner whitespace is part of the needle
        assert_eq!(search(&venues, "slow drip").len(), 1);
        assert!(search(&venues, "slow  drip").is_empty());
    }
}
