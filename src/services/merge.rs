//! Duplicate suppression when venue lists from several sources are combined
//!
//! Two records describe the same real-world venue when their titles
//! normalise to the same dedup key. On a collision the better-rated record
//! survives in the position the first one was seen.

use std::collections::HashMap;

use crate::models::{Source, VenueRecord};

/// Dedup keys are cut to this many characters
pub const DEDUP_KEY_LEN: usize = 32;

/// Lowercased, diacritic-folded, alphanumeric-only prefix of a title
pub fn dedup_key(title: &str) -> String {
    title
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .filter(|c| c.is_alphanumeric())
        .take(DEDUP_KEY_LEN)
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ğ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' | 'ţ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

/// Titles made only of punctuation fall back to the source-qualified id
fn identity_key(venue: &VenueRecord) -> String {
    let key = dedup_key(&venue.title);
    if key.is_empty() {
        format!("{}#{}", venue.source, venue.id)
    } else {
        key
    }
}

/// Missing or non-finite ratings rank below every real rating
fn rating_of(venue: &VenueRecord) -> f64 {
    venue
        .rating
        .filter(|r| r.is_finite())
        .unwrap_or(f64::NEG_INFINITY)
}

/// Display priority: live results are listed ahead of catalog entries
pub fn display_rank(source: Source) -> u8 {
    match source {
        Source::ExternalApi => 0,
        Source::Catalog => 1,
    }
}

/// Concatenates `lists`, drops duplicates, and orders external records first.
///
/// First-seen order is kept within each source. On a key collision the record
/// with the strictly higher rating wins; ties keep the earlier one. Empty
/// lists merge as no-ops, and merging an already-merged list changes nothing.
pub fn merge<I, L>(lists: I) -> Vec<VenueRecord>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = VenueRecord>,
{
    let mut merged: Vec<VenueRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for venue in lists.into_iter().flatten() {
        let key = identity_key(&venue);
        match positions.get(&key) {
            Some(&idx) => {
                if rating_of(&venue) > rating_of(&merged[idx]) {
                    tracing::debug!(
                        key = %key,
                        kept = %venue.id,
                        dropped = %merged[idx].id,
                        "Duplicate venue replaced by higher-rated record"
                    );
                    merged[idx] = venue;
                }
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(venue);
            }
        }
    }

    merged.sort_by_key(|v| display_rank(v.source));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TokenSet, VenueId};

    fn record(id: &str, title: &str, source: Source, rating: Option<f64>) -> VenueRecord {
        VenueRecord {
            id: VenueId::from(id),
            title: title.to_string(),
            description: String::new(),
            category: Category::Food,
            icon: String::new(),
            moods: TokenSet::new(),
            companions: TokenSet::new(),
            needs: TokenSet::new(),
            details: vec![],
            link: None,
            source,
            rating,
        }
    }

    #[test]
    fn test_dedup_key_normalization() {
        assert_eq!(dedup_key("The Coffee-Bean & Tea Leaf!"), "thecoffeebeantealeaf");
        assert_eq!(dedup_key("  CAFÉ   Mocha "), "cafemocha");
        assert_eq!(dedup_key("Crème Brûlée"), "cremebrulee");
    }

    #[test]
    fn test_dedup_key_keeps_non_latin_letters() {
        assert_eq!(dedup_key("을지로 노가리 골목"), "을지로노가리골목");
    }

    #[test]
    fn test_dedup_key_is_truncated() {
        let long = "a".repeat(200);
        assert_eq!(dedup_key(&long).chars().count(), DEDUP_KEY_LEN);
        assert_eq!(
            dedup_key(&format!("{}xyz", "b".repeat(DEDUP_KEY_LEN))),
            dedup_key(&format!("{}uvw", "b".repeat(DEDUP_KEY_LEN)))
        );
    }

    #[test]
    fn test_merge_keeps_higher_rating() {
        let low = record("1", "Sushi Place", Source::Catalog, Some(3.0));
        let high = record("ChIJ1", "sushi place", Source::ExternalApi, Some(5.0));

        let merged = merge([vec![low], vec![high.clone()]]);
        assert_eq!(merged, vec![high]);
    }

    #[test]
    fn test_merge_keeps_higher_rating_regardless_of_order() {
        let low = record("1", "Sushi Place", Source::Catalog, Some(3.0));
        let high = record("2", "Sushi  Place.", Source::Catalog, Some(5.0));

        let merged = merge([vec![high.clone()], vec![low]]);
        assert_eq!(merged, vec![high]);
    }

    #[test]
    fn test_merge_missing_rating_loses() {
        let unrated = record("1", "Taco Stand", Source::Catalog, None);
        let rated = record("ChIJ2", "Taco Stand", Source::ExternalApi, Some(1.5));

        let merged = merge([vec![unrated], vec![rated.clone()]]);
        assert_eq!(merged, vec![rated]);
    }

    #[test]
    fn test_merge_tie_keeps_first_seen() {
        let first = record("1", "Taco Stand", Source::Catalog, Some(4.0));
        let second = record("2", "Taco Stand", Source::Catalog, Some(4.0));

        let merged = merge([vec![first.clone(), second]]);
        assert_eq!(merged, vec![first]);
    }

    #[test]
    fn test_merge_orders_external_before_catalog() {
        let c1 = record("1", "Alpha", Source::Catalog, None);
        let e1 = record("ChIJa", "Beta", Source::ExternalApi, None);
        let c2 = record("2", "Gamma", Source::Catalog, None);
        let e2 = record("ChIJb", "Delta", Source::ExternalApi, None);

        let merged = merge([vec![c1.clone(), c2.clone()], vec![e1.clone(), e2.clone()]]);
        assert_eq!(merged, vec![e1, e2, c1, c2]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = vec![
            record("1", "Alpha", Source::Catalog, Some(3.0)),
            record("2", "Beta", Source::Catalog, None),
        ];
        let b = vec![
            record("ChIJa", "ALPHA", Source::ExternalApi, Some(4.5)),
            record("ChIJc", "Gamma", Source::ExternalApi, Some(2.0)),
        ];

        let once = merge([a, b]);
        let twice = merge([once.clone()]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_empty_lists_are_noops() {
        let a = vec![record("1", "Alpha", Source::Catalog, None)];
        let merged = merge([Vec::new(), a.clone(), Vec::new()]);
        assert_eq!(merged, a);
        assert!(merge(Vec::<Vec<VenueRecord>>::new()).is_empty());
    }

    #[test]
    fn test_merge_punctuation_only_titles_do_not_collapse() {
        let a = record("1", "!!!", Source::Catalog, None);
        let b = record("2", "???", Source::Catalog, None);

        let merged = merge([vec![a, b]]);
        assert_eq!(merged.len(), 2);
    }
}
