//! "Venue of the day" rotation
//!
//! The pick is the catalog entry at `day-of-year mod catalog length`, so it
//! depends on catalog order: reordering the catalog file shifts every past
//! and future pick.

use chrono::{Datelike, Local, NaiveDate};

use crate::models::VenueRecord;

/// Zero-based day of year reduced modulo `len`; `None` for an empty catalog
pub fn pick_index(date: NaiveDate, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(date.ordinal0() as usize % len)
}

/// Deterministic pick for `date`. Identical inputs always give the identical venue.
pub fn todays_pick(venues: &[VenueRecord], date: NaiveDate) -> Option<&VenueRecord> {
    pick_index(date, venues.len()).map(|idx| &venues[idx])
}

/// Today's date on the local calendar, no timezone normalisation
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Source, TokenSet, VenueId};

    fn catalog(len: u64) -> Vec<VenueRecord> {
        (0..len)
            .map(|id| VenueRecord {
                id: VenueId::Numeric(id),
                title: format!("Venue {}", id),
                description: String::new(),
                category: Category::Cafe,
                icon: String::new(),
                moods: TokenSet::new(),
                companions: TokenSet::new(),
                needs: TokenSet::new(),
                details: vec![],
                link: None,
                source: Source::Catalog,
                rating: None,
            })
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_january_first_is_index_zero() {
        assert_eq!(pick_index(date(2025, 1, 1), 7), Some(0));
    }

    #[test]
    fn test_index_wraps_modulo_catalog_length() {
        // Feb 10 is day 40 (zero-based)
        assert_eq!(pick_index(date(2025, 2, 10), 7), Some(40 % 7));
    }

    #[test]
    fn test_empty_catalog_has_no_pick() {
        assert_eq!(pick_index(date(2025, 6, 1), 0), None);
        assert!(todays_pick(&[], date(2025, 6, 1)).is_none());
    }

    #[test]
    fn test_same_date_same_pick() {
        let venues = catalog(5);
        let d = date(2024, 9, 14);
        assert_eq!(todays_pick(&venues, d), todays_pick(&venues, d));
    }

    #[test]
    fn test_consecutive_days_cycle_sequentially() {
        let venues = catalog(11);
        let mut day = date(2024, 1, 1);

        // 2024 is a leap year
        for expected in 0..366usize {
            let pick = todays_pick(&venues, day).unwrap();
            assert_eq!(pick.id, VenueId::Numeric((expected % 11) as u64));
            day = day.succ_opt().unwrap();
        }

        // the rotation restarts on January 1
        assert_eq!(day, date(2025, 1, 1));
        assert_eq!(pick_index(day, venues.len()), Some(0));
    }

    #[test]
    fn test_different_years_same_day_of_year_agree() {
        let venues = catalog(9);
        assert_eq!(
            todays_pick(&venues, date(2023, 3, 1)),
            todays_pick(&venues, date(2025, 3, 1))
        );
    }
}
