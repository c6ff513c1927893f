//! Archive view: entries grouped by the year they were added.

use chrono::Datelike;
use serde::Serialize;
use std::ops::RangeInclusive;

use crate::address::search_link;
use crate::types::{Category, Entry, Freshness, Region};

/// Years shown by the archive unless configured otherwise.
pub const DEFAULT_YEARS: RangeInclusive<i32> = 2020..=2025;

/// Widest range, in years, a caller may ask the archive for.
pub const MAX_SPAN_YEARS: i64 = 100;

/// Categories shown per archive card.
const CARD_CATEGORIES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineItem {
    pub id: String,
    pub term: String,
    pub definition: String,
    pub freshness: Freshness,
    pub region: Region,
    pub categories: Vec<Category>,
    /// Address that opens the listing searched for this term.
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineYear {
    pub year: i32,
    /// Empty when nothing was added that year.
    pub items: Vec<TimelineItem>,
}

/// Group `entries` by creation year over `years`, newest year first.
///
/// Every year in the range is present even when empty; entries outside the
/// range are left out. Within a year entries are sorted by term, ignoring case.
pub fn timeline(entries: &[Entry], years: RangeInclusive<i32>) -> Vec<TimelineYear> {
    years
        .rev()
        .map(|year| {
            let mut in_year: Vec<&Entry> = entries
                .iter()
                .filter(|e| e.created_at.year() == year)
                .collect();
            in_year.sort_by_key(|e| e.term.to_lowercase());

            TimelineYear {
                year,
                items: in_year.into_iter().map(item).collect(),
            }
        })
        .collect()
}

fn item(entry: &Entry) -> TimelineItem {
    TimelineItem {
        id: entry.id.clone(),
        term: entry.term.clone(),
        definition: entry.definition.clone(),
        freshness: entry.freshness,
        region: entry.region,
        categories: entry.categories.iter().take(CARD_CATEGORIES).copied().collect(),
        link: search_link(&entry.term),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_years_descend_and_include_empty() {
        let years = timeline(&seed::default_entries(), DEFAULT_YEARS);
        let labels: Vec<i32> = years.iter().map(|y| y.year).collect();
        assert_eq!(labels, vec![2025, 2024, 2023, 2022, 2021, 2020]);
        assert!(years[0].items.is_empty());
        assert!(years[1].items.is_empty());
    }

    #[test]
    fn test_entries_sorted_by_term_within_year() {
        let years = timeline(&seed::default_entries(), DEFAULT_YEARS);
        let y2023 = years.iter().find(|y| y.year == 2023).unwrap();
        let terms: Vec<&str> = y2023.items.iter().map(|i| i.term.as_str()).collect();
        assert_eq!(terms, vec!["Ate", "NPC", "Rizz", "Skibidi"]);

        let y2022 = years.iter().find(|y| y.year == 2022).unwrap();
        let terms: Vec<&str> = y2022.items.iter().map(|i| i.term.as_str()).collect();
        assert_eq!(terms, vec!["Bussin'", "Mid"]);
    }

    #[test]
    fn test_items_carry_link_and_capped_categories() {
        let years = timeline(&seed::default_entries(), 2020..=2020);
        let slay = &years[0].items[0];
        assert_eq!(slay.link, "/?search=Slay");
        assert_eq!(slay.categories, vec![Category::Social, Category::Fashion]);
    }

    #[test]
    fn test_entries_outside_range_are_dropped() {
        let years = timeline(&seed::default_entries(), 2024..=2025);
        assert!(years.iter().all(|y| y.items.is_empty()));
    }
}
