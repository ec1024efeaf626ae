//! In-memory shaping of admin dashboard lists: case-insensitive substring
//! search, per-field sorting with an asc/desc toggle, and status filtering.
//! Lists are small enough that everything happens after the fetch.

use serde::Deserialize;
use std::cmp::Ordering;

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Common query parameters accepted by the admin list endpoints.
#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    pub status: Option<String>,
}

impl ListQuery {
    pub fn order(&self) -> SortOrder {
        self.order.unwrap_or_default()
    }
}

/// Parses a query value into a typed enum through its wire form. Values
/// naming no variant yield `None`, so filters built on this match nothing.
pub fn parse_wire<T: serde::de::DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).ok()
}

/// Case-insensitive substring match.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// True when any of the candidate fields matches the search term.
pub fn any_field_matches(fields: &[&str], needle: &str) -> bool {
    fields.iter().any(|f| contains_ci(f, needle))
}

pub fn cmp_str_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Sorts with the given comparator, reversing it for descending order.
pub fn sort_with<T>(items: &mut [T], order: SortOrder, cmp: impl Fn(&T, &T) -> Ordering) {
    items.sort_by(|a, b| match order {
        SortOrder::Asc => cmp(a, b),
        SortOrder::Desc => cmp(a, b).reverse(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_case_insensitive_substring() {
        assert!(contains_ci("Makkah & Madinah Umrah", "madinah"));
        assert!(contains_ci("amina@example.com", "AMINA"));
        assert!(!contains_ci("Karbala Ziyarat", "madinah"));
    }

    #[test]
    fn any_field_matches_checks_all_fields() {
        let fields = ["Amina Yusuf", "amina@example.com"];
        assert!(any_field_matches(&fields, "example.com"));
        assert!(any_field_matches(&fields, "yusuf"));
        assert!(!any_field_matches(&fields, "fatima"));
    }

    #[test]
    fn toggling_order_reverses_the_same_field() {
        let mut names = vec!["Madinah", "makkah", "Jeddah"];
        sort_with(&mut names, SortOrder::Asc, |a, b| cmp_str_ci(a, b));
        assert_eq!(names, vec!["Jeddah", "Madinah", "makkah"]);
        sort_with(&mut names, SortOrder::Desc, |a, b| cmp_str_ci(a, b));
        assert_eq!(names, vec!["makkah", "Madinah", "Jeddah"]);
    }

    #[test]
    fn numeric_sort_handles_floats() {
        let mut prices = vec![1450.0, 800.0, 2200.0];
        sort_with(&mut prices, SortOrder::Asc, |a, b| cmp_f64(*a, *b));
        assert_eq!(prices, vec![800.0, 1450.0, 2200.0]);
        sort_with(&mut prices, SortOrder::Desc, |a, b| cmp_f64(*a, *b));
        assert_eq!(prices, vec![2200.0, 1450.0, 800.0]);
    }

    #[test]
    fn order_defaults_to_ascending() {
        let query = ListQuery::default();
        assert_eq!(query.order(), SortOrder::Asc);
    }

    #[test]
    fn parse_wire_requires_the_exact_variant_form() {
        use crate::models::BookingStatus;
        assert_eq!(
            parse_wire::<BookingStatus>("Cancelled"),
            Some(BookingStatus::Cancelled)
        );
        assert_eq!(parse_wire::<BookingStatus>("cancelled"), None);
        assert_eq!(parse_wire::<BookingStatus>("Refunded"), None);
    }
}
