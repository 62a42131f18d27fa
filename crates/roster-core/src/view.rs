//! The derived view: the canonical collection filtered by the search text.
//!
//! A record matches when the search text is empty, or when it occurs
//! case-insensitively in the full name, the registration number or the
//! course. Matching never reorders records.

use serde::Serialize;

use crate::record::Record;

/// Records of `collection` that match `filter`, in collection order.
///
/// Pure: the result depends only on the two arguments. The list controller
/// reads its view through this function.
pub fn derive_view<'a>(collection: &'a [Record], filter: &str) -> Vec<&'a Record> {
  if filter.is_empty() {
    return collection.iter().collect();
  }
  let needle = filter.to_lowercase();
  collection.iter().filter(|r| matches(r, &needle)).collect()
}

/// `needle` must already be lowercase.
fn matches(record: &Record, needle: &str) -> bool {
  [&record.full_name, &record.registration_number, &record.course]
    .into_iter()
    .any(|field| field.to_lowercase().contains(needle))
}

// ─── Stats ────────────────────────────────────────────────────────────────────

/// Counts over the canonical collection, shown above the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
  pub total:    usize,
  pub active:   usize,
  pub inactive: usize,
}

impl Stats {
  pub fn of(collection: &[Record]) -> Self {
    let active = collection.iter().filter(|r| r.status.is_active()).count();
    Self {
      total: collection.len(),
      active,
      inactive: collection.len() - active,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{record::Status, testing::record};

  fn collection() -> Vec<Record> {
    vec![
      record("Ana Silva", "2024001", "Engenharia"),
      record("Bruno Costa", "2023117", "Direito"),
      record("Carla Souza", "2024050", "Engenharia Civil"),
      record("Daniel Lima", "ENG-77", "Medicina"),
    ]
  }

  fn names(view: &[&Record]) -> Vec<String> {
    view.iter().map(|r| r.full_name.clone()).collect()
  }

  #[test]
  fn empty_filter_is_the_whole_collection() {
    let c = collection();
    assert_eq!(derive_view(&c, "").len(), c.len());
  }

  #[test]
  fn matches_any_searchable_field_case_insensitively() {
    let c = collection();
    assert_eq!(names(&derive_view(&c, "SILVA")), ["Ana Silva"]);
    assert_eq!(names(&derive_view(&c, "2024")), ["Ana Silva", "Carla Souza"]);
    assert_eq!(
      names(&derive_view(&c, "eng")),
      ["Ana Silva", "Carla Souza", "Daniel Lima"]
    );
  }

  #[test]
  fn preserves_collection_order() {
    let c = collection();
    let view = derive_view(&c, "a");
    let positions: Vec<usize> = view
      .iter()
      .map(|r| c.iter().position(|x| x.id == r.id).unwrap())
      .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
  }

  #[test]
  fn email_and_phone_are_not_searched() {
    let c = collection();
    assert!(derive_view(&c, "example.com").is_empty());
    assert!(derive_view(&c, "11988887777").is_empty());
  }

  #[test]
  fn agrees_with_the_predicate_for_every_filter() {
    let c = collection();
    for filter in ["", "a", "A", "20", "civil", "zzz", "ENG-", " "] {
      let needle = filter.to_lowercase();
      let expected: Vec<&Record> = c
        .iter()
        .filter(|r| {
          filter.is_empty()
            || r.full_name.to_lowercase().contains(&needle)
            || r.registration_number.to_lowercase().contains(&needle)
            || r.course.to_lowercase().contains(&needle)
        })
        .collect();
      assert_eq!(derive_view(&c, filter), expected, "filter {filter:?}");
    }
  }

  #[test]
  fn same_filter_twice_is_identical() {
    let c = collection();
    assert_eq!(derive_view(&c, "eng"), derive_view(&c, "eng"));
  }

  #[test]
  fn stats_count_statuses() {
    let mut c = collection();
    c[1].status = Status::Inactive;
    assert_eq!(
      Stats::of(&c),
      Stats { total: 4, active: 3, inactive: 1 }
    );
    assert_eq!(Stats::of(&[]), Stats::default());
  }
}
