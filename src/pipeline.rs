//! Pure row pipeline: filter, then sort, then paginate.
//!
//! Each stage works on row ids into the caller's data and never touches the
//! records themselves.

use crate::cell::CellValue;
use crate::column::ColumnDef;
use crate::state::{FilterState, RowId, SortDirection, SortState};
use std::ops::Range;

/// Case-insensitive substring match. An empty needle matches everything.
pub fn matches_text(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn find_column<'a, R>(columns: &'a [ColumnDef<R>], id: &str) -> Option<&'a ColumnDef<R>> {
    columns.iter().find(|c| c.id() == id)
}

/// Rows passing every column filter, in data order.
///
/// Filters naming unknown or presentational columns are skipped.
pub fn apply_filter<R>(data: &[R], columns: &[ColumnDef<R>], filters: &FilterState) -> Vec<RowId> {
    let active: Vec<(&ColumnDef<R>, String)> = filters
        .iter()
        .filter_map(|(id, value)| {
            find_column(columns, id)
                .filter(|c| c.is_data_bound())
                .map(|c| (c, value.to_string()))
        })
        .collect();

    data.iter()
        .enumerate()
        .filter(|(_, record)| {
            active.iter().all(|(column, needle)| {
                column
                    .search_text(record)
                    .is_some_and(|text| matches_text(&text, needle))
            })
        })
        .map(|(i, _)| RowId(i))
        .collect()
}

/// Stable multi-key sort of `rows`. Unknown or unsortable keys are skipped;
/// ties keep their incoming order.
pub fn apply_sort<R>(data: &[R], columns: &[ColumnDef<R>], rows: &mut Vec<RowId>, sort: &SortState) {
    let keys: Vec<(&ColumnDef<R>, SortDirection)> = sort
        .keys()
        .iter()
        .filter_map(|k| {
            find_column(columns, &k.column)
                .filter(|c| c.is_sortable())
                .map(|c| (c, k.direction))
        })
        .collect();

    if keys.is_empty() {
        return;
    }

    // Extract each value once rather than per comparison.
    let mut decorated: Vec<(RowId, Vec<CellValue>)> = rows
        .iter()
        .filter_map(|&id| {
            data.get(id.0)
                .map(|record| (id, keys.iter().map(|(c, _)| c.value(record)).collect()))
        })
        .collect();

    decorated.sort_by(|(_, a), (_, b)| {
        keys.iter()
            .zip(a.iter().zip(b.iter()))
            .map(|((_, direction), (va, vb))| {
                let ord = va.compare(vb);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    *rows = decorated.into_iter().map(|(id, _)| id).collect();
}

/// Number of pages for `total` rows; never less than one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Index range of `page` (zero-based) within `total` rows.
pub fn page_range(total: usize, page: usize, page_size: usize) -> Range<usize> {
    let size = page_size.max(1);
    let start = page.saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);
    start..end
}

/// Slice of `rows` shown on `page`.
pub fn apply_pagination(rows: &[RowId], page: usize, page_size: usize) -> &[RowId] {
    &rows[page_range(rows.len(), page, page_size)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SortKey;

    struct Site {
        name: &'static str,
        kw: i64,
    }

    fn sites() -> Vec<Site> {
        vec![
            Site { name: "Ridgeway", kw: 50 },
            Site { name: "harbour", kw: 150 },
            Site { name: "Riverside", kw: 50 },
            Site { name: "Airport", kw: 350 },
        ]
    }

    fn columns() -> Vec<ColumnDef<Site>> {
        vec![
            ColumnDef::display("select", ""),
            ColumnDef::new("name", "Name").text(|s: &Site| s.name.to_string()),
            ColumnDef::new("kw", "Power").accessor(|s: &Site| CellValue::Int(s.kw)),
        ]
    }

    fn ids(rows: &[RowId]) -> Vec<usize> {
        rows.iter().map(|r| r.0).collect()
    }

    #[test]
    fn text_match_ignores_case() {
        assert!(matches_text("Harbour Point", "POINT"));
        assert!(matches_text("Harbour Point", "bour p"));
        assert!(matches_text("anything", ""));
        assert!(!matches_text("Harbour", "harbours"));
        assert!(!matches_text("", "a"));
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut filters = FilterState::default();
        filters.set("name", "RI");
        assert_eq!(ids(&apply_filter(&sites(), &columns(), &filters)), vec![0, 2]);
    }

    #[test]
    fn filters_on_presentational_columns_are_skipped() {
        let mut filters = FilterState::default();
        filters.set("select", "zzz");
        assert_eq!(apply_filter(&sites(), &columns(), &filters).len(), 4);
    }

    #[test]
    fn multiple_filters_intersect() {
        let mut filters = FilterState::default();
        filters.set("name", "r");
        filters.set("kw", "150");
        assert_eq!(ids(&apply_filter(&sites(), &columns(), &filters)), vec![1]);
    }

    #[test]
    fn sort_is_stable_and_multi_key() {
        let data = sites();
        let mut rows: Vec<RowId> = (0..data.len()).map(RowId).collect();
        let mut sort = SortState::default();
        sort.set(vec![SortKey::new("kw", SortDirection::Ascending)]);
        apply_sort(&data, &columns(), &mut rows, &sort);
        assert_eq!(ids(&rows), vec![0, 2, 1, 3]);

        sort.set(vec![
            SortKey::new("kw", SortDirection::Ascending),
            SortKey::new("name", SortDirection::Descending),
        ]);
        apply_sort(&data, &columns(), &mut rows, &sort);
        assert_eq!(ids(&rows), vec![2, 0, 1, 3]);
    }

    #[test]
    fn unsortable_keys_leave_order_alone() {
        let data = sites();
        let mut rows: Vec<RowId> = vec![RowId(3), RowId(1)];
        let mut sort = SortState::default();
        sort.set(vec![SortKey::new("select", SortDirection::Ascending)]);
        apply_sort(&data, &columns(), &mut rows, &sort);
        assert_eq!(ids(&rows), vec![3, 1]);
    }

    #[test]
    fn pagination_bounds() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(21, 10), 3);
        assert_eq!(page_range(21, 2, 10), 20..21);
        assert_eq!(page_range(21, 5, 10), 21..21);
        let rows: Vec<RowId> = (0..5).map(RowId).collect();
        assert_eq!(ids(apply_pagination(&rows, 1, 2)), vec![2, 3]);
    }
}
