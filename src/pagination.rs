use serde::Serialize;

/// Number of rows shown per page on the list screens.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Number of pages needed to show `total` rows, `per_page` at a time.
#[must_use]
pub fn total_pages(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

#[derive(Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            items,
            pages,
            page: current_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, DEFAULT_ITEMS_PER_PAGE), 0);
        assert_eq!(total_pages(1, DEFAULT_ITEMS_PER_PAGE), 1);
        assert_eq!(total_pages(20, DEFAULT_ITEMS_PER_PAGE), 1);
        assert_eq!(total_pages(21, DEFAULT_ITEMS_PER_PAGE), 2);
    }

    #[test]
    fn window_collapses_for_short_lists() {
        let paged = Paginated::new(vec![1, 2, 3], 1, 1);
        assert_eq!(paged.pages, vec![Some(1)]);
        assert_eq!(paged.page, 1);
    }

    #[test]
    fn window_elides_middle_pages() {
        let paged: Paginated<i32> = Paginated::new(vec![], 10, 30);
        assert!(paged.pages.contains(&None));
        assert!(paged.pages.contains(&Some(10)));
        assert_eq!(paged.pages.first(), Some(&Some(1)));
        assert_eq!(paged.pages.last(), Some(&Some(30)));
    }

    #[test]
    fn zero_page_is_treated_as_first() {
        let paged: Paginated<i32> = Paginated::new(vec![], 0, 5);
        assert_eq!(paged.page, 1);
    }
}
