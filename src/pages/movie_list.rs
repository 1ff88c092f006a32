use crate::api::{ApiError, Movie, MovieQuery, PAGE_SIZE, Page};

/// Descriptions longer than this are cut on the list cards.
pub const SUMMARY_LIMIT: usize = 150;

/// Number of pages needed for `count` movies.
pub fn total_pages(count: u64) -> u32 {
    u32::try_from(count.div_ceil(PAGE_SIZE)).unwrap_or(u32::MAX)
}

/// First [`SUMMARY_LIMIT`] characters of `description`, with `...` appended
/// when anything was cut.
pub fn summarize(description: &str) -> String {
    if description.chars().count() > SUMMARY_LIMIT {
        let mut cut: String = description.chars().take(SUMMARY_LIMIT).collect();
        cut.push_str("...");
        cut
    } else {
        description.to_string()
    }
}

/// Average score to one decimal, `N/A` when the movie has no ratings.
pub fn average_label(average: Option<f64>) -> String {
    match average {
        Some(avg) if avg > 0.0 => format!("{avg:.1}"),
        _ => "N/A".to_string(),
    }
}

pub fn count_label(count: u32) -> String {
    format!("{} {}", count, if count == 1 { "rating" } else { "ratings" })
}

/// State of the paginated, searchable movie list.
#[derive(Debug, Clone)]
pub struct MovieList {
    pub movies: Vec<Movie>,
    pub loading: bool,
    pub error: Option<String>,
    pub search: String,
    pub editing_search: bool,
    pub page: u32,
    pub total_pages: u32,
    pub count: u64,
    pub selected: usize,
}

impl Default for MovieList {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieList {
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            loading: true,
            error: None,
            search: String::new(),
            editing_search: false,
            page: 1,
            total_pages: 1,
            count: 0,
            selected: 0,
        }
    }

    /// Query for the current page and search term; marks the list loading.
    pub fn reload(&mut self) -> MovieQuery {
        self.loading = true;
        MovieQuery::new(self.page, &self.search)
    }

    pub fn submit_search(&mut self) -> MovieQuery {
        self.editing_search = false;
        self.page = 1;
        self.reload()
    }

    pub fn can_previous(&self) -> bool {
        self.page != 1
    }

    pub fn can_next(&self) -> bool {
        self.page != self.total_pages
    }

    /// Pagination controls only show when there is more than one page.
    pub fn shows_pagination(&self) -> bool {
        self.total_pages > 1
    }

    pub fn previous_page(&mut self) -> Option<MovieQuery> {
        if !self.shows_pagination() || !self.can_previous() {
            return None;
        }
        self.change_page(self.page - 1)
    }

    pub fn next_page(&mut self) -> Option<MovieQuery> {
        if !self.shows_pagination() || !self.can_next() {
            return None;
        }
        self.change_page(self.page + 1)
    }

    fn change_page(&mut self, page: u32) -> Option<MovieQuery> {
        self.page = page;
        self.selected = 0;
        Some(self.reload())
    }

    /// Apply a listing response. Whichever response arrives last is shown,
    /// even if it answers an older request.
    pub fn apply(&mut self, result: Result<Page<Movie>, ApiError>) {
        self.loading = false;
        match result {
            Ok(page) => {
                self.total_pages = total_pages(page.count);
                self.count = page.count;
                self.movies = page.results;
                self.selected = self.selected.min(self.movies.len().saturating_sub(1));
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load movies");
                self.error = Some("Failed to load movies".to_string());
            }
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.movies.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.selected)
    }

    /// Nothing to show once loading has finished.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.movies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::fixtures::movie;
    use proptest::prelude::*;

    fn page(count: u64, ids: &[i64]) -> Page<Movie> {
        Page {
            count,
            results: ids.iter().copied().map(movie).collect(),
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(average_label(Some(4.24)), "4.2");
        assert_eq!(average_label(Some(3.0)), "3.0");
        assert_eq!(average_label(None), "N/A");
        assert_eq!(average_label(Some(0.0)), "N/A");
        assert_eq!(count_label(1), "1 rating");
        assert_eq!(count_label(0), "0 ratings");
        assert_eq!(count_label(12), "12 ratings");
    }

    #[test]
    fn test_summary_boundary() {
        let exact = "a".repeat(150);
        assert_eq!(summarize(&exact), exact);
        let long = "b".repeat(151);
        assert_eq!(summarize(&long), format!("{}...", "b".repeat(150)));
    }

    #[test]
    fn test_pagination_walk() {
        let mut list = MovieList::new();
        list.reload();
        list.apply(Ok(page(25, &[1, 2, 3])));
        assert_eq!(list.total_pages, 3);
        assert!(!list.can_previous());
        assert!(list.previous_page().is_none());

        list.selected = 2;
        let query = list.next_page().unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(list.selected, 0);
        assert!(list.loading);

        list.apply(Ok(page(25, &[11])));
        assert_eq!(list.next_page().unwrap().page, 3);
        list.apply(Ok(page(25, &[21])));
        assert!(!list.can_next());
        assert!(list.next_page().is_none());
        assert_eq!(list.previous_page().unwrap().page, 2);
    }

    #[test]
    fn test_single_page_hides_pagination() {
        let mut list = MovieList::new();
        list.apply(Ok(page(7, &[1])));
        assert!(!list.shows_pagination());
        assert!(list.next_page().is_none());
    }

    #[test]
    fn test_search_resets_to_first_page() {
        let mut list = MovieList::new();
        list.apply(Ok(page(40, &[1])));
        list.next_page();
        list.next_page();
        assert_eq!(list.page, 3);

        list.search = "  heat ".into();
        list.editing_search = true;
        let query = list.submit_search();
        assert_eq!(query, MovieQuery::new(1, "heat"));
        assert!(!list.editing_search);
    }

    #[test]
    fn test_failure_keeps_previous_movies() {
        let mut list = MovieList::new();
        list.apply(Ok(page(2, &[1, 2])));
        list.reload();
        list.apply(Err(ApiError::NotFound));
        assert_eq!(list.error.as_deref(), Some("Failed to load movies"));
        assert_eq!(list.movies.len(), 2);
        assert!(!list.loading);

        list.apply(Ok(page(0, &[])));
        assert!(list.error.is_none());
        assert!(list.is_empty());
        assert_eq!(list.total_pages, 0);
    }

    #[test]
    fn test_last_response_wins() {
        let mut list = MovieList::new();
        list.apply(Ok(page(30, &[1])));
        list.next_page();
        list.next_page();
        // The page-3 response lands first, then the stale page-2 one.
        list.apply(Ok(page(30, &[21])));
        list.apply(Ok(page(30, &[11])));
        assert_eq!(list.page, 3);
        assert_eq!(list.movies[0].id, 11);
    }

    proptest! {
        #[test]
        fn prop_summary_truncation(desc in "\\PC{0,400}") {
            let summary = summarize(&desc);
            let len = desc.chars().count();
            if len > SUMMARY_LIMIT {
                let head: String = desc.chars().take(SUMMARY_LIMIT).collect();
                prop_assert_eq!(summary, format!("{head}..."));
            } else {
                prop_assert_eq!(summary, desc);
            }
        }

        #[test]
        fn prop_total_pages_is_ceiling(count in 0u64..100_000) {
            let pages = total_pages(count) as u64;
            prop_assert!(pages * PAGE_SIZE >= count);
            prop_assert!(pages == 0 || (pages - 1) * PAGE_SIZE < count);
        }

        #[test]
        fn prop_boundary_controls(count in 11u64..500, steps in 0usize..60) {
            let mut list = MovieList::new();
            list.apply(Ok(page(count, &[1])));
            for _ in 0..steps {
                list.next_page();
            }
            prop_assert_eq!(list.can_previous(), list.page != 1);
            prop_assert_eq!(list.can_next(), list.page != list.total_pages);
            prop_assert!(list.page >= 1 && list.page <= list.total_pages);
        }
    }
}
