use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationOptions {
    pub rows_per_page: usize,
    pub page_size_choices: Vec<usize>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            rows_per_page: 10,
            page_size_choices: vec![2, 4, 6, 8, 10],
        }
    }
}

impl PaginationOptions {
    pub fn rows_per_page(rows_per_page: usize) -> Self {
        Self {
            rows_per_page,
            ..Self::default()
        }
    }
}

/// Current page (1-based) and page size.
///
/// Navigation methods return `true` only when the page actually changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    rows_per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PaginationOptions::default().rows_per_page)
    }
}

impl Pagination {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            page: 1,
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn total_pages(&self, row_count: usize) -> usize {
        row_count.div_ceil(self.rows_per_page).max(1)
    }

    pub fn range(&self, row_count: usize) -> Range<usize> {
        let start = (self.rows_per_page * (self.page - 1)).min(row_count);
        let end = (self.rows_per_page * self.page).min(row_count);
        start..end
    }

    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[self.range(rows.len())]
    }

    pub fn next(&mut self, row_count: usize) -> bool {
        if self.page < self.total_pages(row_count) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn first(&mut self) -> bool {
        self.reset()
    }

    pub fn last(&mut self, row_count: usize) -> bool {
        let last = self.total_pages(row_count);
        if self.page < last {
            self.page = last;
            true
        } else {
            false
        }
    }

    /// Back to page 1. Returns `false` when already there.
    pub fn reset(&mut self) -> bool {
        if self.page == 1 {
            return false;
        }
        self.page = 1;
        true
    }

    /// Changes the page size and returns to page 1.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        self.rows_per_page = rows_per_page.max(1);
        self.page = 1;
    }

    /// Moves to the next (or previous) entry of `choices`, wrapping around.
    pub fn cycle_page_size(&mut self, choices: &[usize], forward: bool) -> bool {
        if choices.is_empty() {
            return false;
        }
        let pos = choices.iter().position(|&n| n == self.rows_per_page);
        let next = match (pos, forward) {
            (Some(i), true) => (i + 1) % choices.len(),
            (Some(i), false) => (i + choices.len() - 1) % choices.len(),
            (None, true) => 0,
            (None, false) => choices.len() - 1,
        };
        let size = choices[next];
        if size.max(1) == self.rows_per_page {
            return false;
        }
        self.set_rows_per_page(size);
        true
    }

    /// Pulls the page back into range after the row count shrank.
    pub fn clamp(&mut self, row_count: usize) {
        self.page = self.page.clamp(1, self.total_pages(row_count));
    }
}
