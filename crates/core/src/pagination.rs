//! Page arithmetic over fully materialized result lists.
//!
//! [`paginate`] is a pure function of (row count, page size, requested
//! page); [`PageCursor`] is the per-session cursor that remembers the last
//! page and page size and keeps them clamped as the row count changes.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Page size
// ---------------------------------------------------------------------------

/// The page sizes a client may choose from.
pub const PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];

/// A page size restricted to [`PAGE_SIZES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Page size used until the client picks another one.
    pub const DEFAULT: PageSize = PageSize(10);

    /// Number of rows per page.
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for PageSize {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if PAGE_SIZES.contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::Validation(format!(
                "Invalid page size {value}. Must be one of: 10, 25, 50, 100"
            )))
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

// ---------------------------------------------------------------------------
// Page window
// ---------------------------------------------------------------------------

/// The slice boundaries of one page. Pages are 1-based, indices 0-based and
/// `end_index` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub total_rows: usize,
    pub page_size: PageSize,
    pub total_pages: usize,
    pub current_page: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl PageWindow {
    /// The rows of `rows` that fall on this page.
    ///
    /// Returns an empty slice if `rows` is shorter than the window expects.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        rows.get(self.start_index..self.end_index).unwrap_or(&[])
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Compute the window for `requested_page`, clamping it into
/// `[1, total_pages]`. An empty list still has one (empty) page.
pub fn paginate(total_rows: usize, page_size: PageSize, requested_page: usize) -> PageWindow {
    let size = page_size.get();
    let total_pages = total_rows.div_ceil(size).max(1);
    let current_page = requested_page.clamp(1, total_pages);
    let start_index = (current_page - 1) * size;
    let end_index = (start_index + size).min(total_rows);

    PageWindow {
        total_rows,
        page_size,
        total_pages,
        current_page,
        start_index,
        end_index,
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Remembered pagination position for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCursor {
    page: usize,
    page_size: PageSize,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PageSize::DEFAULT,
        }
    }
}

impl PageCursor {
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Switch page size. Always goes back to page 1.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    pub fn go_to(&mut self, page: usize, total_rows: usize) {
        self.page = paginate(total_rows, self.page_size, page).current_page;
    }

    pub fn first(&mut self, total_rows: usize) {
        self.go_to(1, total_rows);
    }

    pub fn previous(&mut self, total_rows: usize) {
        self.go_to(self.page.saturating_sub(1), total_rows);
    }

    pub fn next(&mut self, total_rows: usize) {
        self.go_to(self.page.saturating_add(1), total_rows);
    }

    pub fn last(&mut self, total_rows: usize) {
        self.go_to(usize::MAX, total_rows);
    }

    /// Window for the current row count. Re-clamps the stored page so the
    /// cursor never points past the last page after rows disappear.
    pub fn window(&mut self, total_rows: usize) -> PageWindow {
        let window = paginate(total_rows, self.page_size, self.page);
        self.page = window.current_page;
        window
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
