//! Shared query parameter types for API handlers.

use serde::Deserialize;
use trainreg_core::error::CoreError;
use trainreg_core::pagination::PageSize;

/// Page selection for the assignment list (`?page=&page_size=`).
///
/// Both are optional: the first page and the default page size are used
/// when absent. Out-of-range pages are clamped by the pagination engine.
#[derive(Debug, Default, Deserialize)]
pub struct AssignmentListParams {
    pub page: Option<usize>,
    pub page_size: Option<u32>,
}

impl AssignmentListParams {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    /// The requested page size, rejected unless it is one of the allowed sizes.
    pub fn page_size(&self) -> Result<PageSize, CoreError> {
        self.page_size
            .map_or(Ok(PageSize::DEFAULT), PageSize::try_from)
    }
}
