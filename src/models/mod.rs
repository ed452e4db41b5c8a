pub mod iri;
pub mod media_object;
pub mod options;
pub mod property;
pub mod property_options;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Items per page when the client does not ask for a size.
pub const DEFAULT_ITEMS_PER_PAGE: u64 = 10;
/// Upper bound for the client-adjustable page size.
pub const MAX_ITEMS_PER_PAGE: u64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub items_per_page: Option<u64>,
}

impl PaginationQuery {
    /// 1-based page number.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn items_per_page(&self) -> u64 {
        self.items_per_page
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
            .clamp(1, MAX_ITEMS_PER_PAGE)
    }

    /// Page number and size, rejecting pages whose row offset does not fit
    /// in a `u64`.
    pub fn bounds(&self) -> Result<(u64, u64), ApiError> {
        let page = self.page();
        let items_per_page = self.items_per_page();
        (page - 1)
            .checked_mul(items_per_page)
            .ok_or_else(|| ApiError::BadRequest(format!("Page {page} is out of range")))?;
        Ok((page, items_per_page))
    }
}

/// Collection envelope returned by every list endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub page: u64,
    pub items_per_page: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            page: self.page,
            items_per_page: self.items_per_page,
        }
    }
}
