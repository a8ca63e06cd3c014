use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Highest page a listing accepts. Keeps `page * page_size` within `u32`.
pub const MAX_PAGE: u32 = 1_000_000;

#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 1_000_000, message = "page must be between 1 and 1000000"))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    50
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    /// Rows to skip. Saturates on parameters that never went through `validate`.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
    /// Whether a later page holds more competitions
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total_items: i64) -> Self {
        let total = u64::try_from(total_items).unwrap_or(0);
        let pages = total.div_ceil(u64::from(params.page_size.max(1)));
        let total_pages = u32::try_from(pages).unwrap_or(u32::MAX);

        Self {
            page: params.page,
            page_size: params.page_size,
            total_items,
            total_pages,
            has_more: params.page < total_pages,
        }
    }
}

/// One page of a listing plus where it sits in the whole result
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total_items: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(params, total_items),
        }
    }
}
