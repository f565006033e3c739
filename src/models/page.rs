use serde::{Deserialize, Serialize};

/// Pagination envelope returned by the list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    pub total_items: u32,
    pub item_count: u32,
    pub items_per_page: u32,
    pub total_pages: u32,
    pub current_page: u32,
}

impl PageMeta {
    /// Whether another page follows this one.
    ///
    /// A missing envelope decodes to all zeroes, which reads as "last page".
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}
