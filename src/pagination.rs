// src/pagination.rs
//! Query state sent to the list endpoints and the page arithmetic around it.

use serde::{Deserialize, Serialize};

use crate::status::EntityStatus;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

// ==================== QUERY PARAMETERS ====================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

/// Body of every `POST {Entity}/{Entities}` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page_number: u32,
    pub page_size: u32,
    pub search: String,
    pub sort_field: String,
    pub sort_ascending: bool,
    #[serde(default)]
    pub filters: ListFilters,
}

impl ListQuery {
    pub fn new(page_size: u32, sort_field: &str) -> Self {
        Self {
            page_number: 1,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            search: String::new(),
            sort_field: sort_field.to_string(),
            sort_ascending: true,
            filters: ListFilters::default(),
        }
    }

    /// Same field flips direction; a new field starts ascending. Always back to page 1.
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort_field == field {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_field = field.to_string();
            self.sort_ascending = true;
        }
        self.page_number = 1;
    }

    /// 1-based position of a row across all pages.
    pub fn row_index(&self, position_in_page: usize) -> u64 {
        row_index(self.page_number, self.page_size, position_in_page)
    }
}

pub fn row_index(page_number: u32, page_size: u32, position_in_page: usize) -> u64 {
    (page_number.max(1) as u64 - 1) * page_size as u64 + position_in_page as u64 + 1
}

// ==================== RESPONSE STRUCTURES ====================

/// Canonical list result, whatever envelope the backend used.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn from_page(total_count: u64, page_number: u32, page_size: u32) -> Self {
        let size = page_size.max(1) as u64;
        let total_pages = u32::try_from(total_count.div_ceil(size)).unwrap_or(u32::MAX);
        Self {
            total_count,
            page_number,
            page_size,
            total_pages,
            has_next: page_number < total_pages,
            has_prev: page_number > 1,
        }
    }

    /// "Showing 11-20 of 42".
    pub fn range_label(&self, items_on_page: usize) -> String {
        if items_on_page == 0 {
            return format!("Showing 0 of {}", self.total_count);
        }
        let first = row_index(self.page_number, self.page_size, 0);
        let last = first + items_on_page as u64 - 1;
        format!("Showing {}-{} of {}", first, last, self.total_count)
    }
}
