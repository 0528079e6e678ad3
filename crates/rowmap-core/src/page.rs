//! Paged result content.

use serde::{Deserialize, Serialize};

/// One page of a larger result, numbered from 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            page: 0,
            size: 0,
            total_elements: 0,
        }
    }
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(content: Vec<T>, page: u32, size: u32, total_elements: u64) -> Self {
        Self {
            content,
            page,
            size,
            total_elements,
        }
    }

    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.page == 0
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        (self.page as u64 + 1) * self.size as u64 >= self.total_elements
    }

    /// Number of pages needed for `total_elements`. Zero when `size` is zero.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.size as u64)
    }

    /// Transform the content, keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}
