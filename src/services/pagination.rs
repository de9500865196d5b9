//! Paginated section rendering
//!
//! A [`Paginator`] presents a fixed-size window over an immutable, shared
//! sequence. The backing sequence is an `Arc<[T]>`; swapping in a different
//! allocation always sends the window back to page 1, so a refreshed result
//! set can never be shown at a stale page offset.

use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Width of the page-number affordance window
pub const PAGE_WINDOW: usize = 5;

/// Fallback page size when a zero size is configured
const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(n) => n,
    None => unreachable!(),
};

/// Page state over a shared sequence
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Arc<[T]>,
    page_size: NonZeroUsize,
    current_page: usize,
}

impl<T> Paginator<T> {
    /// Create a paginator positioned on page 1. A page size of 0 is replaced
    /// by the default of 20.
    pub fn new(items: Arc<[T]>, page_size: usize) -> Self {
        Self {
            items,
            page_size: NonZeroUsize::new(page_size).unwrap_or(DEFAULT_PAGE_SIZE),
            current_page: 1,
        }
    }

    /// Swap the backing sequence. Returns true (and resets to page 1) when
    /// `items` is a different sequence than the current one.
    pub fn replace(&mut self, items: Arc<[T]>) -> bool {
        if Arc::ptr_eq(&self.items, &items) {
            return false;
        }
        self.items = items;
        self.current_page = 1;
        true
    }

    pub fn items(&self) -> &Arc<[T]> {
        &self.items
    }

    /// 1-indexed
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// `ceil(len / page_size)`; 0 for an empty sequence
    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size.get())
    }

    /// Items on the current page, clipped to the sequence bounds
    pub fn visible_slice(&self) -> &[T] {
        let size = self.page_size.get();
        let start = (self.current_page - 1).saturating_mul(size);
        if start >= self.items.len() {
            return &[];
        }
        let end = start.saturating_add(size).min(self.items.len());
        &self.items[start..end]
    }

    /// Move to `page`, clamped into `[1, total_pages]` (page 1 when empty).
    /// Returns the page actually selected.
    pub fn go_to_page(&mut self, page: i64) -> usize {
        let last = self.total_pages().max(1);
        let last = i64::try_from(last).unwrap_or(i64::MAX);
        // clamp keeps the value in 1..=last, so the cast back is lossless
        self.current_page = page.clamp(1, last) as usize;
        self.current_page
    }

    pub fn next_page(&mut self) -> usize {
        let target = i64::try_from(self.current_page).unwrap_or(i64::MAX).saturating_add(1);
        self.go_to_page(target)
    }

    pub fn prev_page(&mut self) -> usize {
        let target = i64::try_from(self.current_page).unwrap_or(i64::MAX).saturating_sub(1);
        self.go_to_page(target)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Page numbers to offer as direct links
    pub fn page_numbers(&self) -> Vec<usize> {
        page_window(self.current_page, self.total_pages())
    }

    /// "Showing X of Y"
    pub fn range_label(&self) -> String {
        format!(
            "Showing {} of {}",
            self.visible_slice().len(),
            self.items.len()
        )
    }
}

impl<T: Clone> Paginator<T> {
    /// Serializable snapshot of the current page
    pub fn view(&self) -> PageView<T> {
        PageView {
            items: self.visible_slice().to_vec(),
            current_page: self.current_page(),
            total_pages: self.total_pages(),
            page_size: self.page_size(),
            total_items: self.total_items(),
            page_numbers: self.page_numbers(),
            has_prev: self.has_prev(),
            has_next: self.has_next(),
        }
    }
}

/// Rendered page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub page_numbers: Vec<usize>,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Page numbers around `current`.
///
/// Up to [`PAGE_WINDOW`] pages: all of them when there are that few,
/// otherwise a window centered on `current` and shifted so it stays inside
/// `1..=total`.
pub fn page_window(current: usize, total: usize) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    if total <= PAGE_WINDOW {
        return (1..=total).collect();
    }

    let start = current
        .saturating_sub(PAGE_WINDOW / 2)
        .max(1)
        .min(total - PAGE_WINDOW + 1);
    (start..start + PAGE_WINDOW).collect()
}
