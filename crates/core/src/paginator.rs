//! Paginated listing results
//!
//! Every list operation of a [`StorageClient`](crate::StorageClient) returns a
//! [`Paginator`]. Callers treat all paginators alike, whether they follow a
//! backend cursor or hold an in-memory result set.

use crate::error::{Error, Result};

/// Lazy, one-shot-per-page result sequence
///
/// After the final page, or after an error, `has_more_pages` returns `false`.
/// Calling `next_page` at end of stream yields an empty page.
pub trait Paginator<T> {
    /// Whether another call to `next_page` would fetch data
    fn has_more_pages(&self) -> bool;

    /// Fetch the next page of results
    fn next_page(&mut self) -> Result<Vec<T>>;
}

impl<T, P: Paginator<T> + ?Sized> Paginator<T> for Box<P> {
    fn has_more_pages(&self) -> bool {
        (**self).has_more_pages()
    }

    fn next_page(&mut self) -> Result<Vec<T>> {
        (**self).next_page()
    }
}

/// Drain a paginator into a single vector, stopping at the first error
pub fn collect_pages<T>(paginator: &mut dyn Paginator<T>) -> Result<Vec<T>> {
    let mut items = Vec::new();
    while paginator.has_more_pages() {
        items.extend(paginator.next_page()?);
    }
    Ok(items)
}

/// A paginator over a result set that is already in memory
///
/// Yields the whole set as exactly one page. A paginator created with
/// [`MemoryPaginator::not_found`] stays in the error state forever: it claims
/// one page until the error has been returned once, and every `next_page`
/// call returns the same error.
#[derive(Debug)]
pub struct MemoryPaginator<T> {
    items: Vec<T>,
    failure: Option<String>,
    read: bool,
}

impl<T> MemoryPaginator<T> {
    /// Create a paginator yielding `items` as a single page
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            failure: None,
            read: false,
        }
    }

    /// Create a paginator that fails every call with a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            failure: Some(message.into()),
            read: false,
        }
    }
}

impl<T> Paginator<T> for MemoryPaginator<T> {
    fn has_more_pages(&self) -> bool {
        if self.failure.is_some() {
            return !self.read;
        }
        !self.read && !self.items.is_empty()
    }

    fn next_page(&mut self) -> Result<Vec<T>> {
        if let Some(message) = &self.failure {
            self.read = true;
            return Err(Error::NotFound(message.clone()));
        }
        if self.read {
            return Ok(Vec::new());
        }
        self.read = true;
        Ok(std::mem::take(&mut self.items))
    }
}
