use crate::domain::errors::ValidationError;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A validated 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::InvalidPageNumber(page));
        }
        if page_size == 0 {
            return Err(ValidationError::InvalidPageSize(page_size));
        }
        Ok(Self { page, page_size })
    }

    /// Build a request from loosely typed query values.
    ///
    /// Missing, non-numeric and non-positive values fall back to the defaults.
    pub fn from_query(page: Option<&str>, page_size: Option<&str>) -> Self {
        fn positive(value: Option<&str>) -> Option<usize> {
            value
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|v| *v > 0)
        }

        Self {
            page: positive(page).unwrap_or(DEFAULT_PAGE),
            page_size: positive(page_size).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of an ordered result set
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page_number: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Transform every item while keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// Slice an already filtered and sorted sequence into the requested page.
///
/// Pages past the end yield no items rather than an error.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_count = items.len();
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.page_size())
        .collect();

    Page {
        items,
        total_count,
        page_number: request.page(),
        page_size: request.page_size(),
        total_pages: total_count.div_ceil(request.page_size()),
    }
}
