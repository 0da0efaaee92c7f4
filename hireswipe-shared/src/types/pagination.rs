use serde::{Deserialize, Serialize};

pub const MAX_PAGE_SIZE: u32 = 100;

/// Page-addressable window over an ordered result set. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("page must be at least 1")]
    PageOutOfRange,
    #[error("pageSize must be between 1 and {MAX_PAGE_SIZE}")]
    PageSizeOutOfRange,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Result<Self, PageError> {
        if page < 1 {
            return Err(PageError::PageOutOfRange);
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(PageError::PageSizeOutOfRange);
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, page_size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_skips_previous_pages() {
        let page = PageRequest::new(2, 5).unwrap();
        assert_eq!(page.offset(), 5);
        assert_eq!(page.limit(), 5);
        assert_eq!(PageRequest::default().offset(), 0);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(PageRequest::new(0, 10), Err(PageError::PageOutOfRange));
        assert_eq!(PageRequest::new(1, 0), Err(PageError::PageSizeOutOfRange));
        assert_eq!(PageRequest::new(1, MAX_PAGE_SIZE + 1), Err(PageError::PageSizeOutOfRange));
    }
}
