use std::fmt;

use crate::error::DomainError;

/// A 1-indexed result window.
///
/// Both fields are at least 1; `Paging::new` is the only way to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    current_page: u32,
    page_size: u32,
}

impl Paging {
    /// Creates a window over page `current_page` of `page_size` rows.
    pub fn new(current_page: u32, page_size: u32) -> Result<Self, DomainError> {
        if current_page == 0 {
            return Err(DomainError::Validation(
                "currentPage must be greater than zero".into(),
            ));
        }
        if page_size == 0 {
            return Err(DomainError::Validation(
                "pageSize must be greater than zero".into(),
            ));
        }
        Ok(Self {
            current_page,
            page_size,
        })
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows to skip: `(page - 1) * size`.
    pub fn offset(&self) -> usize {
        (self.current_page as usize - 1).saturating_mul(self.page_size as usize)
    }

    /// Number of rows to take.
    pub fn limit(&self) -> usize {
        self.page_size as usize
    }

    /// Number of pages needed to show `total` rows.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.limit())
    }

    /// Clips an already filtered and sorted sequence to this window.
    ///
    /// A page past the end yields an empty vector.
    pub fn window<T>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter()
            .skip(self.offset())
            .take(self.limit())
            .collect()
    }
}

impl fmt::Display for Paging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CurrentPage={}&PageSize={}",
            self.current_page, self.page_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_fails() {
        assert!(matches!(Paging::new(0, 10), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_zero_size_fails() {
        assert!(matches!(Paging::new(1, 0), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_offset_and_limit() {
        let paging = Paging::new(4, 10).unwrap();
        assert_eq!(paging.offset(), 30);
        assert_eq!(paging.limit(), 10);
    }

    #[test]
    fn test_last_partial_page() {
        let rows: Vec<u32> = (1..=35).collect();
        let page = Paging::new(4, 10).unwrap().window(rows);
        assert_eq!(page, vec![31, 32, 33, 34, 35]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let rows: Vec<u32> = (1..=35).collect();
        assert!(Paging::new(5, 10).unwrap().window(rows).is_empty());
    }

    #[test]
    fn test_total_pages() {
        let paging = Paging::new(1, 10).unwrap();
        assert_eq!(paging.total_pages(35), 4);
        assert_eq!(paging.total_pages(0), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Paging::new(2, 25).unwrap().to_string(),
            "CurrentPage=2&PageSize=25"
        );
    }
}
