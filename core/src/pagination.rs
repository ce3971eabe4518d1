use crate::errors::PagerError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Half-open window `[start, end)` of ledger sequence numbers.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct SequenceRange {
    pub start: u64,
    pub end: u64,
}

impl SequenceRange {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
    pub fn contains(&self, sequence_number: u64) -> bool {
        (self.start..self.end).contains(&sequence_number)
    }
}

/// One navigation to a page. `page` is 1-based.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64, total_count: u64) -> Result<Self, PagerError> {
        if page_size == 0 {
            return Err(PagerError::InvalidRange {
                page: signed(page),
                page_size,
                total_count,
            });
        }
        Ok(PageRequest {
            page: page.max(1),
            page_size,
            total_count,
        })
    }
    /// The request with its page pulled into `[1, max_page]`.
    pub fn clamped(&self) -> Self {
        PageRequest {
            page: clamp_page(Some(signed(self.page)), self.total_count, self.page_size),
            ..*self
        }
    }
    pub fn max_page(&self) -> u64 {
        max_page(self.total_count, self.page_size)
    }
    pub fn range(&self) -> Result<SequenceRange, PagerError> {
        compute_range(self.total_count, self.page_size, Some(signed(self.page)))
    }
}

fn signed(page: u64) -> i64 {
    i64::try_from(page).unwrap_or(i64::MAX)
}

/// Number of pages needed to show `total_count` transactions. An empty ledger
/// still has one (empty) page.
pub fn max_page(total_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total_count.div_ceil(page_size).max(1)
}

/// Absent or non-positive pages become 1, pages past the end become the last page.
pub fn clamp_page(page: Option<i64>, total_count: u64, page_size: u64) -> u64 {
    let requested = page.filter(|p| *p > 0).unwrap_or(1) as u64;
    requested.min(max_page(total_count, page_size))
}

/// Maps a 1-based page onto sequence numbers, newest first: page 1 ends at
/// `total_count` and each following page ends where the previous one started.
pub fn compute_range(
    total_count: u64,
    page_size: u64,
    page: Option<i64>,
) -> Result<SequenceRange, PagerError> {
    let page = page.filter(|p| *p > 0).unwrap_or(1);
    let invalid = || PagerError::InvalidRange {
        page,
        page_size,
        total_count,
    };
    if page_size == 0 {
        return Err(invalid());
    }
    let offset = i128::from(page - 1);
    let end = i128::from(total_count) - i128::from(page_size) * offset;
    if end < 0 {
        return Err(invalid());
    }
    let start = (end - i128::from(page_size)).max(0);
    Ok(SequenceRange {
        start: start as u64,
        end: end as u64,
    })
}
