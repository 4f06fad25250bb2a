//! Page request validation.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Invalid or missing paging input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingError {
    MissingPageNumber,
    MissingPageSize,
    NegativePageNumber(i64),
    NegativePageSize(i64),
    /// `page_number * page_size` does not fit a SQLite offset.
    OffsetOverflow { page_number: i64, page_size: i64 },
}

impl Display for PagingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPageNumber => write!(f, "pageNumber is required"),
            Self::MissingPageSize => write!(f, "pageSize is required"),
            Self::NegativePageNumber(value) => {
                write!(f, "pageNumber must be >= 0, got {value}")
            }
            Self::NegativePageSize(value) => write!(f, "pageSize must be >= 0, got {value}"),
            Self::OffsetOverflow {
                page_number,
                page_size,
            } => write!(
                f,
                "page offset overflows for pageNumber={page_number} pageSize={page_size}"
            ),
        }
    }
}

impl Error for PagingError {}

/// Zero-indexed, fixed-size page of an ordered result set.
///
/// Can only be built from validated input, so stores never see a negative
/// number or size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: i64,
    page_size: i64,
}

impl PageRequest {
    /// Validates raw request parameters; absence is an error, not a default.
    pub fn from_params(
        page_number: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Self, PagingError> {
        let page_number = page_number.ok_or(PagingError::MissingPageNumber)?;
        let page_size = page_size.ok_or(PagingError::MissingPageSize)?;
        Self::new(page_number, page_size)
    }

    pub fn new(page_number: i64, page_size: i64) -> Result<Self, PagingError> {
        if page_number < 0 {
            return Err(PagingError::NegativePageNumber(page_number));
        }
        if page_size < 0 {
            return Err(PagingError::NegativePageSize(page_size));
        }
        if page_number.checked_mul(page_size).is_none() {
            return Err(PagingError::OffsetOverflow {
                page_number,
                page_size,
            });
        }
        Ok(Self {
            page_number,
            page_size,
        })
    }

    pub fn page_number(&self) -> i64 {
        self.page_number
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Rows to skip before this page starts.
    pub fn offset(&self) -> i64 {
        self.page_number * self.page_size
    }
}
