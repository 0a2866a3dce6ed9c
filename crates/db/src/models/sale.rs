//! Sales rows and aggregates.

use bookshelf_core::types::DbId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Copies of one book sold on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub book_key: DbId,
    pub copies: i64,
    pub sold_on: NaiveDate,
}

/// Best-selling book of a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopSeller {
    pub book_key: DbId,
    pub copies_sold: i64,
}
