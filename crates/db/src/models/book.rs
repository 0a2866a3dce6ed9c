//! Book rows and payloads.

use bookshelf_core::types::DbId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub book_key: DbId,
    pub author: String,
    pub title: String,
    pub publish_date: Option<NaiveDate>,
    pub price: f64,
    pub used: bool,
}

/// A book that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub author: String,
    pub title: String,
    pub publish_date: Option<NaiveDate>,
    pub price: f64,
    pub used: bool,
}

impl NewBook {
    pub fn into_record(self, book_key: DbId) -> BookRecord {
        BookRecord {
            book_key,
            author: self.author,
            title: self.title,
            publish_date: self.publish_date,
            price: self.price,
            used: self.used,
        }
    }
}
