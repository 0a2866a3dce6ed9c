//! Data access for books.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use bookshelf_core::error::CoreError;
use bookshelf_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::book::{BookRecord, NewBook};

const ENTITY: &str = "Book";

/// Book data access.
#[async_trait]
pub trait BookDao: Send + Sync {
    /// Store a new book and return it with its generated key.
    async fn insert(&self, book: NewBook) -> Result<BookRecord, CoreError>;

    /// Replace a stored book. Fails with `NotFound` for unknown keys.
    async fn update(&self, book: BookRecord) -> Result<BookRecord, CoreError>;

    /// Delete a stored book. Fails with `NotFound` for unknown keys.
    async fn delete(&self, book_key: DbId) -> Result<(), CoreError>;

    async fn find_by_key(&self, book_key: DbId) -> Result<Option<BookRecord>, CoreError>;

    /// Case-insensitive exact title match.
    async fn find_by_title(&self, title: &str) -> Result<Option<BookRecord>, CoreError>;

    /// All books ordered by key.
    async fn list_all(&self) -> Result<Vec<BookRecord>, CoreError>;

    /// Books whose author contains `author`, case-insensitively.
    async fn list_by_author(&self, author: &str) -> Result<Vec<BookRecord>, CoreError>;

    /// Books at 1-based positions `from..=to` in key order, plus the total count.
    async fn list_range(&self, from: u64, to: u64) -> Result<(Vec<BookRecord>, u64), CoreError>;

    async fn count(&self) -> Result<u64, CoreError>;
}

/// Book store kept in process memory.
#[derive(Debug)]
pub struct InMemoryBookRepo {
    rows: RwLock<BTreeMap<DbId, BookRecord>>,
    next_key: AtomicI64,
}

impl Default for InMemoryBookRepo {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_key: AtomicI64::new(1),
        }
    }
}

impl InMemoryBookRepo {
    /// Seed the store. New keys continue after the highest seeded key.
    pub fn with_books(books: Vec<BookRecord>) -> Self {
        let next = books.iter().map(|b| b.book_key).max().unwrap_or(0) + 1;
        let rows = books.into_iter().map(|b| (b.book_key, b)).collect();
        Self {
            rows: RwLock::new(rows),
            next_key: AtomicI64::new(next),
        }
    }

    /// Number of stored books, without waiting for writers.
    pub fn len(&self) -> usize {
        self.rows.try_read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BookDao for InMemoryBookRepo {
    async fn insert(&self, book: NewBook) -> Result<BookRecord, CoreError> {
        let key = self.next_key.fetch_add(1, Ordering::SeqCst);
        let record = book.into_record(key);
        self.rows.write().await.insert(key, record.clone());
        tracing::debug!(book_key = key, title = %record.title, "Book inserted");
        Ok(record)
    }

    async fn update(&self, book: BookRecord) -> Result<BookRecord, CoreError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&book.book_key) {
            Some(row) => {
                *row = book.clone();
                tracing::debug!(book_key = book.book_key, "Book updated");
                Ok(book)
            }
            None => Err(CoreError::NotFound {
                entity: ENTITY,
                id: book.book_key,
            }),
        }
    }

    async fn delete(&self, book_key: DbId) -> Result<(), CoreError> {
        match self.rows.write().await.remove(&book_key) {
            Some(_) => {
                tracing::debug!(book_key, "Book deleted");
                Ok(())
            }
            None => Err(CoreError::NotFound {
                entity: ENTITY,
                id: book_key,
            }),
        }
    }

    async fn find_by_key(&self, book_key: DbId) -> Result<Option<BookRecord>, CoreError> {
        Ok(self.rows.read().await.get(&book_key).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<BookRecord>, CoreError> {
        let wanted = title.trim().to_lowercase();
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|b| b.title.to_lowercase() == wanted)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<BookRecord>, CoreError> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn list_by_author(&self, author: &str) -> Result<Vec<BookRecord>, CoreError> {
        let wanted = author.trim().to_lowercase();
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|b| b.author.to_lowercase().contains(&wanted))
            .cloned()
            .collect())
    }

    async fn list_range(&self, from: u64, to: u64) -> Result<(Vec<BookRecord>, u64), CoreError> {
        if from == 0 || to < from {
            return Err(CoreError::Validation(format!(
                "Invalid range {from}..{to}: positions start at 1 and 'to' must not precede 'from'"
            )));
        }
        let rows = self.rows.read().await;
        let total = rows.len() as u64;
        let page = rows
            .values()
            .skip((from - 1) as usize)
            .take((to - from + 1) as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn count(&self) -> Result<u64, CoreError> {
        Ok(self.rows.read().await.len() as u64)
    }
}
