//! Mock data access layer.
//!
//! Data access objects are traits so models never depend on a concrete
//! store. The in-memory implementations are seeded from the sample data in
//! [`seed`] and live for the lifetime of the process.

pub mod models;
pub mod repositories;
pub mod seed;

use std::sync::Arc;

use repositories::{BookDao, InMemoryBookRepo, InMemorySalesRepo, SalesDao};

/// Every data access object the models use, bundled for injection.
#[derive(Clone)]
pub struct DataLayer {
    pub books: Arc<dyn BookDao>,
    pub sales: Arc<dyn SalesDao>,
}

impl DataLayer {
    pub fn new(books: Arc<dyn BookDao>, sales: Arc<dyn SalesDao>) -> Self {
        Self { books, sales }
    }

    /// In-memory stores filled with the sample books and sales.
    pub fn in_memory() -> Self {
        let books = InMemoryBookRepo::with_books(seed::sample_books());
        let sales = InMemorySalesRepo::with_sales(seed::sample_sales());
        tracing::info!(
            books = books.len(),
            sales = sales.len(),
            "In-memory data layer seeded",
        );
        Self::new(Arc::new(books), Arc::new(sales))
    }

    /// Liveness probe used by the health endpoint.
    pub async fn health_check(&self) -> bool {
        self.books.count().await.is_ok()
    }
}
