//! Data access objects and their in-memory implementations.

pub mod book_repo;
pub mod sales_repo;

pub use book_repo::{BookDao, InMemoryBookRepo};
pub use sales_repo::{InMemorySalesRepo, SalesDao};
