//! Demo models served through the API portal.
//!
//! Each module defines one model: its data, schema, method table and
//! factory. [`factories`] is the complete registration list.

pub mod admin_book_list;
pub mod book;
pub mod book_list;
pub mod book_view;
pub mod filter;
pub mod find_bestseller;

use std::sync::Arc;

use bookshelf_core::factory::ModelFactory;
use bookshelf_core::schema::SchemaError;
use bookshelf_db::DataLayer;

/// Every model of the application, bound to `data`.
pub fn factories(data: Arc<DataLayer>) -> Result<Vec<ModelFactory>, SchemaError> {
    Ok(vec![
        ModelFactory::editable(book::BookFactory::new(Arc::clone(&data))?),
        ModelFactory::read_only(book_view::BookViewFactory::new(Arc::clone(&data))?),
        ModelFactory::read_only(book_list::BookListFactory::new(Arc::clone(&data))?),
        ModelFactory::read_only(admin_book_list::AdminBookListFactory::new(Arc::clone(
            &data,
        ))?),
        ModelFactory::command(find_bestseller::FindBestsellerFactory::new(data)?),
    ])
}
