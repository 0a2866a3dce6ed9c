pub mod book;
pub mod sale;
