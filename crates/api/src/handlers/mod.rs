pub mod pages;
pub mod portal;
