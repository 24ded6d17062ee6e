pub mod cache;
pub mod decoder;
pub mod element;
pub mod importer;
pub mod models;
pub mod obo;
pub mod parser;
pub mod query;
pub mod release;
pub mod store;
pub mod writer;
