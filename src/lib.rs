pub mod cli;
pub mod commands;
pub mod schema;
pub mod uniprot;
