pub mod uniprot;
