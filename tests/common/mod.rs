#![allow(dead_code)]

use std::path::PathBuf;

use diesel::SqliteConnection;
use uniprot_ru::uniprot::importer::{import, ImportOptions, ImportSummary};
use uniprot_ru::uniprot::store::establish_connection;

pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn sample_options(taxids: &[i32]) -> ImportOptions {
    let mut options = ImportOptions::new(
        data_path("uniprot_sample.xml"),
        data_path("reldate.txt"),
    );
    options.batch_size = 3;
    if !taxids.is_empty() {
        options.taxids = Some(taxids.iter().copied().collect());
    }
    options
}

/// In-memory store holding the sample file, restricted to `taxids`.
pub fn imported(taxids: &[i32]) -> (SqliteConnection, ImportSummary) {
    let mut connection = establish_connection(":memory:").unwrap();
    let summary = import(&mut connection, &sample_options(taxids)).unwrap();
    (connection, summary)
}
