//! Import orchestration: the one entry point that turns an XML dump and its
//! release file into a freshly built store.
//!
//! A run walks the states of [`ImportState`] strictly in order. Any error
//! aborts the run where it happened; the next run starts over from an empty
//! schema.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use diesel::prelude::*;
use log::info;
use strum_macros::Display;
use thiserror::Error;

use crate::uniprot::cache::References;
use crate::uniprot::decoder::{decode, DecodeError, TaxidFilter};
use crate::uniprot::parser::{self, ParseError};
use crate::uniprot::release::{insert_versions, mark_completed, read_releases, ReleaseError};
use crate::uniprot::store::{create_schema, drop_schema};
use crate::uniprot::writer::{BatchWriter, WriteError, DEFAULT_BATCH_SIZE};

const PROGRESS_INTERVAL: u64 = 10_000;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Malformed entry #{index}: {source}")]
    Decode {
        index: u64,
        #[source]
        source: DecodeError,
    },

    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    #[error("Release metadata error: {0}")]
    Release(#[from] ReleaseError),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ImportState {
    Start,
    DropSchema,
    CreateSchema,
    ImportVersionMetadata,
    StreamEntries,
    FinalCommit,
    Done,
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub xml_path: PathBuf,
    pub release_path: PathBuf,
    /// Restricts the import to these taxonomy ids; `None` or empty keeps all.
    pub taxids: Option<TaxidFilter>,
    pub batch_size: usize,
}

impl ImportOptions {
    pub fn new(xml_path: impl Into<PathBuf>, release_path: impl Into<PathBuf>) -> Self {
        ImportOptions {
            xml_path: xml_path.into(),
            release_path: release_path.into(),
            taxids: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub entries_seen: u64,
    pub entries_kept: u64,
    pub entries_skipped: u64,
    pub batches: u64,
    pub bytes: u64,
    pub elapsed: Duration,
}

fn enter(state: ImportState) {
    info!("Import: {}", state);
}

/// Replaces the contents of the store behind `connection` with the
/// entries of `options.xml_path`.
pub fn import(
    connection: &mut SqliteConnection,
    options: &ImportOptions,
) -> Result<ImportSummary, ImportError> {
    let started = Instant::now();
    enter(ImportState::Start);
    info!(
        "Importing {} (release file {})",
        options.xml_path.display(),
        options.release_path.display()
    );
    if let Some(taxids) = options.taxids.as_ref().filter(|t| !t.is_empty()) {
        info!("Restricting import to {} taxonomy ids", taxids.len());
    }

    enter(ImportState::DropSchema);
    drop_schema(connection)?;

    enter(ImportState::CreateSchema);
    create_schema(connection)?;

    enter(ImportState::ImportVersionMetadata);
    let releases = read_releases(&options.release_path)?;
    let version_ids = insert_versions(connection, &releases, Utc::now().naive_utc())?;

    enter(ImportState::StreamEntries);
    let mut summary = ImportSummary::default();
    let mut writer = BatchWriter::new(connection, References::new(), options.batch_size)?;
    let taxids = options.taxids.as_ref();

    let progress = parser::run(
        &options.xml_path,
        |element| {
            summary.entries_seen += 1;
            let decoded = decode(&element, taxids).map_err(|source| ImportError::Decode {
                index: summary.entries_seen,
                source,
            })?;
            match decoded {
                Some(entry) => {
                    summary.entries_kept += 1;
                    writer.accept(entry)?;
                }
                None => summary.entries_skipped += 1,
            }
            Ok::<(), ImportError>(())
        },
        |progress| {
            if progress.entries % PROGRESS_INTERVAL == 0 {
                info!("Imported {} entries ({} bytes read)", progress.entries, progress.bytes);
            }
        },
    )?;

    enter(ImportState::FinalCommit);
    writer.flush()?;
    summary.batches = writer.batches();
    summary.bytes = progress.bytes;
    drop(writer);

    mark_completed(connection, &version_ids, Utc::now().naive_utc())?;

    summary.elapsed = started.elapsed();
    enter(ImportState::Done);
    info!(
        "Imported {} of {} entries ({} skipped) in {} batches, {:.1?}",
        summary.entries_kept,
        summary.entries_seen,
        summary.entries_skipped,
        summary.batches,
        summary.elapsed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniprot::store::{count_rows, establish_connection};
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::TempDir;

    const RELDATE: &str = "UniProtKB/Swiss-Prot Release 2017_06 of 07-Jun-2017\n";

    fn entry(name: &str, taxid: i32) -> String {
        format!(
            r#"<entry dataset="Swiss-Prot" created="2000-01-01" modified="2000-01-02" version="1">
                <accession>{name}</accession><name>{name}</name>
                <protein><recommendedName><fullName>{name} protein</fullName></recommendedName></protein>
                <organism><dbReference type="NCBI Taxonomy" id="{taxid}"/></organism>
                <sequence>MK</sequence>
            </entry>"#
        )
    }

    fn write_inputs(dir: &TempDir, body: &str) -> ImportOptions {
        let xml_path = dir.path().join("uniprot.xml");
        let release_path = dir.path().join("reldate.txt");
        fs::write(&xml_path, format!("<uniprot>{body}</uniprot>")).unwrap();
        fs::write(&release_path, RELDATE).unwrap();
        ImportOptions::new(xml_path, release_path)
    }

    #[test]
    fn test_state_names() {
        assert_eq!(ImportState::ImportVersionMetadata.to_string(), "import_version_metadata");
        assert_eq!(ImportState::Done.to_string(), "done");
    }

    #[test]
    fn test_summary_counts_skipped_entries() {
        let dir = TempDir::new().unwrap();
        let body = [entry("A", 9606), entry("B", 10090), entry("C", 9606)].concat();
        let mut options = write_inputs(&dir, &body);
        options.taxids = Some([9606].into_iter().collect());
        options.batch_size = 1;

        let mut connection = establish_connection(":memory:").unwrap();
        let summary = import(&mut connection, &options).unwrap();

        assert_eq!(summary.entries_seen, 3);
        assert_eq!(summary.entries_kept, 2);
        assert_eq!(summary.entries_skipped, 1);
        assert_eq!(summary.batches, 2);
        assert_eq!(count_rows(&mut connection, "entries").unwrap(), 2);
    }

    #[test]
    fn test_malformed_entry_aborts_without_completion() {
        let dir = TempDir::new().unwrap();
        let broken = entry("B", 9606).replace("<accession>B</accession>", "");
        let options = write_inputs(&dir, &[entry("A", 9606), broken].concat());

        let mut connection = establish_connection(":memory:").unwrap();
        assert_matches!(
            import(&mut connection, &options),
            Err(ImportError::Decode { index: 2, source: DecodeError::MissingElement("entry", "accession") })
        );

        use crate::schema::versions::dsl::*;
        let completed: Vec<Option<chrono::NaiveDateTime>> = versions
            .select(import_completed_date)
            .load(&mut connection)
            .unwrap();
        assert_eq!(completed, vec![None]);
    }

    #[test]
    fn test_truncated_between_entries_is_not_completed() {
        let dir = TempDir::new().unwrap();
        let options = write_inputs(&dir, "");
        fs::write(&options.xml_path, format!("<uniprot>{}\n", entry("A", 9606))).unwrap();

        let mut connection = establish_connection(":memory:").unwrap();
        assert_matches!(
            import(&mut connection, &options),
            Err(ImportError::Parse(ParseError::UnexpectedEof(root))) if root == "uniprot"
        );

        use crate::schema::versions::dsl::*;
        let completed: Vec<Option<chrono::NaiveDateTime>> = versions
            .select(import_completed_date)
            .load(&mut connection)
            .unwrap();
        assert_eq!(completed, vec![None]);
    }

    #[test]
    fn test_missing_release_line_fails_before_entries() {
        let dir = TempDir::new().unwrap();
        let options = write_inputs(&dir, &entry("A", 9606));
        fs::write(&options.release_path, "no releases\n").unwrap();

        let mut connection = establish_connection(":memory:").unwrap();
        assert_matches!(
            import(&mut connection, &options),
            Err(ImportError::Release(ReleaseError::NoRelease))
        );
        assert_eq!(count_rows(&mut connection, "entries").unwrap(), 0);
    }
}
