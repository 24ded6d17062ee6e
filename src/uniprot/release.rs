//! Release metadata from the `reldate.txt` companion file.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use log::info;
use regex::Regex;
use thiserror::Error;

use crate::schema::versions;
use crate::uniprot::models::{Dataset, NewVersion};

const RELEASE_PATTERN: &str =
    r"UniProtKB/(Swiss-Prot|TrEMBL) Release (\S+) of (\d{2}-[A-Za-z]{3}-\d{4})";
const RELEASE_DATE_FORMAT: &str = "%d-%b-%Y";

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Cannot read release file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex pattern error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid release date '{0}'")]
    InvalidDate(String),

    #[error("Unknown knowledgebase '{0}'")]
    UnknownKnowledgebase(String),

    #[error("No release line found in release file")]
    NoRelease,

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    pub knowledgebase: Dataset,
    pub name: String,
    pub date: NaiveDate,
}

/// Every release line of `text`, in file order.
pub fn parse_releases(text: &str) -> Result<Vec<Release>, ReleaseError> {
    let pattern = Regex::new(RELEASE_PATTERN)?;

    let releases = pattern
        .captures_iter(text)
        .map(|caps| {
            let knowledgebase = caps[1]
                .parse::<Dataset>()
                .map_err(|_| ReleaseError::UnknownKnowledgebase(caps[1].to_string()))?;
            let date = NaiveDate::parse_from_str(&caps[3], RELEASE_DATE_FORMAT)
                .map_err(|_| ReleaseError::InvalidDate(caps[3].to_string()))?;
            Ok(Release {
                knowledgebase,
                name: caps[2].to_string(),
                date,
            })
        })
        .collect::<Result<Vec<_>, ReleaseError>>()?;

    if releases.is_empty() {
        return Err(ReleaseError::NoRelease);
    }
    Ok(releases)
}

pub fn read_releases(path: &Path) -> Result<Vec<Release>, ReleaseError> {
    parse_releases(&fs::read_to_string(path)?)
}

/// Inserts one Version row per release, stamped with `started`, and
/// returns the ids of the new rows.
pub fn insert_versions(
    connection: &mut SqliteConnection,
    releases: &[Release],
    started: NaiveDateTime,
) -> Result<Vec<i32>, ReleaseError> {
    let mut ids = Vec::with_capacity(releases.len());
    for release in releases {
        info!(
            "Release {} of {} ({})",
            release.name, release.date, release.knowledgebase
        );
        let id = diesel::insert_into(versions::table)
            .values(&NewVersion {
                knowledgebase: release.knowledgebase.as_ref(),
                release_name: &release.name,
                release_date: release.date,
                import_start_date: Some(started),
                import_completed_date: None,
            })
            .returning(versions::id)
            .get_result(connection)?;
        ids.push(id);
    }
    Ok(ids)
}

/// Stamps `completed` on the Version rows `ids`.
pub fn mark_completed(
    connection: &mut SqliteConnection,
    ids: &[i32],
    completed: NaiveDateTime,
) -> Result<usize, ReleaseError> {
    let updated = diesel::update(versions::table.filter(versions::id.eq_any(ids)))
        .set(versions::import_completed_date.eq(Some(completed)))
        .execute(connection)?;
    Ok(updated)
}
