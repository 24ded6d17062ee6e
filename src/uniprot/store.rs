//! Relational store: connection, schema lifecycle and row insertion.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use log::info;

use crate::schema::*;
use crate::uniprot::cache::{References, RowId};
use crate::uniprot::decoder::{Citation, DecodedEntry, DiseaseRecord, KeywordRecord};
use crate::uniprot::models::*;

/// Tables in creation order; dropped in reverse.
const TABLES: &[&str] = &[
    "entries",
    "sequences",
    "accessions",
    "organism_hosts",
    "features",
    "functions",
    "ec_numbers",
    "db_references",
    "alternative_full_names",
    "alternative_short_names",
    "other_gene_names",
    "tissue_specificities",
    "diseases",
    "disease_comments",
    "pmids",
    "keywords",
    "subcellular_locations",
    "tissue_in_references",
    "entry_pmids",
    "entry_keywords",
    "entry_subcellular_locations",
    "entry_tissue_in_references",
    "versions",
];

const CREATE_SCHEMA: &str = r#"
CREATE TABLE entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    dataset TEXT NOT NULL,
    created DATE NOT NULL,
    modified DATE NOT NULL,
    version INTEGER NOT NULL,
    name TEXT NOT NULL UNIQUE,
    recommended_full_name TEXT NOT NULL,
    recommended_short_name TEXT,
    taxid INTEGER NOT NULL,
    gene_name TEXT
);
CREATE INDEX ix_entries_taxid ON entries (taxid);
CREATE INDEX ix_entries_gene_name ON entries (gene_name);

CREATE TABLE sequences (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL UNIQUE REFERENCES entries (id) ON DELETE CASCADE,
    sequence TEXT NOT NULL,
    length INTEGER,
    mass INTEGER
);

CREATE TABLE accessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    accession TEXT NOT NULL
);
CREATE INDEX ix_accessions_entry_id ON accessions (entry_id);
CREATE INDEX ix_accessions_accession ON accessions (accession);

CREATE TABLE organism_hosts (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    taxid INTEGER NOT NULL
);
CREATE INDEX ix_organism_hosts_entry_id ON organism_hosts (entry_id);

CREATE TABLE features (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    type TEXT NOT NULL,
    identifier TEXT,
    description TEXT
);
CREATE INDEX ix_features_entry_id ON features (entry_id);

CREATE TABLE functions (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    text TEXT NOT NULL
);
CREATE INDEX ix_functions_entry_id ON functions (entry_id);

CREATE TABLE ec_numbers (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    ec_number TEXT NOT NULL
);
CREATE INDEX ix_ec_numbers_entry_id ON ec_numbers (entry_id);

CREATE TABLE db_references (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    type TEXT NOT NULL,
    identifier TEXT NOT NULL
);
CREATE INDEX ix_db_references_entry_id ON db_references (entry_id);
CREATE INDEX ix_db_references_identifier ON db_references (identifier);

CREATE TABLE alternative_full_names (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    name TEXT NOT NULL
);
CREATE INDEX ix_alternative_full_names_entry_id ON alternative_full_names (entry_id);

CREATE TABLE alternative_short_names (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    name TEXT NOT NULL
);
CREATE INDEX ix_alternative_short_names_entry_id ON alternative_short_names (entry_id);

CREATE TABLE other_gene_names (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    type TEXT NOT NULL,
    name TEXT NOT NULL
);
CREATE INDEX ix_other_gene_names_entry_id ON other_gene_names (entry_id);

CREATE TABLE tissue_specificities (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    comment TEXT NOT NULL
);
CREATE INDEX ix_tissue_specificities_entry_id ON tissue_specificities (entry_id);

CREATE TABLE diseases (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    identifier TEXT NOT NULL UNIQUE,
    ref_id TEXT,
    ref_type TEXT,
    name TEXT,
    acronym TEXT,
    description TEXT
);

CREATE TABLE disease_comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    disease_id INTEGER REFERENCES diseases (id),
    comment TEXT
);
CREATE INDEX ix_disease_comments_entry_id ON disease_comments (entry_id);

CREATE TABLE pmids (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    pmid INTEGER NOT NULL UNIQUE,
    last TEXT,
    first TEXT,
    volume INTEGER,
    name TEXT,
    date INTEGER,
    type TEXT,
    title TEXT
);

CREATE TABLE keywords (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    identifier TEXT NOT NULL UNIQUE,
    name TEXT
);

CREATE TABLE subcellular_locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    location TEXT NOT NULL UNIQUE
);

CREATE TABLE tissue_in_references (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    tissue TEXT NOT NULL UNIQUE
);

CREATE TABLE entry_pmids (
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    pmid_id INTEGER NOT NULL REFERENCES pmids (id),
    PRIMARY KEY (entry_id, pmid_id)
);

CREATE TABLE entry_keywords (
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    keyword_id INTEGER NOT NULL REFERENCES keywords (id),
    PRIMARY KEY (entry_id, keyword_id)
);

CREATE TABLE entry_subcellular_locations (
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    subcellular_location_id INTEGER NOT NULL REFERENCES subcellular_locations (id),
    PRIMARY KEY (entry_id, subcellular_location_id)
);

CREATE TABLE entry_tissue_in_references (
    entry_id INTEGER NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
    tissue_in_reference_id INTEGER NOT NULL REFERENCES tissue_in_references (id),
    PRIMARY KEY (entry_id, tissue_in_reference_id)
);

CREATE TABLE versions (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    knowledgebase TEXT NOT NULL UNIQUE,
    release_name TEXT NOT NULL,
    release_date DATE NOT NULL,
    import_start_date TIMESTAMP,
    import_completed_date TIMESTAMP
);
"#;

/// Opens the store at `database_url` with foreign keys enforced.
pub fn establish_connection(database_url: &str) -> Result<SqliteConnection, ConnectionError> {
    let mut connection = SqliteConnection::establish(database_url)?;
    connection
        .batch_execute("PRAGMA foreign_keys = ON;")
        .map_err(ConnectionError::CouldntSetupConfiguration)?;
    Ok(connection)
}

pub fn drop_schema(connection: &mut SqliteConnection) -> QueryResult<()> {
    info!("Dropping {} tables", TABLES.len());
    let statements: String = TABLES
        .iter()
        .rev()
        .map(|table| format!("DROP TABLE IF EXISTS {table};\n"))
        .collect();
    connection.batch_execute(&statements)
}

pub fn create_schema(connection: &mut SqliteConnection) -> QueryResult<()> {
    info!("Creating {} tables", TABLES.len());
    connection.batch_execute(CREATE_SCHEMA)
}

/// Inserts one decoded entry with all owned rows and links to shared rows,
/// creating shared rows through `references` on first sight. Must run
/// inside the caller's transaction.
pub fn insert_entry(
    connection: &mut SqliteConnection,
    references: &mut References,
    entry: &DecodedEntry,
) -> QueryResult<RowId> {
    let new_entry = NewEntry {
        dataset: entry.dataset.as_ref(),
        created: entry.created,
        modified: entry.modified,
        version: entry.version,
        name: &entry.name,
        recommended_full_name: &entry.recommended_full_name,
        recommended_short_name: entry.recommended_short_name.as_deref(),
        taxid: entry.taxid,
        gene_name: entry.gene_name.as_deref(),
    };
    let entry_id: RowId = diesel::insert_into(entries::table)
        .values(&new_entry)
        .returning(entries::id)
        .get_result(connection)?;

    diesel::insert_into(sequences::table)
        .values(&NewSequence {
            entry_id,
            sequence: &entry.sequence.sequence,
            length: entry.sequence.length,
            mass: entry.sequence.mass,
        })
        .execute(connection)?;

    insert_owned_rows(connection, entry_id, entry)?;
    insert_disease_comments(connection, references, entry_id, entry)?;
    insert_shared_links(connection, references, entry_id, entry)?;

    Ok(entry_id)
}

fn insert_owned_rows(
    connection: &mut SqliteConnection,
    entry_id: RowId,
    entry: &DecodedEntry,
) -> QueryResult<()> {
    let accession_rows: Vec<_> = entry
        .accessions
        .iter()
        .map(|accession| NewAccession { entry_id, accession })
        .collect();
    diesel::insert_into(accessions::table)
        .values(&accession_rows)
        .execute(connection)?;

    let host_rows: Vec<_> = entry
        .organism_hosts
        .iter()
        .map(|&taxid| NewOrganismHost { entry_id, taxid })
        .collect();
    diesel::insert_into(organism_hosts::table)
        .values(&host_rows)
        .execute(connection)?;

    let feature_rows: Vec<_> = entry
        .features
        .iter()
        .map(|feature| NewFeature {
            entry_id,
            type_: &feature.type_,
            identifier: feature.identifier.as_deref(),
            description: feature.description.as_deref(),
        })
        .collect();
    diesel::insert_into(features::table)
        .values(&feature_rows)
        .execute(connection)?;

    let function_rows: Vec<_> = entry
        .functions
        .iter()
        .map(|text| NewFunction { entry_id, text })
        .collect();
    diesel::insert_into(functions::table)
        .values(&function_rows)
        .execute(connection)?;

    let ec_rows: Vec<_> = entry
        .ec_numbers
        .iter()
        .map(|ec_number| NewEcNumber { entry_id, ec_number })
        .collect();
    diesel::insert_into(ec_numbers::table)
        .values(&ec_rows)
        .execute(connection)?;

    let reference_rows: Vec<_> = entry
        .db_references
        .iter()
        .map(|reference| NewDbReference {
            entry_id,
            type_: &reference.type_,
            identifier: &reference.identifier,
        })
        .collect();
    diesel::insert_into(db_references::table)
        .values(&reference_rows)
        .execute(connection)?;

    let full_name_rows: Vec<_> = entry
        .alternative_full_names
        .iter()
        .map(|name| NewAlternativeFullName { entry_id, name })
        .collect();
    diesel::insert_into(alternative_full_names::table)
        .values(&full_name_rows)
        .execute(connection)?;

    let short_name_rows: Vec<_> = entry
        .alternative_short_names
        .iter()
        .map(|name| NewAlternativeShortName { entry_id, name })
        .collect();
    diesel::insert_into(alternative_short_names::table)
        .values(&short_name_rows)
        .execute(connection)?;

    let gene_name_rows: Vec<_> = entry
        .other_gene_names
        .iter()
        .map(|gene| NewOtherGeneName {
            entry_id,
            type_: &gene.type_,
            name: &gene.name,
        })
        .collect();
    diesel::insert_into(other_gene_names::table)
        .values(&gene_name_rows)
        .execute(connection)?;

    let specificity_rows: Vec<_> = entry
        .tissue_specificities
        .iter()
        .map(|comment| NewTissueSpecificity { entry_id, comment })
        .collect();
    diesel::insert_into(tissue_specificities::table)
        .values(&specificity_rows)
        .execute(connection)?;

    Ok(())
}

fn insert_disease_comments(
    connection: &mut SqliteConnection,
    references: &mut References,
    entry_id: RowId,
    entry: &DecodedEntry,
) -> QueryResult<()> {
    for disease_comment in &entry.disease_comments {
        let disease_id = match &disease_comment.disease {
            Some(disease) => Some(references.diseases.resolve(
                disease.identifier.clone(),
                |_| get_or_create_disease(connection, disease),
            )?),
            None => None,
        };
        diesel::insert_into(disease_comments::table)
            .values(&NewDiseaseComment {
                entry_id,
                disease_id,
                comment: disease_comment.comment.as_deref(),
            })
            .execute(connection)?;
    }
    Ok(())
}

/// Looks the disease up by identifier and inserts it when absent, so its
/// id is durable before any comment references it.
fn get_or_create_disease(
    connection: &mut SqliteConnection,
    disease: &DiseaseRecord,
) -> QueryResult<RowId> {
    let existing: Option<RowId> = diseases::table
        .filter(diseases::identifier.eq(&disease.identifier))
        .select(diseases::id)
        .first(connection)
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    diesel::insert_into(diseases::table)
        .values(&NewDisease {
            identifier: &disease.identifier,
            ref_id: disease.ref_id.as_deref(),
            ref_type: disease.ref_type.as_deref(),
            name: disease.name.as_deref(),
            acronym: disease.acronym.as_deref(),
            description: disease.description.as_deref(),
        })
        .returning(diseases::id)
        .get_result(connection)
}

fn insert_shared_links(
    connection: &mut SqliteConnection,
    references: &mut References,
    entry_id: RowId,
    entry: &DecodedEntry,
) -> QueryResult<()> {
    let mut pmid_links = Vec::with_capacity(entry.citations.len());
    for citation in &entry.citations {
        let pmid_id = references
            .pmids
            .resolve(citation.pmid, |_| create_pmid(connection, citation))?;
        pmid_links.push(EntryPmid { entry_id, pmid_id });
    }
    diesel::insert_into(entry_pmids::table)
        .values(&pmid_links)
        .execute(connection)?;

    let mut keyword_links = Vec::with_capacity(entry.keywords.len());
    for keyword in &entry.keywords {
        let keyword_id = references
            .keywords
            .resolve(keyword.identifier.clone(), |_| create_keyword(connection, keyword))?;
        keyword_links.push(EntryKeyword { entry_id, keyword_id });
    }
    diesel::insert_into(entry_keywords::table)
        .values(&keyword_links)
        .execute(connection)?;

    let mut location_links = Vec::with_capacity(entry.subcellular_locations.len());
    for location in &entry.subcellular_locations {
        let subcellular_location_id =
            references
                .subcellular_locations
                .resolve(location.clone(), |location| {
                    diesel::insert_into(subcellular_locations::table)
                        .values(&NewSubcellularLocation { location })
                        .returning(subcellular_locations::id)
                        .get_result(connection)
                })?;
        location_links.push(EntrySubcellularLocation {
            entry_id,
            subcellular_location_id,
        });
    }
    diesel::insert_into(entry_subcellular_locations::table)
        .values(&location_links)
        .execute(connection)?;

    let mut tissue_links = Vec::with_capacity(entry.tissues.len());
    for tissue in &entry.tissues {
        let tissue_in_reference_id = references.tissues.resolve(tissue.clone(), |tissue| {
            diesel::insert_into(tissue_in_references::table)
                .values(&NewTissueInReference { tissue })
                .returning(tissue_in_references::id)
                .get_result(connection)
        })?;
        tissue_links.push(EntryTissueInReference {
            entry_id,
            tissue_in_reference_id,
        });
    }
    diesel::insert_into(entry_tissue_in_references::table)
        .values(&tissue_links)
        .execute(connection)?;

    Ok(())
}

fn create_pmid(connection: &mut SqliteConnection, citation: &Citation) -> QueryResult<RowId> {
    diesel::insert_into(pmids::table)
        .values(&NewPmid {
            pmid: citation.pmid,
            last: citation.last.as_deref(),
            first: citation.first.as_deref(),
            volume: citation.volume,
            name: citation.name.as_deref(),
            date: citation.date,
            type_: citation.type_.as_deref(),
            title: citation.title.as_deref(),
        })
        .returning(pmids::id)
        .get_result(connection)
}

fn create_keyword(connection: &mut SqliteConnection, keyword: &KeywordRecord) -> QueryResult<RowId> {
    diesel::insert_into(keywords::table)
        .values(&NewKeyword {
            identifier: &keyword.identifier,
            name: keyword.name.as_deref(),
        })
        .returning(keywords::id)
        .get_result(connection)
}

/// Row count of `table`, one of the tables this store creates.
pub fn count_rows(connection: &mut SqliteConnection, table: &str) -> QueryResult<i64> {
    #[derive(QueryableByName)]
    struct Count {
        #[diesel(sql_type = diesel::sql_types::BigInt)]
        count: i64,
    }

    if !TABLES.contains(&table) {
        return Err(diesel::result::Error::NotFound);
    }
    let row: Count = diesel::sql_query(format!("SELECT COUNT(*) AS count FROM {table}"))
        .get_result(connection)?;
    Ok(row.count)
}
