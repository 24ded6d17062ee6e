//! OBO flat-file export of imported entries.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;
use diesel::prelude::*;
use log::{info, warn};
use thiserror::Error;

use crate::schema::*;
use crate::uniprot::decoder::TaxidFilter;
use crate::uniprot::models::*;

/// Entries loaded per round-trip while exporting.
const CHUNK_SIZE: i64 = 1_000;

/// Cross-reference types whose identifiers repeat the type as a prefix.
const PREFIXED_XREF_TYPES: &[&str] = &["GO", "HGNC"];

#[derive(Error, Debug)]
pub enum OboError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
}

#[derive(Debug, Clone)]
pub struct OboOptions {
    pub ontology: String,
    pub taxids: Option<TaxidFilter>,
}

impl Default for OboOptions {
    fn default() -> Self {
        OboOptions {
            ontology: "uniprot".to_string(),
            taxids: None,
        }
    }
}

/// Writes the header and one `[Term]` per entry; returns the number of
/// terms written.
pub fn write_obo<W: Write>(
    connection: &mut SqliteConnection,
    out: &mut W,
    options: &OboOptions,
) -> Result<usize, OboError> {
    write_header(out, &options.ontology)?;

    let taxids: Option<Vec<i32>> = options
        .taxids
        .as_ref()
        .filter(|taxids| !taxids.is_empty())
        .map(|taxids| taxids.iter().copied().collect());

    let mut terms = 0;
    let mut last_id = 0;
    loop {
        let mut chunk_query = entries::table
            .filter(entries::id.gt(last_id))
            .select(Entry::as_select())
            .order(entries::id)
            .limit(CHUNK_SIZE)
            .into_boxed();
        if let Some(taxids) = &taxids {
            chunk_query = chunk_query.filter(entries::taxid.eq_any(taxids.clone()));
        }
        let chunk: Vec<Entry> = chunk_query.load(connection)?;
        let Some(last) = chunk.last() else {
            break;
        };
        last_id = last.id;

        let accessions = Accession::belonging_to(&chunk)
            .select(Accession::as_select())
            .order(accessions::id)
            .load::<Accession>(connection)?
            .grouped_by(&chunk);
        let full_names = AlternativeFullName::belonging_to(&chunk)
            .select(AlternativeFullName::as_select())
            .order(alternative_full_names::id)
            .load::<AlternativeFullName>(connection)?
            .grouped_by(&chunk);
        let short_names = AlternativeShortName::belonging_to(&chunk)
            .select(AlternativeShortName::as_select())
            .order(alternative_short_names::id)
            .load::<AlternativeShortName>(connection)?
            .grouped_by(&chunk);
        let references = DbReference::belonging_to(&chunk)
            .select(DbReference::as_select())
            .order(db_references::id)
            .load::<DbReference>(connection)?
            .grouped_by(&chunk);

        for (i, entry) in chunk.iter().enumerate() {
            let term = Term {
                entry,
                accessions: &accessions[i],
                full_names: &full_names[i],
                short_names: &short_names[i],
                references: &references[i],
            };
            if term.write(out)? {
                terms += 1;
            }
        }
    }

    info!("Exported {} OBO terms", terms);
    Ok(terms)
}

pub fn export_obo(
    connection: &mut SqliteConnection,
    path: &Path,
    options: &OboOptions,
) -> Result<usize, OboError> {
    info!("Exporting OBO to {}", path.display());
    let mut out = BufWriter::new(File::create(path)?);
    let terms = write_obo(connection, &mut out, options)?;
    out.flush()?;
    Ok(terms)
}

fn write_header<W: Write>(out: &mut W, ontology: &str) -> std::io::Result<()> {
    writeln!(out, "format-version: 0.1")?;
    writeln!(out, "date: {}", Local::now().format("%d:%m:%Y %H:%M"))?;
    writeln!(out, "ontology: {}", ontology)?;
    writeln!(out, "synonymtypedef: GENE_NAME \"GENE NAME\"")?;
    writeln!(out, "synonymtypedef: ALTERNATIVE_NAME \"ALTERNATIVE NAME\"")
}

struct Term<'a> {
    entry: &'a Entry,
    accessions: &'a [Accession],
    full_names: &'a [AlternativeFullName],
    short_names: &'a [AlternativeShortName],
    references: &'a [DbReference],
}

impl Term<'_> {
    fn write<W: Write>(&self, out: &mut W) -> std::io::Result<bool> {
        let Some((primary, secondary)) = self.accessions.split_first() else {
            warn!("Entry {} has no accession, not exported", self.entry.name);
            return Ok(false);
        };

        writeln!(out)?;
        writeln!(out, "[Term]")?;
        writeln!(out, "id: SWISSPROT:{}", primary.accession)?;
        for accession in secondary {
            writeln!(out, "alt_id: {}", accession.accession)?;
        }
        writeln!(out, "name: {}", self.entry.recommended_full_name)?;

        let alternative_names = self
            .full_names
            .iter()
            .map(|n| &n.name)
            .chain(self.short_names.iter().map(|n| &n.name));
        for name in alternative_names {
            writeln!(out, "synonym: \"{}\" EXACT ALTERNATIVE_NAME []", name)?;
        }
        if let Some(gene_name) = &self.entry.gene_name {
            writeln!(out, "synonym: \"{}\" EXACT GENE_NAME []", gene_name)?;
        }

        for reference in self.references {
            writeln!(
                out,
                "xref: {}:{}",
                reference.type_,
                xref_identifier(&reference.type_, &reference.identifier)
            )?;
        }
        Ok(true)
    }
}

/// Identifier as written after `xref: <type>:`.
fn xref_identifier(type_: &str, identifier: &str) -> String {
    let identifier = if PREFIXED_XREF_TYPES.contains(&type_) {
        identifier
            .split_once(':')
            .map_or(identifier, |(_, local)| local)
    } else {
        identifier
    };
    identifier.replace('\\', "\\\\")
}
