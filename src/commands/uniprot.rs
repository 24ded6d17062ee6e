use clap::{Parser, Subcommand};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use dotenvy::dotenv;
use log::info;
use polars::prelude::{ParquetWriter, DataFrame};
use std::path::{Path, PathBuf};
use strum_macros::EnumString;

use crate::uniprot::decoder::TaxidFilter;
use crate::uniprot::importer::{import, ImportOptions};
use crate::uniprot::models::*;
use crate::uniprot::obo::{export_obo, OboOptions};
use crate::uniprot::query::{query, Entity, Filter, Kind, Limit, Output, Query, Value};
use crate::uniprot::store::establish_connection;
use crate::uniprot::writer::DEFAULT_BATCH_SIZE;

///////////////////////////////////////////////////////////////////////////////

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rebuild the store from a UniProt XML dump
    #[command(name = "import")]
    Import(ImportCommand),
    /// Query one table of the store
    #[command(name = "query")]
    Query(QueryCommand),
    /// Export entries as an OBO file
    #[command(name = "export-obo")]
    ExportObo(ExportOboCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct ImportCommand {
    /// Decompressed uniprot_sprot.xml / uniprot_trembl.xml
    #[arg()]
    xml: PathBuf,
    /// reldate.txt of the same release
    #[arg()]
    reldate: PathBuf,

    /// Only import these NCBI taxonomy ids
    #[arg(long, short, value_delimiter = ',')]
    taxids: Vec<i32>,
    /// Entries committed per transaction
    #[arg(long, short)]
    batch_size: Option<usize>,

    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct QueryCommand {
    /// Table to query, e.g. entry, keyword, db_reference
    #[arg()]
    entity: EntityName,

    /// field=value, repeatable
    #[arg(long, short)]
    exact: Vec<String>,
    /// field=pattern, SQL LIKE syntax
    #[arg(long, short)]
    like: Vec<String>,
    /// field=value1,value2,...
    #[arg(long, short)]
    any_of: Vec<String>,

    /// Return at most this many rows
    #[arg(long, short = 'n', conflicts_with = "page")]
    limit: Option<u32>,
    /// 1-based page number
    #[arg(long, requires = "page_size")]
    page: Option<u32>,
    /// Rows per page
    #[arg(long, requires = "page")]
    page_size: Option<u32>,

    /// Write the result as Parquet instead of printing it
    #[arg(long)]
    parquet: Option<PathBuf>,

    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportOboCommand {
    /// Path of the .obo file to write
    #[arg()]
    output: PathBuf,
    #[arg(long, default_value = "uniprot")]
    ontology: String,
    /// Only export entries of these NCBI taxonomy ids
    #[arg(long, short, value_delimiter = ',')]
    taxids: Vec<i32>,

    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct StoreArgs {
    /// Config file, without extension
    #[arg(long, default_value = "assets/config")]
    config: PathBuf,
    /// Overrides DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,
}

#[derive(Debug, Clone, Copy, EnumString)]
#[strum(serialize_all = "snake_case")]
enum EntityName {
    Entry,
    Sequence,
    Accession,
    OrganismHost,
    Feature,
    Function,
    EcNumber,
    DbReference,
    AlternativeFullName,
    AlternativeShortName,
    OtherGeneName,
    TissueSpecificity,
    Disease,
    DiseaseComment,
    Pmid,
    Keyword,
    SubcellularLocation,
    TissueInReference,
    Version,
}

///////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub batch_size: usize,
    pub taxids: Vec<i32>,
}

/// Reads `.env`, the optional config file and the environment, in
/// increasing order of precedence.
pub fn load_settings(config: &Path) -> Result<Settings, Box<dyn std::error::Error>> {
    dotenv().ok();
    let config_file = config.to_str().ok_or("Invalid config path")?;
    let settings = ConfigBuilder::<DefaultState>::default()
        .set_default("batch_size", DEFAULT_BATCH_SIZE as i64)?
        .set_default("taxids", Vec::<i64>::new())?
        .add_source(File::with_name(config_file).required(false))
        .add_source(
            Environment::default()
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("taxids"),
        )
        .build()?;

    Ok(Settings {
        database_url: settings.get("database_url")?,
        batch_size: settings.get("batch_size")?,
        taxids: settings.get("taxids")?,
    })
}

fn resolve_settings(store: &StoreArgs) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = load_settings(&store.config)?;
    if let Some(url) = &store.database_url {
        settings.database_url = url.clone();
    }
    Ok(settings)
}

fn taxid_filter(flags: &[i32], settings: &Settings) -> Option<TaxidFilter> {
    let taxids = if flags.is_empty() { &settings.taxids } else { flags };
    if taxids.is_empty() {
        None
    } else {
        Some(taxids.iter().copied().collect())
    }
}

pub fn command(cmds: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmds {
        Commands::Import(cmd) => run_import(&cmd),
        Commands::Query(cmd) => run_query(&cmd),
        Commands::ExportObo(cmd) => run_export_obo(&cmd),
    }
}

fn run_import(cmd: &ImportCommand) -> Result<(), Box<dyn std::error::Error>> {
    let settings = resolve_settings(&cmd.store)?;
    let mut connection = establish_connection(&settings.database_url)
        .map_err(|e| format!("Error connecting to {}: {}", settings.database_url, e))?;

    let options = ImportOptions {
        xml_path: cmd.xml.clone(),
        release_path: cmd.reldate.clone(),
        taxids: taxid_filter(&cmd.taxids, &settings),
        batch_size: cmd.batch_size.unwrap_or(settings.batch_size),
    };
    let summary = import(&mut connection, &options)?;
    info!(
        "Import finished: {} entries kept, {} skipped",
        summary.entries_kept, summary.entries_skipped
    );
    Ok(())
}

fn run_export_obo(cmd: &ExportOboCommand) -> Result<(), Box<dyn std::error::Error>> {
    let settings = resolve_settings(&cmd.store)?;
    let mut connection = establish_connection(&settings.database_url)
        .map_err(|e| format!("Error connecting to {}: {}", settings.database_url, e))?;

    let options = OboOptions {
        ontology: cmd.ontology.clone(),
        taxids: taxid_filter(&cmd.taxids, &settings),
    };
    export_obo(&mut connection, &cmd.output, &options)?;
    Ok(())
}

fn run_query(cmd: &QueryCommand) -> Result<(), Box<dyn std::error::Error>> {
    let frame = match cmd.entity {
        EntityName::Entry => query_frame::<Entry>(cmd)?,
        EntityName::Sequence => query_frame::<Sequence>(cmd)?,
        EntityName::Accession => query_frame::<Accession>(cmd)?,
        EntityName::OrganismHost => query_frame::<OrganismHost>(cmd)?,
        EntityName::Feature => query_frame::<Feature>(cmd)?,
        EntityName::Function => query_frame::<Function>(cmd)?,
        EntityName::EcNumber => query_frame::<EcNumber>(cmd)?,
        EntityName::DbReference => query_frame::<DbReference>(cmd)?,
        EntityName::AlternativeFullName => query_frame::<AlternativeFullName>(cmd)?,
        EntityName::AlternativeShortName => query_frame::<AlternativeShortName>(cmd)?,
        EntityName::OtherGeneName => query_frame::<OtherGeneName>(cmd)?,
        EntityName::TissueSpecificity => query_frame::<TissueSpecificity>(cmd)?,
        EntityName::Disease => query_frame::<Disease>(cmd)?,
        EntityName::DiseaseComment => query_frame::<DiseaseComment>(cmd)?,
        EntityName::Pmid => query_frame::<Pmid>(cmd)?,
        EntityName::Keyword => query_frame::<Keyword>(cmd)?,
        EntityName::SubcellularLocation => query_frame::<SubcellularLocation>(cmd)?,
        EntityName::TissueInReference => query_frame::<TissueInReference>(cmd)?,
        EntityName::Version => query_frame::<Version>(cmd)?,
    };

    match &cmd.parquet {
        Some(path) => {
            let mut frame = frame;
            let file = std::fs::File::create(path)?;
            ParquetWriter::new(file).finish(&mut frame)?;
            info!("Wrote {} rows to {}", frame.height(), path.display());
        }
        None => println!("{}", frame),
    }
    Ok(())
}

fn query_frame<T: Entity>(cmd: &QueryCommand) -> Result<DataFrame, Box<dyn std::error::Error>> {
    let settings = resolve_settings(&cmd.store)?;
    let mut connection = establish_connection(&settings.database_url)
        .map_err(|e| format!("Error connecting to {}: {}", settings.database_url, e))?;

    let mut request = Query::new().output(Output::Frame);
    for arg in &cmd.exact {
        let (field, value) = split_filter_arg(arg)?;
        request = request.filter(field, Filter::Exact(typed_value::<T>(field, value)?));
    }
    for arg in &cmd.like {
        let (field, pattern) = split_filter_arg(arg)?;
        request = request.filter(field, Filter::like(pattern));
    }
    for arg in &cmd.any_of {
        let (field, values) = split_filter_arg(arg)?;
        let values = values
            .split(',')
            .map(|value| typed_value::<T>(field, value))
            .collect::<Result<Vec<_>, _>>()?;
        request = request.filter(field, Filter::AnyOf(values));
    }

    if let Some(count) = cmd.limit {
        request = request.limit(Limit::Count(count));
    }
    if let (Some(page), Some(page_size)) = (cmd.page, cmd.page_size) {
        request = request.limit(Limit::Page { page, page_size });
    }

    let frame = query::<T>(&mut connection, &request)?
        .into_frame()
        .ok_or("Query did not return a frame")?;
    Ok(frame)
}

fn split_filter_arg(arg: &str) -> Result<(&str, &str), String> {
    arg.split_once('=')
        .ok_or_else(|| format!("Expected field=value, got '{}'", arg))
}

/// Parses a command-line value according to the kind of `field`.
fn typed_value<T: Entity>(field: &str, value: &str) -> Result<Value, Box<dyn std::error::Error>> {
    match T::field(field).map(|f| f.kind) {
        Some(Kind::Integer) => Ok(Value::Integer(value.trim().parse()?)),
        // Unknown fields are reported by the query itself.
        _ => Ok(Value::Text(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_names() {
        assert!(matches!("db_reference".parse::<EntityName>(), Ok(EntityName::DbReference)));
        assert!(matches!(
            "tissue_in_reference".parse::<EntityName>(),
            Ok(EntityName::TissueInReference)
        ));
        assert!("dbreference".parse::<EntityName>().is_err());
    }

    #[test]
    fn test_typed_value_follows_field_kind() {
        assert_eq!(typed_value::<Entry>("taxid", "9606").unwrap(), Value::Integer(9606));
        assert_eq!(typed_value::<Entry>("name", "9606").unwrap(), Value::Text("9606".into()));
        assert!(typed_value::<Entry>("taxid", "human").is_err());
    }

    #[test]
    fn test_split_filter_arg() {
        assert_eq!(split_filter_arg("gene_name=HTR2A").unwrap(), ("gene_name", "HTR2A"));
        assert_eq!(split_filter_arg("name=a=b").unwrap(), ("name", "a=b"));
        assert!(split_filter_arg("gene_name").is_err());
    }

    #[test]
    fn test_flags_override_configured_taxids() {
        let settings = Settings {
            database_url: ":memory:".to_string(),
            batch_size: 10,
            taxids: vec![9606],
        };
        let from_flags = taxid_filter(&[10090], &settings).unwrap();
        assert!(from_flags.contains(&10090) && !from_flags.contains(&9606));
        assert!(taxid_filter(&[], &settings).unwrap().contains(&9606));

        let empty = Settings { taxids: vec![], ..settings };
        assert!(taxid_filter(&[], &empty).is_none());
    }
}
