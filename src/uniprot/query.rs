//! Parametrized read access to an imported store.
//!
//! Every queryable entity describes its filterable fields in a static table
//! ([`Entity::FIELDS`]). A field is either a column of the entity's own
//! table or a value reached through related tables, which the builder
//! turns into an `EXISTS` subquery. One generic builder, [`query`],
//! interprets those tables for every entity.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::Sqlite;
use polars::prelude::{DataFrame, PolarsError, PolarsResult};
use strum_macros::Display;
use thiserror::Error;

use crate::schema::*;
use crate::uniprot::models::*;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Unknown field '{field}' for {entity}")]
    UnknownField { entity: &'static str, field: String },

    #[error("Field '{field}' expects {expected} values")]
    KindMismatch { field: String, expected: Kind },

    #[error("Page numbers and page sizes start at 1")]
    InvalidPage,

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("DataFrame error: {0}")]
    Frame(#[from] PolarsError),
}

/// Value kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    Integer,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Exact(Value),
    /// SQL `LIKE` pattern, `%` and `_` as wildcards.
    Like(String),
    AnyOf(Vec<Value>),
}

impl Filter {
    pub fn exact(value: impl Into<Value>) -> Self {
        Filter::Exact(value.into())
    }

    pub fn like(pattern: impl Into<String>) -> Self {
        Filter::Like(pattern.into())
    }

    pub fn any_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Filter::AnyOf(values.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u32),
    /// 1-based page of `page_size` rows.
    Page { page: u32, page_size: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    #[default]
    Rows,
    Frame,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<(String, Filter)>,
    pub limit: Option<Limit>,
    pub output: Output,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, filter: Filter) -> Self {
        self.filters.push((field.into(), filter));
        self
    }

    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }
}

#[derive(Debug)]
pub enum QueryOutput<T> {
    Rows(Vec<T>),
    Frame(DataFrame),
}

impl<T> QueryOutput<T> {
    pub fn len(&self) -> usize {
        match self {
            QueryOutput::Rows(rows) => rows.len(),
            QueryOutput::Frame(frame) => frame.height(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_rows(self) -> Option<Vec<T>> {
        match self {
            QueryOutput::Rows(rows) => Some(rows),
            QueryOutput::Frame(_) => None,
        }
    }

    pub fn into_frame(self) -> Option<DataFrame> {
        match self {
            QueryOutput::Frame(frame) => Some(frame),
            QueryOutput::Rows(_) => None,
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
// Field tables

/// A filterable field. `related` holds the `FROM ... WHERE ...` part of a
/// correlated subquery (the queried row is aliased `t`); `column` is then
/// evaluated inside it.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: Kind,
    pub related: Option<&'static str>,
}

const fn own(name: &'static str, column: &'static str, kind: Kind) -> Field {
    Field {
        name,
        column,
        kind,
        related: None,
    }
}

const fn via(name: &'static str, related: &'static str, column: &'static str, kind: Kind) -> Field {
    Field {
        name,
        column,
        kind,
        related: Some(related),
    }
}

const ID: Field = own("id", "t.id", Kind::Integer);

const OWNER_NAME: Field = via("entry_name", "entries e WHERE e.id = t.entry_id", "e.name", Kind::Text);

/// A table that can be read through [`query`].
pub trait Entity: QueryableByName<Sqlite> + Sized + 'static {
    const TABLE: &'static str;
    const FIELDS: &'static [Field];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame>;

    fn field(name: &str) -> Option<&'static Field> {
        if name == ID.name {
            return Some(&ID);
        }
        Self::FIELDS.iter().find(|field| field.name == name)
    }
}

macro_rules! frame {
    ($rows:expr, { $($column:literal => |$row:ident| $value:expr),+ $(,)? }) => {
        polars::df!($($column => $rows.iter().map(|$row| $value).collect::<Vec<_>>()),+)
    };
}

impl Entity for Entry {
    const TABLE: &'static str = "entries";
    const FIELDS: &'static [Field] = &[
        own("name", "t.name", Kind::Text),
        own("dataset", "t.dataset", Kind::Text),
        own("created", "t.created", Kind::Text),
        own("modified", "t.modified", Kind::Text),
        own("recommended_full_name", "t.recommended_full_name", Kind::Text),
        own("recommended_short_name", "t.recommended_short_name", Kind::Text),
        own("gene_name", "t.gene_name", Kind::Text),
        own("taxid", "t.taxid", Kind::Integer),
        own("version", "t.version", Kind::Integer),
        via("accession", "accessions r WHERE r.entry_id = t.id", "r.accession", Kind::Text),
        via("organism_host", "organism_hosts r WHERE r.entry_id = t.id", "r.taxid", Kind::Integer),
        via("feature_type", "features r WHERE r.entry_id = t.id", "r.type", Kind::Text),
        via("function", "functions r WHERE r.entry_id = t.id", "r.text", Kind::Text),
        via("ec_number", "ec_numbers r WHERE r.entry_id = t.id", "r.ec_number", Kind::Text),
        via("db_reference", "db_references r WHERE r.entry_id = t.id", "r.identifier", Kind::Text),
        via("alternative_name", "alternative_full_names r WHERE r.entry_id = t.id", "r.name", Kind::Text),
        via("other_gene_name", "other_gene_names r WHERE r.entry_id = t.id", "r.name", Kind::Text),
        via("disease_comment", "disease_comments r WHERE r.entry_id = t.id", "r.comment", Kind::Text),
        via(
            "disease_name",
            "disease_comments j JOIN diseases r ON r.id = j.disease_id WHERE j.entry_id = t.id",
            "r.name",
            Kind::Text,
        ),
        via("tissue_specificity", "tissue_specificities r WHERE r.entry_id = t.id", "r.comment", Kind::Text),
        via(
            "pmid",
            "entry_pmids j JOIN pmids r ON r.id = j.pmid_id WHERE j.entry_id = t.id",
            "r.pmid",
            Kind::Integer,
        ),
        via(
            "keyword",
            "entry_keywords j JOIN keywords r ON r.id = j.keyword_id WHERE j.entry_id = t.id",
            "r.identifier",
            Kind::Text,
        ),
        via(
            "keyword_name",
            "entry_keywords j JOIN keywords r ON r.id = j.keyword_id WHERE j.entry_id = t.id",
            "r.name",
            Kind::Text,
        ),
        via(
            "subcellular_location",
            "entry_subcellular_locations j JOIN subcellular_locations r \
             ON r.id = j.subcellular_location_id WHERE j.entry_id = t.id",
            "r.location",
            Kind::Text,
        ),
        via(
            "tissue_in_reference",
            "entry_tissue_in_references j JOIN tissue_in_references r \
             ON r.id = j.tissue_in_reference_id WHERE j.entry_id = t.id",
            "r.tissue",
            Kind::Text,
        ),
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "dataset" => |r| r.dataset.clone(),
            "created" => |r| r.created.to_string(),
            "modified" => |r| r.modified.to_string(),
            "version" => |r| r.version,
            "name" => |r| r.name.clone(),
            "recommended_full_name" => |r| r.recommended_full_name.clone(),
            "recommended_short_name" => |r| r.recommended_short_name.clone(),
            "taxid" => |r| r.taxid,
            "gene_name" => |r| r.gene_name.clone(),
        })
    }
}

impl Entity for Sequence {
    const TABLE: &'static str = "sequences";
    const FIELDS: &'static [Field] = &[
        own("sequence", "t.sequence", Kind::Text),
        own("length", "t.length", Kind::Integer),
        own("mass", "t.mass", Kind::Integer),
        OWNER_NAME,
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "sequence" => |r| r.sequence.clone(),
            "length" => |r| r.length,
            "mass" => |r| r.mass,
        })
    }
}

impl Entity for Accession {
    const TABLE: &'static str = "accessions";
    const FIELDS: &'static [Field] = &[own("accession", "t.accession", Kind::Text), OWNER_NAME];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "accession" => |r| r.accession.clone(),
        })
    }
}

impl Entity for OrganismHost {
    const TABLE: &'static str = "organism_hosts";
    const FIELDS: &'static [Field] = &[own("taxid", "t.taxid", Kind::Integer), OWNER_NAME];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "taxid" => |r| r.taxid,
        })
    }
}

impl Entity for Feature {
    const TABLE: &'static str = "features";
    const FIELDS: &'static [Field] = &[
        own("type", "t.type", Kind::Text),
        own("identifier", "t.identifier", Kind::Text),
        own("description", "t.description", Kind::Text),
        OWNER_NAME,
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "type" => |r| r.type_.clone(),
            "identifier" => |r| r.identifier.clone(),
            "description" => |r| r.description.clone(),
        })
    }
}

impl Entity for Function {
    const TABLE: &'static str = "functions";
    const FIELDS: &'static [Field] = &[own("text", "t.text", Kind::Text), OWNER_NAME];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "text" => |r| r.text.clone(),
        })
    }
}

impl Entity for EcNumber {
    const TABLE: &'static str = "ec_numbers";
    const FIELDS: &'static [Field] = &[own("ec_number", "t.ec_number", Kind::Text), OWNER_NAME];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "ec_number" => |r| r.ec_number.clone(),
        })
    }
}

impl Entity for DbReference {
    const TABLE: &'static str = "db_references";
    const FIELDS: &'static [Field] = &[
        own("type", "t.type", Kind::Text),
        own("identifier", "t.identifier", Kind::Text),
        OWNER_NAME,
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "type" => |r| r.type_.clone(),
            "identifier" => |r| r.identifier.clone(),
        })
    }
}

impl Entity for AlternativeFullName {
    const TABLE: &'static str = "alternative_full_names";
    const FIELDS: &'static [Field] = &[own("name", "t.name", Kind::Text), OWNER_NAME];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "name" => |r| r.name.clone(),
        })
    }
}

impl Entity for AlternativeShortName {
    const TABLE: &'static str = "alternative_short_names";
    const FIELDS: &'static [Field] = &[own("name", "t.name", Kind::Text), OWNER_NAME];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "name" => |r| r.name.clone(),
        })
    }
}

impl Entity for OtherGeneName {
    const TABLE: &'static str = "other_gene_names";
    const FIELDS: &'static [Field] = &[
        own("type", "t.type", Kind::Text),
        own("name", "t.name", Kind::Text),
        OWNER_NAME,
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "type" => |r| r.type_.clone(),
            "name" => |r| r.name.clone(),
        })
    }
}

impl Entity for TissueSpecificity {
    const TABLE: &'static str = "tissue_specificities";
    const FIELDS: &'static [Field] = &[own("comment", "t.comment", Kind::Text), OWNER_NAME];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "comment" => |r| r.comment.clone(),
        })
    }
}

impl Entity for Disease {
    const TABLE: &'static str = "diseases";
    const FIELDS: &'static [Field] = &[
        own("identifier", "t.identifier", Kind::Text),
        own("ref_id", "t.ref_id", Kind::Text),
        own("ref_type", "t.ref_type", Kind::Text),
        own("name", "t.name", Kind::Text),
        own("acronym", "t.acronym", Kind::Text),
        own("description", "t.description", Kind::Text),
        via(
            "entry_name",
            "disease_comments j JOIN entries e ON e.id = j.entry_id WHERE j.disease_id = t.id",
            "e.name",
            Kind::Text,
        ),
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "identifier" => |r| r.identifier.clone(),
            "ref_id" => |r| r.ref_id.clone(),
            "ref_type" => |r| r.ref_type.clone(),
            "name" => |r| r.name.clone(),
            "acronym" => |r| r.acronym.clone(),
            "description" => |r| r.description.clone(),
        })
    }
}

impl Entity for DiseaseComment {
    const TABLE: &'static str = "disease_comments";
    const FIELDS: &'static [Field] = &[
        own("comment", "t.comment", Kind::Text),
        via("disease_name", "diseases d WHERE d.id = t.disease_id", "d.name", Kind::Text),
        OWNER_NAME,
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "entry_id" => |r| r.entry_id,
            "disease_id" => |r| r.disease_id,
            "comment" => |r| r.comment.clone(),
        })
    }
}

impl Entity for Pmid {
    const TABLE: &'static str = "pmids";
    const FIELDS: &'static [Field] = &[
        own("pmid", "t.pmid", Kind::Integer),
        own("last", "t.last", Kind::Text),
        own("first", "t.first", Kind::Text),
        own("volume", "t.volume", Kind::Integer),
        own("name", "t.name", Kind::Text),
        own("date", "t.date", Kind::Integer),
        own("type", "t.type", Kind::Text),
        own("title", "t.title", Kind::Text),
        via(
            "entry_name",
            "entry_pmids j JOIN entries e ON e.id = j.entry_id WHERE j.pmid_id = t.id",
            "e.name",
            Kind::Text,
        ),
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "pmid" => |r| r.pmid,
            "last" => |r| r.last.clone(),
            "first" => |r| r.first.clone(),
            "volume" => |r| r.volume,
            "name" => |r| r.name.clone(),
            "date" => |r| r.date,
            "type" => |r| r.type_.clone(),
            "title" => |r| r.title.clone(),
        })
    }
}

impl Entity for Keyword {
    const TABLE: &'static str = "keywords";
    const FIELDS: &'static [Field] = &[
        own("identifier", "t.identifier", Kind::Text),
        own("name", "t.name", Kind::Text),
        via(
            "entry_name",
            "entry_keywords j JOIN entries e ON e.id = j.entry_id WHERE j.keyword_id = t.id",
            "e.name",
            Kind::Text,
        ),
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "identifier" => |r| r.identifier.clone(),
            "name" => |r| r.name.clone(),
        })
    }
}

impl Entity for SubcellularLocation {
    const TABLE: &'static str = "subcellular_locations";
    const FIELDS: &'static [Field] = &[
        own("location", "t.location", Kind::Text),
        via(
            "entry_name",
            "entry_subcellular_locations j JOIN entries e ON e.id = j.entry_id \
             WHERE j.subcellular_location_id = t.id",
            "e.name",
            Kind::Text,
        ),
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "location" => |r| r.location.clone(),
        })
    }
}

impl Entity for TissueInReference {
    const TABLE: &'static str = "tissue_in_references";
    const FIELDS: &'static [Field] = &[
        own("tissue", "t.tissue", Kind::Text),
        via(
            "entry_name",
            "entry_tissue_in_references j JOIN entries e ON e.id = j.entry_id \
             WHERE j.tissue_in_reference_id = t.id",
            "e.name",
            Kind::Text,
        ),
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "tissue" => |r| r.tissue.clone(),
        })
    }
}

impl Entity for Version {
    const TABLE: &'static str = "versions";
    const FIELDS: &'static [Field] = &[
        own("knowledgebase", "t.knowledgebase", Kind::Text),
        own("release_name", "t.release_name", Kind::Text),
        own("release_date", "t.release_date", Kind::Text),
        own("import_start_date", "t.import_start_date", Kind::Text),
        own("import_completed_date", "t.import_completed_date", Kind::Text),
    ];

    fn frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        frame!(rows, {
            "id" => |r| r.id,
            "knowledgebase" => |r| r.knowledgebase.clone(),
            "release_name" => |r| r.release_name.clone(),
            "release_date" => |r| r.release_date.to_string(),
            "import_start_date" => |r| r.import_start_date.map(|d| d.to_string()),
            "import_completed_date" => |r| r.import_completed_date.map(|d| d.to_string()),
        })
    }
}

///////////////////////////////////////////////////////////////////////////////
// Builder

type BoxedQuery = diesel::query_builder::BoxedSqlQuery<'static, Sqlite, diesel::query_builder::SqlQuery>;

fn bind_value(sql: BoxedQuery, field: &Field, value: &Value) -> Result<BoxedQuery, QueryError> {
    match (field.kind, value) {
        (Kind::Integer, Value::Integer(v)) => Ok(sql.bind::<BigInt, _>(*v)),
        (Kind::Text, Value::Text(v)) => Ok(sql.bind::<Text, _>(v.clone())),
        (expected, _) => Err(QueryError::KindMismatch {
            field: field.name.to_string(),
            expected,
        }),
    }
}

fn push_predicate(mut sql: BoxedQuery, field: &Field, filter: &Filter) -> Result<BoxedQuery, QueryError> {
    sql = match field.related {
        Some(related) => sql.sql(format!(" AND EXISTS (SELECT 1 FROM {related} AND {}", field.column)),
        None => sql.sql(format!(" AND {}", field.column)),
    };

    sql = match filter {
        Filter::Exact(value) => bind_value(sql.sql(" = ?"), field, value)?,
        Filter::Like(pattern) => {
            if field.kind != Kind::Text {
                return Err(QueryError::KindMismatch {
                    field: field.name.to_string(),
                    expected: field.kind,
                });
            }
            sql.sql(" LIKE ?").bind::<Text, _>(pattern.clone())
        }
        Filter::AnyOf(values) if values.is_empty() => sql.sql(" IS NULL AND 1 = 0"),
        Filter::AnyOf(values) => {
            sql = sql.sql(" IN (");
            for (index, value) in values.iter().enumerate() {
                if index > 0 {
                    sql = sql.sql(", ");
                }
                sql = bind_value(sql.sql("?"), field, value)?;
            }
            sql.sql(")")
        }
    };

    if field.related.is_some() {
        sql = sql.sql(")");
    }
    Ok(sql)
}

/// Runs `query` against the table of `T`, ordered by id.
pub fn query<T: Entity>(
    connection: &mut SqliteConnection,
    query: &Query,
) -> Result<QueryOutput<T>, QueryError> {
    let mut sql = diesel::sql_query(format!("SELECT t.* FROM {} t WHERE 1 = 1", T::TABLE))
        .into_boxed::<Sqlite>();

    for (name, filter) in &query.filters {
        let field = T::field(name).ok_or_else(|| QueryError::UnknownField {
            entity: T::TABLE,
            field: name.clone(),
        })?;
        sql = push_predicate(sql, field, filter)?;
    }

    sql = sql.sql(" ORDER BY t.id");
    sql = match query.limit {
        None => sql,
        Some(Limit::Count(count)) => sql.sql(" LIMIT ?").bind::<BigInt, _>(i64::from(count)),
        Some(Limit::Page { page: 0, .. } | Limit::Page { page_size: 0, .. }) => {
            return Err(QueryError::InvalidPage)
        }
        Some(Limit::Page { page, page_size }) => sql
            .sql(" LIMIT ? OFFSET ?")
            .bind::<BigInt, _>(i64::from(page_size))
            .bind::<BigInt, _>(i64::from(page - 1) * i64::from(page_size)),
    };

    let rows: Vec<T> = sql.load(connection)?;
    match query.output {
        Output::Rows => Ok(QueryOutput::Rows(rows)),
        Output::Frame => Ok(QueryOutput::Frame(T::frame(&rows)?)),
    }
}

///////////////////////////////////////////////////////////////////////////////
// Distinct values and relationships

pub fn taxids(connection: &mut SqliteConnection) -> QueryResult<Vec<i32>> {
    entries::table
        .select(entries::taxid)
        .distinct()
        .order(entries::taxid)
        .load(connection)
}

pub fn datasets(connection: &mut SqliteConnection) -> QueryResult<Vec<String>> {
    entries::table
        .select(entries::dataset)
        .distinct()
        .order(entries::dataset)
        .load(connection)
}

pub fn feature_types(connection: &mut SqliteConnection) -> QueryResult<Vec<String>> {
    features::table
        .select(features::type_)
        .distinct()
        .order(features::type_)
        .load(connection)
}

pub fn db_reference_types(connection: &mut SqliteConnection) -> QueryResult<Vec<String>> {
    db_references::table
        .select(db_references::type_)
        .distinct()
        .order(db_references::type_)
        .load(connection)
}

pub fn disease_names(connection: &mut SqliteConnection) -> QueryResult<Vec<String>> {
    diseases::table
        .select(diseases::name)
        .filter(diseases::name.is_not_null())
        .distinct()
        .order(diseases::name)
        .load::<Option<String>>(connection)
        .map(|names| names.into_iter().flatten().collect())
}

pub fn subcellular_locations(connection: &mut SqliteConnection) -> QueryResult<Vec<SubcellularLocation>> {
    subcellular_locations::table
        .select(SubcellularLocation::as_select())
        .order(subcellular_locations::id)
        .load(connection)
}

pub fn tissues_in_references(connection: &mut SqliteConnection) -> QueryResult<Vec<TissueInReference>> {
    tissue_in_references::table
        .select(TissueInReference::as_select())
        .order(tissue_in_references::id)
        .load(connection)
}

pub fn keywords(connection: &mut SqliteConnection) -> QueryResult<Vec<Keyword>> {
    keywords::table
        .select(Keyword::as_select())
        .order(keywords::id)
        .load(connection)
}

pub fn entry_by_name(connection: &mut SqliteConnection, name: &str) -> QueryResult<Option<Entry>> {
    entries::table
        .filter(entries::name.eq(name))
        .select(Entry::as_select())
        .first(connection)
        .optional()
}

/// Accessions of `entry` in document order; the first is the primary one.
pub fn accessions_of(connection: &mut SqliteConnection, entry: &Entry) -> QueryResult<Vec<String>> {
    Accession::belonging_to(entry)
        .select(accessions::accession)
        .order(accessions::id)
        .load(connection)
}

pub fn sequence_of(connection: &mut SqliteConnection, entry: &Entry) -> QueryResult<Sequence> {
    Sequence::belonging_to(entry)
        .select(Sequence::as_select())
        .first(connection)
}

pub fn pmids_of(connection: &mut SqliteConnection, entry: &Entry) -> QueryResult<Vec<Pmid>> {
    entry_pmids::table
        .inner_join(pmids::table)
        .filter(entry_pmids::entry_id.eq(entry.id))
        .select(Pmid::as_select())
        .order(pmids::id)
        .load(connection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniprot::store::{create_schema, establish_connection};
    use assert_matches::assert_matches;

    fn connection() -> SqliteConnection {
        let mut connection = establish_connection(":memory:").unwrap();
        create_schema(&mut connection).unwrap();
        connection
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut connection = connection();
        let query = Query::new().filter("colour", Filter::exact("red"));
        assert_matches!(
            super::query::<Entry>(&mut connection, &query),
            Err(QueryError::UnknownField { entity: "entries", field }) if field == "colour"
        );
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let mut connection = connection();

        let query = Query::new().filter("taxid", Filter::exact("9606"));
        assert_matches!(
            super::query::<Entry>(&mut connection, &query),
            Err(QueryError::KindMismatch { expected: Kind::Integer, .. })
        );

        let query = Query::new().filter("pmid", Filter::like("77%"));
        assert_matches!(
            super::query::<Entry>(&mut connection, &query),
            Err(QueryError::KindMismatch { .. })
        );

        let query = Query::new().filter("accession", Filter::any_of([1, 2]));
        assert_matches!(
            super::query::<Entry>(&mut connection, &query),
            Err(QueryError::KindMismatch { expected: Kind::Text, .. })
        );
    }

    #[test]
    fn test_page_zero_is_rejected() {
        let mut connection = connection();
        let query = Query::new().limit(Limit::Page { page: 0, page_size: 10 });
        assert_matches!(
            super::query::<Keyword>(&mut connection, &query),
            Err(QueryError::InvalidPage)
        );
    }

    #[test]
    fn test_empty_store_yields_empty_frame() {
        let mut connection = connection();
        let query = Query::new()
            .filter("entry_name", Filter::any_of(Vec::<String>::new()))
            .output(Output::Frame);
        let frame = super::query::<Accession>(&mut connection, &query)
            .unwrap()
            .into_frame()
            .unwrap();
        assert_eq!(frame.height(), 0);
        assert_eq!(frame.width(), 3);
    }

    #[test]
    fn test_every_field_table_is_valid_sql() {
        let mut connection = connection();

        fn check_fields<T: Entity>(connection: &mut SqliteConnection) {
            for field in T::FIELDS {
                let filter = match field.kind {
                    Kind::Integer => Filter::exact(1),
                    Kind::Text => Filter::like("%"),
                };
                let query = Query::new().filter(field.name, filter);
                let rows = super::query::<T>(connection, &query).unwrap();
                assert!(rows.is_empty(), "{}.{}", T::TABLE, field.name);
            }
        }

        check_fields::<Entry>(&mut connection);
        check_fields::<Sequence>(&mut connection);
        check_fields::<Accession>(&mut connection);
        check_fields::<OrganismHost>(&mut connection);
        check_fields::<Feature>(&mut connection);
        check_fields::<Function>(&mut connection);
        check_fields::<EcNumber>(&mut connection);
        check_fields::<DbReference>(&mut connection);
        check_fields::<AlternativeFullName>(&mut connection);
        check_fields::<AlternativeShortName>(&mut connection);
        check_fields::<OtherGeneName>(&mut connection);
        check_fields::<TissueSpecificity>(&mut connection);
        check_fields::<Disease>(&mut connection);
        check_fields::<DiseaseComment>(&mut connection);
        check_fields::<Pmid>(&mut connection);
        check_fields::<Keyword>(&mut connection);
        check_fields::<SubcellularLocation>(&mut connection);
        check_fields::<TissueInReference>(&mut connection);
        check_fields::<Version>(&mut connection);
    }
}
