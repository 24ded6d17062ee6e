use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::schema::*;

/// Knowledgebase a record or release belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
pub enum Dataset {
    #[strum(serialize = "Swiss-Prot")]
    SwissProt,
    #[strum(serialize = "TrEMBL")]
    Trembl,
}

///////////////////////////////////////////////////////////////////////////////
// Rows

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable)]
#[diesel(table_name = entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Entry {
    pub id: i32,
    pub dataset: String,
    pub created: NaiveDate,
    pub modified: NaiveDate,
    pub version: i32,
    pub name: String,
    pub recommended_full_name: String,
    pub recommended_short_name: Option<String>,
    pub taxid: i32,
    pub gene_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = sequences)]
#[diesel(belongs_to(Entry))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Sequence {
    pub id: i32,
    pub entry_id: i32,
    pub sequence: String,
    pub length: Option<i32>,
    pub mass: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = accessions)]
#[diesel(belongs_to(Entry))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Accession {
    pub id: i32,
    pub entry_id: i32,
    pub accession: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = organism_hosts)]
#[diesel(belongs_to(Entry))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrganismHost {
    pub id: i32,
    pub entry_id: i32,
    pub taxid: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = features)]
#[diesel(belongs_to(Entry))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Feature {
    pub id: i32,
    pub entry_id: i32,
    pub type_: String,
    pub identifier: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = functions)]
#[diesel(belongs_to(Entry))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Function {
    pub id: i32,
    pub entry_id: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = ec_numbers)]
#[diesel(belongs_to(Entry))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EcNumber {
    pub id: i32,
    pub entry_id: i32,
    pub ec_number: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = db_references)]
#[diesel(belongs_to(Entry))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbReference {
    pub id: i32,
    pub entry_id: i32,
    pub type_: String,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = alternative_full_names)]
#[diesel(belongs_to(Entry))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AlternativeFullName {
    pub id: i32,
    pub entry_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = alternative_short_names)]
#[diesel(belongs_to(Entry))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AlternativeShortName {
    pub id: i32,
    pub entry_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = other_gene_names)]
#[diesel(belongs_to(Entry))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OtherGeneName {
    pub id: i32,
    pub entry_id: i32,
    pub type_: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = tissue_specificities)]
#[diesel(belongs_to(Entry))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TissueSpecificity {
    pub id: i32,
    pub entry_id: i32,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable)]
#[diesel(table_name = diseases)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Disease {
    pub id: i32,
    pub identifier: String,
    pub ref_id: Option<String>,
    pub ref_type: Option<String>,
    pub name: Option<String>,
    pub acronym: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable, Associations)]
#[diesel(table_name = disease_comments)]
#[diesel(belongs_to(Entry))]
#[diesel(belongs_to(Disease))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DiseaseComment {
    pub id: i32,
    pub entry_id: i32,
    pub disease_id: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable)]
#[diesel(table_name = pmids)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Pmid {
    pub id: i32,
    pub pmid: i32,
    pub last: Option<String>,
    pub first: Option<String>,
    pub volume: Option<i32>,
    pub name: Option<String>,
    pub date: Option<i32>,
    pub type_: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable)]
#[diesel(table_name = keywords)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Keyword {
    pub id: i32,
    pub identifier: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable)]
#[diesel(table_name = subcellular_locations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubcellularLocation {
    pub id: i32,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable)]
#[diesel(table_name = tissue_in_references)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TissueInReference {
    pub id: i32,
    pub tissue: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, QueryableByName, Identifiable)]
#[diesel(table_name = versions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Version {
    pub id: i32,
    pub knowledgebase: String,
    pub release_name: String,
    pub release_date: NaiveDate,
    pub import_start_date: Option<NaiveDateTime>,
    pub import_completed_date: Option<NaiveDateTime>,
}

///////////////////////////////////////////////////////////////////////////////
// Insertables

#[derive(Insertable)]
#[diesel(table_name = entries)]
#[diesel(treat_none_as_null = true)]
pub struct NewEntry<'a> {
    pub dataset: &'a str,
    pub created: NaiveDate,
    pub modified: NaiveDate,
    pub version: i32,
    pub name: &'a str,
    pub recommended_full_name: &'a str,
    pub recommended_short_name: Option<&'a str>,
    pub taxid: i32,
    pub gene_name: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = sequences)]
#[diesel(treat_none_as_null = true)]
pub struct NewSequence<'a> {
    pub entry_id: i32,
    pub sequence: &'a str,
    pub length: Option<i32>,
    pub mass: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = accessions)]
pub struct NewAccession<'a> {
    pub entry_id: i32,
    pub accession: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = organism_hosts)]
pub struct NewOrganismHost {
    pub entry_id: i32,
    pub taxid: i32,
}

#[derive(Insertable)]
#[diesel(table_name = features)]
#[diesel(treat_none_as_null = true)]
pub struct NewFeature<'a> {
    pub entry_id: i32,
    pub type_: &'a str,
    pub identifier: Option<&'a str>,
    pub description: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = functions)]
pub struct NewFunction<'a> {
    pub entry_id: i32,
    pub text: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = ec_numbers)]
pub struct NewEcNumber<'a> {
    pub entry_id: i32,
    pub ec_number: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = db_references)]
pub struct NewDbReference<'a> {
    pub entry_id: i32,
    pub type_: &'a str,
    pub identifier: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = alternative_full_names)]
pub struct NewAlternativeFullName<'a> {
    pub entry_id: i32,
    pub name: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = alternative_short_names)]
pub struct NewAlternativeShortName<'a> {
    pub entry_id: i32,
    pub name: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = other_gene_names)]
pub struct NewOtherGeneName<'a> {
    pub entry_id: i32,
    pub type_: &'a str,
    pub name: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = tissue_specificities)]
pub struct NewTissueSpecificity<'a> {
    pub entry_id: i32,
    pub comment: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = diseases)]
#[diesel(treat_none_as_null = true)]
pub struct NewDisease<'a> {
    pub identifier: &'a str,
    pub ref_id: Option<&'a str>,
    pub ref_type: Option<&'a str>,
    pub name: Option<&'a str>,
    pub acronym: Option<&'a str>,
    pub description: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = disease_comments)]
#[diesel(treat_none_as_null = true)]
pub struct NewDiseaseComment<'a> {
    pub entry_id: i32,
    pub disease_id: Option<i32>,
    pub comment: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = pmids)]
#[diesel(treat_none_as_null = true)]
pub struct NewPmid<'a> {
    pub pmid: i32,
    pub last: Option<&'a str>,
    pub first: Option<&'a str>,
    pub volume: Option<i32>,
    pub name: Option<&'a str>,
    pub date: Option<i32>,
    pub type_: Option<&'a str>,
    pub title: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = keywords)]
#[diesel(treat_none_as_null = true)]
pub struct NewKeyword<'a> {
    pub identifier: &'a str,
    pub name: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = subcellular_locations)]
pub struct NewSubcellularLocation<'a> {
    pub location: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = tissue_in_references)]
pub struct NewTissueInReference<'a> {
    pub tissue: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = entry_pmids)]
pub struct EntryPmid {
    pub entry_id: i32,
    pub pmid_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = entry_keywords)]
pub struct EntryKeyword {
    pub entry_id: i32,
    pub keyword_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = entry_subcellular_locations)]
pub struct EntrySubcellularLocation {
    pub entry_id: i32,
    pub subcellular_location_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = entry_tissue_in_references)]
pub struct EntryTissueInReference {
    pub entry_id: i32,
    pub tissue_in_reference_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = versions)]
#[diesel(treat_none_as_null = true)]
pub struct NewVersion<'a> {
    pub knowledgebase: &'a str,
    pub release_name: &'a str,
    pub release_date: NaiveDate,
    pub import_start_date: Option<NaiveDateTime>,
    pub import_completed_date: Option<NaiveDateTime>,
}
