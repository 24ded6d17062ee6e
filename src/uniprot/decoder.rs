//! Decodes one `<entry>` subtree into typed records.
//!
//! Decoding is a pure function of the subtree: shared entities (citations,
//! keywords, locations, tissues, diseases) are carried as natural-key
//! payloads and resolved against the store by the batch writer.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::uniprot::element::{optional_text, Element};
use crate::uniprot::models::Dataset;

/// Stored in place of a citation volume that is not a number.
pub const UNKNOWN_VOLUME: i32 = -1;

const DATE_FORMAT: &str = "%Y-%m-%d";
const NCBI_TAXONOMY: &str = "NCBI Taxonomy";
const PUBMED: &str = "PubMed";

#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("<{0}> is missing required element <{1}>")]
    MissingElement(&'static str, &'static str),

    #[error("<{0}> is missing required attribute '{1}'")]
    MissingAttribute(&'static str, &'static str),

    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },

    #[error("expected an <entry> element, found <{0}>")]
    NotAnEntry(String),
}

/// Set of NCBI taxonomy ids an import is restricted to.
pub type TaxidFilter = HashSet<i32>;

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEntry {
    pub dataset: Dataset,
    pub created: NaiveDate,
    pub modified: NaiveDate,
    pub version: i32,
    pub name: String,
    pub recommended_full_name: String,
    pub recommended_short_name: Option<String>,
    pub taxid: i32,
    pub gene_name: Option<String>,
    pub sequence: SequenceRecord,
    pub accessions: Vec<String>,
    pub organism_hosts: Vec<i32>,
    pub features: Vec<FeatureRecord>,
    pub functions: Vec<String>,
    pub ec_numbers: Vec<String>,
    pub db_references: Vec<DbReferenceRecord>,
    pub alternative_full_names: Vec<String>,
    pub alternative_short_names: Vec<String>,
    pub other_gene_names: Vec<GeneNameRecord>,
    pub tissue_specificities: Vec<String>,
    pub citations: Vec<Citation>,
    pub disease_comments: Vec<DiseaseCommentRecord>,
    pub keywords: Vec<KeywordRecord>,
    pub subcellular_locations: Vec<String>,
    pub tissues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRecord {
    pub sequence: String,
    pub length: Option<i32>,
    pub mass: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub type_: String,
    pub identifier: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbReferenceRecord {
    pub type_: String,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneNameRecord {
    pub type_: String,
    pub name: String,
}

/// Literature reference keyed by PubMed id.
#[derive(Debug, Clone, PartialEq)]
pub struct Citation {
    pub pmid: i32,
    pub type_: Option<String>,
    pub name: Option<String>,
    pub date: Option<i32>,
    pub volume: Option<i32>,
    pub first: Option<String>,
    pub last: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseRecord {
    pub identifier: String,
    pub name: Option<String>,
    pub acronym: Option<String>,
    pub description: Option<String>,
    pub ref_id: Option<String>,
    pub ref_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseCommentRecord {
    pub comment: Option<String>,
    pub disease: Option<DiseaseRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRecord {
    pub identifier: String,
    pub name: Option<String>,
}

/// Decodes an entry, or returns `Ok(None)` when its taxonomy id is
/// excluded by `taxids`.
pub fn decode(
    entry: &Element,
    taxids: Option<&TaxidFilter>,
) -> Result<Option<DecodedEntry>, DecodeError> {
    if entry.name != "entry" {
        return Err(DecodeError::NotAnEntry(entry.name.clone()));
    }

    let taxid = get_taxid(entry)?;
    if let Some(filter) = taxids {
        if !filter.is_empty() && !filter.contains(&taxid) {
            return Ok(None);
        }
    }

    let (recommended_full_name, recommended_short_name) = get_recommended_protein_name(entry)?;

    Ok(Some(DecodedEntry {
        dataset: parse_attribute(entry, "dataset")?,
        created: get_date(entry, "created")?,
        modified: get_date(entry, "modified")?,
        version: parse_attribute(entry, "version")?,
        name: get_entry_name(entry)?,
        recommended_full_name,
        recommended_short_name,
        taxid,
        gene_name: get_gene_name(entry),
        sequence: get_sequence(entry)?,
        accessions: get_accessions(entry)?,
        organism_hosts: get_organism_hosts(entry)?,
        features: get_features(entry)?,
        functions: get_comment_texts(entry, "function"),
        ec_numbers: texts(entry.find_all(&["protein", "recommendedName", "ecNumber"])),
        db_references: get_db_references(entry)?,
        alternative_full_names: texts(entry.find_all(&["protein", "alternativeName", "fullName"])),
        alternative_short_names: texts(entry.find_all(&["protein", "alternativeName", "shortName"])),
        other_gene_names: get_other_gene_names(entry),
        tissue_specificities: get_comment_texts(entry, "tissue specificity"),
        citations: get_citations(entry)?,
        disease_comments: get_disease_comments(entry)?,
        keywords: get_keywords(entry)?,
        subcellular_locations: unique_texts(
            entry.find_all(&["comment", "subcellularLocation", "location"]),
        ),
        tissues: unique_texts(entry.find_all(&["reference", "source", "tissue"])),
    }))
}

///////////////////////////////////////////////////////////////////////////////

fn required_attr<'a>(
    element: &'a Element,
    element_name: &'static str,
    key: &'static str,
) -> Result<&'a str, DecodeError> {
    element
        .attr(key)
        .ok_or(DecodeError::MissingAttribute(element_name, key))
}

fn parse_value<T: FromStr>(field: &'static str, value: &str) -> Result<T, DecodeError> {
    value.trim().parse().map_err(|_| DecodeError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn parse_attribute<T: FromStr>(entry: &Element, key: &'static str) -> Result<T, DecodeError> {
    parse_value(key, required_attr(entry, "entry", key)?)
}

fn get_date(entry: &Element, key: &'static str) -> Result<NaiveDate, DecodeError> {
    let value = required_attr(entry, "entry", key)?;
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DecodeError::InvalidValue {
        field: key,
        value: value.to_string(),
    })
}

fn texts(elements: Vec<&Element>) -> Vec<String> {
    elements
        .into_iter()
        .filter_map(|e| optional_text(Some(e)))
        .collect()
}

/// Text values with duplicates removed, first occurrence kept.
fn unique_texts(elements: Vec<&Element>) -> Vec<String> {
    let mut seen = HashSet::new();
    texts(elements)
        .into_iter()
        .filter(|text| seen.insert(text.clone()))
        .collect()
}

fn is_type(element: &Element, type_: &str) -> bool {
    element.attr("type") == Some(type_)
}

fn get_taxid(entry: &Element) -> Result<i32, DecodeError> {
    let reference = entry
        .children("organism")
        .flat_map(|organism| organism.children("dbReference"))
        .find(|r| is_type(r, NCBI_TAXONOMY))
        .ok_or(DecodeError::MissingElement("organism", "dbReference"))?;
    parse_value("taxid", required_attr(reference, "dbReference", "id")?)
}

fn get_entry_name(entry: &Element) -> Result<String, DecodeError> {
    optional_text(entry.child("name")).ok_or(DecodeError::MissingElement("entry", "name"))
}

fn get_recommended_protein_name(
    entry: &Element,
) -> Result<(String, Option<String>), DecodeError> {
    let full_name = optional_text(entry.find(&["protein", "recommendedName", "fullName"]))
        .ok_or(DecodeError::MissingElement("recommendedName", "fullName"))?;
    let short_name = optional_text(entry.find(&["protein", "recommendedName", "shortName"]));
    Ok((full_name, short_name))
}

fn get_gene_name(entry: &Element) -> Option<String> {
    let primary = entry
        .find_all(&["gene", "name"])
        .into_iter()
        .find(|name| is_type(name, "primary"));
    optional_text(primary)
}

fn get_other_gene_names(entry: &Element) -> Vec<GeneNameRecord> {
    entry
        .find_all(&["gene", "name"])
        .into_iter()
        .filter(|name| !is_type(name, "primary"))
        .filter_map(|name| {
            Some(GeneNameRecord {
                type_: name.attr("type").unwrap_or_default().to_string(),
                name: name.text()?.to_string(),
            })
        })
        .collect()
}

fn get_sequence(entry: &Element) -> Result<SequenceRecord, DecodeError> {
    let element = entry
        .child("sequence")
        .ok_or(DecodeError::MissingElement("entry", "sequence"))?;
    let sequence: String = element.text.chars().filter(|c| !c.is_whitespace()).collect();
    let length = element.attr("length").map(|v| parse_value("sequence length", v)).transpose()?;
    let mass = element.attr("mass").map(|v| parse_value("sequence mass", v)).transpose()?;
    Ok(SequenceRecord {
        sequence,
        length,
        mass,
    })
}

fn get_accessions(entry: &Element) -> Result<Vec<String>, DecodeError> {
    let accessions = texts(entry.children("accession").collect());
    if accessions.is_empty() {
        return Err(DecodeError::MissingElement("entry", "accession"));
    }
    Ok(accessions)
}

fn get_organism_hosts(entry: &Element) -> Result<Vec<i32>, DecodeError> {
    entry
        .find_all(&["organismHost", "dbReference"])
        .into_iter()
        .filter(|r| is_type(r, NCBI_TAXONOMY))
        .map(|r| parse_value("organism host taxid", required_attr(r, "dbReference", "id")?))
        .collect()
}

fn get_features(entry: &Element) -> Result<Vec<FeatureRecord>, DecodeError> {
    entry
        .children("feature")
        .map(|feature| {
            Ok(FeatureRecord {
                type_: required_attr(feature, "feature", "type")?.to_string(),
                identifier: feature.attr("id").map(str::to_string),
                description: feature.attr("description").map(str::to_string),
            })
        })
        .collect()
}

/// Text of every `comment[@type=kind]/text`.
fn get_comment_texts(entry: &Element, kind: &str) -> Vec<String> {
    let elements = entry
        .children("comment")
        .filter(|comment| is_type(comment, kind))
        .flat_map(|comment| comment.children("text"))
        .collect();
    texts(elements)
}

fn get_db_references(entry: &Element) -> Result<Vec<DbReferenceRecord>, DecodeError> {
    entry
        .children("dbReference")
        .map(|reference| {
            Ok(DbReferenceRecord {
                type_: required_attr(reference, "dbReference", "type")?.to_string(),
                identifier: required_attr(reference, "dbReference", "id")?.to_string(),
            })
        })
        .collect()
}

fn get_citations(entry: &Element) -> Result<Vec<Citation>, DecodeError> {
    let mut seen = HashSet::new();
    let mut citations = Vec::new();

    for citation in entry.find_all(&["reference", "citation"]) {
        let Some(pubmed) = citation.children("dbReference").find(|r| is_type(r, PUBMED)) else {
            continue;
        };
        let pmid: i32 = parse_value("pmid", required_attr(pubmed, "dbReference", "id")?)?;
        if !seen.insert(pmid) {
            continue;
        }
        citations.push(Citation {
            pmid,
            type_: citation.attr("type").map(str::to_string),
            name: citation.attr("name").map(str::to_string),
            date: citation.attr("date").and_then(parse_year),
            volume: citation.attr("volume").map(parse_volume),
            first: citation.attr("first").map(str::to_string),
            last: citation.attr("last").map(str::to_string),
            title: optional_text(citation.child("title")),
        });
    }

    Ok(citations)
}

/// Year prefix of a citation date such as `1995` or `1995-06`.
fn parse_year(date: &str) -> Option<i32> {
    date.get(..4).and_then(|year| year.parse().ok())
}

fn parse_volume(volume: &str) -> i32 {
    volume.trim().parse().unwrap_or(UNKNOWN_VOLUME)
}

fn get_disease_comments(entry: &Element) -> Result<Vec<DiseaseCommentRecord>, DecodeError> {
    entry
        .children("comment")
        .filter(|comment| is_type(comment, "disease"))
        .map(|comment| {
            let disease = comment.child("disease").map(get_disease).transpose()?;
            Ok(DiseaseCommentRecord {
                comment: optional_text(comment.child("text")),
                disease,
            })
        })
        .collect()
}

fn get_disease(disease: &Element) -> Result<DiseaseRecord, DecodeError> {
    let reference = disease.child("dbReference");
    Ok(DiseaseRecord {
        identifier: required_attr(disease, "disease", "id")?.to_string(),
        name: optional_text(disease.child("name")),
        acronym: optional_text(disease.child("acronym")),
        description: optional_text(disease.child("description")),
        ref_id: reference.and_then(|r| r.attr("id")).map(str::to_string),
        ref_type: reference.and_then(|r| r.attr("type")).map(str::to_string),
    })
}

fn get_keywords(entry: &Element) -> Result<Vec<KeywordRecord>, DecodeError> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    for keyword in entry.children("keyword") {
        let identifier = required_attr(keyword, "keyword", "id")?;
        if seen.insert(identifier) {
            keywords.push(KeywordRecord {
                identifier: identifier.to_string(),
                name: keyword.text().map(str::to_string),
            });
        }
    }
    Ok(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniprot::parser::EntryReader;
    use assert_matches::assert_matches;

    const ENTRY: &str = r#"<uniprot xmlns="http://uniprot.org/uniprot">
<entry dataset="Swiss-Prot" created="1996-10-01" modified="2017-05-10" version="111">
  <accession>P50129</accession>
  <accession>Q9XXX1</accession>
  <name>5HT2A_PIG</name>
  <protein>
    <recommendedName>
      <fullName>5-hydroxytryptamine receptor 2A</fullName>
      <shortName>5-HT-2</shortName>
      <ecNumber>1.2.3.4</ecNumber>
    </recommendedName>
    <alternativeName>
      <fullName>Serotonin receptor 2A</fullName>
    </alternativeName>
  </protein>
  <gene>
    <name type="synonym">HTR2</name>
    <name type="primary">HTR2A</name>
  </gene>
  <organism>
    <name type="scientific">Sus scrofa</name>
    <dbReference type="NCBI Taxonomy" id="9823"/>
  </organism>
  <reference key="1">
    <citation type="journal article" date="1995" name="Biochim. Biophys. Acta" volume="1236" first="201" last="206">
      <title>Species differences in 5-HT2A receptors.</title>
      <dbReference type="PubMed" id="7794950"/>
    </citation>
    <source><tissue>Pulmonary artery</tissue></source>
  </reference>
  <reference key="2">
    <citation type="journal article" date="1997-02" name="J. Test" volume="Suppl 2">
      <dbReference type="PubMed" id="1000001"/>
      <dbReference type="DOI" id="10.1/x"/>
    </citation>
    <source><tissue>Pulmonary artery</tissue></source>
  </reference>
  <reference key="3">
    <citation type="submission" date="1998">
      <title>Unpublished.</title>
    </citation>
  </reference>
  <comment type="function">
    <text>Receptor for serotonin.</text>
  </comment>
  <comment type="subcellular location">
    <subcellularLocation><location>Cell membrane</location></subcellularLocation>
    <subcellularLocation><location>Cell membrane</location></subcellularLocation>
  </comment>
  <comment type="disease">
    <disease id="DI-00001">
      <name>Psoriasis 1</name>
      <acronym>PSORS1</acronym>
      <description>A skin disease.</description>
      <dbReference type="MIM" id="177900"/>
    </disease>
    <text>Disease susceptibility is associated with variations.</text>
  </comment>
  <comment type="disease">
    <text>No curated disease.</text>
  </comment>
  <dbReference type="EMBL" id="S78208"/>
  <dbReference type="GO" id="GO:0005886"/>
  <keyword id="KW-0085">Behavior</keyword>
  <keyword id="KW-0085">Behavior</keyword>
  <keyword id="KW-1003">Cell membrane</keyword>
  <feature type="chain" id="PRO_0000068949" description="5-hydroxytryptamine receptor 2A"/>
  <feature type="disulfide bond"/>
  <sequence length="12" mass="1345">MDILCEENTS
  LS</sequence>
</entry>
</uniprot>"#;

    fn element(xml: &str) -> Element {
        EntryReader::new(xml.as_bytes())
            .next_entry()
            .unwrap()
            .expect("fixture has an entry")
    }

    #[test]
    fn test_decode_scalars() {
        let entry = decode(&element(ENTRY), None).unwrap().unwrap();
        assert_eq!(entry.dataset, Dataset::SwissProt);
        assert_eq!(entry.created, NaiveDate::from_ymd_opt(1996, 10, 1).unwrap());
        assert_eq!(entry.modified, NaiveDate::from_ymd_opt(2017, 5, 10).unwrap());
        assert_eq!(entry.version, 111);
        assert_eq!(entry.name, "5HT2A_PIG");
        assert_eq!(entry.recommended_full_name, "5-hydroxytryptamine receptor 2A");
        assert_eq!(entry.recommended_short_name.as_deref(), Some("5-HT-2"));
        assert_eq!(entry.taxid, 9823);
        assert_eq!(entry.gene_name.as_deref(), Some("HTR2A"));
        assert_eq!(entry.sequence.sequence, "MDILCEENTSLS");
        assert_eq!(entry.sequence.length, Some(12));
        assert_eq!(entry.sequence.mass, Some(1345));
    }

    #[test]
    fn test_decode_repeated_children() {
        let entry = decode(&element(ENTRY), None).unwrap().unwrap();
        assert_eq!(entry.accessions, vec!["P50129", "Q9XXX1"]);
        assert_eq!(entry.ec_numbers, vec!["1.2.3.4"]);
        assert_eq!(entry.alternative_full_names, vec!["Serotonin receptor 2A"]);
        assert!(entry.alternative_short_names.is_empty());
        assert_eq!(
            entry.other_gene_names,
            vec![GeneNameRecord { type_: "synonym".into(), name: "HTR2".into() }]
        );
        assert_eq!(entry.functions, vec!["Receptor for serotonin."]);
        assert_eq!(entry.db_references.len(), 2);
        assert_eq!(entry.features.len(), 2);
        assert_eq!(entry.features[1].identifier, None);
        assert_eq!(entry.features[1].description, None);
    }

    #[test]
    fn test_decode_shared_entities_collapse_duplicates() {
        let entry = decode(&element(ENTRY), None).unwrap().unwrap();
        assert_eq!(entry.keywords.len(), 2);
        assert_eq!(entry.subcellular_locations, vec!["Cell membrane"]);
        assert_eq!(entry.tissues, vec!["Pulmonary artery"]);
    }

    #[test]
    fn test_decode_citations() {
        let entry = decode(&element(ENTRY), None).unwrap().unwrap();
        assert_eq!(entry.citations.len(), 2);

        let first = &entry.citations[0];
        assert_eq!(first.pmid, 7794950);
        assert_eq!(first.volume, Some(1236));
        assert_eq!(first.date, Some(1995));
        assert_eq!(first.first.as_deref(), Some("201"));
        assert_eq!(first.last.as_deref(), Some("206"));
        assert_eq!(first.title.as_deref(), Some("Species differences in 5-HT2A receptors."));

        let second = &entry.citations[1];
        assert_eq!(second.volume, Some(UNKNOWN_VOLUME));
        assert_eq!(second.date, Some(1997));
        assert_eq!(second.title, None);
    }

    #[test]
    fn test_decode_disease_comments() {
        let entry = decode(&element(ENTRY), None).unwrap().unwrap();
        assert_eq!(entry.disease_comments.len(), 2);

        let disease = entry.disease_comments[0].disease.as_ref().unwrap();
        assert_eq!(disease.identifier, "DI-00001");
        assert_eq!(disease.name.as_deref(), Some("Psoriasis 1"));
        assert_eq!(disease.ref_id.as_deref(), Some("177900"));
        assert_eq!(disease.ref_type.as_deref(), Some("MIM"));

        assert_eq!(entry.disease_comments[1].disease, None);
        assert_eq!(
            entry.disease_comments[1].comment.as_deref(),
            Some("No curated disease.")
        );
    }

    #[test]
    fn test_taxid_filter() {
        let entry = element(ENTRY);
        let excluded: TaxidFilter = [9606].into_iter().collect();
        let included: TaxidFilter = [9606, 9823].into_iter().collect();

        assert_eq!(decode(&entry, Some(&excluded)).unwrap(), None);
        assert!(decode(&entry, Some(&included)).unwrap().is_some());
        assert!(decode(&entry, Some(&TaxidFilter::new())).unwrap().is_some());
    }

    #[test]
    fn test_blank_gene_name_is_absent() {
        let xml = ENTRY.replace(r#"<name type="primary">HTR2A</name>"#, r#"<name type="primary">  </name>"#);
        let entry = decode(&element(&xml), None).unwrap().unwrap();
        assert_eq!(entry.gene_name, None);
    }

    #[test]
    fn test_missing_recommended_name_is_malformed() {
        let xml = ENTRY.replace("<fullName>5-hydroxytryptamine receptor 2A</fullName>", "");
        assert_matches!(
            decode(&element(&xml), None),
            Err(DecodeError::MissingElement("recommendedName", "fullName"))
        );
    }

    #[test]
    fn test_invalid_date_is_malformed() {
        let xml = ENTRY.replace(r#"created="1996-10-01""#, r#"created="01/10/1996""#);
        assert_matches!(
            decode(&element(&xml), None),
            Err(DecodeError::InvalidValue { field: "created", .. })
        );
    }
}
