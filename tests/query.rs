mod common;

use diesel::SqliteConnection;
use uniprot_ru::uniprot::models::{Accession, Disease, Entry, Keyword, SubcellularLocation, Version};
use uniprot_ru::uniprot::query::{self, query, Filter, Limit, Output, Query, QueryError};

use common::imported;

fn entry_names(rows: Vec<Entry>) -> Vec<String> {
    rows.into_iter().map(|entry| entry.name).collect()
}

fn entries_matching(request: Query) -> Vec<String> {
    let (mut connection, _) = imported(&[]);
    let rows = query::<Entry>(&mut connection, &request)
        .unwrap()
        .into_rows()
        .unwrap();
    entry_names(rows)
}

#[test]
fn test_entries_by_own_columns() {
    assert_eq!(
        entries_matching(Query::new().filter("gene_name", Filter::exact("HTR2A"))),
        vec!["5HT2A_PIG"]
    );
    assert_eq!(
        entries_matching(Query::new().filter("recommended_full_name", Filter::like("%receptor%"))),
        vec!["5HT2A_PIG"]
    );
    assert_eq!(
        entries_matching(Query::new().filter("taxid", Filter::any_of([9606, 3702]))),
        vec!["AAH_ARATH", "1C06_HUMAN"]
    );
}

#[test]
fn test_filter_on_dates() {
    assert_eq!(
        entries_matching(Query::new().filter("created", Filter::exact("1996-10-01"))),
        vec!["5HT2A_PIG"]
    );
    assert_eq!(
        entries_matching(Query::new().filter("modified", Filter::like("2017-05-%"))),
        vec!["5HT2A_PIG", "001R_FRG3G"]
    );

    let (mut connection, _) = imported(&[]);
    let finished = query::<Version>(
        &mut connection,
        &Query::new().filter("import_completed_date", Filter::like("2%")),
    )
    .unwrap();
    assert_eq!(finished.len(), 2);
    let started = query::<Version>(
        &mut connection,
        &Query::new().filter("import_start_date", Filter::like("1%")),
    )
    .unwrap();
    assert!(started.is_empty());
}

#[test]
fn test_entries_through_related_tables() {
    assert_eq!(
        entries_matching(Query::new().filter("keyword", Filter::exact("KW-1185"))),
        vec!["AAH_ARATH", "1C06_HUMAN", "001R_FRG3G"]
    );
    assert_eq!(
        entries_matching(Query::new().filter("accession", Filter::exact("O02957"))),
        vec!["1C06_HUMAN"]
    );
    assert_eq!(
        entries_matching(Query::new().filter("disease_name", Filter::like("Psoriasis%"))),
        vec!["1C06_HUMAN"]
    );
    assert_eq!(
        entries_matching(Query::new().filter("organism_host", Filter::exact(30343))),
        vec!["001R_FRG3G"]
    );
    assert_eq!(
        entries_matching(Query::new().filter("tissue_in_reference", Filter::exact("Leaf"))),
        vec!["AAH_ARATH"]
    );
    assert_eq!(
        entries_matching(Query::new().filter("ec_number", Filter::exact("3.5.3.9"))),
        vec!["AAH_ARATH"]
    );
}

#[test]
fn test_filters_combine_with_and() {
    let request = Query::new()
        .filter("subcellular_location", Filter::exact("Cell membrane"))
        .filter("taxid", Filter::exact(9606));
    assert_eq!(entries_matching(request), vec!["1C06_HUMAN"]);
}

#[test]
fn test_children_by_entry_name() {
    let (mut connection, _) = imported(&[]);

    let accessions: Vec<String> = query::<Accession>(
        &mut connection,
        &Query::new().filter("entry_name", Filter::exact("1C06_HUMAN")),
    )
    .unwrap()
    .into_rows()
    .unwrap()
    .into_iter()
    .map(|row| row.accession)
    .collect();
    assert_eq!(accessions, vec!["Q29960", "O02957", "O19606"]);

    let locations = query::<SubcellularLocation>(
        &mut connection,
        &Query::new().filter("entry_name", Filter::exact("AAH_ARATH")),
    )
    .unwrap();
    assert_eq!(locations.len(), 2);

    let keywords = query::<Keyword>(
        &mut connection,
        &Query::new().filter("entry_name", Filter::exact("1C06_HUMAN")),
    )
    .unwrap();
    assert_eq!(keywords.len(), 3);

    let diseases = query::<Disease>(
        &mut connection,
        &Query::new().filter("entry_name", Filter::exact("1C06_HUMAN")),
    )
    .unwrap()
    .into_rows()
    .unwrap();
    assert_eq!(diseases.len(), 1);
    assert_eq!(diseases[0].identifier, "DI-02145");
    assert_eq!(diseases[0].acronym.as_deref(), Some("PSORS1"));
    assert_eq!(diseases[0].ref_type.as_deref(), Some("MIM"));
    assert_eq!(diseases[0].ref_id.as_deref(), Some("177900"));
}

#[test]
fn test_limits() {
    let (mut connection, _) = imported(&[]);

    let first_two = query::<Accession>(&mut connection, &Query::new().limit(Limit::Count(2))).unwrap();
    assert_eq!(first_two.len(), 2);

    fn page(connection: &mut SqliteConnection, page: u32) -> Vec<String> {
        query::<Accession>(connection, &Query::new().limit(Limit::Page { page, page_size: 3 }))
            .unwrap()
            .into_rows()
            .unwrap()
            .into_iter()
            .map(|row| row.accession)
            .collect()
    }
    assert_eq!(page(&mut connection, 1), vec!["P50129", "O19012", "O49434"]);
    assert_eq!(page(&mut connection, 3), vec!["Q6GZX4"]);
    assert!(page(&mut connection, 4).is_empty());
}

#[test]
fn test_frame_output() {
    let (mut connection, _) = imported(&[]);
    let frame = query::<Entry>(
        &mut connection,
        &Query::new()
            .filter("dataset", Filter::exact("Swiss-Prot"))
            .output(Output::Frame),
    )
    .unwrap()
    .into_frame()
    .unwrap();

    assert_eq!(frame.height(), 4);
    assert_eq!(frame.width(), 10);
    let names = frame.column("name").unwrap().as_materialized_series().str().unwrap();
    assert_eq!(names.get(0), Some("5HT2A_PIG"));
    assert_eq!(names.get(3), Some("001R_FRG3G"));
}

#[test]
fn test_unknown_field() {
    let (mut connection, _) = imported(&[]);
    let result = query::<Entry>(&mut connection, &Query::new().filter("species", Filter::exact("pig")));
    assert!(matches!(result, Err(QueryError::UnknownField { .. })));
}

#[test]
fn test_distinct_values() {
    let (mut connection, _) = imported(&[]);

    assert_eq!(query::taxids(&mut connection).unwrap(), vec![3702, 9606, 9823, 654924]);
    assert_eq!(query::datasets(&mut connection).unwrap(), vec!["Swiss-Prot"]);
    assert_eq!(
        query::db_reference_types(&mut connection).unwrap(),
        vec!["EMBL", "GO", "HGNC", "MIM"]
    );
    assert_eq!(
        query::feature_types(&mut connection).unwrap(),
        vec![
            "chain",
            "disulfide bond",
            "region of interest",
            "signal peptide",
            "topological domain",
            "transmembrane region",
        ]
    );
    assert_eq!(query::disease_names(&mut connection).unwrap(), vec!["Psoriasis 1"]);
}

#[test]
fn test_shared_rows() {
    let (mut connection, _) = imported(&[]);

    let locations: Vec<String> = query::subcellular_locations(&mut connection)
        .unwrap()
        .into_iter()
        .map(|row| row.location)
        .collect();
    assert_eq!(locations, vec!["Cell membrane", "Endoplasmic reticulum"]);

    let tissues: Vec<String> = query::tissues_in_references(&mut connection)
        .unwrap()
        .into_iter()
        .map(|row| row.tissue)
        .collect();
    assert_eq!(tissues, vec!["Pulmonary artery", "Leaf"]);

    let keywords = query::keywords(&mut connection).unwrap();
    assert_eq!(keywords.len(), 7);
    assert_eq!(keywords[0].identifier, "KW-0297");
    assert_eq!(keywords[0].name.as_deref(), Some("G-protein coupled receptor"));
}
