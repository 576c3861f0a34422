//! Integration tests for the full diagnosis pass.

use std::fs;
use std::path::{Path, PathBuf};

use mip_model::{BadLabel, ColumnRole, InputFormat, RowCounts, RuleTable, UnknownLabel};
use mip_standards::RuleRepository;
use mip_validate::{DiagnosisError, OutputNames, StreamPaths, data_width, diagnose};
use proptest::prelude::*;

fn rules() -> RuleRepository {
    RuleRepository::builder()
        .labels(RuleTable::Model, ["GLOBIOM"])
        .and_then(|b| b.labels(RuleTable::Scenario, ["SSP1", "SSP2"]))
        .and_then(|b| b.labels(RuleTable::Region, ["WLD", "EUR"]))
        .and_then(|b| b.labels(RuleTable::Variable, ["PROD", "AREA"]))
        .and_then(|b| b.labels(RuleTable::Item, ["WHT", "RIC"]))
        .and_then(|b| b.labels(RuleTable::Unit, ["1000 t", "1000 ha"]))
        .and_then(|b| b.labels(RuleTable::Year, ["2030"]))
        .expect("fixture rules")
        .region_fix("World", "WLD")
        .value_fix("NA", "0")
        .range("PROD", "1000 t", 0.0, 1_000_000.0)
        .build()
}

fn canonical_format(skip: usize, header: bool) -> InputFormat {
    let mut format = InputFormat::new();
    format.set_delimiter(",");
    format.set_initial_lines_to_skip(skip);
    format.set_header_included(header);
    for (offset, role) in ColumnRole::ALL.into_iter().enumerate() {
        format.assign_column(role, offset + 1);
    }
    format
}

fn write_input(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("upload.csv");
    fs::write(&path, contents).expect("write input");
    path
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read stream")
}

const MIXED: &str = "# exported by GLOBIOM\n\
Scenario,Region,Variable,Item,Unit,Year,Value\n\
SSP2,WLD,PROD,WHT,1000 t,2030,151\n\
SSP2,WLD,PROD,WHT,1000 t,2030,151\n\
ssp2,World,PROD,wheat,1000 t,2050,NA\n\
SSP0,WLD,PROD,WHT,1000 t,2030,1\n\
SSP2,WLD,PROD,WHT,1000 t,2030\n\
SSP2,WLD,PROD,WHT,1000 t,2030,-5\n\
\n";

#[test]
fn classifies_and_diagnoses_mixed_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), MIXED);
    let streams = StreamPaths::new(dir.path(), &OutputNames::default());
    let rules = rules();

    let result = diagnose(&input, &canonical_format(1, true), &rules, &["SSP0"], &streams)
        .expect("diagnose");

    assert_eq!(
        result.counts,
        RowCounts {
            structural_issues: 3,
            ignored_scenarios: 1,
            duplicates: 1,
            accepted: 2,
        }
    );
    assert_eq!(
        result.bad_labels,
        vec![
            BadLabel::new(ColumnRole::Scenario, "ssp2", "SSP2"),
            BadLabel::new(ColumnRole::Region, "World", "WLD"),
            BadLabel::new(ColumnRole::Value, "NA", "0"),
        ]
    );
    assert_eq!(
        result.unknown_labels,
        vec![UnknownLabel::new(ColumnRole::Item, "wheat", "WHT")]
    );
    assert_eq!(result.unknown_years.iter().collect::<Vec<_>>(), vec!["2050"]);

    assert_eq!(
        read(&streams.accepted),
        "SSP2,WLD,PROD,WHT,1000 t,2030,151\nssp2,World,PROD,wheat,1000 t,2050,NA\n"
    );
    assert_eq!(
        read(&streams.duplicates),
        "SSP2,WLD,PROD,WHT,1000 t,2030,151 # row 4: occurrence 2\n"
    );
    assert_eq!(
        read(&streams.ignored_scenarios),
        "SSP0,WLD,PROD,WHT,1000 t,2030,1 # row 6: ignored scenario SSP0\n"
    );
    let structural = read(&streams.structural_issues);
    let lines: Vec<&str> = structural.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "SSP2,WLD,PROD,WHT,1000 t,2030 # row 7: expected 7 fields, found 6"
    );
    assert!(lines[1].starts_with("SSP2,WLD,PROD,WHT,1000 t,2030,-5 # row 8: value -5 outside"));
    assert_eq!(lines[2], " # row 9: expected 7 fields, found 1");
}

#[test]
fn rerun_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), MIXED);
    let streams = StreamPaths::new(dir.path(), &OutputNames::default());
    let rules = rules();
    let format = canonical_format(1, true);

    let first = diagnose(&input, &format, &rules, &["SSP0"], &streams).expect("first run");
    let accepted = read(&streams.accepted);
    let second = diagnose(&input, &format, &rules, &["SSP0"], &streams).expect("second run");

    assert_eq!(first, second);
    assert_eq!(read(&streams.accepted), accepted);
}

#[test]
fn clean_file_has_no_label_reports() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(
        dir.path(),
        "SSP1,EUR,AREA,RIC,1000 ha,2030,12.5\nSSP2,WLD,PROD,WHT,1000 t,2030,151\n",
    );
    let streams = StreamPaths::new(dir.path(), &OutputNames::default());

    let result = diagnose(&input, &canonical_format(0, false), &rules(), &[] as &[&str], &streams)
        .expect("diagnose");

    assert_eq!(result.counts.accepted, 2);
    assert!(result.bad_labels.is_empty());
    assert!(result.unknown_labels.is_empty());
    assert!(result.unknown_years.is_empty());
}

#[test]
fn incomplete_format_fails_before_writing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "SSP2,WLD,PROD,WHT,1000 t,2030,151\n");
    let streams = StreamPaths::new(dir.path(), &OutputNames::default());
    let mut format = canonical_format(0, false);
    format.assign_column(ColumnRole::Year, 0);

    let err = diagnose(&input, &format, &rules(), &[] as &[&str], &streams).unwrap_err();

    assert!(matches!(err, DiagnosisError::IncompleteFormat { .. }));
    assert!(!streams.accepted.exists());
}

#[test]
fn column_past_modal_width_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "SSP2,WLD,PROD,WHT,1000 t,2030\n");
    let streams = StreamPaths::new(dir.path(), &OutputNames::default());

    let err = diagnose(&input, &canonical_format(0, false), &rules(), &[] as &[&str], &streams)
        .unwrap_err();

    assert!(matches!(
        err,
        DiagnosisError::ColumnOutOfRange { index: 7, width: 6, .. }
    ));
}

#[test]
fn data_width_streams_only_the_data_region() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(
        dir.path(),
        "note\nnote\nnote\n\
         Scenario,Region,Variable,Item,Unit,Year,Value\n\
         a,b,c,d,e,f,g\n\
         a,b,c,d,e,f\n\
         a,b,c,d,e,f,g\n\
         a,b,c,d,e,f\n",
    );

    assert_eq!(data_width(&input, &canonical_format(3, true)).expect("width"), Some(6));
    assert_eq!(data_width(&input, &canonical_format(8, false)).expect("width"), None);
    assert!(data_width(&dir.path().join("absent.csv"), &canonical_format(0, false)).is_err());
}

#[test]
fn missing_input_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let streams = StreamPaths::new(dir.path(), &OutputNames::default());
    let err = diagnose(
        &dir.path().join("absent.csv"),
        &canonical_format(0, false),
        &rules(),
        &[] as &[&str],
        &streams,
    )
    .unwrap_err();
    assert!(matches!(err, DiagnosisError::Ingest(_)));
}

const POOL: [&str; 6] = [
    "SSP2,WLD,PROD,WHT,1000 t,2030,151",
    "SSP1,EUR,AREA,RIC,1000 ha,2030,3",
    "SSP2,,PROD,WHT,1000 t,2030,151",
    "SSP2,WLD,PROD,WHT,1000 t,year,151",
    "SSP0,WLD,PROD,WHT,1000 t,2030,151",
    "SSP2,WLD,PROD,WHT,1000 t,2030,n/a",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_row_lands_in_exactly_one_stream(picks in prop::collection::vec(0..POOL.len(), 0..40)) {
        let dir = tempfile::tempdir().expect("temp dir");
        let contents: String = picks.iter().map(|&i| format!("{}\n", POOL[i])).collect();
        let input = write_input(dir.path(), &contents);
        let streams = StreamPaths::new(dir.path(), &OutputNames::default());

        let result = diagnose(&input, &canonical_format(0, false), &rules(), &["SSP0"], &streams)
            .expect("diagnose");

        prop_assert_eq!(result.counts.total(), picks.len());
        let written: usize = [
            &streams.structural_issues,
            &streams.ignored_scenarios,
            &streams.duplicates,
            &streams.accepted,
        ]
        .into_iter()
        .map(|path| read(path).lines().count())
        .sum();
        prop_assert_eq!(written, picks.len());
    }

    #[test]
    fn identical_rows_count_as_duplicates(n in 1usize..20) {
        let dir = tempfile::tempdir().expect("temp dir");
        let contents = format!("{}\n", POOL[0]).repeat(n);
        let input = write_input(dir.path(), &contents);
        let streams = StreamPaths::new(dir.path(), &OutputNames::default());

        let result = diagnose(&input, &canonical_format(0, false), &rules(), &[] as &[&str], &streams)
            .expect("diagnose");

        prop_assert_eq!(result.counts.accepted, 1);
        prop_assert_eq!(result.counts.duplicates, n - 1);
    }
}
