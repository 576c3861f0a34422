use std::fs;
use std::path::Path;

use mip_model::RuleTable;
use mip_standards::{RuleRepository, StandardsError};

fn write_rule_set(dir: &Path) {
    let sheets = [
        ("ModelTable.csv", "Model\nGLOBIOM\nMAGNET\n"),
        ("ScenarioTable.csv", "Scenario\nSSP1\nSSP2\n"),
        ("RegionTable.csv", "Region\nWLD\nEUR\n"),
        ("VariableTable.csv", "Variable\nPROD\nAREA\n"),
        ("ItemTable.csv", "Item\nWHT\nRIC\n"),
        ("UnitTable.csv", "Unit\n1000 t\n1000 ha\n"),
        ("YearTable.csv", "Year\n2020\n2030\n"),
        ("RegionFixTable.csv", "Region,Fix\nWorld,WLD\nEurope,EUR\n"),
        ("ValueFixTable.csv", "Value,Fix\nNA,0\n-,0\n"),
        (
            "VariableUnitValueTable.csv",
            "Variable,Unit,Minimum Value,Maximum Value\nPROD,1000 t,0,1000000\nAREA,1000 ha,0,\n",
        ),
    ];
    for (name, contents) in sheets {
        fs::write(dir.join(name), contents).expect("write sheet");
    }
}

#[test]
fn loads_complete_rule_set() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_rule_set(dir.path());

    let repository = RuleRepository::load(dir.path()).expect("load rules");
    assert!(repository.is_valid(RuleTable::Model, "GLOBIOM"));
    assert_eq!(repository.match_exact(RuleTable::Unit, "1000 T"), Some("1000 t"));
    assert_eq!(repository.fix_region("world"), Some("WLD"));
    assert_eq!(repository.fix_value("na"), Some("0"));

    let prod = repository.value_range("PROD", "1000 t");
    assert!(prod.contains(151.0));
    assert!(!prod.contains(99999999999999999999.0));

    let area = repository.value_range("AREA", "1000 ha");
    assert_eq!(area.min, 0.0);
    assert!(area.max.is_infinite());
    assert!(repository.value_range("AREA", "t").is_unbounded());
}

#[test]
fn missing_sheet_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_rule_set(dir.path());
    fs::remove_file(dir.path().join("ItemTable.csv")).expect("remove sheet");

    let err = RuleRepository::load(dir.path()).unwrap_err();
    assert!(matches!(err, StandardsError::MissingFile { .. }));
}

#[test]
fn missing_range_column_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_rule_set(dir.path());
    fs::write(
        dir.path().join("VariableUnitValueTable.csv"),
        "Variable,Unit,Minimum Value\nPROD,1000 t,0\n",
    )
    .expect("write sheet");

    let err = RuleRepository::load(dir.path()).unwrap_err();
    match err {
        StandardsError::MissingColumn { column, .. } => assert_eq!(column, "Maximum Value"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unparsable_bound_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_rule_set(dir.path());
    fs::write(
        dir.path().join("VariableUnitValueTable.csv"),
        "Variable,Unit,Minimum Value,Maximum Value\nPROD,1000 t,zero,10\n",
    )
    .expect("write sheet");

    let err = RuleRepository::load(dir.path()).unwrap_err();
    assert!(matches!(err, StandardsError::InvalidBound { line: 2, .. }));
}

#[test]
fn non_finite_or_inverted_bounds_are_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_rule_set(dir.path());
    for (row, value) in [
        ("PROD,t,NaN,100", "NaN"),
        ("PROD,t,0,inf", "inf"),
        ("PROD,t,-Infinity,", "-Infinity"),
        ("PROD,t,100,10", "100 > 10"),
    ] {
        fs::write(
            dir.path().join("VariableUnitValueTable.csv"),
            format!("Variable,Unit,Minimum Value,Maximum Value\nAREA,ha,0,\n{row}\n"),
        )
        .expect("write sheet");

        match RuleRepository::load(dir.path()).unwrap_err() {
            StandardsError::InvalidBound { line, value: found, .. } => {
                assert_eq!(line, 3, "{row}");
                assert_eq!(found, value);
            }
            other => panic!("unexpected error for {row}: {other}"),
        }
    }
}

#[test]
fn empty_label_table_is_fatal_except_years() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_rule_set(dir.path());
    fs::write(dir.path().join("YearTable.csv"), "Year\n").expect("write sheet");
    assert!(RuleRepository::load(dir.path()).is_ok());

    fs::write(dir.path().join("ScenarioTable.csv"), "Scenario\n").expect("write sheet");
    let err = RuleRepository::load(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        StandardsError::EmptyTable {
            table: RuleTable::Scenario
        }
    ));
}

#[test]
fn case_colliding_labels_are_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_rule_set(dir.path());
    fs::write(dir.path().join("UnitTable.csv"), "Unit\nkg\nKG\n").expect("write sheet");

    let err = RuleRepository::load(dir.path()).unwrap_err();
    assert!(matches!(err, StandardsError::AmbiguousLabel { .. }));
}
