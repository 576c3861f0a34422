//! Diagnose, review, and assemble through the command layer.

use std::fs;
use std::path::{Path, PathBuf};

use mip_cli::cli::{AssembleArgs, DiagnoseArgs, FormatArgs};
use mip_cli::commands::{load_rules, run_assemble, run_diagnose, run_infer, run_rules};
use mip_cli::config::IntakeConfig;
use mip_cli::session::Session;
use mip_model::ColumnRole;

fn write_rule_set(dir: &Path) {
    let sheets = [
        ("ModelTable.csv", "Model\nGLOBIOM\n"),
        ("ScenarioTable.csv", "Scenario\nSSP2\n"),
        ("RegionTable.csv", "Region\nWLD\nEUR\n"),
        ("VariableTable.csv", "Variable\nPROD\nAREA\n"),
        ("ItemTable.csv", "Item\nWHT\n"),
        ("UnitTable.csv", "Unit\n1000 t\n"),
        ("YearTable.csv", "Year\n2030\n"),
        ("RegionFixTable.csv", "Region,Fix\nWorld,WLD\n"),
        ("ValueFixTable.csv", "Value,Fix\nNA,0\n"),
        (
            "VariableUnitValueTable.csv",
            "Variable,Unit,Minimum Value,Maximum Value\nPROD,1000 t,0,1000000\n",
        ),
    ];
    fs::create_dir_all(dir).expect("create rules dir");
    for (name, contents) in sheets {
        fs::write(dir.join(name), contents).expect("write sheet");
    }
}

fn format_args(file: PathBuf) -> FormatArgs {
    FormatArgs {
        file,
        delimiter: Some(";".to_string()),
        skip: Some(0),
        header: true,
        no_header: false,
        columns: Vec::new(),
        model: None,
    }
}

const UPLOAD: &str = "Model;Scenario;Region;Variable;Item;Unit;Year;Value\n\
                      GLOBIOM;SSP2;WLD;PROD;WHT;1000 t;2030;151\n\
                      GLOBIOM;SSP2;World;PROD;WHT;1000 t;2030;152\n\
                      GLOBIOM;SSP2;WLD;PRODX;WHT;1000 t;2030;153\n";

#[test]
fn review_round_trip_recovers_dropped_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let rules_dir = dir.path().join("rules");
    write_rule_set(&rules_dir);
    let rules = load_rules(&rules_dir).expect("load rules");
    let input = dir.path().join("upload.csv");
    fs::write(&input, UPLOAD).expect("write input");
    let config = IntakeConfig::default();
    let output_dir = dir.path().join("out");

    let diagnosed = run_diagnose(
        &DiagnoseArgs {
            format: format_args(input.clone()),
            output_dir: output_dir.clone(),
            ignore_scenarios: Vec::new(),
        },
        &config,
        &rules,
    )
    .expect("diagnose");

    assert_eq!(diagnosed.session_path, output_dir.join("session.json"));
    assert_eq!(diagnosed.session.format.model_name(), "GLOBIOM");
    assert_eq!(diagnosed.session.diagnosis.counts.accepted, 3);
    assert_eq!(diagnosed.session.diagnosis.bad_labels.len(), 1);
    assert_eq!(diagnosed.session.diagnosis.unknown_labels.len(), 1);

    let args = AssembleArgs {
        session: diagnosed.session_path.clone(),
    };
    let first = run_assemble(&args, &config, &rules).expect("assemble");
    assert_eq!(first.unresolved, 1);
    assert_eq!(first.assembled.dropped, 1);
    assert_eq!(first.filter.kept, 2);
    assert_eq!(first.filter.selections.for_role(ColumnRole::Variable), ["PROD"]);
    assert!(!first.has_overrides);

    let mut session = Session::load(&diagnosed.session_path).expect("load session");
    session
        .diagnosis
        .unknown_label_mut(ColumnRole::Variable, "PRODX")
        .expect("unknown variable")
        .accept_closest_match()
        .expect("accept fix");
    session.save(&diagnosed.session_path).expect("save session");

    let second = run_assemble(&args, &config, &rules).expect("assemble");
    assert_eq!(second.unresolved, 0);
    assert_eq!(second.filter.kept, 3);
    let table = fs::read_to_string(&second.assembled.path).expect("read table");
    assert!(table.lines().all(|line| !line.contains(';')));
    assert!(table.contains("GLOBIOM,SSP2,WLD,PROD,WHT,1000 t,2030,153"));
    assert!(!table.contains("World"));
}

#[test]
fn conflicting_review_edits_are_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let rules_dir = dir.path().join("rules");
    write_rule_set(&rules_dir);
    let rules = load_rules(&rules_dir).expect("load rules");
    let input = dir.path().join("upload.csv");
    fs::write(&input, UPLOAD).expect("write input");
    let output_dir = dir.path().join("out");
    let diagnosed = run_diagnose(
        &DiagnoseArgs {
            format: format_args(input),
            output_dir,
            ignore_scenarios: Vec::new(),
        },
        &IntakeConfig::default(),
        &rules,
    )
    .expect("diagnose");

    let mut session = diagnosed.session;
    let label = &mut session.diagnosis.unknown_labels[0];
    label.fix = "PROD".to_string();
    label.overridden = true;
    session.save(&diagnosed.session_path).expect("save session");

    assert!(Session::load(&diagnosed.session_path).is_err());
}

#[test]
fn infer_reports_overrides_as_decided() {
    let dir = tempfile::tempdir().expect("temp dir");
    let rules_dir = dir.path().join("rules");
    write_rule_set(&rules_dir);
    let rules = load_rules(&rules_dir).expect("load rules");
    let input = dir.path().join("upload.csv");
    fs::write(&input, UPLOAD).expect("write input");

    let mut args = format_args(input);
    args.model = Some("MAGNET".to_string());
    let result = run_infer(&args, &IntakeConfig::default(), &rules).expect("infer");

    assert!(result.report.all_succeeded());
    assert_eq!(result.format.model_name(), "MAGNET");
    assert_eq!(result.format.column(ColumnRole::Value), Some(8));
    assert!(result.format.columns().is_complete());
}

#[test]
fn rules_command_lists_every_sheet() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_rule_set(dir.path());

    let result = run_rules(dir.path()).expect("rules");

    assert_eq!(result.tables.len(), 10);
    assert!(result.tables.contains(&("RegionTable".to_string(), 2)));
    assert!(result.tables.contains(&("VariableUnitValueTable".to_string(), 1)));
}

#[test]
fn config_file_overrides_stream_names() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("intake.toml");
    fs::write(
        &path,
        "max_skip_ratio = 0.5\nsession_name = \"review.json\"\n[output]\nduplicates = \"dups.txt\"\n",
    )
    .expect("write config");

    let config = IntakeConfig::load(&path).expect("load config");

    assert_eq!(config.inference_options().max_skip_ratio, 0.5);
    assert_eq!(config.session_name, "review.json");
    assert_eq!(config.output.duplicates, "dups.txt");
    assert_eq!(config.filtered_name, "filtered.csv");
    assert!(IntakeConfig::load(&dir.path().join("missing.toml")).is_err());
}
