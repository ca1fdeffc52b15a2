use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{
    attach_external_tables, builtin_instruments, find_builtin, find_instrument, resolve_instrument,
};
use crate::error::ConfigError;
use crate::model::instrument::OutcomeModel;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_clinrisk_instruments_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn recmet_csv() -> String {
    let mut csv = String::from("risk_score,Predicted\n");
    for (i, score) in (-20..=51).enumerate() {
        csv.push_str(&format!("{score},{:.3}\n", 1.0 + i as f64));
    }
    csv
}

#[test]
fn test_builtin_registry() {
    let ids: Vec<&str> = builtin_instruments().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["hcc-dfs", "hcc-os", "hcc-recmet", "eoe", "eoe-remodeling"]);
    for instrument in builtin_instruments() {
        instrument.validate().unwrap();
    }
    assert!(find_builtin("hcc-os").is_some());
    assert!(find_builtin("hcc").is_none());
}

#[test]
fn test_unknown_instrument() {
    assert!(matches!(
        find_instrument("nope", None),
        Err(ConfigError::UnknownInstrument(_))
    ));
}

#[test]
fn test_config_overrides_builtin() {
    let dir = make_temp_dir();
    let mut custom = find_builtin("eoe").unwrap().clone();
    custom.name = "Custom EoE".to_string();
    let path = dir.join("defs.json");
    fs::write(&path, serde_json::to_string(&custom).unwrap()).unwrap();

    let found = find_instrument("eoe", Some(&path)).unwrap();
    assert_eq!(found.name, "Custom EoE");
    let fallback = find_instrument("hcc-dfs", Some(&path)).unwrap();
    assert_eq!(fallback.id, "hcc-dfs");
}

#[test]
fn test_missing_default_table_is_unresolved() {
    let mut instrument = find_builtin("hcc-recmet").unwrap().clone();
    if let OutcomeModel::ExternalTable { source } = &mut instrument.outcomes[0].model {
        source.default_path = make_temp_dir().join("absent.csv");
    }
    assert!(matches!(
        attach_external_tables(instrument, None),
        Err(ConfigError::UnresolvedTable { .. })
    ));
}

#[test]
fn test_missing_explicit_table_is_io_error() {
    let path = make_temp_dir().join("absent.csv");
    assert!(matches!(
        resolve_instrument("hcc-recmet", None, Some(&path)),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_explicit_table_is_attached() {
    let dir = make_temp_dir();
    let path = dir.join("full_range_probabilities.csv");
    fs::write(&path, recmet_csv()).unwrap();

    let instrument = resolve_instrument("hcc-recmet", None, Some(&path)).unwrap();
    assert!(!instrument.needs_external_table());
    match &instrument.outcomes[0].model {
        OutcomeModel::Table { table } => {
            assert_eq!(table.min_score(), -20);
            assert_eq!(table.max_score(), 51);
            assert_eq!(table.horizons()[0].label, "5-year");
        }
        other => panic!("table not attached: {}", other.kind()),
    }
}

#[test]
fn test_bad_table_reports_path() {
    let dir = make_temp_dir();
    let path = dir.join("broken.csv");
    fs::write(&path, "risk_score,Predicted\n0,5.0\n1,4.0\n").unwrap();
    match resolve_instrument("hcc-recmet", None, Some(&path)) {
        Err(ConfigError::Table { path: p, .. }) => assert_eq!(p, path),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_builtins_without_tables_pass_through() {
    let instrument = resolve_instrument("hcc-dfs", None, None).unwrap();
    assert!(matches!(
        instrument.outcomes[0].model,
        OutcomeModel::Table { .. }
    ));
}

#[test]
fn test_table_override_ignored_without_external_outcome() {
    let path = make_temp_dir().join("never_read.csv");
    let dfs = find_builtin("hcc-dfs").unwrap().clone();
    assert_eq!(dfs.external_table_count(), 0);
    let attached = attach_external_tables(dfs.clone(), Some(&path)).unwrap();
    assert_eq!(attached, dfs);
}

#[test]
fn test_table_override_shared_by_every_external_outcome() {
    let dir = make_temp_dir();
    let path = dir.join("shared.csv");
    fs::write(&path, recmet_csv()).unwrap();

    let mut recmet = find_builtin("hcc-recmet").unwrap().clone();
    let mut second = recmet.outcomes[0].clone();
    second.id = "recmet_copy".to_string();
    recmet.outcomes.push(second);
    assert_eq!(recmet.external_table_count(), 2);

    let attached = attach_external_tables(recmet, Some(&path)).unwrap();
    assert_eq!(attached.external_table_count(), 0);
    assert_eq!(attached.outcomes[0].model, attached.outcomes[1].model);
}
