//! Snapshot files: export, re-import, and rejection of malformed input.

use chrono::{TimeZone, Utc};
use mnav_common::MnavBands;
use mnav_core::snapshot::{export_file_name, export_legacy, SNAPSHOT_VERSION};
use mnav_core::{
    read_snapshot_file, validate_import, write_snapshot_file, Company, Dashboard, FeedEvent,
    SnapshotFormat,
};
use serde_json::json;
use tempfile::TempDir;

fn sample_dashboard() -> Dashboard {
    let mut mstr = Company::new("1", "Strategy", "MSTR");
    mstr.bitcoin = Some(640_031.0);
    mstr.long_term_debt = Some(8_200_000_000.0);
    let xxi = Company::new("2", "Twenty One Capital", "XXI");

    let mut dashboard = Dashboard::new(vec![mstr, xxi], MnavBands::default());
    dashboard.set_manual_stock_price("MSTR", Some(400.0)).unwrap();
    dashboard.set_manual_shares("XXI", Some(350_000_000.0)).unwrap();
    dashboard
}

#[test]
fn test_envelope_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("snapshot.json");

    let source = sample_dashboard();
    let envelope = source.export(Utc::now());
    write_snapshot_file(&path, &envelope).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["version"], SNAPSHOT_VERSION);

    let imported = read_snapshot_file(&path).unwrap();
    assert_eq!(imported.format, SnapshotFormat::Envelope);
    assert_eq!(imported.companies, source.companies());

    let mut target = Dashboard::default();
    target.import(imported).unwrap();
    assert_eq!(target.companies(), source.companies());
    assert_eq!(target.stock_prices().value("MSTR"), Some(400.0));
    assert_eq!(target.shares_outstanding().value("XXI"), Some(350_000_000.0));
}

#[test]
fn test_legacy_file_roundtrip_keeps_overrides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.json");

    let source = sample_dashboard();
    std::fs::write(&path, export_legacy(source.companies()).unwrap()).unwrap();

    let mut target = sample_dashboard();
    target.set_manual_stock_price("XXI", Some(12.0)).unwrap();
    let new_tickers = target.import(read_snapshot_file(&path).unwrap()).unwrap();
    assert_eq!(target.companies(), source.companies());

    // legacy files carry no override maps, so existing ones survive
    assert_eq!(target.stock_prices().value("XXI"), Some(12.0));
    assert_eq!(target.stock_prices().value("MSTR"), Some(400.0));
    // nothing has fetched shares yet, so both need a fetch
    assert_eq!(new_tickers, vec!["MSTR".to_string(), "XXI".to_string()]);
}

#[test]
fn test_new_tickers_skip_cached() {
    let mut dashboard = sample_dashboard();
    dashboard.apply(
        FeedEvent::SharesOutstanding {
            ticker: "MSTR".into(),
            shares: 250_000_000.0,
        },
        Utc::now(),
    );

    let data = validate_import(&json!([
        {
            "id": "1", "name": "Strategy", "ticker": "MSTR",
            "commonSharesOutstanding": null, "bitcoin": 640031, "cash": null,
            "otherAssets": null, "longTermDebt": null, "otherDebt": null,
            "preferredStock": null
        },
        {
            "id": "7", "name": "Semler Scientific", "ticker": "SMLR",
            "commonSharesOutstanding": null, "bitcoin": 5021, "cash": null,
            "otherAssets": null, "longTermDebt": null, "otherDebt": null,
            "preferredStock": null
        }
    ]))
    .unwrap();

    assert_eq!(dashboard.import(data).unwrap(), vec!["SMLR".to_string()]);
}

#[test]
fn test_invalid_file_is_rejected_with_reason() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        json!([{ "id": "1", "name": "Strategy", "ticker": "MSTR" }]).to_string(),
    )
    .unwrap();

    let err = read_snapshot_file(&path).unwrap_err();
    assert!(err.is_invalid_input());
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn test_unreadable_inputs() {
    let dir = TempDir::new().unwrap();

    let missing = read_snapshot_file(&dir.path().join("missing.json")).unwrap_err();
    assert!(missing.to_string().contains("missing.json"));

    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "{ not json").unwrap();
    assert!(read_snapshot_file(&garbage).is_err());
}

#[test]
fn test_export_file_name() {
    let day = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap().date_naive();
    assert_eq!(export_file_name(day), "mnav-dashboard-2026-10-16.json");
}
