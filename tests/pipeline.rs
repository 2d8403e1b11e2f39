use std::collections::HashMap;
use std::path::PathBuf;

use order_recon_rust::io::{read_dataset, write_report_json, write_result_csv};
use order_recon_rust::models::{
    CanonicalKey, CanonicalRecord, RawDataset, RawRow, RawValue, StatusFlag, SummaryMetrics,
};
use order_recon_rust::service::{clean_order_id, reconcile, FieldMapper, RecordStandardizer};
use order_recon_rust::{AppConfig, ReconError, ReconcileService};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn canonical(id: &str, status: &str, sales: f64, cost: f64) -> CanonicalRecord {
    CanonicalRecord {
        order_id: clean_order_id(&id.into()),
        order_id_raw: Some(id.to_string()),
        product_name: Some(format!("product {id}")),
        order_status: status.to_string(),
        sales_amount: sales,
        cost_amount: cost,
    }
}

fn canonical_dataset(records: &[CanonicalRecord]) -> RawDataset {
    let headers: Vec<String> = CanonicalKey::ALL.iter().map(|k| k.to_string()).collect();
    let rows = records
        .iter()
        .map(|r| {
            let mut row = RawRow::new();
            row.insert("order_id".into(), r.order_id.clone().into());
            row.insert("product_name".into(), r.product_name.clone().into());
            row.insert("order_status".into(), r.order_status.clone().into());
            row.insert("sales_amount".into(), RawValue::Number(r.sales_amount));
            row.insert("cost_amount".into(), RawValue::Number(r.cost_amount));
            row
        })
        .collect();
    RawDataset::new(headers, rows)
}

// -------------------------------------------------------------------------
// End-to-end over CSV fixtures
// -------------------------------------------------------------------------

#[test]
fn fixtures_end_to_end() {
    let official = read_dataset(&fixtures_dir().join("official.csv")).unwrap();
    let service = read_dataset(&fixtures_dir().join("service.csv")).unwrap();

    let svc = ReconcileService::new(&AppConfig::default());
    let report = svc.compare(&official, &service, None, None).unwrap();

    let rows: Vec<(usize, &str, StatusFlag, &str)> = report
        .rows
        .iter()
        .map(|r| (r.index, r.order_id.as_str(), r.status_flag, r.final_status.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (1, "1001", StatusFlag::Matched, "Matched"),
            (2, "1004", StatusFlag::Matched, "Matched|loss order"),
            (3, "1002", StatusFlag::MissingFromService, "MissingFromService"),
            (4, "", StatusFlag::MissingFromService, "MissingFromService"),
            (5, "1009", StatusFlag::ExtraInService, "ExtraInService|loss order"),
        ]
    );

    // 重复订单保留最后一条 (成本 980)
    assert_eq!(report.rows[2].cost_amount, 980.0);
    assert_eq!(report.rows[2].sales_amount, 1050.5);
    // 官方金额无法解析 -> 0, 但仍优先于客服金额
    assert_eq!(report.rows[1].sales_amount, 0.0);

    assert_eq!(
        report.summary,
        SummaryMetrics {
            total_sales: 1203.5,
            total_cost: 1096.0,
            total_profit: 107.5,
            order_count: 5,
            matched_count: 2,
            missing_count: 2,
            extra_count: 1,
            loss_count: 2,
        }
    );

    assert_eq!(
        report.warnings,
        vec![
            "official orders: detected 1 non-numeric or empty order ids, marked as invalid",
            "official orders: filtered 1 orders with invalid status",
            "official orders: detected 2 duplicate order ids, keeping the last record",
            "service records: filtered 1 orders with invalid status",
        ]
    );
}

#[test]
fn fixture_headers_are_inferred() {
    let service = read_dataset(&fixtures_dir().join("service.csv")).unwrap();
    let result = FieldMapper::default().infer_mapping(&service.headers);

    assert!(result.is_complete());
    assert_eq!(result.mapping.get(CanonicalKey::OrderId), Some("子订单号"));
    assert_eq!(result.mapping.get(CanonicalKey::OrderStatus), Some(" Status "));
    assert_eq!(result.mapping.get(CanonicalKey::SalesAmount), Some("应收"));
    assert_eq!(result.mapping.get(CanonicalKey::CostAmount), Some("进货价"));
    assert_eq!(result.mapping.get(CanonicalKey::ProductName), Some("产品"));
}

#[test]
fn unsupported_extension_is_rejected() {
    let err = read_dataset(&fixtures_dir().join("official.xlsx")).unwrap_err();
    assert!(matches!(err, ReconError::UnsupportedFile(_)));
}

#[test]
fn manual_mapping_with_unknown_header_blocks_compare() {
    let official = read_dataset(&fixtures_dir().join("official.csv")).unwrap();
    let service = read_dataset(&fixtures_dir().join("service.csv")).unwrap();

    let mut manual = HashMap::new();
    manual.insert(CanonicalKey::OrderId, "订单编号".to_string());
    manual.insert(CanonicalKey::ProductName, "商品名称".to_string());

    let svc = ReconcileService::new(&AppConfig::default());
    let err = svc
        .compare(&official, &service, Some(&manual), None)
        .unwrap_err();
    match err {
        ReconError::IncompleteMappings { official, service } => {
            assert_eq!(
                official,
                vec![
                    CanonicalKey::OrderStatus,
                    CanonicalKey::SalesAmount,
                    CanonicalKey::CostAmount,
                ]
            );
            assert!(service.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

// -------------------------------------------------------------------------
// Reconciliation properties
// -------------------------------------------------------------------------

#[test]
fn missing_from_service_example() {
    let official = vec![canonical("A001", "交易成功", 100.0, 60.0)];
    let out = reconcile(&official, &[]);

    assert_eq!(out.records.len(), 1);
    let row = &out.records[0];
    assert_eq!(row.status_flag, StatusFlag::MissingFromService);
    assert_eq!(row.profit, 40.0);
    assert!(!row.is_loss);
    assert_eq!(
        out.summary,
        SummaryMetrics {
            total_sales: 100.0,
            total_cost: 60.0,
            total_profit: 40.0,
            order_count: 1,
            matched_count: 0,
            missing_count: 1,
            extra_count: 0,
            loss_count: 0,
        }
    );
}

#[test]
fn matched_loss_example() {
    let official = vec![canonical("B002", "交易成功", 50.0, 80.0)];
    let service = vec![canonical("B002", "已发货", 50.0, 80.0)];
    let out = reconcile(&official, &service);

    assert_eq!(out.records.len(), 1);
    let row = &out.records[0];
    assert_eq!(row.status_flag, StatusFlag::Matched);
    assert_eq!(row.profit, -30.0);
    assert!(row.is_loss);
    assert_eq!(row.final_status, "Matched|loss order");
    assert_eq!(out.summary.loss_count, 1);
}

#[test]
fn disjoint_sets_never_match() {
    let official = vec![canonical("1", "交易成功", 1.0, 2.0), canonical("2", "交易成功", 3.0, 1.0)];
    let service = vec![canonical("3", "已发货", 1.0, 1.0)];
    let out = reconcile(&official, &service);

    assert_eq!(out.summary.matched_count, 0);
    assert_eq!(out.summary.missing_count, 2);
    assert_eq!(out.summary.extra_count, 1);
    assert!(out
        .records
        .iter()
        .all(|r| r.status_flag != StatusFlag::Matched));
}

#[test]
fn identical_sets_all_match() {
    let records = vec![
        canonical("1", "交易成功", 10.0, 5.0),
        canonical("2", "已发货", 5.0, 10.0),
        canonical("3", "交易成功", 7.0, 7.0),
    ];
    let out = reconcile(&records, &records);

    let expected_losses = records.iter().filter(|r| r.sales_amount < r.cost_amount).count();
    assert_eq!(out.summary.matched_count, records.len());
    assert_eq!(out.summary.missing_count, 0);
    assert_eq!(out.summary.extra_count, 0);
    assert_eq!(out.summary.loss_count, expected_losses);
    assert_eq!(
        out.summary.total_profit,
        out.summary.total_sales - out.summary.total_cost
    );
}

#[test]
fn standardizing_canonical_data_is_idempotent() {
    let first_input = canonical_dataset(&[
        canonical("11", "交易成功", 10.5, 4.0),
        canonical("12", "已发货", 3.0, 9.25),
    ]);
    let mapper = FieldMapper::default();
    let standardizer = RecordStandardizer::default();

    let mapping = mapper
        .infer_mapping(&first_input.headers)
        .mapping
        .resolve("canonical")
        .unwrap();
    let first = standardizer.standardize(&first_input, &mapping, "canonical");
    let second = standardizer.standardize(&canonical_dataset(&first.records), &mapping, "canonical");

    assert!(first.warnings.is_empty());
    assert!(second.warnings.is_empty());
    assert_eq!(first.records, second.records);
}

#[test]
fn incomplete_mapping_cannot_be_resolved() {
    let result = FieldMapper::default().infer_mapping(&["订单号".to_string()]);
    let err = result.mapping.resolve("official orders").unwrap_err();
    assert_eq!(
        err.to_string(),
        "official orders: unresolved field mapping for product_name, order_status, sales_amount, cost_amount"
    );
}

// -------------------------------------------------------------------------
// Export
// -------------------------------------------------------------------------

#[test]
fn exports_csv_and_json_report() {
    let official = read_dataset(&fixtures_dir().join("official.csv")).unwrap();
    let service = read_dataset(&fixtures_dir().join("service.csv")).unwrap();
    let report = ReconcileService::new(&AppConfig::default())
        .compare(&official, &service, None, None)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("nested/result.csv");
    let json_path = dir.path().join("report.json");

    write_result_csv(&report.rows, &report.summary, &csv_path).unwrap();
    write_report_json(&report, &json_path).unwrap();

    let csv_text = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv_text.lines().collect();
    assert_eq!(lines.len(), 1 + report.rows.len() + 2);
    assert_eq!(lines[2], "2,1004,台灯,0.00,30.00,-30.00,Matched|loss order,true");
    assert_eq!(
        lines.last().copied(),
        Some("summary,total_sales: 1203.50,total_cost: 1096.00,total_profit: 107.50,loss_count: 2,order_count: 5")
    );

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["summary"]["order_count"], 5);
    assert_eq!(json["rows"][0]["status_flag"], "Matched");
    assert_eq!(json["warnings"].as_array().map(Vec::len), Some(4));
}
