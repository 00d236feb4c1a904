//! Integration tests for statement normalization over provider-shaped payloads

use chrono::{Datelike, NaiveDate};
use fundamentals_core::{
    DEFAULT_PERIOD_WINDOW, RawPeriodRecord, StatementKind, StatementManifest, normalize,
};
use serde_json::json;

fn annual_reports(payload: serde_json::Value) -> Vec<RawPeriodRecord> {
    serde_json::from_value(payload["annualReports"].clone()).unwrap()
}

/// Nine fiscal years, newest first as the provider lists them.
fn nine_year_income() -> serde_json::Value {
    let reports: Vec<_> = (0..9)
        .rev()
        .map(|i| {
            json!({
                "fiscalDateEnding": format!("{}-03-31", 2016 + i),
                "reportedCurrency": "INR",
                "totalRevenue": ((100 + 10 * i) * 1_000_000).to_string(),
                "ebitda": ((30 + i) * 1_000_000).to_string(),
                "netIncome": ((10 + i) * 1_000_000).to_string(),
                "grossProfit": "None",
            })
        })
        .collect();
    json!({ "symbol": "INFY", "annualReports": reports, "quarterlyReports": [] })
}

#[test]
fn test_nine_year_income_statement() {
    let records = annual_reports(nine_year_income());
    let stmt = normalize(&records, &StatementManifest::income(), DEFAULT_PERIOD_WINDOW).unwrap();

    assert_eq!(stmt.kind, StatementKind::Income);
    assert_eq!(stmt.len(), 9);
    assert_eq!(
        stmt.column("net_income").unwrap(),
        vec![10, 11, 12, 13, 14, 15, 16, 17, 18]
    );
    assert_eq!(
        stmt.column("total_revenue").unwrap(),
        vec![100, 110, 120, 130, 140, 150, 160, 170, 180]
    );
    assert_eq!(stmt.dates().first(), NaiveDate::from_ymd_opt(2016, 3, 31).as_ref());
    assert_eq!(stmt.currency.as_deref(), Some("INR"));
}

#[test]
fn test_tenth_year_dropped() {
    let mut payload = nine_year_income();
    payload["annualReports"]
        .as_array_mut()
        .unwrap()
        .push(json!({
            "fiscalDateEnding": "2015-03-31",
            "totalRevenue": "90000000",
            "ebitda": "29000000",
            "netIncome": "9000000",
        }));

    let records = annual_reports(payload);
    assert_eq!(records.len(), 10);

    let stmt = normalize(&records, &StatementManifest::income(), DEFAULT_PERIOD_WINDOW).unwrap();
    assert_eq!(stmt.len(), 9);
    assert_eq!(stmt.dates()[0].year(), 2016);
    assert!(!stmt.column("net_income").unwrap().contains(&9));
}

#[test]
fn test_shuffled_balance_sheet() {
    let payload = json!({
        "annualReports": [
            {
                "fiscalDateEnding": "2021-03-31",
                "totalCurrentAssets": "3000000000",
                "cashAndCashEquivalentsAtCarryingValue": "300000000",
                "longTermDebt": "",
            },
            {
                "fiscalDateEnding": "2019-03-31",
                "totalCurrentAssets": "1000000000",
                "cashAndCashEquivalentsAtCarryingValue": "100000000",
                "longTermDebt": null,
            },
            {
                "fiscalDateEnding": "2020-03-31",
                "totalCurrentAssets": "2000000000",
                "cashAndCashEquivalentsAtCarryingValue": "200000000",
                "longTermDebt": "50000000",
            },
        ]
    });

    let stmt = normalize(
        &annual_reports(payload),
        &StatementManifest::balance_sheet(),
        DEFAULT_PERIOD_WINDOW,
    )
    .unwrap();

    let years: Vec<i32> = stmt.dates().iter().map(|d| d.year()).collect();
    assert_eq!(years, vec![2019, 2020, 2021]);
    assert_eq!(stmt.column("long_term_debt").unwrap(), vec![0, 50, 0]);
    assert_eq!(stmt.column("total_current_assets").unwrap(), vec![1000, 2000, 3000]);
    assert_eq!(stmt.column("cash_and_equivalents").unwrap(), vec![100, 200, 300]);
}
