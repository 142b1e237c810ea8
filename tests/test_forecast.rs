//! Quarter labels, rounding, and the JSON response shape.

mod common;

use gdp_forecast::forecast::round2;
use gdp_forecast::{ForecastResponse, ForecastRow, Quarter, QuarterlyEstimate};
use rstest::rstest;

use common::date;

#[rstest]
#[case(1, Quarter::Q1)]
#[case(3, Quarter::Q1)]
#[case(4, Quarter::Q2)]
#[case(6, Quarter::Q2)]
#[case(7, Quarter::Q3)]
#[case(9, Quarter::Q3)]
#[case(10, Quarter::Q4)]
#[case(12, Quarter::Q4)]
fn quarter_follows_month(#[case] month: u32, #[case] expected: Quarter) {
    assert_eq!(Quarter::from_month(month), expected);
    assert_eq!(Quarter::from_date(date(2027, month, 28)), expected);
}

#[test]
fn quarter_labels_render_as_q_number() {
    let labels: Vec<String> = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4]
        .iter()
        .map(|q| q.to_string())
        .collect();
    assert_eq!(labels, vec!["Q1", "Q2", "Q3", "Q4"]);
    assert_eq!(serde_json::to_value(Quarter::Q3).unwrap(), "Q3");
}

#[test]
fn forecast_row_derives_quarter_from_timestamp() {
    let row = ForecastRow {
        timestamp: date(2030, 11, 1),
        point_estimate: 1.0,
        upper_bound: 2.0,
        lower_bound: 0.0,
    };
    assert_eq!(row.quarter_label(), Quarter::Q4);
}

#[rstest]
#[case(1.234, 1.23)]
#[case(1.235_000_1, 1.24)]
#[case(-7.456, -7.46)]
#[case(182_315.660_426, 182_315.66)]
#[case(0.125, 0.12)]
#[case(100.0, 100.0)]
fn round2_keeps_two_decimals(#[case] raw: f64, #[case] expected: f64) {
    assert_eq!(round2(raw), expected);
}

#[test]
fn response_serializes_with_original_field_names() {
    let response = ForecastResponse {
        year: 2026,
        model: "Prophet GDP Forecaster".to_string(),
        gdp_value: vec![QuarterlyEstimate {
            quarter: Quarter::Q1,
            gdp_prediction: 190_540.13,
            upper_boundary: 194_000.5,
            lower_boundary: 187_079.76,
        }],
    };

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "year": 2026,
            "model": "Prophet GDP Forecaster",
            "GDP Value": [{
                "quarter": "Q1",
                "gdp_prediction": 190540.13,
                "upper_boundary": 194000.5,
                "lower_boundary": 187079.76
            }]
        })
    );

    let back: ForecastResponse = serde_json::from_value(value).unwrap();
    assert_eq!(back, response);
}
