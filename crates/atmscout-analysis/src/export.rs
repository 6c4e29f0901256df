//! Tabular export of analyzed opportunities.
//!
//! Fixed column order consumed by downstream spreadsheet tooling. Unknown
//! distance serializes as an empty cell, never a numeric sentinel; the
//! distance value itself is rounded to two decimals at this boundary only,
//! so in-memory records keep full precision.

use std::path::Path;

use atmscout_core::OpportunityRecord;

use crate::error::AnalysisError;

/// Export column order. Downstream tooling matches on position, so this
/// order is a contract.
pub const EXPORT_COLUMNS: [&str; 14] = [
    "business_name",
    "address",
    "phone",
    "business_type",
    "latitude",
    "longitude",
    "has_bitcoin_atm",
    "existing_atm_operator",
    "distance_to_nearest_atm",
    "nearest_atm_operator",
    "google_rating",
    "opportunity_score",
    "status",
    "notes",
];

/// Render records as a CSV document (header + one row per record), in the
/// order given.
#[must_use]
pub fn to_csv_string(records: &[OpportunityRecord]) -> String {
    let mut out = String::new();
    out.push_str(&EXPORT_COLUMNS.join(","));
    out.push('\n');

    for record in records {
        let row = [
            csv_field(&record.business_name),
            csv_field(&record.address),
            csv_field(record.phone.as_deref().unwrap_or("")),
            csv_field(&record.business_type),
            record.latitude.map(fmt_float).unwrap_or_default(),
            record.longitude.map(fmt_float).unwrap_or_default(),
            record.has_competitor.to_string(),
            csv_field(&record.competitor_operator),
            record
                .nearest_distance_km
                .map(|d| format!("{d:.2}"))
                .unwrap_or_default(),
            csv_field(&record.nearest_operator),
            record.google_rating.map(fmt_float).unwrap_or_default(),
            record.score.to_string(),
            record.status.to_string(),
            csv_field(&record.notes),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Write records as CSV to `path`.
///
/// # Errors
///
/// Returns [`AnalysisError::ExportIo`] if the file cannot be written.
pub fn write_csv(path: &Path, records: &[OpportunityRecord]) -> Result<(), AnalysisError> {
    std::fs::write(path, to_csv_string(records)).map_err(|e| AnalysisError::ExportIo {
        path: path.display().to_string(),
        source: e,
    })
}

fn fmt_float(v: f64) -> String {
    format!("{v}")
}

/// RFC-4180 quoting: fields containing a comma, quote, or newline are
/// wrapped in quotes with inner quotes doubled.
fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use atmscout_core::OpportunityStatus;

    use super::*;

    fn record() -> OpportunityRecord {
        OpportunityRecord {
            business_name: "Test Gas Station".to_string(),
            address: "123 Main St, Miami, FL".to_string(),
            phone: Some("305-555-1234".to_string()),
            business_type: "Gas Station".to_string(),
            latitude: Some(25.7617),
            longitude: Some(-80.1918),
            has_competitor: false,
            competitor_operator: String::new(),
            nearest_distance_km: Some(1.2345),
            nearest_operator: "Bitcoin Depot".to_string(),
            google_rating: Some(4.2),
            score: 90,
            status: OpportunityStatus::NotContacted,
            notes: String::new(),
        }
    }

    #[test]
    fn header_matches_column_contract() {
        let csv = to_csv_string(&[]);
        assert_eq!(
            csv.lines().next().unwrap(),
            "business_name,address,phone,business_type,latitude,longitude,\
             has_bitcoin_atm,existing_atm_operator,distance_to_nearest_atm,\
             nearest_atm_operator,google_rating,opportunity_score,status,notes"
        );
    }

    #[test]
    fn distance_rounds_to_two_decimals() {
        let csv = to_csv_string(&[record()]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(",1.23,"), "row: {row}");
    }

    #[test]
    fn unknown_distance_is_empty_cell() {
        let mut r = record();
        r.nearest_distance_km = None;
        r.nearest_operator = String::new();
        let csv = to_csv_string(&[r]);
        let row = csv.lines().nth(1).unwrap();
        // ...,false,,,,4.2,...  — operator + distance + nearest all empty.
        assert!(row.contains("false,,,,4.2"), "row: {row}");
        assert!(!row.contains("inf"), "row: {row}");
    }

    #[test]
    fn address_with_commas_is_quoted() {
        let csv = to_csv_string(&[record()]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("\"123 Main St, Miami, FL\""), "row: {row}");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let mut r = record();
        r.business_name = "Lucky \"7\" Mart".to_string();
        let csv = to_csv_string(&[r]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Lucky \"\"7\"\" Mart\","), "row: {row}");
    }

    #[test]
    fn status_serializes_snake_case() {
        let csv = to_csv_string(&[record()]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(",not_contacted,"), "row: {row}");
    }

    #[test]
    fn row_count_matches_record_count() {
        let records = vec![record(), record(), record()];
        let csv = to_csv_string(&records);
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn missing_phone_and_rating_are_empty_cells() {
        let mut r = record();
        r.phone = None;
        r.google_rating = None;
        let csv = to_csv_string(&[r]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(",,Gas Station,"), "row: {row}");
        assert!(row.contains(",1.23,Bitcoin Depot,,90,"), "row: {row}");
    }
}
