use std::io::{Read, Write};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use super::classifier::{decode_classifications, RecordDecodeError};
use super::domain::{CategoryTable, ClassifiedStatement};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("row {row}: `punkte` must be a non-negative integer, got '{value}'")]
    InvalidPoints { row: usize, value: String },
    #[error(transparent)]
    Decode(#[from] RecordDecodeError),
}

/// Loads records exported as CSV with `aussage,kategorie,begründung[,punkte]`
/// headers. Missing points are filled from `weights`.
pub fn import_csv<R: Read>(
    reader: R,
    weights: &CategoryTable<u32>,
) -> Result<Vec<ClassifiedStatement>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut items = Vec::new();
    for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        let points = match row.punkte {
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| ImportError::InvalidPoints {
                row: index + 1,
                value: raw,
            })?),
            None => None,
        };
        items.push(json!({
            "aussage": row.aussage,
            "kategorie": row.kategorie,
            "begründung": row.begruendung.unwrap_or_default(),
            "punkte": points,
        }));
    }

    Ok(decode_classifications(Value::Array(items), weights)?)
}

/// Loads records in the classification service's JSON response shape.
pub fn import_json<R: Read>(
    reader: R,
    weights: &CategoryTable<u32>,
) -> Result<Vec<ClassifiedStatement>, ImportError> {
    let payload: Value = serde_json::from_reader(reader)?;
    Ok(decode_classifications(payload, weights)?)
}

/// Writes records as CSV that [`import_csv`] reads back.
pub fn export_csv<W: Write>(writer: W, records: &[ClassifiedStatement]) -> Result<(), ImportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(CsvExportRow {
            aussage: &record.text,
            kategorie: record.category.as_str(),
            begruendung: &record.justification,
            punkte: record.points,
        })?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "text")]
    aussage: String,
    #[serde(alias = "category")]
    kategorie: String,
    #[serde(
        rename = "begründung",
        alias = "begruendung",
        alias = "justification",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    begruendung: Option<String>,
    #[serde(
        alias = "points",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    punkte: Option<String>,
}

#[derive(Serialize)]
struct CsvExportRow<'a> {
    aussage: &'a str,
    kategorie: &'a str,
    #[serde(rename = "begründung")]
    begruendung: &'a str,
    punkte: u32,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
