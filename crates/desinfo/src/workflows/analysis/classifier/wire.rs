use super::super::domain::{CategoryLabel, CategoryTable, ClassifiedStatement};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordDecodeError {
    #[error("expected a JSON array of records")]
    NotAnArray,
    #[error("record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Record layout sent by the classification service. German field names are
/// canonical; the English names are accepted as well.
#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(alias = "text")]
    aussage: String,
    #[serde(alias = "category")]
    kategorie: String,
    #[serde(rename = "begründung", alias = "begruendung", alias = "justification", default)]
    begruendung: String,
    #[serde(alias = "points", default)]
    punkte: Option<u32>,
}

/// Turns the service payload into classified statements.
///
/// Records without `punkte` get the configured weight of their category.
/// Supplied points are kept for display even when they disagree with the
/// weight; scoring never reads them.
pub fn decode_classifications(
    payload: Value,
    weights: &CategoryTable<u32>,
) -> Result<Vec<ClassifiedStatement>, RecordDecodeError> {
    let Value::Array(items) = payload else {
        return Err(RecordDecodeError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let record: WireRecord = serde_json::from_value(item).map_err(|err| {
                RecordDecodeError::InvalidRecord {
                    index,
                    reason: err.to_string(),
                }
            })?;
            Ok(into_statement(index, record, weights))
        })
        .collect()
}

fn into_statement(
    index: usize,
    record: WireRecord,
    weights: &CategoryTable<u32>,
) -> ClassifiedStatement {
    let category = CategoryLabel::parse(&record.kategorie);
    let expected = category.known().map(|known| *weights.get(known));

    if expected.is_none() {
        warn!(index, category = %category, "classifier returned an unrecognized category");
    }

    let points = match (record.punkte, expected) {
        (Some(supplied), Some(weight)) if supplied != weight => {
            warn!(
                index,
                category = %category,
                supplied,
                weight,
                "classifier points differ from configured weight"
            );
            supplied
        }
        (Some(supplied), _) => supplied,
        (None, weight) => weight.unwrap_or(0),
    };

    ClassifiedStatement::new(record.aussage, category, record.begruendung, points)
}
