//! Parsing of the `brick_info.txt` blob that accompanies each capture.
//!
//! The blob is one `Key Name: value` pair per line. Keys are normalised to
//! `snake_case`, values become numbers when they parse as finite floats and
//! stay text otherwise. Only the first colon splits, so timestamps such as
//! `Photo Timestamp: 12:30:45` keep their value intact.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::{ColorMapping, Rgb, UNKNOWN_COLOR};

pub const COLOR_PREDICTION_KEY: &str = "color_prediction";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Self::Number(number),
            _ => Self::Text(trimmed.to_string()),
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) if number.fract() == 0.0 && number.abs() < 1e15 => {
                write!(f, "{}", *number as i64)
            }
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrickRecord {
    pub fields: BTreeMap<String, FieldValue>,
    /// Filled by [`BrickRecord::recode_color`] when the mapping carries one.
    pub color_rgb: Option<Rgb>,
}

impl BrickRecord {
    pub fn parse(text: &str) -> Self {
        let mut fields = BTreeMap::new();
        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = normalize_key(key);
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                continue;
            }
            fields.insert(key, FieldValue::coerce(value));
        }
        Self {
            fields,
            color_rgb: None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Replaces the numeric color prediction with its display name.
    pub fn recode_color(&mut self, mapping: &ColorMapping) {
        let resolved = self
            .fields
            .get(COLOR_PREDICTION_KEY)
            .and_then(|code| mapping.resolve(&code.to_string()));

        match resolved {
            Some(color) => {
                self.fields
                    .insert(COLOR_PREDICTION_KEY.to_string(), FieldValue::Text(color.name));
                self.color_rgb = color.rgb;
            }
            None => {
                self.fields.insert(
                    COLOR_PREDICTION_KEY.to_string(),
                    FieldValue::Text(UNKNOWN_COLOR.to_string()),
                );
                self.color_rgb = None;
            }
        }
    }
}

/// `"Trigger Id"` becomes `"trigger_id"`.
pub fn normalize_key(key: &str) -> String {
    key.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Display view of a parsed and recoded record.
#[derive(Debug, Clone, PartialEq)]
pub struct BrickInfo {
    pub trigger_id: Option<FieldValue>,
    pub brick_id: Option<FieldValue>,
    pub super_id: Option<FieldValue>,
    pub bucket_number: Option<FieldValue>,
    pub photo_timestamp: Option<FieldValue>,
    pub laser_timestamp: Option<FieldValue>,
    pub color_prediction: String,
    pub color_rgb: Option<Rgb>,
    /// Lines the view has no dedicated slot for.
    pub extra: BTreeMap<String, FieldValue>,
}

impl BrickInfo {
    pub fn parse(text: &str, mapping: &ColorMapping) -> Self {
        let mut record = BrickRecord::parse(text);
        record.recode_color(mapping);
        Self::from_record(record)
    }

    pub fn from_record(record: BrickRecord) -> Self {
        let BrickRecord {
            mut fields,
            color_rgb,
        } = record;
        let color_prediction = fields
            .remove(COLOR_PREDICTION_KEY)
            .map(|value| value.to_string())
            .unwrap_or_else(|| UNKNOWN_COLOR.to_string());

        Self {
            trigger_id: fields.remove("trigger_id"),
            brick_id: fields.remove("brick_id"),
            super_id: fields.remove("super_id"),
            bucket_number: fields.remove("bucket_number"),
            photo_timestamp: fields.remove("photo_timestamp"),
            laser_timestamp: fields.remove("laser_timestamp"),
            color_prediction,
            color_rgb,
            extra: fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_mapping() -> ColorMapping {
        serde_json::from_str(r#"{"3": {"name": "Red", "rgb": [1, 0, 0]}}"#).expect("mapping")
    }

    #[test]
    fn parses_numeric_fields_before_recoding() {
        let record = BrickRecord::parse("Trigger Id: 5\nColor Prediction: 3\n");
        assert_eq!(record.get("trigger_id"), Some(&FieldValue::Number(5.0)));
        assert_eq!(record.get("color_prediction"), Some(&FieldValue::Number(3.0)));
        assert_eq!(record.fields.len(), 2);
    }

    #[test]
    fn empty_input_gives_empty_record() {
        assert!(BrickRecord::parse("").is_empty());
        assert!(BrickRecord::parse("\n\n   \n").is_empty());
    }

    #[test]
    fn skips_lines_without_colon_or_parts() {
        let record = BrickRecord::parse("BadLine\n: orphan\nSuper Id:\nBucket Number: 4");
        assert_eq!(record.fields.len(), 1);
        assert_eq!(record.get("bucket_number"), Some(&FieldValue::Number(4.0)));
    }

    #[test]
    fn last_duplicate_wins_and_near_numbers_stay_text() {
        let record = BrickRecord::parse("Brick Id: 1\nBrick Id: 12ab\nSuper Id: 1.2.3\nNote: NaN");
        assert_eq!(
            record.get("brick_id"),
            Some(&FieldValue::Text("12ab".to_string()))
        );
        assert_eq!(
            record.get("super_id"),
            Some(&FieldValue::Text("1.2.3".to_string()))
        );
        assert_eq!(record.get("note"), Some(&FieldValue::Text("NaN".to_string())));
    }

    #[test]
    fn values_keep_colons_after_the_first() {
        let record = BrickRecord::parse("Photo Timestamp: 2024-05-01 12:30:45");
        assert_eq!(
            record.get("photo_timestamp"),
            Some(&FieldValue::Text("2024-05-01 12:30:45".to_string()))
        );
    }

    #[test]
    fn recodes_known_color_with_rgb() {
        let mut record = BrickRecord::parse("Color Prediction: 3");
        record.recode_color(&red_mapping());
        assert_eq!(
            record.get(COLOR_PREDICTION_KEY),
            Some(&FieldValue::Text("Red".to_string()))
        );
        assert_eq!(record.color_rgb, Some(Rgb([1.0, 0.0, 0.0])));
    }

    #[test]
    fn unknown_code_falls_back_to_marker() {
        let mut record = BrickRecord::parse("Color Prediction: 8");
        record.recode_color(&red_mapping());
        assert_eq!(
            record.get(COLOR_PREDICTION_KEY),
            Some(&FieldValue::Text(UNKNOWN_COLOR.to_string()))
        );
        assert_eq!(record.color_rgb, None);
    }

    #[test]
    fn info_view_splits_known_fields() {
        let info = BrickInfo::parse(
            "Trigger Id: 17\nColor Prediction: 3\nSuper Id: S-9\n\
             Bucket Number: 2\nConfidence: 0.82",
            &red_mapping(),
        );
        assert_eq!(info.color_prediction, "Red");
        assert_eq!(info.trigger_id.map(|v| v.to_string()), Some("17".to_string()));
        assert_eq!(info.super_id, Some(FieldValue::Text("S-9".to_string())));
        assert_eq!(info.extra.get("confidence"), Some(&FieldValue::Number(0.82)));
        assert!(info.brick_id.is_none());
    }

    #[test]
    fn normalizes_keys_to_snake_case() {
        assert_eq!(normalize_key("  Laser   Timestamp "), "laser_timestamp");
        assert_eq!(normalize_key("Super-ID"), "super_id");
    }
}
