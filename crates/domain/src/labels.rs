use serde::{Deserialize, Deserializer, Serialize};

/// Reviewer judgement for one capture. Always persisted as a whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub validity: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub color: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub shape: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub markings: String,
    #[serde(rename = "correctColor", default, deserialize_with = "null_as_false")]
    pub correct_color: bool,
    #[serde(rename = "correctShape", default, deserialize_with = "null_as_false")]
    pub correct_shape: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    Validity,
    Color,
    Shape,
    Markings,
}

impl LabelField {
    pub const ALL: [LabelField; 4] = [
        LabelField::Validity,
        LabelField::Color,
        LabelField::Shape,
        LabelField::Markings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Validity => "Validity",
            Self::Color => "Color",
            Self::Shape => "Shape",
            Self::Markings => "Markings",
        }
    }
}

impl Labels {
    pub fn field(&self, field: LabelField) -> &str {
        match field {
            LabelField::Validity => &self.validity,
            LabelField::Color => &self.color,
            LabelField::Shape => &self.shape,
            LabelField::Markings => &self.markings,
        }
    }

    pub fn field_mut(&mut self, field: LabelField) -> &mut String {
        match field {
            LabelField::Validity => &mut self.validity,
            LabelField::Color => &mut self.color,
            LabelField::Shape => &mut self.shape,
            LabelField::Markings => &mut self.markings,
        }
    }

    pub fn apply_verdict(&mut self, verdict: QuickVerdict) {
        self.correct_color = verdict.color_correct;
        self.correct_shape = verdict.shape_correct;
    }
}

/// One cell of the color x shape correctness grid used by quick validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickVerdict {
    pub color_correct: bool,
    pub shape_correct: bool,
}

impl QuickVerdict {
    pub const ALL: [QuickVerdict; 4] = [
        QuickVerdict::new(true, true),
        QuickVerdict::new(true, false),
        QuickVerdict::new(false, true),
        QuickVerdict::new(false, false),
    ];

    pub const fn new(color_correct: bool, shape_correct: bool) -> Self {
        Self {
            color_correct,
            shape_correct,
        }
    }

    pub fn caption(self) -> String {
        let mark = |correct: bool| if correct { "correct" } else { "wrong" };
        format!(
            "Color {} / Shape {}",
            mark(self.color_correct),
            mark(self.shape_correct)
        )
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_every_field() {
        let labels = Labels {
            validity: "valid".to_string(),
            correct_shape: true,
            ..Labels::default()
        };
        let value = serde_json::to_value(&labels).expect("json");
        let object = value.as_object().expect("object");
        assert_eq!(object.len(), 6);
        assert_eq!(object["validity"], "valid");
        assert_eq!(object["color"], "");
        assert_eq!(object["markings"], "");
        assert_eq!(object["correctColor"], false);
        assert_eq!(object["correctShape"], true);
    }

    #[test]
    fn missing_and_null_fields_load_as_blank() {
        let labels: Labels =
            serde_json::from_str(r#"{"validity": null, "shape": "round"}"#).expect("labels");
        assert_eq!(labels.validity, "");
        assert_eq!(labels.shape, "round");
        assert!(!labels.correct_color);
    }

    #[test]
    fn verdict_sets_both_flags_and_keeps_text() {
        let mut labels = Labels {
            color: "red".to_string(),
            ..Labels::default()
        };
        labels.apply_verdict(QuickVerdict::new(false, true));
        assert!(!labels.correct_color);
        assert!(labels.correct_shape);
        assert_eq!(labels.color, "red");
    }

    #[test]
    fn field_accessors_cover_all_text_fields() {
        let mut labels = Labels::default();
        for field in LabelField::ALL {
            labels.field_mut(field).push_str(field.title());
        }
        assert_eq!(labels.field(LabelField::Markings), "Markings");
        assert_eq!(labels.validity, "Validity");
    }
}
