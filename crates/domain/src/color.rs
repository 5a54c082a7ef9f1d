use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const UNKNOWN_COLOR: &str = "Unknown color";

/// RGB triple as delivered by the server. Components are either unit floats
/// (`[1, 0, 0]`) or 8-bit values (`[255, 0, 0]`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [f64; 3]);

impl Rgb {
    pub fn to_rgb8(self) -> [u8; 3] {
        let unit_scale = self.0.iter().all(|component| *component <= 1.0);
        self.0.map(|component| {
            let scaled = if unit_scale {
                component * 255.0
            } else {
                component
            };
            scaled.round().clamp(0.0, 255.0) as u8
        })
    }
}

/// A mapping value is either a bare display name or a `{name, rgb}` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorEntry {
    Name(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        rgb: Option<Rgb>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColor {
    pub name: String,
    pub rgb: Option<Rgb>,
}

/// Server-provided lookup from color-prediction code to display data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMapping(BTreeMap<String, ColorEntry>);

impl ColorMapping {
    pub fn new(entries: BTreeMap<String, ColorEntry>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn resolve(&self, code: &str) -> Option<ResolvedColor> {
        match self.0.get(code.trim())? {
            ColorEntry::Name(name) => Some(ResolvedColor {
                name: name.clone(),
                rgb: None,
            }),
            ColorEntry::Detailed { name, rgb } => name.as_ref().map(|name| ResolvedColor {
                name: name.clone(),
                rgb: *rgb,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(json: &str) -> ColorMapping {
        serde_json::from_str(json).expect("mapping json")
    }

    #[test]
    fn resolves_both_entry_shapes() {
        let mapping = mapping(r#"{"3": {"name": "Red", "rgb": [1, 0, 0]}, "5": "Blue"}"#);

        let red = mapping.resolve("3").expect("red");
        assert_eq!(red.name, "Red");
        assert_eq!(red.rgb, Some(Rgb([1.0, 0.0, 0.0])));

        let blue = mapping.resolve("5").expect("blue");
        assert_eq!(blue.name, "Blue");
        assert_eq!(blue.rgb, None);

        assert!(mapping.resolve("9").is_none());
    }

    #[test]
    fn record_without_name_resolves_to_nothing() {
        let mapping = mapping(r#"{"4": {"rgb": [0, 0, 1]}}"#);
        assert!(mapping.resolve("4").is_none());
    }

    #[test]
    fn rgb_scales_unit_and_byte_components() {
        assert_eq!(Rgb([1.0, 0.5, 0.0]).to_rgb8(), [255, 128, 0]);
        assert_eq!(Rgb([200.0, 16.0, 300.0]).to_rgb8(), [200, 16, 255]);
    }
}
