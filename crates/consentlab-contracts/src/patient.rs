//! Patient intake types.
//!
//! `PatientDetails` is what the report extractor pulls out of a medical
//! report. Every field is a string in transit; callers coerce as needed.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Patient fields extracted from a free-text medical report.
///
/// Missing or null fields become empty strings. Numbers and booleans are
/// kept in their textual form so `"age": 42` and `"age": "42"` read the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDetails {
    #[serde(default, deserialize_with = "lenient_string")]
    pub patient_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub age: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub disease: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub treatment_course: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
}

impl PatientDetails {
    /// The age as whole years, if it reads as a number.
    ///
    /// Accepts "42", "42.0", and "42 years"; anything else yields `None`.
    pub fn age_years(&self) -> Option<u32> {
        let leading: String = self
            .age
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        leading.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u32)
    }

    /// Names of the fields that came back blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("patient_name", &self.patient_name),
            ("age", &self.age),
            ("gender", &self.gender),
            ("disease", &self.disease),
            ("treatment_course", &self.treatment_course),
            ("notes", &self.notes),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // Arrays and objects are not meaningful for a form field.
        Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Prefix shared by every hospital patient identifier.
pub const PATIENT_ID_PREFIX: &str = "CNLB-";

const PATIENT_ID_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// The 122 random bits of a v4 UUID, with the fixed version nibble and
/// variant bits squeezed out.
fn uuid_random_bits(id: Uuid) -> u128 {
    let bits = id.as_u128();
    let high = bits >> 80;
    let mid = (bits >> 64) & 0xFFF;
    let low = bits & ((1 << 62) - 1);
    (high << 74) | (mid << 62) | low
}

/// Generate a patient identifier: `CNLB-` plus eight characters drawn
/// uniformly from A–Z0–9.
pub fn generate_patient_id() -> String {
    let radix = PATIENT_ID_ALPHABET.len() as u128;
    let mut random = uuid_random_bits(Uuid::new_v4());
    let mut suffix = String::with_capacity(8);
    for _ in 0..8 {
        suffix.push(PATIENT_ID_ALPHABET[(random % radix) as usize] as char);
        random /= radix;
    }
    format!("{PATIENT_ID_PREFIX}{suffix}")
}
