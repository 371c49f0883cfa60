use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Uint(u64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Uint(n) => n.to_string(),
        }
    }
}

/// Accepts an identifier encoded either as a JSON string or an integer.
///
/// The registrar backend is not consistent about id encoding, so both `"10"`
/// and `10` decode to `"10"`.
pub fn deserialize_string_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

/// Deserializes optional free text, treating empty strings as `None`.
///
/// Numbers are accepted and rendered as text (`"duration": 4` becomes `"4"`).
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    match opt.map(String::from) {
        Some(s) if s.trim().is_empty() => Ok(None),
        other => Ok(other),
    }
}
