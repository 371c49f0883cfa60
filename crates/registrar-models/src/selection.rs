//! One level of a cascading filter.
//!
//! A level is either unconstrained (the `"all"` sentinel) or pinned to a
//! single entity id. On the wire the sentinel is the literal string `"all"`;
//! an empty string is not a valid selection.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire value meaning "no constraint at this level".
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Selection must be \"all\" or a non-empty identifier")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Selection<I> {
    #[default]
    All,
    One(I),
}

impl<I> Selection<I> {
    pub fn one(id: impl Into<I>) -> Self {
        Selection::One(id.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// The selected id, or `None` for `"all"`.
    pub fn as_one(&self) -> Option<&I> {
        match self {
            Selection::All => None,
            Selection::One(id) => Some(id),
        }
    }
}

impl<I: PartialEq> Selection<I> {
    /// Whether an entity with `id` passes this level of the filter.
    pub fn admits(&self, id: &I) -> bool {
        match self {
            Selection::All => true,
            Selection::One(selected) => selected == id,
        }
    }
}

impl<I: From<String>> Selection<I> {
    /// Parses a wire value: `"all"` or a non-empty identifier.
    pub fn parse(raw: &str) -> Result<Self, SelectionError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SelectionError::Empty);
        }
        if raw == ALL {
            return Ok(Selection::All);
        }
        Ok(Selection::One(I::from(raw.to_owned())))
    }
}

impl<I: AsRef<str>> Selection<I> {
    pub fn as_wire(&self) -> &str {
        match self {
            Selection::All => ALL,
            Selection::One(id) => id.as_ref(),
        }
    }
}

impl<I: AsRef<str>> fmt::Display for Selection<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl<I: AsRef<str>> Serialize for Selection<I> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de, I: From<String>> Deserialize<'de> for Selection<I> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = registrar_core::serde::deserialize_string_id(deserializer)?;
        Selection::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SchoolId;

    #[test]
    fn test_parse_sentinel() {
        assert_eq!(Selection::<SchoolId>::parse("all").unwrap(), Selection::All);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(
            Selection::<SchoolId>::parse("12").unwrap(),
            Selection::one("12")
        );
    }

    #[test]
    fn test_empty_is_not_all() {
        assert_eq!(
            Selection::<SchoolId>::parse(""),
            Err(SelectionError::Empty)
        );
        assert!(serde_json::from_str::<Selection<SchoolId>>(r#""""#).is_err());
    }

    #[test]
    fn test_serde_wire_format() {
        let all: Selection<SchoolId> = Selection::All;
        assert_eq!(serde_json::to_string(&all).unwrap(), r#""all""#);

        let one: Selection<SchoolId> = serde_json::from_str("5").unwrap();
        assert_eq!(one.as_one().map(SchoolId::as_str), Some("5"));
        assert_eq!(serde_json::to_string(&one).unwrap(), r#""5""#);
    }

    #[test]
    fn test_admits() {
        let all: Selection<SchoolId> = Selection::All;
        let one: Selection<SchoolId> = Selection::one("1");
        assert!(all.admits(&SchoolId::from("9")));
        assert!(one.admits(&SchoolId::from("1")));
        assert!(!one.admits(&SchoolId::from("2")));
    }
}
