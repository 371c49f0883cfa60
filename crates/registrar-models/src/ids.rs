//! Strongly-typed ID newtypes for the academic hierarchy.
//!
//! The registrar backend hands out opaque string identifiers. Wrapping them per
//! entity keeps a `DepartmentId` from being passed where a `SchoolId` is
//! expected.
//!
//! ```ignore
//! use registrar_models::ids::{DepartmentId, SchoolId};
//!
//! fn departments_of(school: &SchoolId) { /* ... */ }
//!
//! departments_of(&SchoolId::from("1"));         // OK
//! // departments_of(&DepartmentId::from("10")); // Compile error! Type mismatch.
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Defines a string-backed ID newtype.
///
/// Deserialization accepts both JSON strings and integers.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
        #[serde(transparent)]
        #[schema(value_type = String)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from anything string-like.
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Take the raw identifier.
            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                registrar_core::serde::deserialize_string_id(deserializer).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`School`](crate::catalog::School).
    SchoolId
);

define_id!(
    /// Identifier of a [`Department`](crate::catalog::Department).
    DepartmentId
);

define_id!(
    /// Identifier of a [`Program`](crate::catalog::Program).
    ProgramId
);
