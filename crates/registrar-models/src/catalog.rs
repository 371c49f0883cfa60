//! Academic catalogue entities.
//!
//! These are read-only reference data from the filter's point of view. Field
//! names follow the registrar backend (`schoolId`, `departmentId`).

use registrar_core::serde::deserialize_optional_string;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ids::{DepartmentId, ProgramId, SchoolId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    pub school_id: SchoolId,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    pub department_id: DepartmentId,
    /// Award level, e.g. "Undergraduate" or "Masters".
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<String>,
    /// Nominal duration as reported by the backend, e.g. "4 years".
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl School {
    pub fn new(id: impl Into<SchoolId>, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            description: None,
        }
    }
}

impl Department {
    pub fn new(
        id: impl Into<DepartmentId>,
        name: impl Into<String>,
        code: impl Into<String>,
        school_id: impl Into<SchoolId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            school_id: school_id.into(),
            description: None,
        }
    }
}

impl Program {
    pub fn new(
        id: impl Into<ProgramId>,
        name: impl Into<String>,
        code: impl Into<String>,
        department_id: impl Into<DepartmentId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            department_id: department_id.into(),
            level: None,
            duration: None,
            description: None,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>, duration: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self.duration = Some(duration.into());
        self
    }
}
