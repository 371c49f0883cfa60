//! Cascading filter state.
//!
//! [`FilterState`] is the active tuple `(school, department, program,
//! searchTerm)`. It changes only by merging a [`FilterUpdate`], and merging
//! keeps the hierarchy consistent: a new school clears the department and
//! program, and a new department clears the program, before any explicitly
//! supplied child values are applied.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::catalog::{Department, Program, School};
use crate::ids::{DepartmentId, ProgramId, SchoolId};
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[schema(value_type = String, example = "all")]
    pub school: Selection<SchoolId>,
    #[schema(value_type = String, example = "all")]
    pub department: Selection<DepartmentId>,
    #[schema(value_type = String, example = "all")]
    pub program: Selection<ProgramId>,
    #[serde(default)]
    pub search_term: String,
}

/// A partial filter change. Absent fields keep their current value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "1")]
    pub school: Option<Selection<SchoolId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "all")]
    pub department: Option<Selection<DepartmentId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "all")]
    pub program: Option<Selection<ProgramId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub search_term: Option<String>,
}

/// Candidate pools currently loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub schools: Vec<School>,
    pub departments: Vec<Department>,
    pub programs: Vec<Program>,
}

impl FilterState {
    /// Builds an initial state from the all-`"all"` defaults plus overrides.
    pub fn with_overrides(overrides: &FilterUpdate) -> Self {
        FilterState::default().merged(overrides)
    }

    /// Returns the state after applying `update`.
    ///
    /// Changing `school` resets `department` and `program` to `"all"`;
    /// changing `department` resets `program`. Explicit child values carried
    /// by the same update are applied after the reset. Setting a field to its
    /// current value is not a change.
    pub fn merged(&self, update: &FilterUpdate) -> Self {
        let mut next = self.clone();

        if let Some(school) = &update.school
            && *school != next.school
        {
            next.school = school.clone();
            next.department = Selection::All;
            next.program = Selection::All;
        }

        if let Some(department) = &update.department
            && *department != next.department
        {
            next.department = department.clone();
            next.program = Selection::All;
        }

        if let Some(program) = &update.program {
            next.program = program.clone();
        }

        if let Some(term) = &update.search_term {
            next.search_term = term.clone();
        }

        next
    }

    /// Whether no level and no search term is constraining the view.
    pub fn is_unconstrained(&self) -> bool {
        self.school.is_all()
            && self.department.is_all()
            && self.program.is_all()
            && self.search_term.trim().is_empty()
    }
}

impl FilterUpdate {
    pub fn school(mut self, school: Selection<SchoolId>) -> Self {
        self.school = Some(school);
        self
    }

    pub fn department(mut self, department: Selection<DepartmentId>) -> Self {
        self.department = Some(department);
        self
    }

    pub fn program(mut self, program: Selection<ProgramId>) -> Self {
        self.program = Some(program);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.school.is_none()
            && self.department.is_none()
            && self.program.is_none()
            && self.search_term.is_none()
    }
}

/// How the department and program pools are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Fetch every pool up front.
    #[default]
    Eager,
    /// Fetch schools up front; departments and programs follow the selection.
    Lazy,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown load mode '{0}', expected 'eager' or 'lazy'")]
pub struct ParseLoadModeError(pub String);

impl FromStr for LoadMode {
    type Err = ParseLoadModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager" => Ok(LoadMode::Eager),
            "lazy" => Ok(LoadMode::Lazy),
            other => Err(ParseLoadModeError(other.to_string())),
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadMode::Eager => f.write_str("eager"),
            LoadMode::Lazy => f.write_str("lazy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(school: &str, department: &str, program: &str) -> FilterState {
        FilterState {
            school: Selection::one(school),
            department: Selection::one(department),
            program: Selection::one(program),
            search_term: String::new(),
        }
    }

    #[test]
    fn test_default_is_all() {
        let state = FilterState::default();
        assert!(state.school.is_all());
        assert!(state.department.is_all());
        assert!(state.program.is_all());
        assert!(state.search_term.is_empty());
        assert!(state.is_unconstrained());
    }

    #[test]
    fn test_new_school_resets_children() {
        let state = selected("1", "10", "100");
        let next = state.merged(&FilterUpdate::default().school(Selection::one("2")));
        assert_eq!(next.school, Selection::one("2"));
        assert!(next.department.is_all());
        assert!(next.program.is_all());
    }

    #[test]
    fn test_explicit_reset_matches_automatic_reset() {
        let state = selected("1", "10", "100");
        let explicit = state.merged(
            &FilterUpdate::default()
                .school(Selection::one("2"))
                .department(Selection::All)
                .program(Selection::All),
        );
        let automatic = state.merged(&FilterUpdate::default().school(Selection::one("2")));
        assert_eq!(explicit, automatic);
    }

    #[test]
    fn test_same_school_keeps_children() {
        let state = selected("1", "10", "100");
        let next = state.merged(&FilterUpdate::default().school(Selection::one("1")));
        assert_eq!(next, state);
    }

    #[test]
    fn test_new_department_resets_program() {
        let state = selected("1", "10", "100");
        let next = state.merged(&FilterUpdate::default().department(Selection::one("11")));
        assert_eq!(next.school, Selection::one("1"));
        assert_eq!(next.department, Selection::one("11"));
        assert!(next.program.is_all());
    }

    #[test]
    fn test_school_and_department_in_one_update() {
        let state = selected("1", "10", "100");
        let next = state.merged(
            &FilterUpdate::default()
                .school(Selection::one("2"))
                .department(Selection::one("20")),
        );
        assert_eq!(next.school, Selection::one("2"));
        assert_eq!(next.department, Selection::one("20"));
        assert!(next.program.is_all());
    }

    #[test]
    fn test_search_term_is_independent() {
        let state = selected("1", "10", "100");
        let next = state.merged(&FilterUpdate::default().search("comp"));
        assert_eq!(next.search_term, "comp");
        assert_eq!(next.department, Selection::one("10"));
        assert_eq!(next.program, Selection::one("100"));
    }

    #[test]
    fn test_update_deserializes_partial_json() {
        let update: FilterUpdate = serde_json::from_str(r#"{"school":"1"}"#).unwrap();
        assert_eq!(update.school, Some(Selection::one("1")));
        assert!(update.department.is_none());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_update_search_term_length_validation() {
        let update = FilterUpdate::default().search("x".repeat(201));
        assert!(update.validate().is_err());
        let update = FilterUpdate::default().search("computer");
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_state_serializes_sentinel() {
        let value = serde_json::to_value(FilterState::default()).unwrap();
        assert_eq!(value["school"], "all");
        assert_eq!(value["department"], "all");
        assert_eq!(value["program"], "all");
        assert_eq!(value["searchTerm"], "");
    }

    #[test]
    fn test_load_mode_parse() {
        assert_eq!("eager".parse::<LoadMode>().unwrap(), LoadMode::Eager);
        assert_eq!(" Lazy ".parse::<LoadMode>().unwrap(), LoadMode::Lazy);
        assert!("sometimes".parse::<LoadMode>().is_err());
        assert_eq!(LoadMode::default(), LoadMode::Eager);
    }
}
