//! Free-text search and consumer-side record filtering.
//!
//! The search term composes with the hierarchy by logical AND: a record is
//! kept only if it passes every selected level and matches the term.

use registrar_core::serde::{deserialize_optional_string, deserialize_string_id};
use registrar_models::{
    Department, DepartmentId, FilterOptions, FilterState, Program, ProgramId, School, SchoolId,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Case-insensitive substring match of `term` against any of `fields`.
///
/// A blank term matches everything.
pub fn matches_search(term: &str, fields: &[&str]) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for School {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.code.as_str()]
    }
}

impl Searchable for Department {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.code.as_str()]
    }
}

impl Searchable for Program {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.code.as_str()]
    }
}

/// Keeps the items matching `term`, preserving order.
pub fn search<'a, T, I>(items: I, term: &str) -> Vec<&'a T>
where
    T: Searchable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter(|item| matches_search(term, &item.search_fields()))
        .collect()
}

/// A record that sits somewhere in the academic hierarchy.
pub trait HierarchyScoped {
    fn school_id(&self) -> Option<&SchoolId>;
    fn department_id(&self) -> Option<&DepartmentId>;
    fn program_id(&self) -> Option<&ProgramId>;
}

/// A consumer-side list row (student, applicant, exam candidate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScopedRecord {
    #[serde(deserialize_with = "deserialize_string_id")]
    pub id: String,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<SchoolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<DepartmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<ProgramId>,
}

impl Searchable for ScopedRecord {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.id.as_str()];
        if let Some(email) = &self.email {
            fields.push(email);
        }
        fields
    }
}

impl HierarchyScoped for ScopedRecord {
    fn school_id(&self) -> Option<&SchoolId> {
        self.school_id.as_ref()
    }

    fn department_id(&self) -> Option<&DepartmentId> {
        self.department_id.as_ref()
    }

    fn program_id(&self) -> Option<&ProgramId> {
        self.program_id.as_ref()
    }
}

/// Filters consumer records by the hierarchy selection and search term.
///
/// A record missing its department or school is placed through the loaded
/// pools (program → department → school). A record that cannot be placed at a
/// selected level does not pass that level.
pub fn filter_records<'a, T>(
    records: &'a [T],
    state: &FilterState,
    options: &FilterOptions,
) -> Vec<&'a T>
where
    T: Searchable + HierarchyScoped,
{
    records
        .iter()
        .filter(|record| in_selection(*record, state, options))
        .filter(|record| matches_search(&state.search_term, &record.search_fields()))
        .collect()
}

fn in_selection<T: HierarchyScoped>(record: &T, state: &FilterState, options: &FilterOptions) -> bool {
    let program = record.program_id();
    let department = record.department_id().or_else(|| {
        let program = program?;
        options
            .programs
            .iter()
            .find(|p| p.id == *program)
            .map(|p| &p.department_id)
    });
    let school = record.school_id().or_else(|| {
        let department = department?;
        options
            .departments
            .iter()
            .find(|d| d.id == *department)
            .map(|d| &d.school_id)
    });

    level_admits(&state.school, school)
        && level_admits(&state.department, department)
        && level_admits(&state.program, program)
}

fn level_admits<I: PartialEq>(selection: &registrar_models::Selection<I>, id: Option<&I>) -> bool {
    match selection.as_one() {
        None => true,
        Some(selected) => id == Some(selected),
    }
}
