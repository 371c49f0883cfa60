//! Built-in fallback catalogue.
//!
//! Served in place of backend data when a fetch fails and
//! `allow_mock_fallback` is on, and by the static option source for offline
//! development. Scoped lookups filter by parent id exactly as the backend does.

use std::sync::LazyLock;

use registrar_models::{
    Department, DepartmentId, FilterOptions, Program, School, SchoolId,
};

static CATALOG: LazyLock<FilterOptions> = LazyLock::new(|| FilterOptions {
    schools: vec![
        School::new("1", "School of Engineering", "ENG"),
        School::new("2", "School of Business", "BUS"),
        School::new("3", "School of Arts and Sciences", "SAS"),
        School::new("4", "School of Health Sciences", "HSC"),
    ],
    departments: vec![
        Department::new("10", "Computer Science", "CS", "1"),
        Department::new("11", "Electrical Engineering", "EE", "1"),
        Department::new("12", "Civil Engineering", "CE", "1"),
        Department::new("20", "Accounting and Finance", "ACF", "2"),
        Department::new("21", "Management", "MGT", "2"),
        Department::new("30", "Mathematics", "MATH", "3"),
        Department::new("31", "English and Literature", "ENGL", "3"),
        Department::new("40", "Nursing", "NUR", "4"),
        Department::new("41", "Public Health", "PH", "4"),
    ],
    programs: vec![
        Program::new("100", "Bachelor of Computer Science", "BCS", "10")
            .with_level("Undergraduate", "4 years"),
        Program::new("101", "Master of Computer Science", "MCS", "10")
            .with_level("Postgraduate", "2 years"),
        Program::new("110", "Bachelor of Electrical Engineering", "BEE", "11")
            .with_level("Undergraduate", "4 years"),
        Program::new("120", "Bachelor of Civil Engineering", "BCE", "12")
            .with_level("Undergraduate", "4 years"),
        Program::new("200", "Bachelor of Accounting", "BACC", "20")
            .with_level("Undergraduate", "3 years"),
        Program::new("210", "Master of Business Administration", "MBA", "21")
            .with_level("Postgraduate", "2 years"),
        Program::new("300", "Bachelor of Science in Mathematics", "BSM", "30")
            .with_level("Undergraduate", "3 years"),
        Program::new("310", "Bachelor of Arts in English", "BAE", "31")
            .with_level("Undergraduate", "3 years"),
        Program::new("400", "Bachelor of Science in Nursing", "BSN", "40")
            .with_level("Undergraduate", "4 years"),
        Program::new("410", "Master of Public Health", "MPH", "41")
            .with_level("Postgraduate", "2 years"),
    ],
});

/// The whole fallback catalogue.
pub fn catalog() -> &'static FilterOptions {
    &CATALOG
}

pub fn schools() -> Vec<School> {
    CATALOG.schools.clone()
}

pub fn departments_of(school: Option<&SchoolId>) -> Vec<Department> {
    CATALOG
        .departments
        .iter()
        .filter(|d| school.is_none_or(|s| d.school_id == *s))
        .cloned()
        .collect()
}

pub fn programs_of(department: Option<&DepartmentId>) -> Vec<Program> {
    CATALOG
        .programs
        .iter()
        .filter(|p| department.is_none_or(|d| p.department_id == *d))
        .cloned()
        .collect()
}
