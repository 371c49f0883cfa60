//! Plain-text rendering for terminal output.

use std::fmt::Write;

use registrar_filters::{DataSource, FilterView};
use registrar_models::{Department, Program, School};

use crate::resolve::Listing;

pub fn schools_table(schools: &[School]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<8} {:<8} NAME", "ID", "CODE");
    for school in schools {
        let _ = writeln!(out, "{:<8} {:<8} {}", school.id, school.code, school.name);
    }
    out
}

pub fn departments_table(departments: &[Department]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<8} {:<8} {:<8} NAME", "ID", "CODE", "SCHOOL");
    for department in departments {
        let _ = writeln!(
            out,
            "{:<8} {:<8} {:<8} {}",
            department.id, department.code, department.school_id, department.name
        );
    }
    out
}

pub fn programs_table(programs: &[Program]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<8} {:<6} {:<14} NAME",
        "ID", "CODE", "DEPT", "LEVEL"
    );
    for program in programs {
        let _ = writeln!(
            out,
            "{:<8} {:<8} {:<6} {:<14} {}",
            program.id,
            program.code,
            program.department_id,
            program.level.as_deref().unwrap_or("-"),
            program.name
        );
    }
    out
}

/// One-line note when a listing did not come from the backend.
pub fn source_note<T>(listing: &Listing<T>) -> Option<String> {
    match (&listing.source, &listing.fallback_reason) {
        (DataSource::Fallback, Some(reason)) => {
            Some(format!("⚠️  Showing fallback data: {reason}"))
        }
        (DataSource::Fallback, None) => Some("⚠️  Showing fallback data".to_string()),
        _ => None,
    }
}

pub fn view_summary(view: &FilterView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Load mode:  {}", view.load_mode);
    let _ = writeln!(
        out,
        "School:     {}",
        describe(view.filters.school.as_wire(), view.current_school.as_ref().map(|s| s.name.as_str()))
    );
    let _ = writeln!(
        out,
        "Department: {}",
        describe(
            view.filters.department.as_wire(),
            view.current_department.as_ref().map(|d| d.name.as_str())
        )
    );
    let _ = writeln!(
        out,
        "Program:    {}",
        describe(view.filters.program.as_wire(), view.current_program.as_ref().map(|p| p.name.as_str()))
    );
    if !view.filters.search_term.is_empty() {
        let _ = writeln!(out, "Search:     {}", view.filters.search_term);
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error:      {error}");
    }

    let _ = writeln!(out, "\nDepartments ({}):", view.departments.len());
    out.push_str(&departments_table(&view.departments));
    let _ = writeln!(out, "\nPrograms ({}):", view.programs.len());
    out.push_str(&programs_table(&view.programs));
    out
}

fn describe(wire: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{wire} ({name})"),
        None => wire.to_string(),
    }
}
