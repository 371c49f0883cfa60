//! Pure derivations over filter state and option pools.
//!
//! Nothing here mutates; every function may be called on every render and
//! returns equal results for equal inputs. Pool order is preserved.

use std::collections::HashSet;

use registrar_models::{Department, FilterOptions, FilterState, Program, School, Selection};

use crate::error::FilterError;

/// Departments valid for the selected school (the whole pool for `"all"`).
pub fn filtered_departments<'a>(
    state: &FilterState,
    options: &'a FilterOptions,
) -> Vec<&'a Department> {
    options
        .departments
        .iter()
        .filter(|d| state.school.admits(&d.school_id))
        .collect()
}

/// Programs valid for the selection.
///
/// A selected department wins regardless of the school. Otherwise a selected
/// school narrows programs to those of its departments.
pub fn filtered_programs<'a>(state: &FilterState, options: &'a FilterOptions) -> Vec<&'a Program> {
    match (&state.department, &state.school) {
        (Selection::One(department), _) => options
            .programs
            .iter()
            .filter(|p| p.department_id == *department)
            .collect(),
        (Selection::All, Selection::One(_)) => {
            let departments: HashSet<_> = filtered_departments(state, options)
                .into_iter()
                .map(|d| &d.id)
                .collect();
            options
                .programs
                .iter()
                .filter(|p| departments.contains(&p.department_id))
                .collect()
        }
        (Selection::All, Selection::All) => options.programs.iter().collect(),
    }
}

/// The selected school, if one is selected and loaded.
pub fn current_school<'a>(state: &FilterState, options: &'a FilterOptions) -> Option<&'a School> {
    let id = state.school.as_one()?;
    options.schools.iter().find(|s| s.id == *id)
}

/// The selected department, if one is selected and loaded.
pub fn current_department<'a>(
    state: &FilterState,
    options: &'a FilterOptions,
) -> Option<&'a Department> {
    let id = state.department.as_one()?;
    options.departments.iter().find(|d| d.id == *id)
}

/// The selected program, if one is selected and loaded.
pub fn current_program<'a>(state: &FilterState, options: &'a FilterOptions) -> Option<&'a Program> {
    let id = state.program.as_one()?;
    options.programs.iter().find(|p| p.id == *id)
}

/// Checks a candidate state against the loaded pools.
///
/// Only contradictions visible in the pools are reported; ids that are not
/// loaded yet are accepted as unknown.
pub fn validate_selection(state: &FilterState, options: &FilterOptions) -> Result<(), FilterError> {
    let department = current_department(state, options);
    let program = current_program(state, options);

    if let (Selection::One(school), Some(department)) = (&state.school, department)
        && department.school_id != *school
    {
        return Err(FilterError::DepartmentOutsideSchool {
            department: department.id.clone(),
            selected: school.clone(),
            actual: department.school_id.clone(),
        });
    }

    let Some(program) = program else {
        return Ok(());
    };

    match &state.department {
        Selection::One(selected) if program.department_id != *selected => {
            Err(FilterError::ProgramOutsideDepartment {
                program: program.id.clone(),
                selected: selected.clone(),
                actual: program.department_id.clone(),
            })
        }
        Selection::One(_) => Ok(()),
        Selection::All => {
            let Selection::One(school) = &state.school else {
                return Ok(());
            };
            let owner = options
                .departments
                .iter()
                .find(|d| d.id == program.department_id);
            match owner {
                Some(owner) if owner.school_id != *school => Err(FilterError::ProgramOutsideSchool {
                    program: program.id.clone(),
                    selected: school.clone(),
                    actual: owner.school_id.clone(),
                }),
                _ => Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_models::{FilterUpdate, SchoolId};

    fn scenario() -> FilterOptions {
        FilterOptions {
            schools: vec![School::new("1", "Eng", "ENG"), School::new("2", "Bus", "BUS")],
            departments: vec![
                Department::new("10", "CS", "CS", "1"),
                Department::new("11", "EE", "EE", "1"),
                Department::new("20", "ACC", "ACC", "2"),
            ],
            programs: vec![
                Program::new("100", "BCS", "BCS", "10"),
                Program::new("101", "BEE", "BEE", "11"),
                Program::new("200", "BACC", "BACC", "20"),
            ],
        }
    }

    fn ids<T, F: Fn(&T) -> &str>(items: &[&T], id: F) -> Vec<String> {
        items.iter().map(|item| id(item).to_string()).collect()
    }

    fn state(update: FilterUpdate) -> FilterState {
        FilterState::with_overrides(&update)
    }

    #[test]
    fn test_all_school_returns_whole_department_pool() {
        let options = scenario();
        let departments = filtered_departments(&FilterState::default(), &options);
        let expected: Vec<&Department> = options.departments.iter().collect();
        assert_eq!(departments, expected);
    }

    #[test]
    fn test_departments_of_selected_school() {
        let options = scenario();
        let state = state(FilterUpdate::default().school(Selection::one("1")));
        let departments = filtered_departments(&state, &options);
        assert_eq!(ids(&departments, |d| d.id.as_str()), vec!["10", "11"]);
    }

    #[test]
    fn test_programs_of_selected_department() {
        let options = scenario();
        let state = state(
            FilterUpdate::default()
                .school(Selection::one("1"))
                .department(Selection::one("10")),
        );
        let programs = filtered_programs(&state, &options);
        assert_eq!(ids(&programs, |p| p.id.as_str()), vec!["100"]);
    }

    #[test]
    fn test_department_wins_regardless_of_school() {
        let options = scenario();
        let state = FilterState {
            school: Selection::one("2"),
            department: Selection::one("10"),
            ..FilterState::default()
        };
        let programs = filtered_programs(&state, &options);
        assert_eq!(ids(&programs, |p| p.id.as_str()), vec!["100"]);
    }

    #[test]
    fn test_programs_of_selected_school() {
        let options = scenario();
        let state = state(FilterUpdate::default().school(Selection::one("1")));
        let programs = filtered_programs(&state, &options);
        assert_eq!(ids(&programs, |p| p.id.as_str()), vec!["100", "101"]);
    }

    #[test]
    fn test_unconstrained_programs_is_whole_pool() {
        let options = scenario();
        let programs = filtered_programs(&FilterState::default(), &options);
        assert_eq!(programs.len(), options.programs.len());
    }

    #[test]
    fn test_selectors_are_repeatable() {
        let options = scenario();
        let state = state(FilterUpdate::default().school(Selection::one("1")));
        assert_eq!(
            filtered_programs(&state, &options),
            filtered_programs(&state, &options)
        );
        assert_eq!(
            filtered_departments(&state, &options),
            filtered_departments(&state, &options)
        );
    }

    #[test]
    fn test_current_entities() {
        let options = scenario();
        let state = state(
            FilterUpdate::default()
                .school(Selection::one("1"))
                .department(Selection::one("11"))
                .program(Selection::one("101")),
        );
        assert_eq!(current_school(&state, &options).map(|s| s.name.as_str()), Some("Eng"));
        assert_eq!(current_department(&state, &options).map(|d| d.name.as_str()), Some("EE"));
        assert_eq!(current_program(&state, &options).map(|p| p.name.as_str()), Some("BEE"));
    }

    #[test]
    fn test_current_entity_absent_for_all_or_unloaded() {
        let options = scenario();
        assert!(current_school(&FilterState::default(), &options).is_none());

        let state = state(FilterUpdate::default().school(Selection::one("99")));
        assert!(current_school(&state, &options).is_none());
    }

    #[test]
    fn test_round_trip_program_reachable_from_its_school() {
        let options = scenario();
        for program in &options.programs {
            let department = options
                .departments
                .iter()
                .find(|d| d.id == program.department_id)
                .unwrap();
            let by_school = state(FilterUpdate::default().school(Selection::One(
                department.school_id.clone(),
            )));
            assert!(filtered_programs(&by_school, &options).contains(&program));

            let by_department = by_school.merged(
                &FilterUpdate::default().department(Selection::One(department.id.clone())),
            );
            assert!(filtered_programs(&by_department, &options).contains(&program));
        }
    }

    #[test]
    fn test_validate_accepts_consistent_selection() {
        let options = scenario();
        let state = state(
            FilterUpdate::default()
                .school(Selection::one("1"))
                .department(Selection::one("10"))
                .program(Selection::one("100")),
        );
        assert!(validate_selection(&state, &options).is_ok());
    }

    #[test]
    fn test_validate_rejects_department_of_other_school() {
        let options = scenario();
        let state = FilterState {
            school: Selection::one("1"),
            department: Selection::one("20"),
            ..FilterState::default()
        };
        assert_eq!(
            validate_selection(&state, &options),
            Err(FilterError::DepartmentOutsideSchool {
                department: "20".into(),
                selected: SchoolId::from("1"),
                actual: SchoolId::from("2"),
            })
        );
    }

    #[test]
    fn test_validate_rejects_program_of_other_department() {
        let options = scenario();
        let state = FilterState {
            department: Selection::one("10"),
            program: Selection::one("101"),
            ..FilterState::default()
        };
        assert!(matches!(
            validate_selection(&state, &options),
            Err(FilterError::ProgramOutsideDepartment { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_program_of_other_school() {
        let options = scenario();
        let state = FilterState {
            school: Selection::one("2"),
            program: Selection::one("100"),
            ..FilterState::default()
        };
        assert!(matches!(
            validate_selection(&state, &options),
            Err(FilterError::ProgramOutsideSchool { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_unloaded_ids() {
        let options = scenario();
        let state = FilterState {
            school: Selection::one("1"),
            department: Selection::one("77"),
            program: Selection::one("777"),
            ..FilterState::default()
        };
        assert!(validate_selection(&state, &options).is_ok());
    }
}
