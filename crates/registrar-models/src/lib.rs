//! # Registrar Models
//!
//! Domain models for the registrar academic hierarchy and the cascading
//! filter built on top of it.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed identifier newtypes
//! - [`catalog`]: Schools, departments and programs
//! - [`selection`]: A single level of a cascading filter (`"all"` or one id)
//! - [`filters`]: Filter state, partial updates, option pools and load modes
//!
//! # Hierarchy
//!
//! ```text
//! School
//!     ↓ schoolId
//! Department
//!     ↓ departmentId
//! Program
//! ```

pub mod catalog;
pub mod filters;
pub mod ids;
pub mod selection;

pub use catalog::{Department, Program, School};
pub use filters::{FilterOptions, FilterState, FilterUpdate, LoadMode, ParseLoadModeError};
pub use ids::{DepartmentId, ProgramId, SchoolId};
pub use selection::{ALL, Selection, SelectionError};
