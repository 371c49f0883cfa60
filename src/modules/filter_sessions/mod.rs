//! Filter sessions: one cascading filter store per consumer view.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
