//! Router Module Index
//!
//! Splits the category routes by access level. Write handlers are only
//! mounted together with the employee guard inside `employee_routes`.

/// Read-only routes open to anonymous clients.
pub mod public;

/// Write routes, each guarded by the employee role check.
pub mod employee;
