//! Data layer
//!
//! The loaded dataset (`DataTable`), typed cell comparison, and the CSV
//! loader that builds a table from a file.

pub mod datatable;
pub mod datatable_loaders;
pub mod datavalue_compare;
