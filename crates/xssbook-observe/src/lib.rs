//! Observability for XSSBook: subscriber setup and span field names.

pub mod fields;
pub mod tracing_setup;
