//! File formats at the edge of the application.

pub mod csv;
