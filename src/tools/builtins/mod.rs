//! Built-in tools, grouped by domain.

pub mod math;
pub mod text;
