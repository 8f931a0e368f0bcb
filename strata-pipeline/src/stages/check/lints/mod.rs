//! Built-in lints for parsed units.

mod division_by_zero;
mod nesting_depth;
mod undefined_name;

pub use division_by_zero::DivisionByZeroLint;
pub use nesting_depth::NestingDepthLint;
pub use undefined_name::UndefinedNameLint;
