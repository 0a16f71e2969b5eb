//! Progressive tax engine: marginal bracket schedules and the bracket walk.

pub mod brackets;
pub mod income;

pub use brackets::{Band, TaxBracket, TaxSchedule};
pub use income::{calculate_tax, compute_tax, TaxInput, TaxResult};
