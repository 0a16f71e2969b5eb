pub mod catalog;
pub mod error;
pub mod policy;
pub mod settings;
pub mod time_value;
pub mod types;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "currency")]
pub mod currency;

pub use error::FinCalcError;
pub use policy::{TaxableIncomeFloor, ZeroRatePolicy};
pub use settings::Settings;
pub use types::*;

/// Standard result type for all fincalc operations
pub type FinCalcResult<T> = Result<T, FinCalcError>;
