pub mod catalog;
pub mod currency;
pub mod investment;
pub mod loan;
pub mod tax;

use clap::ValueEnum;
use fincalc_core::{TaxableIncomeFloor, ZeroRatePolicy};

/// `--zero-rate` choices for the loan commands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ZeroRateArg {
    /// Report the formula's division by zero as an error
    Singular,
    /// Split the principal evenly across the term
    Straight,
}

impl From<ZeroRateArg> for ZeroRatePolicy {
    fn from(arg: ZeroRateArg) -> Self {
        match arg {
            ZeroRateArg::Singular => ZeroRatePolicy::Singular,
            ZeroRateArg::Straight => ZeroRatePolicy::Straight,
        }
    }
}

/// `--taxable-floor` choices for the tax command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TaxableFloorArg {
    /// Let negative taxable income through the bracket walk
    None,
    /// Clamp taxable income at zero
    Zero,
}

impl From<TaxableFloorArg> for TaxableIncomeFloor {
    fn from(arg: TaxableFloorArg) -> Self {
        match arg {
            TaxableFloorArg::None => TaxableIncomeFloor::Unfloored,
            TaxableFloorArg::Zero => TaxableIncomeFloor::Zero,
        }
    }
}
