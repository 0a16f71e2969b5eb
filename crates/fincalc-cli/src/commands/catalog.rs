use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use fincalc_core::catalog::{self, Category};
use fincalc_core::settings::Settings;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Loan,
    Tax,
    Investment,
    Currency,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Loan => Category::Loan,
            CategoryArg::Tax => Category::Tax,
            CategoryArg::Investment => Category::Investment,
            CategoryArg::Currency => Category::Currency,
        }
    }
}

/// Arguments for listing calculators
#[derive(Args)]
pub struct ListArgs {
    /// Only list calculators in this category
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,
}

/// Arguments for running a calculator by slug
#[derive(Args)]
pub struct RunArgs {
    /// Calculator slug, as shown by `fincalc list`
    pub slug: String,

    /// Path to JSON input file (otherwise read from stdin)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_list(args: ListArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let entries: Vec<_> = match args.category {
        Some(category) => catalog::by_category(category.into()).collect(),
        None => catalog::catalog().iter().collect(),
    };
    Ok(json!({ "results": entries }))
}

pub fn run_calculator(
    args: RunArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let payload = match args.input {
        Some(ref path) => input::file::read_json_value(path)?,
        None => input::stdin::read_stdin()?
            .ok_or_else(|| format!("--input <file.json> or stdin required for '{}'", args.slug))?,
    };
    Ok(catalog::run(&args.slug, payload, settings)?)
}
