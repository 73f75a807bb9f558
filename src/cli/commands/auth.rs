use crate::credentials::{MAX_COST, MIN_COST};
use anyhow::{Context, Result};
use clap::{Arg, Command};

pub const ARG_BCRYPT_COST: &str = "bcrypt-cost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub bcrypt_cost: u32,
}

impl Options {
    /// # Errors
    /// Returns an error if the bcrypt cost is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let bcrypt_cost = matches
            .get_one::<u32>(ARG_BCRYPT_COST)
            .copied()
            .context("missing required argument: --bcrypt-cost")?;

        Ok(Self { bcrypt_cost })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_BCRYPT_COST)
            .long(ARG_BCRYPT_COST)
            .help("bcrypt work factor used to hash passwords")
            .env("TASKFLOW_BCRYPT_COST")
            .default_value("10")
            .value_parser(clap::value_parser!(u32).range(i64::from(MIN_COST)..=i64::from(MAX_COST))),
    )
}
