//! Map validated CLI arguments to an action.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, ARG_DSN, ARG_MEMORY, ARG_PORT};
use anyhow::{anyhow, Result};

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let memory = matches.get_flag(ARG_MEMORY);
    let dsn = matches.get_one::<String>(ARG_DSN).cloned();

    if !memory && dsn.is_none() {
        return Err(anyhow!("missing required argument: --dsn"));
    }

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        memory,
        bcrypt_cost: auth_opts.bcrypt_cost,
    }))
}
