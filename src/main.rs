use anyhow::{bail, Result};
use clap::Parser;

mod cli;
mod convert;
mod ext;
mod http;
mod marker;
mod model;
mod send_key;
mod services;
mod util;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  util::init_logging();

  match cli.command {
    Some(Commands::SendKey(args)) => {
      let cfg = cli::normalize_send_key(args)?;
      let outcome = send_key::execute(&cfg)?;
      util::print_json(&outcome)
    }
    Some(Commands::ConvertToolErrors(args)) => {
      let cfg = cli::normalize_convert(args)?;
      let report = convert::run(&cfg)?;
      util::print_json(&report)
    }
    None => bail!("Provide a command: send-key or convert-tool-errors (see --help)"),
  }
}
