//! knoex CLI: word-sense disambiguation and concept-graph extraction.
//!
//! Resolves batches of tagged terms (or Hearst-pattern triples) against a
//! WordNet-style lexicon and writes the resulting concept graphs as JSON.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
