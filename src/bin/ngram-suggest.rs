//! ngram-suggest CLI binary.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;

use ngram_suggest::cli::args::SuggestArgs;
use ngram_suggest::cli::commands::execute_command;

fn main() {
    let args = SuggestArgs::parse();

    Builder::new()
        .filter_level(args.log_level())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(&args).map_err(anyhow::Error::from) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
