use std::io::{stdin, stdout, BufWriter, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{arg, command, value_parser, ArgMatches, Command};
use regrep::{Fsm, Searcher};

const ABOUT: &str = r#"Prints the lines of a file matched by an FSM table

The table is read from standard input, as written by `recompile`:

    recompile 'ab*c' | research notes.txt
"#;

fn cli() -> Command {
    command!()
        .about("Prints the lines of a file matched by an FSM table")
        .long_about(ABOUT)
        .arg(
            arg!(<FILE>)
                .help("Path to the text file to search")
                .value_parser(value_parser!(PathBuf)),
        )
}

fn main() -> ExitCode {
    env_logger::init();
    let args = cli().get_matches();

    match cmd_search(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn cmd_search(args: &ArgMatches) -> anyhow::Result<()> {
    let file_path = args
        .get_one::<PathBuf>("FILE")
        .context("missing file to search")?;

    let mut table = String::new();
    stdin()
        .read_to_string(&mut table)
        .context("could not read FSM table from standard input")?;
    let fsm: Fsm = table.parse()?;
    log::debug!("loaded FSM table with {} states", fsm.len());

    let out = BufWriter::new(stdout().lock());
    let summary = Searcher::new(&fsm).search_path(file_path, out)?;

    if summary.matched_without_char {
        eprintln!("regex matched without a character match");
    }
    Ok(())
}
