use std::io::{stdout, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::{arg, command, ArgMatches, Command};
use regrep::{Compiler, Config};

const ABOUT: &str = r#"Compiles a regular expression into an FSM table

The table is written to standard output, one state per line, in the form
`index,type,next1,next2`. Pipe it into `research` to search a file.
"#;

fn cli() -> Command {
    command!()
        .about("Compiles a regular expression into an FSM table")
        .long_about(ABOUT)
        .arg(
            arg!(<REGEX>)
                .help("The regular expression to compile")
                .allow_hyphen_values(true),
        )
        .arg(arg!(-c --"no-compress").help("Disable FSM compression"))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = cli().get_matches();

    match cmd_compile(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn cmd_compile(args: &ArgMatches) -> anyhow::Result<()> {
    let pattern = args
        .get_one::<String>("REGEX")
        .context("missing regular expression")?;
    let config = Config::new().compress(!args.get_flag("no-compress"));

    let fsm = Compiler::new()
        .configure(config)
        .compile(pattern)
        .with_context(|| format!("could not compile `{}`", pattern))?;

    // Nothing reaches stdout unless the whole table was built.
    let mut out = stdout().lock();
    write!(out, "{}", fsm).context("could not write FSM table")?;
    out.flush().context("could not write FSM table")?;
    Ok(())
}
