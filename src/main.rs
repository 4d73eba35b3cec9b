use clap::Parser;
use pgdump_header::{extract, to_json_pretty, Config, Header, HeaderError, Input};
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pgdump-header", version, about = "Print the header of a pg_dump archive as JSON")]
struct Args {
    /// Dump to read the header of
    #[arg(long)]
    filename: Option<PathBuf>,

    /// Read the dump from standard input
    #[arg(long)]
    stdin: bool,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let cfg = Config {
        filename: args.filename,
        stdin: args.stdin,
    };
    let input = match cfg.validate() {
        Ok(input) => input,
        Err(e) => {
            eprintln!("pgdump-header: {}", e);
            return ExitCode::from(2);
        }
    };

    match run(&input, args.pretty) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pgdump-header: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(input: &Input, pretty: bool) -> Result<(), HeaderError> {
    let mut reader = input.open()?;

    let json = if pretty {
        to_json_pretty(&Header::parse(&mut reader)?)?
    } else {
        extract(&mut reader)?
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(&json)?;
    if pretty {
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}
