use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;
use unpx::cli::{Cli, Commands};
use unpx::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let printer = Printer::new()
        .with_quiet(cli.quiet)
        .with_verbose(cli.verbose > 0);

    match cli.command {
        Commands::Unpack(args) => unpx::cli::unpack::run(args, &printer)?,
        Commands::Inspect(args) => unpx::cli::inspect::run(args, &printer)?,
        Commands::Validate(args) => unpx::cli::validate::run(args, &printer)?,
        Commands::List(args) => unpx::cli::list::run(args, &printer)?,
        Commands::Init(args) => unpx::cli::init::run(args, &printer)?,
        Commands::Completions(args) => unpx::cli::completions::run(args)?,
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 | 1 => "warn",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
