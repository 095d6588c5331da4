//! sherpats - TypeScript client generator for sherpa APIs
//!
//! Reads sherpadoc JSON from stdin and writes a TypeScript module to stdout:
//!
//! ```text
//! sherpats [OPTIONS] <API-NAME | BASE-URL> < api.json > api.ts
//! ```
//!
//! A target containing a slash is used as the literal base URL. Otherwise it
//! is the API name, and the base URL is derived from the location of the page
//! loading the client.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

mod config;
mod generate;
mod logging;

#[derive(Parser)]
#[command(name = "sherpats")]
#[command(author, version, about = "Generate a TypeScript client from sherpadoc JSON", long_about = None)]
struct Cli {
    /// API name, or base URL of the API when it contains a slash
    target: String,

    /// Wrap the generated code in a TypeScript namespace
    #[arg(long)]
    namespace: Option<String>,

    /// Generate nullable types for arrays
    #[arg(long)]
    slices_nullable: bool,

    /// Make nullable struct members optional
    #[arg(long)]
    nullable_optional: bool,

    /// TOML file with generator options, overridden by flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let overrides = config::Overrides {
        namespace: cli.namespace,
        slices_nullable: cli.slices_nullable,
        nullable_optional: cli.nullable_optional,
    };
    let result = config::load(cli.config.as_deref())
        .map(|file| overrides.apply(file))
        .and_then(|options| {
            generate::run(
                &cli.target,
                &options,
                std::io::stdin().lock(),
                std::io::stdout().lock(),
            )
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sherpats: {err:#}");
            ExitCode::FAILURE
        }
    }
}
