// formsift CLI - extract fillable fields from PDF forms into JSON
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use formsift::{run_batch, DocumentSource, ExtractorConfig, FieldExtractor};

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract fillable form fields from PDF documents")]
struct Args {
    /// Configuration file (TOML). Falls back to $FORMSIFT_CONFIG, then the user config dir
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract fields from PDFs given as paths, http(s) URLs or `-` for stdin
    Extract {
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print the effective configuration
    Config,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = ExtractorConfig::discover(args.config.as_deref())
        .context("loading configuration")?;

    match args.command {
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Extract {
            inputs,
            output,
            compact,
        } => {
            let extractor = FieldExtractor::new(config).context("building extractor")?;
            let sources: Vec<DocumentSource> =
                inputs.iter().map(|arg| DocumentSource::parse(arg)).collect();
            let report = run_batch(&extractor, &sources);

            match output {
                Some(path) => report
                    .write_to(&path, !compact)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", report.to_json(!compact)?),
            }

            log::info!(
                "Processed {} documents ({} failed)",
                report.documents,
                report.failed
            );
            Ok(if report.all_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
    }
}
