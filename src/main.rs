use ado_wiki::{config, output, pipeline};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Shared flags for commands that run the rewrite passes.
#[derive(clap::Args, Clone)]
struct PassArgs {
    /// Leave VitePress `::: tip` style containers unconverted
    #[arg(long)]
    no_admonitions: bool,
}

#[derive(Parser)]
#[command(name = "ado-wiki")]
#[command(about = "Convert a markdown documentation tree into an Azure DevOps wiki")]
#[command(long_about = "\
Convert a markdown documentation tree into an Azure DevOps wiki

The source tree is mirrored into the output directory. Markdown pages are
rewritten for the wiki dialect, everything else is copied unchanged.

Rewrites applied to every .md page:
  Front matter   leading --- / +++ metadata block removed
  Diagrams       ```mermaid fences → ::: mermaid, flowchart → graph,
                 <br/> → space, ----> → -->
  Links          [label](../outside/docs) → label
  Admonitions    ::: tip|warning|danger|info → > [!TIP|WARNING|CAUTION|NOTE]

After all pages are written, a root index.md that is missing, empty or a
template is replaced by a generated landing page, and a .order file is
written in every directory that holds pages.

Run 'ado-wiki gen-config' to generate a documented ado-wiki.toml.")]
#[command(version)]
struct Cli {
    /// Documentation source directory
    #[arg(long, default_value = "docs", global = true)]
    source: PathBuf,

    /// Wiki output directory (recreated on every run; must be empty or an earlier wiki)
    #[arg(long, default_value = "wiki", global = true)]
    output: PathBuf,

    /// Log every file (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert the source tree into a fresh wiki tree
    Convert {
        #[command(flatten)]
        passes: PassArgs,
        /// Also write the run report as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Run every pass in memory and report, without writing anything
    Check {
        #[command(flatten)]
        passes: PassArgs,
    },
    /// Print a stock ado-wiki.toml with all options documented
    GenConfig,
}

const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Convert { passes, report } => {
            let config = load_config(&cli.source, passes)?;
            init_thread_pool(&config.processing);

            let run_report = pipeline::convert(&cli.source, &cli.output, &config)?;
            output::print_run_summary(
                &run_report,
                &cli.source,
                Some(&cli.output),
                &config.landing.page,
            );
            if let Some(path) = report {
                let json = serde_json::to_string_pretty(&run_report)?;
                std::fs::write(path, json)?;
            }
            Ok(exit_code(run_report.succeeded()))
        }
        Command::Check { passes } => {
            let config = load_config(&cli.source, passes)?;
            init_thread_pool(&config.processing);

            let run_report = pipeline::check(&cli.source, &config)?;
            output::print_run_summary(&run_report, &cli.source, None, &config.landing.page);
            Ok(exit_code(run_report.succeeded()))
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load `ado-wiki.toml` from the source root and apply CLI overrides.
fn load_config(
    source: &Path,
    passes: &PassArgs,
) -> Result<config::WikiConfig, pipeline::PipelineError> {
    let mut config = config::load_config(source)?;
    if passes.no_admonitions {
        config.passes.admonitions = false;
    }
    Ok(config)
}

fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Log to stderr so stdout carries only the summary.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. User can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
