use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use test_results::{
    FileCache, InputSpec, MergeDriver, MergeOptions, ParserRegistry, Report, expand_inputs,
    write_report,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "test-results")]
#[command(about = "Parse, normalize and merge test reports", version)]
struct Cli {
    /// Log every file processed
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse report files (or directories of them) into one merged report
    Compile {
        /// Report files or directories, each optionally suffixed with `:parser`
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<String>,

        /// Where to write the merged JSON report
        output: PathBuf,

        /// Parser for every input without its own suffix
        #[arg(short, long)]
        parser: Option<String>,

        /// Name forced onto every parsed run
        #[arg(short = 'N', long)]
        name: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Merge previously compiled JSON reports
    Combine {
        /// Compiled reports, raw or gzip-compressed
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Where to write the merged JSON report
        output: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Skip missing files and unknown parsers instead of failing
    #[arg(long)]
    ignore_missing: bool,

    /// Maximum characters kept from captured output (0 keeps everything)
    #[arg(long, default_value_t = 0)]
    trim_output_to: usize,

    /// Drop captured output of passing tests
    #[arg(long)]
    omit_output_for_passed: bool,

    /// Gzip the written report
    #[arg(long)]
    gzip: bool,
}

impl CommonArgs {
    fn options(&self) -> MergeOptions {
        MergeOptions::new()
            .ignore_missing(self.ignore_missing)
            .trim_output_to(self.trim_output_to)
            .omit_output_for_passed(self.omit_output_for_passed)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let registry = ParserRegistry::new();
    let cache = FileCache::new();

    match cli.command {
        Command::Compile {
            inputs,
            output,
            parser,
            name,
            common,
        } => {
            let mut options = common.options();
            options.parser = parser;
            options.name = name;

            let known = registry.names();
            let specs = inputs
                .iter()
                .map(|raw| InputSpec::parse(raw, &known))
                .collect();
            let specs = expand_inputs(specs, &registry.supported_extensions())
                .context("Failed to expand input directories")?;
            if specs.is_empty() {
                bail!("No report files found in the given inputs");
            }

            let driver = MergeDriver::new(&registry, &cache, options);
            let outcome = driver.compile(&specs).context("Failed to compile reports")?;

            for rejected in &outcome.rejected {
                warn!(
                    "Rejected run {} ({}): {}",
                    rejected.name, rejected.framework, rejected.status_message
                );
            }
            if outcome.report.test_results.is_empty() && !outcome.rejected.is_empty() {
                bail!("None of the {} inputs could be parsed", specs.len());
            }

            write(&output, &outcome.report, common.gzip)
        }
        Command::Combine {
            inputs,
            output,
            common,
        } => {
            let driver = MergeDriver::new(&registry, &cache, common.options());
            let report = driver.combine(&inputs).context("Failed to combine reports")?;
            write(&output, &report, common.gzip)
        }
    }
}

fn write(output: &Path, report: &Report, gzip: bool) -> Result<()> {
    write_report(output, report, gzip)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        "Wrote {} runs with {} tests to {}",
        report.test_results.len(),
        report.test_count(),
        output.display()
    );
    Ok(())
}
