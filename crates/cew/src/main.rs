use std::{env, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use cew::{
    config::Config,
    orchestrator::Orchestrator,
    sink::FolderSink,
    source::SourceChain,
};
use clap::{ArgAction, Parser};
use log::{LevelFilter, error, info};

/// Generate wrapper classes whose methods throw unchecked instead of checked exceptions
#[derive(Parser, Debug)]
#[command(name = "cew", version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./cew.toml, then the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Class to wrap, e.g. java/io/Reader (repeatable, added to configured classes)
    #[arg(long = "class", value_name = "UNIT")]
    classes: Vec<String>,

    /// Source archive or directory to search before configured ones (repeatable)
    #[arg(long = "source", value_name = "PATH")]
    sources: Vec<PathBuf>,

    /// Output folder for generated sources
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Prefix for generated class names
    #[arg(long)]
    prefix: Option<String>,

    /// Suffix for generated class names
    #[arg(long)]
    suffix: Option<String>,

    /// Exception type thrown in place of checked exceptions
    #[arg(long, value_name = "TYPE")]
    unchecked_type: Option<String>,

    /// Message passed to the unchecked exception
    #[arg(long)]
    message: Option<String>,

    /// JDK whose src.zip is searched last (defaults to $JDK_HOME)
    #[arg(long)]
    jdk_home: Option<PathBuf>,

    /// Stop at the first failing class
    #[arg(long)]
    fail_fast: bool,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Layer command line values over the loaded configuration
    fn apply_to(self, config: &mut Config) {
        config.classes.extend(self.classes);
        if !self.sources.is_empty() {
            let configured = std::mem::take(&mut config.source_paths);
            config.source_paths = self.sources.into_iter().chain(configured).collect();
        }
        if let Some(output) = self.output {
            config.output_folder = Some(output);
        }
        if let Some(prefix) = self.prefix {
            config.generated_name_prefix = prefix;
        }
        if let Some(suffix) = self.suffix {
            config.generated_name_suffix = suffix;
        }
        if let Some(unchecked_type) = self.unchecked_type {
            config.unchecked_failure_type = unchecked_type;
        }
        if let Some(message) = self.message {
            config.failure_message = message;
        }
        if let Some(jdk_home) = self.jdk_home {
            config.jdk_home = Some(jdk_home);
        }
        config.fail_fast |= self.fail_fast;
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure the worker pool")?;
    }

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.apply_jdk_home_env(env::var_os("JDK_HOME"));

    let output_folder = config.output_folder()?.to_path_buf();
    let units = config.units();
    if units.is_empty() {
        info!("No classes configured, nothing to do");
        return Ok(ExitCode::SUCCESS);
    }

    let source = SourceChain::from_locations(&config.source_locations());
    let sink = FolderSink::new(output_folder);
    let options = config.transform_options();
    let orchestrator = Orchestrator::new(&source, &sink, &options);

    if config.fail_fast {
        return match orchestrator.transform_all_fail_fast(&units) {
            Ok(_) => Ok(ExitCode::SUCCESS),
            Err(err) => {
                error!("{:#}", anyhow::Error::new(err));
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let mut failures = 0_usize;
    for outcome in orchestrator.transform_all(&units) {
        if let Err(err) = outcome.result {
            error!("{:#}", anyhow::Error::new(err));
            failures += 1;
        }
    }

    if failures == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        error!("{failures} of {} classes failed", units.len());
        Ok(ExitCode::FAILURE)
    }
}
