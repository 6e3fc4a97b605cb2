use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use fluxrepo_check::manifest;
use fluxrepo_check::report;
use fluxrepo_check::rules::RuleSet;

#[derive(Parser)]
#[command(
    name = "fluxrepo-check",
    about = "Validate Flux v2 HelmRepository and OCIRepository resources",
    version,
    author,
    long_about = None
)]
struct Cli {
    /// Directory containing kustomization.yaml and the repository resources
    #[arg(
        env = "FLUXREPO_CHECK_DIR",
        hide_env = true,
        default_value = "infrastructure/base/repositories"
    )]
    base_dir: PathBuf,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> miette::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    init_logging(cli.verbose);

    let rules = RuleSet::flux_v2();
    let run = manifest::run(&rules, &cli.base_dir)?;

    if run.is_empty() {
        report::print_empty_warning();
        return Ok(ExitCode::SUCCESS);
    }

    report::print_header(run.files.len());
    report::print_report(&run);

    if run.all_valid() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("fluxrepo_check=warn"),
        1 => EnvFilter::new("fluxrepo_check=info"),
        _ => EnvFilter::new("fluxrepo_check=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
