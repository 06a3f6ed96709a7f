use std::process::ExitCode;

use owo_colors::OwoColorize;
use speedup_sweep::{
    cli::Cli,
    config::{Config, SweepSettings},
    report, Aggregator, SpeedupRecord, SweepError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_logging(args.verbose);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red(), e);
            match e.downcast_ref::<SweepError>() {
                Some(sweep) => sweep.exit_code(),
                None => ExitCode::FAILURE,
            }
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: &Cli) -> anyhow::Result<()> {
    let cfg = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let settings = SweepSettings::resolve(&cfg, args)?;
    let mut scheduler = settings.scheduler();
    scheduler.launcher.stdout_to_stderr = args.json;

    if args.dry_run {
        for run in scheduler.runs() {
            println!("{}", scheduler.launcher.command_line(&run).join(" "));
        }
        return Ok(());
    }

    info!(
        sizes = ?settings.sizes,
        workers = ?settings.workers,
        generations = settings.generations,
        config = %cfg.config_path.display(),
        "starting sweep"
    );
    let mut aggregator = Aggregator::new(&settings.sizes);
    // Keep stdout parseable when it carries the JSON dump.
    let progress: fn(&SpeedupRecord) = if args.json { report::eprint_record } else { report::print_record };
    scheduler.run(&mut aggregator, progress).await?;

    report::report(&aggregator.snapshot(), args.json, settings.plot)
}
