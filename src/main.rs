/*!
 * Command-line interface for evbgen
 */

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use evbgen::config::{Args, Config};
use evbgen::generator::Generator;
use evbgen::report::{GenerateReport, ReportFormat, Reporter};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "evbgen", &mut io::stdout());
        return Ok(());
    }

    init_logging(args.verbose);

    let config = Config::from_args(args);
    config.validate()?;

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📦 Generating");

    let generator = Generator::new(config.to_options(), Arc::new(progress.clone()));
    let start_time = Instant::now();

    let result = generator.generate(
        &config.project_file,
        &config.input_exe,
        &config.output_exe,
        &config.pack_dir,
    );
    progress.finish_and_clear();
    let summary = result?;

    let report = GenerateReport::new(
        &summary,
        config.pack_dir.display().to_string(),
        start_time.elapsed(),
    );
    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);

    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}
