use anyhow::{Context, Result};
use clap::Parser;
use codereport::analyzers::{bugs, docgen, metrics, review};
use codereport::cli::{Cli, Commands, MetricsFormat};
use codereport::config::{self, Config};
use codereport::io::write_file;
use codereport::model;
use codereport::report::ReportAssembler;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path),
        None => config::get_config().clone(),
    };

    match cli.command {
        Commands::Report { path, output } => run_report(config, &path, output),
        Commands::Doc { file, output } => run_doc(&file, output.as_deref()),
        Commands::Review { file } => {
            let model = model::from_config(&config);
            for finding in review::review_file(&file, model.as_ref()) {
                println!("- {finding}");
            }
            Ok(())
        }
        Commands::Bugs { file } => {
            for finding in bugs::predict_bugs(&file) {
                println!("- {finding}");
            }
            Ok(())
        }
        Commands::Metrics { file, format } => run_metrics(&file, format),
    }
}

fn run_report(mut config: Config, path: &Path, output: Option<std::path::PathBuf>) -> Result<()> {
    if let Some(dir) = output {
        config.output_dir = dir;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("input path has no file name")?;

    let model = model::from_config(&config);
    let assembler = ReportAssembler::new(&config, model.as_ref());
    let outcome = assembler.generate(path, &file_name)?;

    println!(
        "Report written to {} (format: {}, content-type: {})",
        outcome.path.display(),
        outcome.format.label(),
        outcome.format.content_type()
    );
    Ok(())
}

fn run_doc(file: &Path, output: Option<&Path>) -> Result<()> {
    let source = codereport::io::read_file(file)?;
    let documented = docgen::document_source(&source, file)?;
    match output {
        Some(path) => {
            write_file(path, &documented)?;
            println!("Documented source written to {}", path.display());
        }
        None => print!("{documented}"),
    }
    Ok(())
}

fn run_metrics(file: &Path, format: MetricsFormat) -> Result<()> {
    let metrics = metrics::calculate_metrics(file);
    match format {
        MetricsFormat::Json => println!("{}", serde_json::to_string_pretty(&metrics)?),
        MetricsFormat::Terminal => {
            println!("Lines of Code: {}", metrics.line_count);
            println!("Functions: {}", metrics.function_count);
            println!("Classes: {}", metrics.class_count);
            println!("Cyclomatic Complexity: {}", metrics.complexity);
        }
    }
    Ok(())
}
