use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc::channel;

use anyhow::{bail, Context, Result};
use clap::Parser;
use eframe::CreationContext;
use log::info;

use ct_uploader::app::CtUploader;
use ct_uploader::{validate, AnalyzerClient, CandidateFile, ClientConfig};

#[derive(Parser)]
#[command(name = "ct-uploader", about = "Upload CT studies to the analysis service")]
struct Cli {
    /// Base URL of the analysis service, e.g. http://localhost:8000
    #[arg(long, env = "API_BASE")]
    api_base: String,

    /// Upload this ZIP without opening a window and print the result
    #[arg(long, value_name = "ZIP")]
    file: Option<PathBuf>,

    /// Only check that the service is up
    #[arg(long, conflicts_with = "file")]
    check: bool,
}

fn run_headless(client: &AnalyzerClient, path: PathBuf) -> Result<()> {
    let file = CandidateFile::from_path(&path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let file = validate(file)?;

    let (progress_sender, progress_receiver) = channel::<f32>();
    let printer = std::thread::spawn(move || {
        let mut last = None;
        for fraction in progress_receiver {
            let pct = (fraction * 100.0).round() as u32;
            if last != Some(pct) {
                eprint!("\rUploading: {}%", pct);
                std::io::stderr().flush().unwrap_or_default();
                last = Some(pct);
            }
        }
        if last.is_some() {
            eprintln!();
        }
    });

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(client.upload(&file, Some(progress_sender)));
    drop(runtime);
    printer.join().unwrap_or_default();

    let result = outcome?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.report_path.is_empty() {
        println!("Report: {}", client.config().report_url(&result.report_path)?);
    }
    Ok(())
}

fn run_check(client: &AnalyzerClient) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let health = runtime.block_on(client.health())?;
    if !health.ok {
        bail!("service at {} reports not ok", client.config().api_base());
    }
    println!("Service at {} is up", client.config().api_base());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ClientConfig::new(&cli.api_base)?;
    let client = AnalyzerClient::new(config);

    if cli.check {
        return run_check(&client);
    }
    if let Some(path) = cli.file {
        return run_headless(&client, path);
    }

    info!("Starting CT study uploader window");
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([600.0, 640.0])
            .with_min_inner_size([400.0, 500.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "CT Study Analyzer",
        options,
        Box::new(move |cc: &CreationContext| Box::new(CtUploader::new(cc, client))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {}", e))?;

    Ok(())
}
