mod app;

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use log::info;
use venom_atlas::ChartConfig;
use venom_atlas::logging::{default_log_level, init_logging};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Dataset to plot (`.csv` or `.json`).
    #[arg(long, default_value = "data/snakes.csv")]
    data: PathBuf,

    /// JSON file overriding chart defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = default_log_level().to_owned())]
    log_level: String,

    /// Also write rotating log files into this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_dir.as_deref()).map_err(|error| anyhow!(error))?;

    let config = match &args.config {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("failed to load chart config `{}`", path.display()))?,
        None => ChartConfig::default(),
    };
    info!(
        "event=config_ready source={} data={}",
        args.config
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "default".to_owned()),
        args.data.display()
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1320.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        "venom-atlas",
        options,
        Box::new(move |cc| Ok(Box::new(app::VenomAtlasApp::new(cc, args.data, config)))),
    )
    .map_err(|error| anyhow!("window loop failed: {error}"))
}
