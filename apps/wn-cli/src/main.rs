use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wn_app::{
    AppError, AppResult, ConfigField, CsvExport, Dashboard, NODE_TABLE_HEADERS, NodeRow, Overlay,
    StatusStyle, SubmitReport, UploadOutcome, UploadSource, decode_image, file_name_of,
    load_preset, node_rows, render_preset, save_preset, summary_metrics,
};
use wn_client::{ClientSettings, HttpAnalysisClient};
use wn_core::AnalysisConfig;

#[derive(Parser)]
#[command(name = "wn-cli")]
#[command(about = "Pipe closure impact analysis for water distribution networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a network model to the analysis service
    Analyze {
        /// Path to the EPANET .inp file
        inp_path: PathBuf,
        /// Pipe ID to simulate closure for
        #[arg(long)]
        pipe: Option<String>,
        /// Simulation time in seconds
        #[arg(long)]
        time_sec: Option<u32>,
        /// Number of most impacted nodes to report
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        top_n: Option<u32>,
        /// Minimum pressure (bar) classified as OK
        #[arg(long)]
        ok_bar_min: Option<f64>,
        /// Pressure (bar) below which service is very low
        #[arg(long)]
        very_low_max: Option<f64>,
        /// YAML preset supplying the parameters
        #[arg(long)]
        preset: Option<PathBuf>,
        /// Analysis API base URL (overrides WN_API_URL)
        #[arg(long)]
        api_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Write the results CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the pressure and impact map images into this directory
        #[arg(long)]
        images_dir: Option<PathBuf>,
        /// Also list every node, not only the most impacted ones
        #[arg(long)]
        all: bool,
    },
    /// Print or save the default analysis parameters
    Defaults {
        /// Write the defaults as a YAML preset instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that a file would be accepted for upload
    Check {
        /// Path to the candidate file
        inp_path: PathBuf,
    },
}

struct ConfigOverrides {
    pipe: Option<String>,
    time_sec: Option<u32>,
    top_n: Option<u32>,
    ok_bar_min: Option<f64>,
    very_low_max: Option<f64>,
}

impl ConfigOverrides {
    fn apply(self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(pipe) = self.pipe {
            config.pipe_to_close = pipe;
        }
        if let Some(t) = self.time_sec {
            config.time_sec = f64::from(t);
        }
        if let Some(n) = self.top_n {
            config.top_n = f64::from(n);
        }
        if let Some(v) = self.ok_bar_min {
            config.ok_bar_min = ConfigField::OkBarMin.bounded(v);
        }
        if let Some(v) = self.very_low_max {
            config.very_low_max = ConfigField::VeryLowMax.bounded(v);
        }
        config
    }
}

struct OutputOptions {
    csv: Option<PathBuf>,
    images_dir: Option<PathBuf>,
    all: bool,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            inp_path,
            pipe,
            time_sec,
            top_n,
            ok_bar_min,
            very_low_max,
            preset,
            api_url,
            timeout_secs,
            csv,
            images_dir,
            all,
        } => {
            let base = match &preset {
                Some(path) => load_preset(path)?,
                None => AnalysisConfig::default(),
            };
            let config = ConfigOverrides {
                pipe,
                time_sec,
                top_n,
                ok_bar_min,
                very_low_max,
            }
            .apply(base);

            let mut settings = ClientSettings::from_env();
            if let Some(url) = api_url {
                settings = settings.with_base_url(url);
            }
            if let Some(secs) = timeout_secs {
                settings = settings.with_timeout(Duration::from_secs(secs));
            }

            cmd_analyze(
                &inp_path,
                config,
                settings,
                OutputOptions {
                    csv,
                    images_dir,
                    all,
                },
            )
        }
        Commands::Defaults { output } => cmd_defaults(output.as_deref()),
        Commands::Check { inp_path } => cmd_check(&inp_path),
    }
}

fn load_into(dashboard: &mut Dashboard, inp_path: &Path) -> AppResult<()> {
    let filename = file_name_of(inp_path);
    match dashboard.upload(UploadSource::Picker, &filename, || std::fs::read(inp_path)) {
        UploadOutcome::Accepted => Ok(()),
        UploadOutcome::Ignored => match dashboard.error() {
            Some(notice) => Err(AppError::Analysis(notice.clone())),
            None => Err(AppError::NotInpFile(filename)),
        },
    }
}

fn cmd_analyze(
    inp_path: &Path,
    config: AnalysisConfig,
    settings: ClientSettings,
    output: OutputOptions,
) -> AppResult<()> {
    let client = HttpAnalysisClient::new(settings)?;
    let mut dashboard = Dashboard::with_config(config);
    load_into(&mut dashboard, inp_path)?;

    let config = dashboard.config();
    println!(
        "Closing pipe '{}' in {} (t={}s, top {})",
        config.pipe_to_close,
        inp_path.display(),
        config.time_sec,
        config.top_n
    );
    println!(
        "  Service: {} (timeout {}s)",
        client.analyze_url(),
        client.settings().timeout.as_secs()
    );

    match dashboard.submit_with(&client) {
        SubmitReport::Completed | SubmitReport::Busy => {}
        SubmitReport::Failed(notice) | SubmitReport::Rejected(notice) => {
            return Err(AppError::Analysis(notice));
        }
    }

    let Some(received) = dashboard.result() else {
        return Ok(());
    };
    let result = &received.result;

    println!(
        "✓ Analysis complete ({})",
        received.received_at.format("%Y-%m-%d %H:%M:%S")
    );
    for metric in summary_metrics(result) {
        println!("  {:<22} {}", metric.label, metric.value);
    }

    println!("\nTop Impacted Nodes:");
    print_node_table(&node_rows(&result.top_impacted_nodes));

    if output.all {
        println!("\nAll Nodes ({}):", result.all_nodes.len());
        print_node_table(&node_rows(&result.all_nodes));
    }

    if let Some(path) = &output.csv {
        CsvExport::from_result(result).write_file(path)?;
        println!("\n✓ Wrote CSV to {}", path.display());
    }

    if let Some(dir) = &output.images_dir {
        std::fs::create_dir_all(dir)?;
        for overlay in [Overlay::PressureMaps, Overlay::ImpactMap] {
            match decode_image(overlay.payload(result)) {
                Ok(bytes) => {
                    let path = dir.join(format!("{}.png", overlay.file_stem()));
                    std::fs::write(&path, bytes)?;
                    println!("✓ Wrote {} to {}", overlay.title(), path.display());
                }
                Err(e) => {
                    tracing::warn!(overlay = overlay.file_stem(), error = %e, "skipping image");
                    println!("  {} not available: {}", overlay.title(), e);
                }
            }
        }
    }

    Ok(())
}

fn status_marker(style: StatusStyle) -> &'static str {
    match style {
        StatusStyle::Ok => "  ",
        StatusStyle::Warning => "! ",
        StatusStyle::Severe => "!!",
        StatusStyle::Critical => "✗ ",
    }
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.chars().count())
}

fn print_node_table(rows: &[NodeRow]) {
    if rows.is_empty() {
        println!("  (none)");
        return;
    }

    let w_id = column_width(NODE_TABLE_HEADERS[0], rows.iter().map(|r| r.node_id.as_str()));
    let w_closed = column_width(
        NODE_TABLE_HEADERS[1],
        rows.iter().map(|r| r.pressure_closed.as_str()),
    );
    let w_drop = column_width(NODE_TABLE_HEADERS[2], rows.iter().map(|r| r.drop.as_str()));

    println!(
        "  {:<w_id$}  {:>w_closed$}  {:>w_drop$}     {}",
        NODE_TABLE_HEADERS[0], NODE_TABLE_HEADERS[1], NODE_TABLE_HEADERS[2], NODE_TABLE_HEADERS[3],
    );
    for row in rows {
        println!(
            "  {:<w_id$}  {:>w_closed$}  {:>w_drop$}  {} {}",
            row.node_id,
            row.pressure_closed,
            row.drop,
            status_marker(row.style),
            row.status,
        );
    }
}

fn cmd_defaults(output: Option<&Path>) -> AppResult<()> {
    let config = AnalysisConfig::default();
    match output {
        Some(path) => {
            save_preset(path, &config)?;
            println!("✓ Wrote default preset to {}", path.display());
        }
        None => print!("{}", render_preset(&config)?),
    }
    Ok(())
}

fn cmd_check(inp_path: &Path) -> AppResult<()> {
    let mut dashboard = Dashboard::new();
    load_into(&mut dashboard, inp_path)?;

    if let Some(file) = dashboard.uploaded_file() {
        println!(
            "✓ {} accepted ({} bytes, {} lines)",
            file.filename(),
            file.len(),
            file.content().lines().count()
        );
    }
    Ok(())
}
