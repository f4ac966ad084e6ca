//! # sketch
//!
//! Command-line front end for the sketch canvas: replays gesture scripts into
//! SVG/PNG files and drives the diagram service.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sketch_client::{
    replay_json, ClientConfig, DiagramClient, Workbench, DEFAULT_BASE_URL, DEFAULT_DIAGRAM_TYPE,
    DEFAULT_STYLE,
};
use sketch_core::{SessionConfig, SketchSession};
use sketch_renderer::{ExportConfig, ExportFormat, SketchExporter};

#[derive(Debug, Parser)]
#[command(name = "sketch", version, about = "Sketch canvas renderer and diagram service client")]
struct Cli {
    /// Diagram service base URL.
    #[arg(long, global = true, env = "PULSE_TEX_URL", default_value = DEFAULT_BASE_URL)]
    url: String,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by commands that build a sketch from a gesture script.
#[derive(Debug, clap::Args)]
struct SketchArgs {
    /// Gesture script: JSON array of input events.
    script: PathBuf,

    /// Session configuration (JSON); omitted fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Label for a text placement, used in order. Repeatable.
    #[arg(long = "label")]
    labels: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a gesture script and export the sketch.
    Render {
        #[command(flatten)]
        sketch: SketchArgs,

        /// Output file; the format follows the extension unless --format is given.
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (svg or png).
        #[arg(long)]
        format: Option<String>,

        /// Scale factor for PNG output.
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
    },

    /// Replay a gesture script and have the service refine it.
    Refine {
        #[command(flatten)]
        sketch: SketchArgs,

        /// What the diagram should show.
        #[arg(short, long)]
        description: String,

        /// Journal style id.
        #[arg(long, default_value = DEFAULT_STYLE)]
        style: String,

        /// Paper context.
        #[arg(long)]
        context: Option<String>,

        /// Write the SVG here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a diagram from a description only.
    Generate {
        /// What the diagram should show.
        description: String,

        /// Journal style id.
        #[arg(long, default_value = DEFAULT_STYLE)]
        style: String,

        /// Diagram type id.
        #[arg(long = "type", default_value = DEFAULT_DIAGRAM_TYPE)]
        diagram_type: String,

        /// Paper context.
        #[arg(long)]
        context: Option<String>,

        /// Write the SVG here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert an SVG file to TikZ.
    Tikz {
        /// SVG input.
        svg: PathBuf,

        /// Hint about the diagram's content.
        #[arg(short, long)]
        description: Option<String>,

        /// Write the TikZ here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List journal styles and diagram types.
    Styles,
}

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,sketch_client=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sketch_client=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn load_session(args: &SketchArgs) -> anyhow::Result<SketchSession> {
    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading session config {}", path.display()))?;
            SessionConfig::from_json(&json)?
        }
        None => SessionConfig::default(),
    };
    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("reading gesture script {}", args.script.display()))?;

    let mut session = SketchSession::new(config);
    let summary = replay_json(&mut session, &script, args.labels.iter().cloned())?;
    if summary.cancelled_labels > 0 {
        tracing::warn!("{} text placements had no label", summary.cancelled_labels);
    }
    Ok(session)
}

fn output_format(path: &Path, explicit: Option<&str>) -> anyhow::Result<ExportFormat> {
    if let Some(format) = explicit {
        return Ok(format.parse()?);
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => Ok(ext.parse()?),
        None => bail!("cannot infer output format from {}; pass --format", path.display()),
    }
}

fn emit(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn workbench(url: &str) -> anyhow::Result<Workbench> {
    let client = DiagramClient::new(&ClientConfig::with_base_url(url))?;
    Ok(Workbench::new(client))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            sketch,
            output,
            format,
            scale,
        } => {
            let format = output_format(&output, format.as_deref())?;
            let mut session = load_session(&sketch)?;
            let exporter = SketchExporter::new(ExportConfig {
                scale,
                ..ExportConfig::default()
            });
            let bytes = exporter.export(&mut session, format)?;
            fs::write(&output, bytes).with_context(|| format!("writing {}", output.display()))?;
            tracing::info!(
                "Rendered {} primitives to {}",
                session.len(),
                output.display()
            );
        }
        Command::Refine {
            sketch,
            description,
            style,
            context,
            output,
        } => {
            let mut session = load_session(&sketch)?;
            let mut bench = workbench(&cli.url)?;
            bench.set_style(style);
            bench.set_context(context);
            let refined = bench.refine(&mut session, &description).await?;
            emit(&refined.refined_svg, output.as_deref())?;
        }
        Command::Generate {
            description,
            style,
            diagram_type,
            context,
            output,
        } => {
            let mut bench = workbench(&cli.url)?;
            bench.set_style(style);
            bench.set_context(context);
            let generated = bench.generate(&description, Some(diagram_type.as_str())).await?;
            emit(&generated.svg, output.as_deref())?;
        }
        Command::Tikz {
            svg,
            description,
            output,
        } => {
            let svg = fs::read_to_string(&svg).with_context(|| format!("reading {}", svg.display()))?;
            let client = DiagramClient::new(&ClientConfig::with_base_url(&cli.url))?;
            let tikz = client
                .svg_to_tikz(&sketch_client::TikzRequest { svg, description })
                .await?;
            emit(&tikz, output.as_deref())?;
        }
        Command::Styles => {
            let client = DiagramClient::new(&ClientConfig::with_base_url(&cli.url))?;
            let catalog = client.styles().await?;
            println!("Styles:");
            for (id, info) in &catalog.styles {
                println!("  {id:<10} {} - {}", info.name, info.description);
            }
            println!("Diagram types:");
            for (id, label) in &catalog.diagram_types {
                println!("  {id:<13} {label}");
            }
        }
    }

    Ok(())
}
