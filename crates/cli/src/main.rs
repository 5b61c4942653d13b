#![deny(unsafe_code)]
//! CLI companion for the first-triangle sample.
//!
//! Subcommands:
//! - `fetch <vertex> <fragment>` -- load a shader pair and print it
//! - `scene` -- print the resolved scene configuration

mod error;
mod fetch;
mod logging;

use clap::{Parser, Subcommand};
use error::CliError;
use fetch::HttpFetcher;
use first_triangle_core::{load_shader_source, SceneConfig};
use logging::{init_logging, LoggingConfig};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "first-triangle", about = "Shader loading and scene inspection")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log filter in env_logger syntax (overrides RUST_LOG).
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a vertex/fragment shader pair and print both sources.
    Fetch {
        /// Vertex shader path or http(s) URL.
        #[arg(default_value = "./shader/scene.vert")]
        vertex: String,

        /// Fragment shader path or http(s) URL.
        #[arg(default_value = "./shader/scene.frag")]
        fragment: String,

        /// Directory that relative paths are resolved against.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Print the resolved, validated scene configuration.
    Scene {
        /// JSON scene configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the clear color as "r,g,b,a".
        #[arg(long)]
        clear_color: Option<String>,

        /// Keep rendering until Escape instead of drawing one frame.
        #[arg(long)]
        animate: bool,
    },
}

fn parse_clear_color(text: &str) -> Result<[f32; 4], CliError> {
    let channels = text
        .split(',')
        .map(|c| c.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CliError::Input(format!("invalid --clear-color '{text}': {e}")))?;
    channels.try_into().map_err(|v: Vec<f32>| {
        CliError::Input(format!(
            "invalid --clear-color '{text}': expected 4 channels, got {}",
            v.len()
        ))
    })
}

fn resolve_scene(
    config: Option<PathBuf>,
    clear_color: Option<String>,
    animate: bool,
) -> Result<SceneConfig, CliError> {
    let mut scene = match config {
        Some(path) => SceneConfig::from_path(&path)?,
        None => SceneConfig::default(),
    };
    if let Some(text) = clear_color {
        scene.clear_color = parse_clear_color(&text)?;
    }
    scene.animate |= animate;
    scene.validate()?;
    Ok(scene)
}

fn scene_summary(scene: &SceneConfig) -> Result<serde_json::Value, CliError> {
    Ok(serde_json::json!({
        "config": serde_json::to_value(scene)?,
        "vertex_count": scene.vertex_count(),
        "stride": scene.stride,
    }))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Fetch {
            vertex,
            fragment,
            root,
        } => {
            let fetcher = HttpFetcher::new(root)?;
            let source = load_shader_source(&fetcher, &vertex, &fragment).await?;

            if cli.json {
                let info = serde_json::json!({
                    "vertex": { "path": vertex, "source": source.vertex },
                    "fragment": { "path": fragment, "source": source.fragment },
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("// {vertex}");
                println!("{}", source.vertex);
                println!("// {fragment}");
                println!("{}", source.fragment);
            }
        }
        Command::Scene {
            config,
            clear_color,
            animate,
        } => {
            let scene = resolve_scene(config, clear_color, animate)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&scene_summary(&scene)?)?);
            } else {
                let [r, g, b, a] = scene.clear_color;
                println!("vertex shader:   {}", scene.vertex_shader);
                println!("fragment shader: {}", scene.fragment_shader);
                println!("attribute:       {} (stride {})", scene.position_attribute, scene.stride);
                println!("vertices:        {}", scene.vertex_count());
                println!("clear color:     {r}, {g}, {b}, {a}");
                println!(
                    "frames:          {}",
                    if scene.animate { "until Escape" } else { "1" }
                );
            }
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let json_mode = cli.json;
    if let Err(e) = run(cli).await {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
