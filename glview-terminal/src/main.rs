/// glview terminal viewer
///
/// Loads OBJ models (or a cube when none are given) and renders them as
/// shaded ASCII art. Press `i` to show the matrix report, `q` to quit.
use anyhow::{Context, Result};
use clap::Parser;
use glview_core::{obj, ProjectionMode, SessionConfig};
use glview_terminal::logging::{init_logging, LoggingConfig};
use glview_terminal::{GridSize, TerminalApp};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "glview-terminal")]
#[command(about = "Interactive model/view/projection viewer for the terminal", long_about = None)]
struct Cli {
    /// OBJ files to load; `z`/`x` switch between them
    models: Vec<PathBuf>,

    /// Initial projection: "perspective" or "ortho"
    #[arg(long, default_value = "perspective")]
    projection: ProjectionMode,

    /// Start with per-vertex and per-fragment shading side by side
    #[arg(long)]
    split: bool,

    /// Render into this many columns instead of the terminal width
    #[arg(long)]
    width: Option<u16>,

    /// Render into this many rows instead of the terminal height
    #[arg(long)]
    height: Option<u16>,

    /// Log filter, e.g. "debug" or "glview_core=debug"; without
    /// `--log-file` records go to glview-terminal.log
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Write log output to this file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        filter: cli.log_level.clone(),
        file: cli.log_file.clone(),
    })
    .context("failed to open log file")?;

    let meshes = cli
        .models
        .iter()
        .map(|path| {
            obj::load_obj(path).with_context(|| format!("failed to load {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    log::info!("loaded {} model(s)", meshes.len());

    let config = SessionConfig {
        projection: cli.projection,
        split: cli.split,
        ..SessionConfig::default()
    };

    let grid = GridSize {
        cols: cli.width,
        rows: cli.height,
    };
    let mut app = TerminalApp::new(meshes, config, grid).context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_flags() {
        let cli = Cli::try_parse_from(["glview-terminal", "--width", "60", "--height", "20", "a.obj"])
            .unwrap();
        assert_eq!(cli.width, Some(60));
        assert_eq!(cli.height, Some(20));
        assert_eq!(cli.models, vec![PathBuf::from("a.obj")]);

        let cli = Cli::try_parse_from(["glview-terminal", "--projection", "ortho"]).unwrap();
        assert_eq!(cli.width, None);
        assert_eq!(cli.projection, ProjectionMode::Orthographic);
    }
}
