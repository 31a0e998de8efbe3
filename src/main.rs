
use std::io::{self, Read};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use shapeboard::config::{ConfigError, EditorConfig};
use shapeboard::editor::{Action, Notice, NoticeLevel};
use shapeboard::error::ErrorCode;
use shapeboard::gateway::{GatewayError, HttpBackend, ShapeBackend};
use shapeboard::geometry::Point;
use shapeboard::session::{Session, SubmitError};
use shapeboard::shape::{Rgb, ShapeKind};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("session ended: {0}")]
    SessionEnded(SubmitError),
    #[error("could not read script: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "shapeboard", about = "Shape builder editor and task backend CLI")]
struct Cli {
    #[arg(long, env = "SHAPE_API_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print the next task.
    Task,
    /// Fetch and print the user's coins and progress.
    Stats,
    /// Load a task and replay an editing script against it.
    Play {
        #[arg(long, default_value = "-", help = "Script file path, or - for stdin")]
        script: String,
    },
}

/// One step of an editing script.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Palette { kind: ShapeKind },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    /// Palette press followed by a click at the given point.
    Place { kind: ShapeKind, x: f64, y: f64 },
    Color { value: Rgb },
    Size { value: f64 },
    Dimensions { width: f64, height: f64 },
    Rotate { value: f64 },
    Delete,
    Clear,
    Undo,
    Cancel,
    Submit,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env loaded");
    }

    let cli = Cli::parse();
    let mut config = EditorConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.gateway.base_url = base_url.trim_end_matches('/').to_owned();
    }
    let backend = HttpBackend::new(&config.gateway)?;
    tracing::info!(base_url = backend.base_url(), "shapeboard starting");

    match cli.command {
        Command::Task => {
            let task = backend.fetch_task().await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
            Ok(())
        }
        Command::Stats => {
            let stats = backend.fetch_user_stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
        Command::Play { script } => run_play(Session::new(backend, &config.canvas), &script).await,
    }
}

async fn run_play<B: ShapeBackend>(mut session: Session<B>, script: &str) -> Result<(), CliError> {
    let steps: Vec<Step> = serde_json::from_str(&read_script(script)?)?;

    let task = session.load_task().await?;
    print_notice(&Notice::success(format!("New task: {}!", task.name)));

    for step in steps {
        let actions = match step {
            Step::Submit => {
                match session.submit().await {
                    Ok(outcome) => print_notice(&outcome.notice()),
                    Err(e @ (SubmitError::SessionEnded | SubmitError::Gateway(GatewayError::Unauthorized))) => {
                        return Err(CliError::SessionEnded(e));
                    }
                    Err(e) => {
                        tracing::warn!(code = e.error_code(), error = %e, "submit failed");
                        print_notice(&e.notice());
                    }
                }
                continue;
            }
            step => apply_step(session.editor_mut(), step),
        };
        for action in &actions {
            if let Action::Notify(notice) = action {
                print_notice(notice);
            }
        }
    }

    let shapes = session.editor().registry().to_serializable();
    println!("{}", serde_json::to_string_pretty(&shapes)?);
    if let Some(stats) = session.stats() {
        println!("coins: {}", stats.coins);
    }
    Ok(())
}

fn apply_step(editor: &mut shapeboard::editor::Editor, step: Step) -> Vec<Action> {
    match step {
        Step::Palette { kind } => editor.press_palette(kind),
        Step::Down { x, y } => editor.on_pointer_down(Point::new(x, y)),
        Step::Move { x, y } => editor.on_pointer_move(Point::new(x, y)),
        Step::Up { x, y } => editor.on_pointer_up(Point::new(x, y)),
        Step::Place { kind, x, y } => {
            let mut actions = editor.press_palette(kind);
            actions.extend(editor.on_pointer_down(Point::new(x, y)));
            actions.extend(editor.on_pointer_up(Point::new(x, y)));
            actions
        }
        Step::Color { value } => editor.set_color(value),
        Step::Size { value } => editor.set_size(value),
        Step::Dimensions { width, height } => editor.set_dimensions(width, height),
        Step::Rotate { value } => editor.set_rotation(value),
        Step::Delete => editor.delete_selected(),
        Step::Clear => editor.clear(),
        Step::Undo => editor.undo(),
        Step::Cancel => editor.cancel(),
        Step::Submit => vec![],
    }
}

fn read_script(path: &str) -> Result<String, io::Error> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
}

fn print_notice(notice: &Notice) {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    println!("[{tag}] {}", notice.message);
}
