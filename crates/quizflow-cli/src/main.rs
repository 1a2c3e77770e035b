//! Quizflow service binary: `serve` runs the webhook gateway, `validate`
//! checks a quiz configuration without starting anything.

use quizflow_channels::TelegramChannel;
use quizflow_engine::QuizEngine;
use quizflow_gateway::GatewayServer;
use quizflow_quiz::QuizConfig;
use quizflow_report::{build_backend, ReportConfig};
use quizflow_session::{FileSessionStore, MemorySessionStore, SessionStore};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quizflow", about = "Quizflow — chatbot diagnosis-quiz funnels")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "quizflow.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook gateway
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Validate the quiz configuration and exit
    Validate,
}

#[derive(Deserialize)]
struct QuizflowConfig {
    /// Path to the quiz definition TOML, relative to this config file.
    quiz_path: PathBuf,
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    sessions: SessionsConfig,
    telegram: TelegramConfig,
    #[serde(default)]
    report: ReportConfig,
}

#[derive(Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Deserialize, Default)]
struct SessionsConfig {
    #[serde(default)]
    backend: SessionBackend,
}

#[derive(Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
enum SessionBackend {
    #[default]
    File,
    Memory,
}

#[derive(Deserialize)]
struct TelegramConfig {
    bot_token: String,
    #[serde(default)]
    webhook_secret: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let config_str = tokio::fs::read_to_string(&cli.config).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            cli.config.display(),
            e
        )
    })?;
    let config: QuizflowConfig = toml::from_str(&config_str)?;

    // Resolve the quiz path relative to the config file.
    let config_dir = cli
        .config
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."))
        .to_path_buf();
    let quiz_path = config_dir.join(&config.quiz_path);

    let quiz_str = tokio::fs::read_to_string(&quiz_path).await.map_err(|e| {
        anyhow::anyhow!("Failed to read quiz file '{}': {}", quiz_path.display(), e)
    })?;
    // Configuration errors are fatal; the service never starts on a
    // malformed quiz.
    let quiz = QuizConfig::from_toml(&quiz_str)?;

    match cli.command {
        Commands::Validate => {
            println!(
                "Quiz '{}' is valid: {} questions, max score {}, {} tiers",
                quiz.title,
                quiz.question_count(),
                quiz.max_score(),
                quiz.tiers.len()
            );
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            info!(quiz = %quiz.title, "Starting Quizflow gateway on {}:{}", host, port);

            let sessions: Arc<dyn SessionStore> =
                if config.sessions.backend == SessionBackend::Memory {
                    Arc::new(MemorySessionStore::new())
                } else {
                    Arc::new(FileSessionStore::new(config.data_dir.join("sessions")).await?)
                };

            let reporter = build_backend(config.report);
            let engine = Arc::new(QuizEngine::new(quiz, sessions, reporter)?);
            let telegram = Arc::new(TelegramChannel::new(config.telegram.bot_token));

            if config.telegram.webhook_secret.is_none() {
                info!("No webhook secret configured; accepting unauthenticated updates");
            }

            let app = GatewayServer::build(engine, telegram, config.telegram.webhook_secret);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("Quizflow gateway listening on {}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
