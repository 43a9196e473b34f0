mod app;
mod config_cmd;
mod generate_cmd;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use icebot_config::{config_dir, config_file_path, load_and_prepare};
use icebot_core::StyleMode;
use icebot_gateway::{start_server, GatewayState};
use icebot_memory::InMemoryConversationStore;

#[derive(Parser)]
#[command(name = "icebot")]
#[command(about = "IceBot: dating ice breakers, replies and profiles")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $ICEBOT_CONFIG_DIR/config.yaml or ~/.icebot/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Generate an ice breaker for a profile description
    Generate {
        profile: String,
        /// Style to apply; repeat for several (funny, flirty, question, asshole, ...)
        #[arg(short, long = "style", value_parser = parse_style)]
        styles: Vec<StyleMode>,
    },
    /// Rewrite a draft message to be more engaging
    Enhance { message: String },
    /// Write a dating profile
    Profile {
        /// Personality trait; repeat for several
        #[arg(short, long = "trait")]
        traits: Vec<String>,
        /// short, medium or long
        #[arg(long)]
        length: Option<String>,
        /// casual, professional, playful or sophisticated
        #[arg(long)]
        tone: Option<String>,
    },
    /// Describe a profile photo
    Analyze { image: PathBuf },
    /// Describe a profile photo and write an ice breaker for it
    Scan { image: PathBuf },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config with secrets masked
    Show,
    /// Validate the effective config
    Check,
    /// Write a config file with default values
    Init {
        #[arg(long)]
        force: bool,
    },
}

fn parse_style(s: &str) -> Result<StyleMode, String> {
    s.parse().map_err(|e: icebot_core::ValidationError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));

    let config = load_and_prepare(&path).await?;
    icebot_logging::init_logger(config.log_level(), config.log_dir());

    match cli.command {
        Commands::Serve { port } => {
            let addr = app::bind_addr(&config, port)?;
            let bot = Arc::new(app::build_bot(&config)?);
            let state = GatewayState::new(bot, Arc::new(InMemoryConversationStore::new()));
            info!(%addr, config = %path.display(), "Starting IceBot gateway");
            start_server(addr, state).await?;
        }
        Commands::Generate { profile, styles } => {
            let bot = app::build_bot(&config)?;
            generate_cmd::generate(&bot, &profile, &styles).await?;
        }
        Commands::Enhance { message } => {
            let bot = app::build_bot(&config)?;
            generate_cmd::enhance(&bot, &message).await?;
        }
        Commands::Profile {
            traits,
            length,
            tone,
        } => {
            let brief = generate_cmd::profile_brief(&traits, length.as_deref(), tone.as_deref())?;
            let bot = app::build_bot(&config)?;
            generate_cmd::profile(&bot, &brief).await?;
        }
        Commands::Analyze { image } => {
            let bot = Arc::new(app::build_bot(&config)?);
            generate_cmd::analyze(bot, &image).await?;
        }
        Commands::Scan { image } => {
            let bot = Arc::new(app::build_bot(&config)?);
            generate_cmd::scan(bot, &image).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(&config)?,
            ConfigAction::Check => config_cmd::check(&config)?,
            ConfigAction::Init { force } => config_cmd::init(&path, force).await?,
        },
    }

    Ok(())
}
