use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use onyx_ext_core::{AppConfig, LogFormat};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "onyx-ext")]
#[command(about = "Custom backend extensions for Onyx: projects, hours reports and PDF export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum ReportFormat {
    Json,
    Html,
    Pdf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and start the HTTP API
    Serve {
        #[arg(short, long, env = "PORT", default_value = "8000")]
        port: u16,
        #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
        host: String,
    },
    /// Apply database migrations and exit
    Migrate,
    /// Compute the hours report for one user
    Report {
        /// Onyx user id owning the projects
        user_id: String,
        #[arg(short, long)]
        folder: Option<i64>,
        #[arg(long, value_enum, default_value = "json")]
        format: ReportFormat,
        /// Output file; stdout when omitted (required for pdf)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Print the creation-hours rate of every quality tier
    Rates {
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env();
    init_logging(config.log_format)?;

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(&config, &host, port).await?,
        Commands::Migrate => commands::migrate::run(&config).await?,
        Commands::Report { user_id, folder, format, output } => {
            commands::report::run(&config, &user_id, folder, format, output.as_deref()).await?;
        },
        Commands::Rates { json } => commands::rates::run(json)?,
    }

    Ok(())
}
