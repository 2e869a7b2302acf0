use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use prelude_client::api::resources::{retrieve_query, Resource};
use prelude_client::config::proc_loader;
use prelude_client::utils::logging::{self, LogLevel};
use prelude_client::{
    ApiClient, ConfigStore, ConnectParams, FileConfigStore, HttpParams, MemoryConfigStore,
    SettingsConfig, TokenProvider,
};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "PRELUDE_CONFIG", default_value = "prelude.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check the access token and both endpoints
    Status,
    /// Force a token exchange
    Connect,
    /// Retrieve alerts
    Alerts(QueryArgs),
    /// Retrieve logs
    Logs(QueryArgs),
}

#[derive(clap::Args)]
struct QueryArgs {
    #[arg(long)]
    limit: Option<u64>,
    #[arg(long)]
    offset: Option<u64>,
    /// field to project, repeatable
    #[arg(long = "path")]
    paths: Vec<String>,
}

impl QueryArgs {
    fn to_params(&self, resource: Resource) -> HttpParams {
        let mut request = resource.default_request();
        if let Some(limit) = self.limit {
            request.limit = limit;
        }
        if let Some(offset) = self.offset {
            request.offset = offset;
        }
        if !self.paths.is_empty() {
            request.path = self.paths.clone();
        }
        HttpParams::default().with_query(retrieve_query(&request))
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let service_config = proc_loader::file_to_config(Path::new(&args.config)).await?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Prepare config store and run
    // -------------------------------

    let settings = service_config.settings.clone();
    match settings.token_state_path.clone() {
        Some(path) => {
            let store = FileConfigStore::open(service_config.prelude, path).await;
            run(Arc::new(store), &settings, args.command).await
        }
        None => {
            let store = MemoryConfigStore::new(service_config.prelude);
            run(Arc::new(store), &settings, args.command).await
        }
    }
}

async fn run<S: ConfigStore>(store: Arc<S>, settings: &SettingsConfig, command: Command) -> Result<ExitCode> {
    let provider = TokenProvider::new(store, settings)?;
    let client = ApiClient::new(provider, settings)?;

    match command {
        Command::Status => {
            let status = client.status().await;
            for (label, ok) in status.labels() {
                println!("{}: {}", label, if ok { "ok" } else { "failed" });
            }
            let healthy = status.is_healthy();
            println!("global: {}", if healthy { "ok" } else { "failed" });
            Ok(if healthy { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Connect => {
            let token = client.provider().connect(ConnectParams::default()).await?;
            info!("connected");
            println!("access token expires at {}", token.exp_unix_ts);
            Ok(ExitCode::SUCCESS)
        }
        Command::Alerts(query) => {
            let alerts = client.get_alerts(query.to_params(Resource::Alerts)).await?;
            println!("{}", serde_json::to_string_pretty(&alerts)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Logs(query) => {
            let logs = client.get_logs(query.to_params(Resource::Logs)).await?;
            println!("{}", serde_json::to_string_pretty(&logs)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
