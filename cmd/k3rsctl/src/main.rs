use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use pkg_client::{Client, ClientConfig, ResourceInterface, ResourceQuotasNamespacer};
use pkg_constants::api::DEFAULT_NAMESPACE;
use pkg_constants::paths::DEFAULT_CLIENT_CONFIG;
use pkg_types::config::{ClientConfigFile, load_config_file};
use pkg_types::quota::{ResourceQuota, ResourceQuotaList};
use pkg_types::{Resource, Selector, WatchEvent};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "k3rsctl", about = "CLI tool for k3rs cluster management")]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = DEFAULT_CLIENT_CONFIG)]
    config: String,

    /// Server API endpoint
    #[arg(long)]
    server: Option<String>,

    /// Bearer token for the API server
    #[arg(long)]
    token: Option<String>,

    /// Namespace to operate in
    #[arg(long, short)]
    namespace: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage resource quotas
    Quota {
        #[command(subcommand)]
        action: QuotaAction,
    },
}

#[derive(Subcommand)]
enum QuotaAction {
    /// List quotas, optionally filtered by labels
    List {
        /// Label selector, e.g. `tier=gold,env!=dev`
        #[arg(long, short = 'l')]
        selector: Option<String>,
    },
    /// Show one quota
    Get { name: String },
    /// Create a quota from a YAML or JSON file
    Create {
        #[arg(long, short = 'f')]
        file: String,
    },
    /// Replace a quota from a YAML or JSON file (must carry resource_version)
    Update {
        #[arg(long, short = 'f')]
        file: String,
    },
    /// Delete a quota
    Delete { name: String },
    /// Stream quota changes until interrupted
    Watch {
        #[arg(long, short = 'l')]
        selector: Option<String>,
        #[arg(long)]
        field_selector: Option<String>,
        /// Start after this version (default: from now)
        #[arg(long, default_value = "")]
        resource_version: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    // Merge: CLI args > config file > defaults
    let mut file_cfg: ClientConfigFile = load_config_file(&cli.config)?;
    file_cfg.server = cli.server.or(file_cfg.server);
    file_cfg.token = cli.token.or(file_cfg.token);
    let namespace = cli
        .namespace
        .or(file_cfg.namespace.clone())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
    let config = ClientConfig::from_file(&file_cfg);
    info!("Using API server {} (namespace {})", config.server, namespace);

    let client = Client::new(&config)?;

    match cli.command {
        Commands::Quota { action } => run_quota(&client, &namespace, action).await,
    }
}

async fn run_quota(client: &Client, namespace: &str, action: QuotaAction) -> anyhow::Result<()> {
    let quotas = client.resource_quotas(namespace);
    match action {
        QuotaAction::List { selector } => {
            let selector = parse_selector(selector.as_deref())?;
            let list: ResourceQuotaList = quotas.list(&selector).await?;
            if list.is_empty() {
                println!("(no quotas in namespace {})", namespace);
            } else {
                print_quotas(&list);
            }
            info!(resource_version = %list.resource_version, "Listed quotas");
        }
        QuotaAction::Get { name } => {
            let quota = quotas.get(&name).await?;
            print!("{}", serde_yaml::to_string(&quota)?);
        }
        QuotaAction::Create { file } => {
            let quota = quotas.create(&read_quota(&file)?).await?;
            println!(
                "resourcequota/{} created (version {})",
                quota.name(),
                quota.resource_version()
            );
        }
        QuotaAction::Update { file } => {
            let quota = quotas.update(&read_quota(&file)?).await?;
            println!(
                "resourcequota/{} updated (version {})",
                quota.name(),
                quota.resource_version()
            );
        }
        QuotaAction::Delete { name } => {
            quotas.delete(&name).await?;
            println!("resourcequota/{} deleted", name);
        }
        QuotaAction::Watch {
            selector,
            field_selector,
            resource_version,
        } => {
            let label = parse_selector(selector.as_deref())?;
            let field = parse_selector(field_selector.as_deref())?;
            let mut watcher = quotas.watch(&label, &field, &resource_version).await?;

            let stopper = watcher.stopper();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    stopper.stop();
                }
            });

            println!("{:<9} {:<24} {:<8} {}", "EVENT", "NAME", "VERSION", "PODS");
            while let Some(event) = watcher.recv().await {
                match &event {
                    WatchEvent::Error(status) => eprintln!("{:<9} {}", event.type_name(), status),
                    _ => {
                        if let Some(q) = event.object() {
                            println!(
                                "{:<9} {:<24} {:<8} {}",
                                event.type_name(),
                                q.name(),
                                q.resource_version(),
                                limit(q.hard.max_pods)
                            );
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn parse_selector(raw: Option<&str>) -> anyhow::Result<Selector> {
    Selector::parse(raw.unwrap_or("")).context("invalid selector")
}

fn read_quota(path: &str) -> anyhow::Result<ResourceQuota> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    serde_yaml::from_str(&content).with_context(|| format!("failed to parse quota from {}", path))
}

fn limit<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn print_quotas(quotas: &ResourceQuotaList) {
    println!(
        "{:<24} {:<12} {:<14} {:<16} {:<8} {}",
        "NAME", "PODS", "CPU(m)", "MEMORY(bytes)", "VERSION", "AGE"
    );
    for q in &quotas.items {
        let age = q
            .meta
            .created_at
            .map(|t| format!("{}s", (Utc::now() - t).num_seconds()))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<12} {:<14} {:<16} {:<8} {}",
            q.name(),
            format!("{}/{}", q.used.pods, limit(q.hard.max_pods)),
            format!("{}/{}", q.used.cpu_millis, limit(q.hard.max_cpu_millis)),
            format!("{}/{}", q.used.memory_bytes, limit(q.hard.max_memory_bytes)),
            q.resource_version(),
            age
        );
    }
}
