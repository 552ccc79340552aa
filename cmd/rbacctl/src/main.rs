mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pkg_apply::{HttpRbacClient, apply_manifests};
use pkg_constants::paths::{DEFAULT_API_SERVER, DEFAULT_CTL_CONFIG};
use pkg_manifest::{KindNames, LoaderConfig, SplitMode};
use pkg_types::config::{CtlConfigFile, load_config_file};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "rbacctl", about = "Load and apply Kubernetes RBAC manifests")]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = DEFAULT_CTL_CONFIG)]
    config: String,

    /// How to split manifest files into documents (literal | stream)
    #[arg(long)]
    split_mode: Option<SplitMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a manifest file and print the RBAC objects it contains
    Load {
        /// Manifest file
        path: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Decode a manifest file and create its objects on a cluster
    Apply {
        /// Manifest file
        path: PathBuf,

        /// API server endpoint
        #[arg(long)]
        server: Option<String>,

        /// Bearer token for the API server
        #[arg(long)]
        token: Option<String>,
    },
    /// Write the preamble for a generated Go source file
    Preamble {
        /// Go package name
        #[arg(long)]
        package: String,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    // Load config file (returns defaults if file not found)
    let file_cfg: CtlConfigFile = load_config_file(&cli.config)
        .with_context(|| format!("failed to read config file {}", cli.config))?;
    info!("Config file: {}", cli.config);

    let loader_cfg = loader_config(cli.split_mode, &file_cfg)?;

    match cli.command {
        Commands::Load { path, output } => {
            let manifests = pkg_manifest::load(&path, &loader_cfg)?;
            output::print(&manifests, output)?;
        }
        Commands::Apply {
            path,
            server,
            token,
        } => {
            // Merge: CLI args > config file > defaults
            let server = server
                .or(file_cfg.server)
                .unwrap_or_else(|| DEFAULT_API_SERVER.to_string());
            let token = token.or(file_cfg.token);

            let manifests = pkg_manifest::load(&path, &loader_cfg)?;
            info!("Applying {} object(s) to {}", manifests.len(), server);

            let client = HttpRbacClient::new(&server, token)?;
            let summary = apply_manifests(&client, &manifests).await?;
            println!(
                "applied {} roles, {} cluster roles, {} role bindings, {} cluster role bindings",
                summary.roles,
                summary.cluster_roles,
                summary.role_bindings,
                summary.cluster_role_bindings
            );
        }
        Commands::Preamble { package, out } => match out {
            Some(path) => {
                let mut file = std::fs::File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                pkg_codegen::write_preamble(&package, &mut file)?;
                info!("Wrote preamble to {}", path.display());
            }
            None => pkg_codegen::write_preamble(&package, &mut std::io::stdout().lock())?,
        },
    }

    Ok(())
}

/// Merge: CLI flag > config file > defaults
fn loader_config(split_mode: Option<SplitMode>, file_cfg: &CtlConfigFile) -> anyhow::Result<LoaderConfig> {
    let defaults = LoaderConfig::default();

    let file_split_mode = file_cfg
        .split_mode
        .as_deref()
        .map(str::parse::<SplitMode>)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let overrides = &file_cfg.kinds;
    let kinds = KindNames {
        role: overrides.role.clone().unwrap_or(defaults.kinds.role),
        cluster_role: overrides
            .cluster_role
            .clone()
            .unwrap_or(defaults.kinds.cluster_role),
        role_binding: overrides
            .role_binding
            .clone()
            .unwrap_or(defaults.kinds.role_binding),
        cluster_role_binding: overrides
            .cluster_role_binding
            .clone()
            .unwrap_or(defaults.kinds.cluster_role_binding),
    };

    Ok(LoaderConfig {
        kinds,
        split_mode: split_mode.or(file_split_mode).unwrap_or(defaults.split_mode),
        min_document_len: file_cfg
            .min_document_len
            .unwrap_or(defaults.min_document_len),
    })
}
