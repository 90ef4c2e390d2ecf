//! `lago` - command line front-end for the Lago API client runtime
//!
//! ```text
//! lago login --token <TOKEN>
//! lago flags set --all
//! lago query --file customers.graphql --operation-name getCustomers
//! ```

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use lago_app::commands::{self, CallSiteReaction, ExpectedError, OperationInput};
use lago_app::utils::logging::init_tracing;
use lago_app::AppContext;
use lago_core::{FetchPolicy, OperationContext};
use lago_domain::{ApiErrorCode, FeatureFlag, FeatureFlagSelection, GraphqlRequest};
use lago_infra::Upload;
use serde::Serialize;
use tracing::{info, warn};

/// Fetch policy for queries
#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Serve from the response cache when possible
    CacheFirst,
    /// Always hit the network, fall back to the cache on transport failure (default)
    CacheAndNetwork,
    /// Always hit the network
    NetworkOnly,
}

impl From<PolicyArg> for FetchPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::CacheFirst => Self::CacheFirst,
            PolicyArg::CacheAndNetwork => Self::CacheAndNetwork,
            PolicyArg::NetworkOnly => Self::NetworkOnly,
        }
    }
}

/// Main CLI structure
#[derive(Parser)]
#[command(name = "lago")]
#[command(about = "Lago API client runtime", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (JSON or TOML). Defaults to the environment, then probing
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Store an organization token and open the home view
    Login {
        #[arg(long, value_name = "TOKEN")]
        token: String,
    },
    /// Enter the customer portal with a portal token
    Portal {
        #[arg(long, value_name = "TOKEN")]
        token: String,
    },
    /// Clear every token and the persisted response cache
    Logout,
    /// Switch the current organization
    SwitchOrg {
        #[arg(value_name = "ORGANIZATION_ID")]
        organization_id: String,
    },
    /// Show the current session with tokens masked
    Status,
    /// Inspect or change feature flags
    Flags {
        #[command(subcommand)]
        command: FlagCommands,
    },
    /// Run a GraphQL query or mutation
    Query {
        /// Inline operation document
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        query: Option<String>,
        /// File holding the operation document
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
        #[arg(long, value_name = "NAME")]
        operation_name: Option<String>,
        /// Variables as a JSON object
        #[arg(long, value_name = "JSON")]
        variables: Option<String>,
        /// Do not report any error of this operation
        #[arg(long)]
        silent: bool,
        /// Error code not to report (can be specified multiple times)
        #[arg(long, value_name = "CODE")]
        silent_code: Vec<String>,
        #[arg(long, value_enum, default_value = "cache-and-network")]
        fetch_policy: PolicyArg,
        /// File to attach, as `variable=path` (can be specified multiple times)
        #[arg(long, value_name = "VARIABLE=PATH")]
        upload: Vec<String>,
        /// Error code the caller handles, as `code` or `code@field`
        #[arg(long, value_name = "CODE")]
        expect: Vec<String>,
    },
}

/// Feature flag subcommands
#[derive(Subcommand)]
enum FlagCommands {
    /// List every known flag and whether it is enabled
    List,
    /// Check one flag
    Check {
        #[arg(value_name = "FLAG")]
        flag: String,
    },
    /// Replace the enabled set
    Set {
        /// Enable every known flag
        #[arg(long, conflicts_with_all = ["none", "flags"])]
        all: bool,
        /// Disable every flag
        #[arg(long, conflicts_with = "flags")]
        none: bool,
        #[arg(value_name = "FLAG")]
        flags: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before tracing so that RUST_LOG and LOG_FORMAT from .env apply.
    let dotenv = dotenvy::dotenv();
    init_tracing();

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Could not load .env file"),
    }

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => lago_infra::config::load_from_file(Some(path.clone()))?,
        None => lago_infra::config::load()?,
    };
    let ctx = AppContext::new_with_config(config).context("failed to initialize application")?;

    run(&ctx, cli.command).await
}

async fn run(ctx: &AppContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { token } => print_json(&commands::log_in(ctx, &token)?),
        Commands::Portal { token } => print_json(&commands::access_customer_portal(ctx, &token)?),
        Commands::Logout => {
            let performed = commands::log_out(ctx)?;
            println!("{}", if performed { "logged out" } else { "already logged out" });
            Ok(())
        }
        Commands::SwitchOrg { organization_id } => {
            print_json(&commands::switch_organization(ctx, &organization_id)?)
        }
        Commands::Status => print_json(&commands::session_status(ctx)),
        Commands::Flags { command } => run_flags(ctx, command),
        Commands::Query {
            query,
            file,
            operation_name,
            variables,
            silent,
            silent_code,
            fetch_policy,
            upload,
            expect,
        } => {
            let document = match (query, file) {
                (Some(query), _) => query,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {}", path.display()))?,
                (None, None) => bail!("either --query or --file is required"),
            };

            let mut request = GraphqlRequest::new(document);
            if let Some(name) = operation_name {
                request = request.operation_name(name);
            }
            if let Some(raw) = variables {
                request = request
                    .variables(serde_json::from_str(&raw).context("--variables is not valid JSON")?);
            }

            let mut input = OperationInput::new(request);
            input.context = OperationContext::new()
                .silent_error(silent)
                .silent_error_codes(silent_code.iter().map(|code| ApiErrorCode::from(code.as_str())))
                .fetch_policy(fetch_policy.into());
            input.uploads =
                upload.iter().map(String::as_str).map(read_upload).collect::<Result<_, _>>()?;
            input.expected =
                expect.iter().map(|raw| raw.parse::<ExpectedError>()).collect::<Result<_, _>>()?;

            let outcome = commands::run_operation(ctx, input).await?;
            print_json(&outcome.response)?;
            if outcome.reaction != CallSiteReaction::None {
                println!("{}", outcome.reaction);
            }
            Ok(())
        }
    }
}

fn run_flags(ctx: &AppContext, command: FlagCommands) -> anyhow::Result<()> {
    match command {
        FlagCommands::List => print_json(&commands::list_feature_flags(ctx)?),
        FlagCommands::Check { flag } => {
            let enabled = commands::is_feature_enabled(ctx, flag.parse::<FeatureFlag>()?)?;
            println!("{flag}: {}", if enabled { "enabled" } else { "disabled" });
            Ok(())
        }
        FlagCommands::Set { all, none, flags } => {
            let selection = if all {
                FeatureFlagSelection::All
            } else if none || flags.is_empty() {
                FeatureFlagSelection::None
            } else {
                let mut parsed =
                    flags.iter().map(|f| f.parse::<FeatureFlag>()).collect::<Result<Vec<_>, _>>()?;
                if parsed.len() == 1 {
                    FeatureFlagSelection::One(parsed.remove(0))
                } else {
                    FeatureFlagSelection::Many(parsed)
                }
            };
            print_json(&commands::set_feature_flags(ctx, selection)?)
        }
    }
}

fn read_upload(spec: &str) -> anyhow::Result<Upload> {
    let Some((variable, path)) = spec.split_once('=') else {
        bail!("--upload expects VARIABLE=PATH, got {spec:?}");
    };
    let path = Path::new(path);
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());

    Ok(Upload::new(variable, file_name, content_type_for(path), bytes))
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
