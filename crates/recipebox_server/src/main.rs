//! Recipe API server entrypoint.

use recipebox_core::config::env_flag_enabled;
use recipebox_core::seed::{load_seed_file, seed_if_empty, SeedOutcome};
use recipebox_core::DEFAULT_PORT;
use recipebox_server::{serve_router, AppState, Config, StoreSelector};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    seed: Option<PathBuf>,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--seed" => {
                let Some(path) = iter.next() else {
                    anyhow::bail!("--seed requires a path to a JSON document");
                };
                flags.seed = Some(PathBuf::from(path));
            }
            value if value.starts_with("--seed=") => {
                flags.seed = Some(PathBuf::from(&value["--seed=".len()..]));
            }
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipebox=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    tracing::debug!("Loaded configuration: {:?}", config);
    let selector = StoreSelector::new(config.clone());
    let store = selector.store()?;

    if let Some(path) = cli_flags.seed {
        let recipes = load_seed_file(&path)?;
        match seed_if_empty(store.as_ref(), recipes)? {
            SeedOutcome::Seeded { inserted } => {
                println!("Seeded {} recipes from {}", inserted, path.display());
            }
            SeedOutcome::Skipped { existing } => {
                println!("Store already holds {} recipes; nothing imported", existing);
            }
        }
        return Ok(());
    }

    let state = AppState::new(config.clone(), store);

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = recipebox_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!(
        "RecipeBox running at http://{} ({} store)",
        actual_addr,
        state.store.backend().as_str()
    );

    serve_router(listener, state, allow_public, shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}

fn print_help() {
    println!("RecipeBox Server\n");
    println!("Usage: recipebox [OPTIONS]\n");
    println!("Options:");
    println!("  --seed <PATH>     Import {{\"recipes\": [...]}} into an empty store and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  PORT              Server port (default: {})", DEFAULT_PORT);
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
    println!("  ALLOW_PUBLIC_ACCESS  Allow non-loopback binds and CORS from any origin");
    println!("  DATA_SOURCE       json (default) or sqlite");
    println!("  JSON_DB_PATH      JSON document path (default: db.json)");
    println!("  DB_TYPE           Relational engine (only sqlite is supported)");
    println!("  DB_DATABASE       SQLite database path (default: database.sqlite)");
    println!("  DB_SYNCHRONIZE    Create the recipe table when missing (default: true)");
    println!("  DB_LOGGING        Log SQL statements at debug level (default: false)");
    println!("  MAX_BODY_SIZE     Maximum request body in bytes (default: 1MB)");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_flags, CliFlags};
    use std::path::PathBuf;

    fn args(values: &[&str]) -> Vec<String> {
        std::iter::once("recipebox")
            .chain(values.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parse_cli_flags_rejects_unknown_and_positional_arguments() {
        let cases = [
            (args(&["--seeed"]), "Unknown option"),
            (args(&["seed"]), "Unexpected positional argument"),
            (args(&["--seed"]), "requires a path"),
        ];

        for (args, expected_fragment) in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains(expected_fragment));
        }
    }

    #[test]
    fn parse_cli_flags_accepts_supported_options() {
        let flags = parse_cli_flags(&args(&["--seed", "seed.json", "--help"]))
            .expect("known options should parse");
        assert_eq!(
            flags,
            CliFlags {
                help: true,
                seed: Some(PathBuf::from("seed.json")),
            }
        );

        let inline = parse_cli_flags(&args(&["--seed=data/recipes.json"])).expect("inline form");
        assert_eq!(inline.seed, Some(PathBuf::from("data/recipes.json")));
        assert_eq!(parse_cli_flags(&args(&[])).expect("empty"), CliFlags::default());
    }
}
