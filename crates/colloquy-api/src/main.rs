//! Colloquy CLI and web server entry point.
//!
//! Binary name: `colloquy`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the web server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, UserCommand};
use state::AppState;

/// Environment variable enabling the OpenTelemetry stdout exporter.
const OTEL_ENV: &str = "COLLOQUY_OTEL";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present; real environment variables take precedence.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let enable_otel = std::env::var(OTEL_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    colloquy_observe::init_tracing(
        colloquy_observe::verbosity_filter(cli.verbose, cli.quiet),
        enable_otel,
    )
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "colloquy", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (DB, services)
    let state = AppState::init()
        .await
        .context("failed to initialize application state")?;
    tracing::debug!(data_dir = %state.data_dir.display(), "Application state ready");

    match cli.command {
        Commands::User { command } => match command {
            UserCommand::Create {
                email,
                staff,
                password,
            } => {
                cli::user::create_user(&state, &email, staff, password, cli.json).await?;
            }
            UserCommand::CreateSuperuser { email, password } => {
                cli::user::create_superuser(&state, &email, password, cli.json).await?;
            }
            UserCommand::List => {
                cli::user::list_users(&state, cli.json).await?;
            }
        },

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            if let Some(responder) = &state.responder {
                tracing::info!(
                    provider = responder.provider_name(),
                    model = responder.model(),
                    "Chat responder ready"
                );
            } else {
                println!(
                    "  {} No LLM API key found in {}; chat replies are disabled",
                    console::style("!").yellow().bold(),
                    console::style(&state.config.llm.api_key_env).bold()
                );
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            println!(
                "  {} Colloquy listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let db_pool = state.db_pool.clone();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            db_pool.close().await;
            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    colloquy_observe::shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
