use anyhow::Context;
use clap::Parser;
use colored::*;
use github_repos_demo::cli::Cli;
use github_repos_demo::client::ApiClient;
use github_repos_demo::orchestrator::RequestOrchestrator;
use github_repos_demo::render::render;
use github_repos_demo::service::GitHubService;
use github_repos_demo::ui::MainThread;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("{}", "GitHub Repos Demo".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    // Built once, shared by every request
    let client = ApiClient::new(&cli.client_config()).context("Failed to configure HTTP client")?;
    let service = Arc::new(GitHubService::new(client));

    let (main_thread, ui_handle) = MainThread::spawn().await?;
    let mut states = main_thread.subscribe()?;
    let orchestrator = RequestOrchestrator::new(service, main_thread.clone());

    for _ in 0..cli.repeat {
        for strategy in &cli.strategies {
            println!("{} {:?} for {}", "▶".cyan(), strategy, cli.username.bold());
            orchestrator.launch(*strategy, &cli.username);
        }
    }

    let expected = cli.expected_outcomes();
    let mut finished = 0;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    while finished < expected {
        tokio::select! {
            state = states.recv() => {
                let Some(state) = state else { break };
                println!("{}\n", render(&state));
                if state.is_terminal() {
                    finished += 1;
                }
            }
            _ = &mut shutdown => {
                println!("\n🛑 Interrupted, cancelling in-flight requests...");
                break;
            }
        }
    }

    orchestrator.destroy();
    main_thread.stop();
    ui_handle.await.context("UI actor panicked")?;

    println!("✅ Done ({} of {} requests finished)", finished, expected);
    Ok(())
}
