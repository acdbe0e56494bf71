use std::sync::Arc;

use compliance_assist::config::AppConfig;
use compliance_assist::llm::create_provider;
use compliance_assist::repl::Repl;
use compliance_assist::server::app_routes;
use compliance_assist::session::SessionManager;
use compliance_assist::store::{LibSqlSessionStore, MemorySessionStore, SessionStore};
use compliance_assist::transcript::TranscriptLog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli_mode = std::env::args().skip(1).any(|arg| arg == "--cli");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("  export GEMINI_API_KEY=...");
            std::process::exit(1);
        }
    };

    eprintln!("📋 Compliance Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);

    let llm = create_provider(&config.llm_config())?;

    // ── Session store ───────────────────────────────────────────────────
    let store: Arc<dyn SessionStore> = match &config.db_path {
        Some(path) => {
            let store = LibSqlSessionStore::new_local(path).await?;
            eprintln!("   Database: {}", path.display());
            Arc::new(store)
        }
        None => {
            eprintln!("   Database: in-memory");
            Arc::new(MemorySessionStore::new())
        }
    };

    let transcript = TranscriptLog::new(&config.log_dir);
    eprintln!("   Transcripts: {}", transcript.base_path().display());

    let sessions = Arc::new(SessionManager::new(
        store,
        llm,
        transcript,
        config.excerpt_chars,
    ));

    if cli_mode {
        eprintln!("   Answer the questions, then chat. /quit to exit.\n");
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let id = Repl::new(sessions).run(stdin, tokio::io::stdout()).await?;
        tracing::info!(session_id = %id, "CLI session finished");
        return Ok(());
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("   API: http://{}/api/sessions", addr);
    eprintln!("   Health: http://{}/health\n", addr);
    tracing::info!("Compliance Assist listening on {}", addr);

    axum::serve(listener, app_routes(sessions))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
