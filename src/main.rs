mod app;
mod config;
mod llm;
mod prompts;
mod sessions;
mod state;
mod ui;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "nutrigen=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let startup = match bootstrap(|key| std::env::var(key).ok()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "startup aborted");
            return Err(e);
        }
    };

    let _sweeper = startup
        .state
        .sessions
        .spawn_sweeper(startup.state.config.session_idle_ttl() / 4);

    app::serve(app::build_app(startup.state), &startup.host, startup.port).await
}

struct Startup {
    state: AppState,
    host: String,
    port: u16,
}

/// Config, then state. No credential, no state: nothing gets built or sent.
fn bootstrap<F>(lookup: F) -> anyhow::Result<Startup>
where
    F: Fn(&str) -> Option<String>,
{
    let config = AppConfig::from_lookup(lookup)?;
    tracing::info!(model = %config.llm.model, "completion backend configured");

    let (host, port) = (config.host.clone(), config.port);
    let state = AppState::init(config)?;
    Ok(Startup { state, host, port })
}
