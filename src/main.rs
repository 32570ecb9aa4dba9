use std::time::Duration;
use tokio::net::TcpListener;

use santaserver::config::Config;
use santaserver::state::AppState;

const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "santaserver=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();
    print_banner(&config);

    let db = santaserver::db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    if let Some(ref path) = config.roster_path {
        import_startup_roster(&db, path).await;
    }

    let state = AppState::new(db, config.test_mode, config.token_ttl_days);

    let purge_db = state.db.clone();
    let login_attempts = state.login_attempts.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match santaserver::db::auth::purge_expired_tokens(&purge_db).await {
                Ok(0) => {}
                Ok(n) => tracing::info!("purged {n} expired token(s)"),
                Err(e) => tracing::error!("token purge error: {e}"),
            }
            let evicted = santaserver::middleware::rate_limit::evict_idle_buckets(&login_attempts);
            if evicted > 0 {
                tracing::debug!("evicted {evicted} idle login bucket(s)");
            }
        }
    });

    let app = santaserver::routes::router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("failed to bind");

    let actual_port = listener
        .local_addr()
        .expect("failed to get local address")
        .port();
    eprintln!("  \x1b[32m→ listening on 0.0.0.0:{actual_port}\x1b[0m");
    eprintln!();

    axum::serve(listener, app).await.expect("server error");
}

fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");

    eprintln!();
    eprintln!("  \x1b[1;31msanta\x1b[0m \x1b[2mv{version}\x1b[0m");
    eprintln!();
    eprintln!("  \x1b[2mport\x1b[0m         {}", config.port);
    eprintln!("  \x1b[2mdatabase\x1b[0m     {}", config.database_url);
    eprintln!("  \x1b[2mtoken ttl\x1b[0m    {} days", config.token_ttl_days);
    if let Some(ref path) = config.roster_path {
        eprintln!("  \x1b[2mroster\x1b[0m       {}", path.display());
    }

    if config.test_mode {
        eprintln!();
        eprintln!("  \x1b[33m! test mode enabled\x1b[0m");
    }

    eprintln!();
}

/// Seeds an empty database from the configured roster. An existing game is left alone.
async fn import_startup_roster(db: &sqlx::SqlitePool, path: &std::path::Path) {
    match santaserver::db::members::count_members(db).await {
        Ok(0) => {}
        Ok(_) => {
            tracing::debug!("members present, skipping roster import");
            return;
        }
        Err(e) => {
            tracing::error!("failed to count members: {e}");
            return;
        }
    }

    let result = match santaserver::db::roster::load_roster_file(path).await {
        Ok(entries) => santaserver::db::roster::import_roster(db, entries, false).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(n) => tracing::info!("imported {n} member(s) from {}", path.display()),
        Err(e) => tracing::error!("roster import from {} failed: {e}", path.display()),
    }
}
