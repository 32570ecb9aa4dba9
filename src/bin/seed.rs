use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "santa-seed")]
#[command(version)]
#[command(about = "Imports a member roster into the Secret Santa database.", long_about = None)]
struct Args {
    /// SQLite connection string.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:santa.db?mode=rwc")]
    database_url: String,

    /// JSON roster file.
    #[arg(short, long)]
    roster: PathBuf,

    /// Wipe existing members and all game data first.
    #[arg(long)]
    replace: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "santaserver=info".into()),
        )
        .init();

    let args = Args::parse();

    let pool = match santaserver::db::create_pool(&args.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("failed to open {}: {e}", args.database_url);
            return ExitCode::FAILURE;
        }
    };

    let entries = match santaserver::db::roster::load_roster_file(&args.roster).await {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if !args.replace {
        match santaserver::db::members::count_members(&pool).await {
            Ok(0) => {}
            Ok(n) => {
                eprintln!("database already has {n} member(s); pass --replace to overwrite");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        }
    }

    match santaserver::db::roster::import_roster(&pool, entries, args.replace).await {
        Ok(n) => {
            println!("imported {n} member(s)");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("import failed: {e}");
            ExitCode::FAILURE
        }
    }
}
