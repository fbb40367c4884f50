mod config;
mod plan_cmds;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use plantplan_core::StoreBackend;
use plantplan_core::store::open_store;
use plantplan_db::config::DbConfig;
use plantplan_db::pool;
use plantplan_db::queries::plans as plan_db;

use config::PlantplanConfig;

#[derive(Parser)]
#[command(name = "plantplan", about = "Plant plan tracker: REST API and operator CLI")]
struct Cli {
    /// Database URL (overrides PLANTPLAN_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a plantplan config file
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Store backend: memory or postgres
        #[arg(long, default_value_t = StoreBackend::Memory)]
        backend: StoreBackend,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the database if needed and apply migrations
    DbInit,
    /// Serve the REST API
    Serve {
        /// Address to bind (overrides server.bind in the config file)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides server.port in the config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Plan management
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a plan
    Add {
        #[command(flatten)]
        fields: PlanFieldArgs,
    },
    /// List plans, optionally filtered (at most one filter)
    List {
        /// Exact planting season
        #[arg(long)]
        season: Option<String>,
        /// Exact sunlight needs
        #[arg(long)]
        sunlight: Option<String>,
        /// Watering frequency keyword (case-insensitive)
        #[arg(long)]
        watering: Option<String>,
        /// Name keyword (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one plan
    Show {
        /// Plan ID
        plan_id: String,
    },
    /// Replace every field of a plan
    Update {
        /// Plan ID
        plan_id: String,
        #[command(flatten)]
        fields: PlanFieldArgs,
    },
    /// Delete a plan
    Remove {
        /// Plan ID
        plan_id: String,
    },
    /// Count plans (all, or by exact planting season)
    Count {
        #[arg(long)]
        season: Option<String>,
    },
}

#[derive(Args)]
pub struct PlanFieldArgs {
    /// Plant name
    #[arg(long)]
    name: String,
    /// Planting season (e.g. Spring)
    #[arg(long)]
    season: String,
    /// Sunlight needs (e.g. "Full Sun")
    #[arg(long)]
    sunlight: String,
    /// Watering frequency
    #[arg(long)]
    watering: Option<String>,
    /// Free-form notes
    #[arg(long)]
    notes: Option<String>,
}

/// Execute the `plantplan init` command: write config file.
fn cmd_init(db_url: &str, backend: StoreBackend, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        store: config::StoreSection { backend },
        server: config::ServerSection::default(),
    };

    let path = config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url  = {db_url}");
    println!("  store.backend = {backend}");
    if backend == StoreBackend::Postgres {
        println!();
        println!("Next: run `plantplan db-init` to create and migrate the database.");
    }

    Ok(())
}

/// Execute the `plantplan db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = PlantplanConfig::resolve(cli_db_url)?;

    println!("Initializing plantplan database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::connect_and_migrate(&resolved.db_config).await?;

    let count = plan_db::count_all(&db_pool).await?;
    println!("Database ready. plant_plans: {count} rows");

    db_pool.close().await;

    println!("plantplan db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            db_url,
            backend,
            force,
        } => {
            cmd_init(&db_url, backend, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Serve { bind, port } => {
            let resolved = PlantplanConfig::resolve(cli.database_url.as_deref())?;
            let bind = bind.unwrap_or(resolved.server.bind);
            let port = port.unwrap_or(resolved.server.port);
            tracing::info!(backend = %resolved.backend, "opening plan store");
            let store = open_store(resolved.backend, &resolved.db_config).await?;
            serve_cmd::run_serve(store, &bind, port).await?;
        }
        Commands::Plan { command } => {
            let resolved = PlantplanConfig::resolve(cli.database_url.as_deref())?;
            if resolved.backend == StoreBackend::Memory {
                tracing::warn!("memory backend: changes are discarded when this command exits");
            }
            let store = open_store(resolved.backend, &resolved.db_config).await?;
            plan_cmds::run_plan_command(command, store.as_ref()).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "plantplan",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_plan_add() {
        let cli = Cli::try_parse_from([
            "plantplan",
            "plan",
            "add",
            "--name",
            "Tomato",
            "--season",
            "Spring",
            "--sunlight",
            "Full Sun",
            "--watering",
            "Twice a week",
        ])
        .unwrap();
        match cli.command {
            Commands::Plan {
                command: PlanCommands::Add { fields },
            } => {
                assert_eq!(fields.name, "Tomato");
                assert_eq!(fields.sunlight, "Full Sun");
                assert_eq!(fields.watering.as_deref(), Some("Twice a week"));
                assert!(fields.notes.is_none());
            }
            _ => panic!("expected plan add"),
        }
    }

    #[test]
    fn parses_init_backend() {
        let cli =
            Cli::try_parse_from(["plantplan", "init", "--backend", "postgres"]).unwrap();
        match cli.command {
            Commands::Init { backend, db_url, force } => {
                assert_eq!(backend, StoreBackend::Postgres);
                assert_eq!(db_url, DbConfig::DEFAULT_URL);
                assert!(!force);
            }
            _ => panic!("expected init"),
        }

        assert!(Cli::try_parse_from(["plantplan", "init", "--backend", "sqlite"]).is_err());
    }

    #[test]
    fn global_database_url_after_subcommand() {
        let cli = Cli::try_parse_from([
            "plantplan",
            "serve",
            "--port",
            "8080",
            "--database-url",
            "postgresql://h/db",
        ])
        .unwrap();
        assert_eq!(cli.database_url.as_deref(), Some("postgresql://h/db"));
        match cli.command {
            Commands::Serve { bind, port } => {
                assert!(bind.is_none());
                assert_eq!(port, Some(8080));
            }
            _ => panic!("expected serve"),
        }
    }
}
