use clap::{CommandFactory, Parser};
use trainctl::config::{Args, Command, MigrateDirection};
use trainctl::{Config, db, demo, migrator, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args)?;

    // If --validate flag is set, exit successfully after config validation
    if args.validate {
        println!("Configuration is valid.");
        return Ok(());
    }

    let Some(command) = args.command.clone() else {
        Args::command().print_help()?;
        return Ok(());
    };

    telemetry::init_telemetry()?;
    tracing::debug!("{:?}", args);

    let pool = db::connect(&config).await?;

    match command {
        Command::Migrate { direction: MigrateDirection::Up } => {
            migrator().run(&pool).await?;
            tracing::info!("Migrations applied");
        }
        Command::Migrate {
            direction: MigrateDirection::Down { target },
        } => {
            migrator().undo(&pool, target).await?;
            tracing::info!(target, "Migrations reverted");
        }
        Command::Demo { skip_seed, json } => {
            demo::run(&pool, skip_seed, json).await?;
        }
        Command::SetPassword { email, password } => {
            let user_id = trainctl::set_password(&pool, &email, &password).await?;
            println!("Password updated for user {user_id}");
        }
    }

    pool.close().await;
    Ok(())
}
