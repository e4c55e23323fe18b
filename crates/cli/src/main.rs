use clap::{Parser, Subcommand, ValueEnum};
use gridrank_domain::{CliOverrides, RankField};
use tracing::info;

mod bootstrap;
mod commands;
mod di;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "gridrank")]
#[command(version)]
#[command(about = "gridrank - Bounded leaderboards with scheduled retention")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Database path
    #[arg(long)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the retention scheduler and cache sweeper until Ctrl-C
    Run,

    /// Run one forced retention pass and print its report
    Cleanup,

    /// Print table sizes against their retention bounds and recent runs
    Status {
        /// Run reports to list, newest first
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Newest run reports to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Print the top list of a category
    Top {
        game_type: i32,
        #[arg(default_value_t = 0)]
        sub_type: i32,
        #[arg(long, value_enum, default_value_t = FieldArg::Score)]
        field: FieldArg,
    },

    /// Print a player's absolute rank in a category
    Rank {
        player_id: String,
        game_type: i32,
        #[arg(default_value_t = 0)]
        sub_type: i32,
        #[arg(long, value_enum, default_value_t = FieldArg::Score)]
        field: FieldArg,
    },

    /// Record a score for a player
    Submit {
        player_id: String,
        game_type: i32,
        sub_type: i32,
        score: f64,
        /// Seconds of play to add to the record
        #[arg(long, default_value_t = 0.0)]
        play_time: f64,
        #[arg(long)]
        nick_name: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Score,
    PlayTime,
}

impl From<FieldArg> for RankField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Score => RankField::Score,
            FieldArg::PlayTime => RankField::PlayTime,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        database_path: cli.database.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting gridrank v{}", env!("CARGO_PKG_VERSION"));

    let pool = bootstrap::init_database(&config.database).await?;

    let repos = di::Repositories::new(pool.clone());
    let services = di::Services::new(&config, &repos);
    let use_cases = di::UseCases::new(&repos, &services);

    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => commands::run(&config, &services).await,
        Command::Cleanup => commands::cleanup(&use_cases).await,
        Command::Status { limit, offset } => commands::status(&use_cases, limit, offset).await,
        Command::Top {
            game_type,
            sub_type,
            field,
        } => commands::top(&use_cases, game_type, sub_type, field.into()).await,
        Command::Rank {
            player_id,
            game_type,
            sub_type,
            field,
        } => commands::rank(&use_cases, &player_id, game_type, sub_type, field.into()).await,
        Command::Submit {
            player_id,
            game_type,
            sub_type,
            score,
            play_time,
            nick_name,
        } => {
            commands::submit(
                &use_cases,
                commands::Submission {
                    player_id,
                    game_type,
                    sub_type,
                    score,
                    play_time,
                    nick_name,
                },
            )
            .await
        }
    };

    pool.close().await;
    result
}
