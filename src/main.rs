use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use quizmaster::config::{self, Config, STORE_FILE};
use quizmaster::{
    Difficulty, FileStore, KeyValueStore, LeaderboardFilter, MemoryStore, OpenTdbClient, Progress,
    QuizError, QuizMaster, Timeframe, TriviaApi, logging,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Terminal trivia with streaks, powered by the Open Trivia Database", long_about = None)]
struct Args {
    /// Player name shown on the leaderboard
    #[arg(short, long)]
    name: Option<String>,

    /// Directory for settings, saved progress and logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Base URL of the trivia service
    #[arg(long)]
    api_url: Option<String>,

    /// Keep progress in memory only
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play in the terminal UI (default)
    Play,
    /// List the available trivia categories
    Categories,
    /// Print one page of the local leaderboard
    Leaderboard {
        /// all-time, today, this-week or this-month
        #[arg(short, long, default_value = "all-time")]
        timeframe: Timeframe,
        /// Only entries from this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only entries at this difficulty
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
        /// Case-insensitive player name filter
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show the high score and saved session state
    Stats,
    /// Forget the saved session token
    ResetToken,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    let data_dir = args.data_dir.unwrap_or_else(config::default_data_dir);
    let _guard = logging::init(&data_dir);

    let mut config = Config::from_env(&data_dir);
    if let Some(name) = args.name.filter(|name| !name.trim().is_empty()) {
        config.player_name = name.trim().to_string();
    }
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }

    let store: Arc<dyn KeyValueStore> = if args.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::open(data_dir.join(STORE_FILE))?)
    };
    let progress = Progress::new(store);
    info!(data_dir = %data_dir.display(), ephemeral = args.ephemeral, "Starting");

    match args.command.unwrap_or(Command::Play) {
        Command::Play => QuizMaster::new(&config, progress)?.run().await,
        Command::Categories => print_categories(&config).await,
        Command::Leaderboard {
            timeframe,
            category,
            difficulty,
            search,
            page,
        } => {
            let filter = LeaderboardFilter {
                timeframe,
                category,
                difficulty,
                search,
            };
            print_leaderboard(&progress, &filter, page);
            Ok(())
        }
        Command::Stats => {
            print_stats(&progress);
            Ok(())
        }
        Command::ResetToken => {
            progress.clear_token()?;
            println!("Session token cleared; a new one is requested on the next game.");
            Ok(())
        }
    }
}

async fn print_categories(config: &Config) -> Result<(), QuizError> {
    let client = OpenTdbClient::new(&config.api_base_url, config.request_timeout())?;
    let categories = client.categories().await?;
    for category in categories {
        println!("{:>4}  {}", category.id, category.name);
    }
    Ok(())
}

fn print_leaderboard(progress: &Progress, filter: &LeaderboardFilter, page: usize) {
    let board = progress.leaderboard();
    let page = board.page(filter, &Local::now(), page);

    if page.rows.is_empty() {
        println!("No entries match.");
        return;
    }

    println!(
        "{:>4}  {:<16} {:>5}  {:<28} {:<8} {:<14} {}",
        "Rank", "Player", "Score", "Category", "Level", "Mode", "Date"
    );
    for row in &page.rows {
        let entry = row.entry;
        println!(
            "{:>4}  {:<16} {:>5}  {:<28} {:<8} {:<14} {}",
            row.rank,
            entry.username,
            entry.score,
            entry.category,
            entry.difficulty.to_string(),
            entry.mode.label(),
            entry.date.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }
    println!(
        "Page {} of {} ({} entries)",
        page.number, page.total_pages, page.total_entries
    );
}

fn print_stats(progress: &Progress) {
    let board = progress.leaderboard();
    println!("High score:    {}", progress.high_score());
    println!("Top result:    {}", board.top_score());
    println!("Results saved: {}", board.len());
    println!(
        "Categories:    {}",
        if board.is_empty() {
            "-".to_string()
        } else {
            board.categories().join(", ")
        }
    );
    println!(
        "Session token: {}",
        if progress.token().is_some() { "saved" } else { "none" }
    );
}
