/// NextSound - headless preview player
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use nextsound_cli::{playback_finished, App, AppConfig};
use nextsound_core::{CatalogProvider, Track};
use nextsound_playback::{NoticeLevel, PlaybackEvent};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nextsound")]
#[command(about = "Search catalogs and play 30-second previews", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./nextsound.toml if present)
    #[arg(short, long, global = true, env = "NEXTSOUND_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Catalog {
    Itunes,
    Deezer,
}

#[derive(Subcommand)]
enum Commands {
    /// Search tracks, artists and commands
    Search {
        query: String,
        /// Choose the Nth result (1-based) and remember it
        #[arg(short, long)]
        select: Option<usize>,
    },
    /// Show or clear recent searches
    History {
        #[arg(long)]
        clear: bool,
    },
    /// Queue the tracks matching a query and play their previews
    Play {
        query: String,
        #[arg(long, value_enum, default_value = "itunes")]
        catalog: Catalog,
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
        /// Stop after this many seconds
        #[arg(long, default_value_t = 60)]
        seconds: u64,
        #[arg(long)]
        shuffle: bool,
    },
    /// Manage favorites (needs a configured favorites service and session)
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites, newest first
    List,
    /// Add or remove the first track matching a query
    Toggle { query: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "nextsound=info,nextsound_cli=info,nextsound_playback=info,nextsound_search=warn,nextsound_client=warn"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.validate()?;
    let mut app = App::build(&config)?;

    match cli.command {
        Commands::Search { query, select } => search(&mut app, &query, select).await?,
        Commands::History { clear } => history(&mut app, clear)?,
        Commands::Play {
            query,
            catalog,
            limit,
            seconds,
            shuffle,
        } => play(&app, &query, catalog, limit, Duration::from_secs(seconds), shuffle).await?,
        Commands::Favorites { action } => favorites(&app, action).await?,
    }

    Ok(())
}

async fn search(app: &mut App, query: &str, select: Option<usize>) -> anyhow::Result<()> {
    let results = app.palette.search(query).await;
    if let Some(error) = &results.error {
        eprintln!("warning: {error}");
    }

    let entries = results.all();
    if entries.is_empty() {
        println!("No results for \"{query}\"");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        let marker = if entry.is_exact_match { "*" } else { " " };
        println!("{:>2}.{marker} [{:?}] {} - {}", i + 1, entry.kind, entry.title, entry.subtitle);
    }

    if let Some(n) = select {
        let entry = n
            .checked_sub(1)
            .and_then(|i| entries.get(i))
            .with_context(|| format!("no result number {n}"))?;
        match app.palette.select(query, entry) {
            Some(action) => println!("Selected {}: {action:?}", entry.title),
            None => println!("Selected {}", entry.title),
        }
    }
    Ok(())
}

fn history(app: &mut App, clear: bool) -> anyhow::Result<()> {
    if clear {
        app.palette.clear_history()?;
        println!("Search history cleared");
        return Ok(());
    }

    println!("Recent searches:");
    for query in app.palette.recent_queries() {
        println!("  {query}");
    }
    println!("Recent selections:");
    for item in app.palette.recent_items() {
        match item.action {
            Some(action) => println!("  [{:?}] {} -> {action:?}", item.kind, item.title),
            None => println!("  [{:?}] {}", item.kind, item.title),
        }
    }
    Ok(())
}

async fn play(
    app: &App,
    query: &str,
    catalog: Catalog,
    limit: usize,
    run_for: Duration,
    shuffle: bool,
) -> anyhow::Result<()> {
    let catalog: Arc<dyn CatalogProvider> = match catalog {
        Catalog::Itunes => Arc::clone(&app.itunes) as Arc<dyn CatalogProvider>,
        Catalog::Deezer => Arc::clone(&app.deezer) as Arc<dyn CatalogProvider>,
    };
    let tracks = catalog.search_tracks(query, limit).await?;
    if tracks.is_empty() {
        println!("No tracks for \"{query}\"");
        return Ok(());
    }

    let player = &app.player;
    if shuffle {
        player.toggle_shuffle().await;
    }
    player.play_all_tracks(tracks).await;
    let ticker = player.spawn_ticker();

    let deadline = tokio::time::Instant::now() + run_for;
    let mut status = tokio::time::interval(Duration::from_millis(500));
    loop {
        status.tick().await;
        for event in player.drain_events().await {
            print_event(&event);
        }

        let snapshot = player.snapshot().await;
        if playback_finished(&snapshot) || tokio::time::Instant::now() >= deadline {
            break;
        }
        if let Some(track) = &snapshot.current_track {
            print!(
                "\r{} - {} [{:?}] {:>5.1}%   ",
                track.artist, track.title, snapshot.phase, snapshot.progress_percent
            );
            std::io::stdout().flush()?;
        }
    }
    println!();

    ticker.abort();
    player.close_player().await;
    Ok(())
}

async fn favorites(app: &App, action: FavoritesAction) -> anyhow::Result<()> {
    let player = &app.player;
    let loaded = player.load_favorites().await;
    for event in player.drain_events().await {
        print_event(&event);
    }
    loaded?;

    match action {
        FavoritesAction::List => {
            if let Some(user_id) = app.signed_in_user().await {
                println!("Favorites for {user_id}:");
            }
            let snapshot = player.snapshot().await;
            if snapshot.favorites.is_empty() {
                println!("No favorites yet");
            }
            for key in snapshot.favorites {
                println!("  {key}");
            }
        }
        FavoritesAction::Toggle { query } => {
            let track: Track = app
                .itunes
                .search_tracks(&query, 1)
                .await?
                .into_iter()
                .next()
                .with_context(|| format!("no track matches \"{query}\""))?;
            let result = player.toggle_favorite(&track).await;
            for event in player.drain_events().await {
                print_event(&event);
            }
            result?;
        }
    }
    Ok(())
}

fn print_event(event: &PlaybackEvent) {
    match event {
        PlaybackEvent::Notice(notice) => {
            let label = match notice.level {
                NoticeLevel::Success => "ok",
                NoticeLevel::Info => "info",
                NoticeLevel::Warning => "warn",
                NoticeLevel::Error => "error",
            };
            println!("\n[{label}] {}", notice.message);
        }
        PlaybackEvent::TrackChanged { track, .. } => println!("\nNow playing {track}"),
        PlaybackEvent::SimulationStarted { track } => {
            println!("\nNo preview for {track}, simulating progress");
        }
        PlaybackEvent::MediaFailed { track, message } => {
            println!("\nPlayback of {track} failed: {message}");
        }
        other => tracing::debug!(event = ?other, "Playback event"),
    }
}
