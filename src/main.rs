use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use feedpane::app::App;
use feedpane::config::Config;
use feedpane::display::{DisplayMode, FeedId};
use feedpane::feed::RowViewModel;
use feedpane::storage::{Database, DatabaseError, NewActivity};
use feedpane::util::{single_line, truncate_to_width};

/// Get the config directory path (~/.config/feedpane/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("feedpane"))
}

#[derive(Parser, Debug)]
#[command(name = "feedpane", about = "Activity feed screen over a local activity cache")]
struct Args {
    /// Database file (default: ~/.config/feedpane/activities.db)
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Config file (default: ~/.config/feedpane/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,

    /// Import a JSON array of activities into the cache
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Feed tab to show: major or minor
    #[arg(long)]
    feed: Option<FeedId>,

    /// Open an object by id
    #[arg(long, value_name = "ID")]
    show: Option<String>,

    /// Mode used with --show: feed_and_object or object
    #[arg(long, default_value = "feed_and_object")]
    mode: DisplayMode,

    /// Print the row position of an object id in the shown feed
    #[arg(long, value_name = "ID")]
    find: Option<String>,

    /// Force the two-pane layout
    #[arg(long, conflicts_with = "narrow")]
    wide: bool,

    /// Force the single-pane layout
    #[arg(long)]
    narrow: bool,
}

fn print_row(position: usize, row: &RowViewModel, selected: bool, width: usize) {
    let marker = if selected { '>' } else { ' ' };
    // Notes passed on by someone other than their author
    let origin = if row.shows_origin() { '~' } else { ' ' };
    let text = if row.shows_counters() {
        row.action_text()
    } else {
        row.summary()
    };
    let text = single_line(text);
    let counters = if row.shows_counters() {
        format!("{}/{}/{}", row.replies, row.likes, row.shares)
    } else {
        String::new()
    };
    println!(
        "{marker}{position:>4} {:<5}{origin} {counters:>9} {}",
        format!("{:?}", row.variant),
        truncate_to_width(&text, width)
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let db_path = args
        .db
        .clone()
        .unwrap_or_else(|| config_dir.join("activities.db"));

    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of feedpane appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let is_wide = if args.wide {
        true
    } else if args.narrow {
        false
    } else {
        config.layout.is_wide()
    };
    let summary_width = config.summary_width;
    let mut app = App::new(db, config, is_wide);

    if let Some(import_file) = &args.import {
        let content = std::fs::read_to_string(import_file)
            .with_context(|| format!("Failed to read import file: {}", import_file.display()))?;
        let activities: Vec<NewActivity> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid activity list in {}", import_file.display()))?;
        let stored = app.ingest(&activities).await?;
        println!("Imported {} activities from {}", stored, import_file.display());
    }

    let restored = app.start().await?;
    tracing::info!(restored, is_wide, "Screen started");

    if let Some(feed) = args.feed {
        app.select_tab(feed).await?;
    }
    if let Some(id) = &args.show {
        app.show_object(id, args.mode)?;
    }

    let ctl = &app.controller;
    let panes = ctl.pane_visibility();
    println!(
        "feed: {}  mode: {}  navigation: {:?}  panes: feed={} content={}",
        ctl.current_feed().map_or("-", FeedId::as_str),
        ctl.mode(),
        ctl.navigation_mode(),
        panes.feed,
        panes.content,
    );
    if let Some(object) = ctl.object_id() {
        println!("object: {object}");
    }

    if panes.feed {
        let selected = ctl.feed_pane().and_then(|p| p.selected_position());
        let rows = app.current_rows().context("Corrupt activity in local cache")?;
        if rows.is_empty() {
            println!("(no activities)");
        }
        for (position, row) in rows.iter().enumerate() {
            print_row(position, row, selected == Some(position), summary_width);
        }
    }

    if let Some(id) = &args.find {
        match app.find_in_current_feed(id) {
            Some(position) => println!("{id}: row {position}"),
            None => println!("{id}: not in feed"),
        }
    }

    app.save_session().await?;
    app.db.close().await;
    Ok(())
}
