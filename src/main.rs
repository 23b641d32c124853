use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use relcast::{
    cli::{self, ArtistSelection, RetrieveOptions},
    config, error,
    release::Locale,
    utils,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Retrieve releases, announce new ones and update the histories
    Retrieve(RetrieveArgs),

    /// List releases found today
    Today(TodayArgs),

    /// List collaborators missing from the artist list
    Missing(MissingArgs),

    /// Look artist names up on Spotify and write the artist list
    Collect(CollectArgs),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RetrieveArgs {
    /// Artist list CSV (name,spotifyId,youtubeMusicId)
    #[clap(long)]
    pub artists: Option<PathBuf>,

    /// Folder holding the release histories
    #[clap(long)]
    pub data_dir: Option<PathBuf>,

    /// Process every artist instead of the current hour's group
    #[clap(long, conflicts_with = "group")]
    pub all: bool,

    /// Process the artists of one hourly group (0-23)
    #[clap(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub group: Option<u32>,

    /// Only announce releases from this date on (YYYY, YYYY-MM or YYYY-MM-DD)
    #[clap(long, value_parser = utils::parse_date)]
    pub since: Option<NaiveDate>,

    /// Language of the posts
    #[clap(long, value_enum, default_value_t = Locale::Ukrainian)]
    pub locale: Locale,

    /// Neither post nor save anything
    #[clap(long)]
    pub dry_run: bool,

    /// Save the histories without posting
    #[clap(long)]
    pub no_post: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TodayArgs {
    /// Folder holding the release histories
    #[clap(long)]
    pub data_dir: Option<PathBuf>,

    /// Day to list instead of today (UTC)
    #[clap(long, value_parser = utils::parse_date)]
    pub date: Option<NaiveDate>,
}

#[derive(Parser, Debug, Clone)]
pub struct MissingArgs {
    /// Artist list CSV (name,spotifyId,youtubeMusicId)
    #[clap(long)]
    pub artists: Option<PathBuf>,

    /// Folder holding the release histories
    #[clap(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CollectArgs {
    /// Text file with one artist name per line
    #[clap(long, default_value = "artists.txt")]
    pub names: PathBuf,

    /// Artist list CSV to write
    #[clap(long)]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Retrieve(opt) => {
            let selection = match (opt.all, opt.group) {
                (true, _) => ArtistSelection::All,
                (false, Some(group)) => ArtistSelection::Group(group),
                (false, None) => ArtistSelection::CurrentHour,
            };
            cli::retrieve(RetrieveOptions {
                artists_file: opt.artists.unwrap_or_else(config::artists_file),
                data_dir: opt.data_dir.unwrap_or_else(config::releases_dir),
                selection,
                since: opt.since,
                locale: opt.locale,
                dry_run: opt.dry_run,
                no_post: opt.no_post,
            })
            .await
        }
        Command::Today(opt) => {
            cli::today(
                opt.data_dir.unwrap_or_else(config::releases_dir),
                opt.date.unwrap_or_else(|| Utc::now().date_naive()),
            )
            .await
        }
        Command::Missing(opt) => {
            cli::missing(
                opt.artists.unwrap_or_else(config::artists_file),
                opt.data_dir.unwrap_or_else(config::releases_dir),
            )
            .await
        }
        Command::Collect(opt) => {
            cli::collect(opt.names, opt.out.unwrap_or_else(config::artists_file)).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
