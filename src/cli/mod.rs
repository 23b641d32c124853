//! # CLI Module
//!
//! Command bodies behind the `relcast` binary. Each command loads what it
//! needs, reports progress with the console macros and exits through
//! [`error!`](crate::error) only on batch-level failures.
//!
//! - [`retrieve`] - scrape, enrich and reconcile releases, announce new ones
//!   and save the histories
//! - [`today`] - table of releases found on a given day
//! - [`missing`] - collaborators credited on stored releases but absent from
//!   the artist list
//! - [`collect`] - look artist names up on Spotify and write the artist list
//!
//! ```text
//! retrieve, per artist:
//!   history → Spotify → dedupe → Last.fm → reconcile
//! after all artists:
//!   compose → Bluesky → Telegram → persist histories
//! ```
//!
//! ## Usage
//!
//! ```bash
//! relcast retrieve                 # artists of the current hour's group
//! relcast retrieve --all --dry-run # everything, without posting or saving
//! relcast today                    # what was found today
//! relcast missing                  # collaborators worth tracking
//! relcast collect --names artists.txt --out artist-ids.csv
//! ```

mod collect;
mod missing;
mod retrieve;
mod today;

pub use collect::{collect, collected_artist};
pub use missing::{find_missing_collaborators, missing};
pub use retrieve::{ArtistSelection, RetrieveOptions, compose_posts, retrieve, select_artists};
pub use today::today;
