mod artists;
mod history;

pub use artists::{
    ARTIST_LIST_HEADER, ArtistListError, ArtistListManager, format_artist_list, parse_artist_list,
    parse_artist_names,
};
pub use history::{HistoryError, HistoryManager, HistorySnapshots, found_on_day};
