use crate::types::MusicRelease;

/// Computes the key two releases share when they are the same real-world
/// release: `artists|title|type|releaseDate`, with artist names and title
/// trimmed, whitespace-collapsed and lowercased.
///
/// Artist order is significant. Two releases crediting the same artists in a
/// different order get different keys. The release date is taken verbatim, so
/// `2023` and `2023-05-01` never match.
pub fn release_identity<R: AsRef<MusicRelease>>(release: &R) -> String {
    let release = release.as_ref();
    let artists = release
        .artists
        .iter()
        .map(|artist| normalize(artist))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{artists}|{title}|{kind}|{date}",
        artists = artists,
        title = normalize(&release.title),
        kind = release.release_type,
        date = release.release_date.trim(),
    )
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
