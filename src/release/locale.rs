use crate::types::ReleaseType;

/// Language of the announcements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Locale {
    #[default]
    #[value(name = "uk")]
    Ukrainian,
    #[value(name = "en")]
    English,
}

impl Locale {
    /// Joins artist names the way the language lists people:
    /// `A`, `A і B`, `A, B і C`. Returns `None` for an empty list.
    pub fn join_artists<S: AsRef<str>>(&self, artists: &[S]) -> Option<String> {
        let final_separator = match self {
            Locale::Ukrainian => " і ",
            Locale::English => " & ",
        };

        match artists {
            [] => None,
            [single] => Some(single.as_ref().to_string()),
            [init @ .., last] => {
                let init = init
                    .iter()
                    .map(|artist| artist.as_ref())
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("{init}{final_separator}{}", last.as_ref()))
            }
        }
    }

    pub fn release_type_label(&self, release_type: ReleaseType) -> &'static str {
        match (self, release_type) {
            (Locale::Ukrainian, ReleaseType::Album) => "альбом",
            (Locale::Ukrainian, ReleaseType::Single) => "окремок",
            (Locale::Ukrainian, ReleaseType::Compilation) => "збірка",
            (Locale::English, ReleaseType::Album) => "album",
            (Locale::English, ReleaseType::Single) => "single",
            (Locale::English, ReleaseType::Compilation) => "compilation",
        }
    }

    /// Names the popularity tier of an artist. Each tier doubles the
    /// threshold of the one below; `NaN` has no tier.
    pub fn popularity_label(&self, popularity: f64) -> &'static str {
        const THRESHOLDS: [f64; 7] = [50.0, 25.0, 12.5, 6.75, 3.375, 1.6875, 0.84375];
        const UKRAINIAN: [&str; 8] = [
            "Легенда",
            "Зірка",
            "Знаменитість",
            "Злет",
            "Проблиск",
            "Спроба",
            "Новачок",
            "Таємниця",
        ];
        const ENGLISH: [&str; 8] = [
            "Legend",
            "Star",
            "Celebrity",
            "Rising",
            "Glimpse",
            "Attempt",
            "Newcomer",
            "Mystery",
        ];

        if popularity.is_nan() {
            return "";
        }
        let tier = THRESHOLDS
            .iter()
            .position(|threshold| popularity > *threshold)
            .unwrap_or(THRESHOLDS.len());
        match self {
            Locale::Ukrainian => UKRAINIAN[tier],
            Locale::English => ENGLISH[tier],
        }
    }

    pub fn cover_alt_text(&self) -> &'static str {
        match self {
            Locale::Ukrainian => "Обкладинка релізу",
            Locale::English => "Release cover",
        }
    }
}

/// Turns a tag into a hashtag: `post-rock` becomes `#post_rock`.
///
/// Whitespace and hyphen runs become a single underscore and anything that
/// is neither alphanumeric nor an underscore is removed. Returns `None` when
/// nothing is left.
pub fn hashtagify(tag: &str) -> Option<String> {
    let mut hashtag = String::from("#");
    let mut in_separator = false;

    for c in tag.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator {
                hashtag.push('_');
                in_separator = true;
            }
            continue;
        }
        in_separator = false;
        if c.is_alphanumeric() || c == '_' {
            hashtag.push(c);
        }
    }

    (hashtag.len() > 1).then_some(hashtag)
}
