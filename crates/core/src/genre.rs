//! Genre taxonomy and keyword classifier
//!
//! Upstream genre strings are free text ("Detective Fiction", "gothic
//! tales", ...). [`match_genre`] maps them onto a fixed taxonomy with a
//! keyword table: exact match first, then the first keyword that is a
//! substring of the input, in table declaration order. Pure and total:
//! any input, including the empty string, yields a genre.

use serde::Serialize;

/// One entry of the fixed genre taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub svg_icon: &'static str,
    pub color: &'static str,
}

macro_rules! genre {
    ($const_name:ident, $id:literal, $name:literal, $icon:literal, $svg:literal, $color:literal) => {
        pub const $const_name: Genre = Genre {
            id: $id,
            name: $name,
            icon: $icon,
            svg_icon: $svg,
            color: $color,
        };
    };
}

// Fiction
genre!(FICTION, "fiction", "Fiction", "📚", "book", "#8d6e63");
genre!(MYSTERY, "mystery", "Mystery & Thriller", "🔍", "search", "#424242");
genre!(ROMANCE, "romance", "Romance", "💕", "heart", "#e91e63");
genre!(SCIFI, "science-fiction", "Science Fiction", "🚀", "rocket", "#2196f3");
genre!(FANTASY, "fantasy", "Fantasy", "🐉", "sparkles", "#9c27b0");
genre!(
    HISTORICAL,
    "historical-fiction",
    "Historical Fiction",
    "⌛",
    "landmark",
    "#795548"
);
genre!(ADVENTURE, "adventure", "Adventure", "🗺️", "compass", "#ff6f00");
genre!(HORROR, "horror", "Horror", "👻", "ghost", "#212121");
genre!(HUMOR, "humor", "Humor", "😄", "smile", "#ffc107");

// Non-fiction
genre!(NONFICTION, "non-fiction", "Non-Fiction", "📖", "book-open", "#6d4c41");
genre!(
    BIOGRAPHY,
    "biography",
    "Biography & Memoir",
    "👤",
    "user",
    "#546e7a"
);
genre!(HISTORY, "history", "History", "🏛️", "scroll", "#8d6e63");
genre!(PHILOSOPHY, "philosophy", "Philosophy", "💭", "lightbulb", "#5e35b1");
genre!(SCIENCE, "science", "Science & Nature", "🔬", "flask", "#00897b");
genre!(
    RELIGION,
    "religion",
    "Religion & Spirituality",
    "🕊️",
    "feather",
    "#673ab7"
);
genre!(SELFHELP, "self-help", "Self-Help", "🌟", "star", "#d32f2f");

// Other
genre!(POETRY, "poetry", "Poetry", "✍️", "feather", "#c2185b");
genre!(DRAMA, "drama", "Drama & Plays", "🎭", "theater", "#7b1fa2");
genre!(
    CHILDREN,
    "children",
    "Children's Literature",
    "🧒",
    "baby",
    "#ff9800"
);
genre!(YOUNGADULT, "young-adult", "Young Adult", "📱", "users", "#00bcd4");
genre!(CLASSICS, "classics", "Classics", "📜", "scroll", "#5d4037");
genre!(
    SHORTSTORIES,
    "short-stories",
    "Short Stories",
    "📝",
    "file-text",
    "#26a69a"
);

/// Every genre in the taxonomy
pub const ALL_GENRES: &[Genre] = &[
    FICTION, MYSTERY, ROMANCE, SCIFI, FANTASY, HISTORICAL, ADVENTURE, HORROR, HUMOR, NONFICTION,
    BIOGRAPHY, HISTORY, PHILOSOPHY, SCIENCE, RELIGION, SELFHELP, POETRY, DRAMA, CHILDREN,
    YOUNGADULT, CLASSICS, SHORTSTORIES,
];

/// A named grouping of genres for browse screens
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenreCategory {
    pub name: &'static str,
    pub genres: &'static [Genre],
}

pub const GENRE_CATEGORIES: &[GenreCategory] = &[
    GenreCategory {
        name: "Fiction",
        genres: &[
            FICTION, MYSTERY, ROMANCE, SCIFI, FANTASY, HISTORICAL, ADVENTURE, HORROR, HUMOR,
        ],
    },
    GenreCategory {
        name: "Non-Fiction",
        genres: &[
            NONFICTION, BIOGRAPHY, HISTORY, PHILOSOPHY, SCIENCE, RELIGION, SELFHELP,
        ],
    },
    GenreCategory {
        name: "Other Categories",
        genres: &[POETRY, DRAMA, CHILDREN, YOUNGADULT, CLASSICS, SHORTSTORIES],
    },
];

// Declaration order is the tie-break order for substring matches; earlier
// entries win. Keep multi-word keywords near their single-word variants.
const KEYWORDS: &[(&str, Genre)] = &[
    ("fiction", FICTION),
    ("novel", FICTION),
    ("literature", FICTION),
    ("mystery", MYSTERY),
    ("detective", MYSTERY),
    ("thriller", MYSTERY),
    ("crime", MYSTERY),
    ("romance", ROMANCE),
    ("love", ROMANCE),
    ("science fiction", SCIFI),
    ("sci-fi", SCIFI),
    ("scifi", SCIFI),
    ("fantasy", FANTASY),
    ("magic", FANTASY),
    ("historical", HISTORICAL),
    ("historical fiction", HISTORICAL),
    ("adventure", ADVENTURE),
    ("action", ADVENTURE),
    ("horror", HORROR),
    ("gothic", HORROR),
    ("humor", HUMOR),
    ("humour", HUMOR),
    ("comedy", HUMOR),
    ("non-fiction", NONFICTION),
    ("nonfiction", NONFICTION),
    ("biography", BIOGRAPHY),
    ("memoir", BIOGRAPHY),
    ("autobiography", BIOGRAPHY),
    ("history", HISTORY),
    ("philosophy", PHILOSOPHY),
    ("science", SCIENCE),
    ("nature", SCIENCE),
    ("natural history", SCIENCE),
    ("religion", RELIGION),
    ("spirituality", RELIGION),
    ("theology", RELIGION),
    ("self-help", SELFHELP),
    ("self help", SELFHELP),
    ("poetry", POETRY),
    ("poems", POETRY),
    ("verse", POETRY),
    ("drama", DRAMA),
    ("plays", DRAMA),
    ("theatre", DRAMA),
    ("theater", DRAMA),
    ("children", CHILDREN),
    ("juvenile", CHILDREN),
    ("young adult", YOUNGADULT),
    ("ya", YOUNGADULT),
    ("teen", YOUNGADULT),
    ("classics", CLASSICS),
    ("classic", CLASSICS),
    ("short stories", SHORTSTORIES),
    ("short story", SHORTSTORIES),
];

/// Maps a free-text genre string onto the taxonomy.
///
/// Empty or unmatched input defaults to [`FICTION`].
pub fn match_genre(text: &str) -> Genre {
    let normalized = text.to_lowercase();
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return FICTION;
    }

    for (keyword, genre) in KEYWORDS {
        if *keyword == normalized {
            return *genre;
        }
    }

    for (keyword, genre) in KEYWORDS {
        if normalized.contains(keyword) {
            return *genre;
        }
    }

    FICTION
}

/// Color for a genre id, falling back to the Fiction brown
pub fn genre_color(id: &str) -> &'static str {
    ALL_GENRES
        .iter()
        .find(|g| g.id == id)
        .map(|g| g.color)
        .unwrap_or(FICTION.color)
}

/// Icon for a genre id, falling back to the Fiction book
pub fn genre_icon(id: &str) -> &'static str {
    ALL_GENRES
        .iter()
        .find(|g| g.id == id)
        .map(|g| g.icon)
        .unwrap_or(FICTION.icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(match_genre("mystery"), MYSTERY);
        assert_eq!(match_genre("Science Fiction"), SCIFI);
        assert_eq!(match_genre("  poetry  "), POETRY);
    }

    #[test]
    fn test_substring_match() {
        // "horror" is the first table keyword contained in the input
        assert_eq!(match_genre("Gothic Horror Tale"), HORROR);
        assert_eq!(match_genre("Detective stories of old London"), MYSTERY);
        assert_eq!(match_genre("A comedy of manners"), HUMOR);
    }

    #[test]
    fn test_earlier_entry_wins_ties() {
        // Contains both "fiction" and "science fiction"; table order puts
        // plain "fiction" first.
        assert_eq!(match_genre("science fiction classics"), FICTION);
    }

    #[test]
    fn test_default_fiction() {
        assert_eq!(match_genre(""), FICTION);
        assert_eq!(match_genre("   "), FICTION);
        assert_eq!(match_genre("zzzz-unknown"), FICTION);
    }

    #[test]
    fn test_color_and_icon_lookup() {
        assert_eq!(genre_color("horror"), "#212121");
        assert_eq!(genre_color("nope"), FICTION.color);
        assert_eq!(genre_icon("poetry"), "✍️");
        assert_eq!(genre_icon("nope"), FICTION.icon);
    }

    #[test]
    fn test_taxonomy_complete() {
        assert_eq!(ALL_GENRES.len(), 22);
        let grouped: usize = GENRE_CATEGORIES.iter().map(|c| c.genres.len()).sum();
        assert_eq!(grouped, ALL_GENRES.len());
    }
}
