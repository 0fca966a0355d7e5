//! Search-field selector for the catalog's `column=` query parameter.

use std::fmt;
use std::str::FromStr;

/// Catalog column matched by a search.
///
/// Maps one-to-one onto the values the mirror accepts for `column=` in
/// `search.php`. [`SearchField::Default`] searches across title, author,
/// series, publisher, year, and ISBN at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchField {
    /// Search all primary columns (`column=def`).
    #[default]
    Default,
    Title,
    Author,
    Series,
    Publisher,
    Year,
    /// ISBN / catalog identifier column.
    Identifier,
    Language,
    Md5,
    Tags,
    Extension,
}

impl SearchField {
    /// The literal `column=` value sent to the mirror.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "def",
            Self::Title => "title",
            Self::Author => "author",
            Self::Series => "series",
            Self::Publisher => "publisher",
            Self::Year => "year",
            Self::Identifier => "identifier",
            Self::Language => "language",
            Self::Md5 => "md5",
            Self::Tags => "tags",
            Self::Extension => "extension",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = UnknownSearchField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "def" | "default" => Ok(Self::Default),
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "series" => Ok(Self::Series),
            "publisher" => Ok(Self::Publisher),
            "year" => Ok(Self::Year),
            "identifier" | "isbn" => Ok(Self::Identifier),
            "language" => Ok(Self::Language),
            "md5" => Ok(Self::Md5),
            "tags" => Ok(Self::Tags),
            "extension" => Ok(Self::Extension),
            _ => Err(UnknownSearchField {
                value: value.to_string(),
            }),
        }
    }
}

/// Error returned when a string does not name a known catalog column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown search field '{value}'\n  Suggestion: use one of def, title, author, series, publisher, year, identifier, language, md5, tags, extension")]
pub struct UnknownSearchField {
    /// The unrecognized input.
    pub value: String,
}
