//! Search URL construction.

use crate::config::MirrorConfig;
use crate::field::SearchField;

/// Builds the canonical search URL for a term, field, and result limit.
///
/// By default only spaces in the term are replaced with `%20`, matching the
/// mirror's lenient query parsing. With
/// [`MirrorConfig::strict_query_encoding`] the whole term is percent-encoded,
/// which survives terms containing `&`, `#`, or non-ASCII characters at the
/// cost of diverging from the reference behavior.
#[must_use]
pub fn search_url(config: &MirrorConfig, term: &str, field: SearchField, limit: u32) -> String {
    let req = if config.strict_query_encoding {
        urlencoding::encode(term).into_owned()
    } else {
        term.replace(' ', "%20")
    };
    format!(
        "{}/search.php?req={}&column={}&res={}",
        config.search_base(),
        req,
        field.as_str(),
        limit
    )
}
