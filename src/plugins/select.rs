/// A media URL found on a page, tagged with its variant (e.g. `"720"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub variant: String,
    pub url: String,
}

impl MediaSource {
    pub fn new(variant: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            url: url.into(),
        }
    }
}

/// Pick the source to download.
///
/// Order of preference:
/// 1. a source whose variant equals `requested`;
/// 2. walking `preference` from just after `requested` (or from its start
///    when `requested` is not a known tier), the first tier with a source;
/// 3. the first source on the page.
///
/// Returns `None` only when `sources` is empty.
pub fn select_variant<'a>(
    sources: &'a [MediaSource],
    requested: Option<&str>,
    preference: &[&str],
) -> Option<&'a MediaSource> {
    let find = |variant: &str| sources.iter().find(|s| s.variant == variant);

    if let Some(wanted) = requested {
        if let Some(source) = find(wanted) {
            return Some(source);
        }
    }

    let start = requested
        .and_then(|wanted| preference.iter().position(|tier| *tier == wanted))
        .map(|pos| pos + 1)
        .unwrap_or(0);

    preference[start..]
        .iter()
        .find_map(|tier| find(*tier))
        .or_else(|| sources.first())
}
