//! Built-in site plugins.

mod dailymotion;
mod picstate;
mod pixroute;
mod rapidvideo;
mod sendvid;
mod wordpress;

pub use dailymotion::Dailymotion;
pub use picstate::Picstate;
pub use pixroute::Pixroute;
pub use rapidvideo::Rapidvideo;
pub use sendvid::Sendvid;
pub use wordpress::Wordpress;

use std::sync::Arc;

use regex::Regex;

use crate::plugins::{ExtractionError, ExtractionPlugin};

/// Some hosts serve simplified pages to command-line clients.
pub(crate) const WGET_USER_AGENT: &str = "Wget/1.13.4 (linux-gnu)";

/// Every built-in plugin, unsorted.
pub fn builtin() -> Result<Vec<Arc<dyn ExtractionPlugin>>, regex::Error> {
    let plugins: Vec<Arc<dyn ExtractionPlugin>> = vec![
        Arc::new(Dailymotion::new()?) as Arc<dyn ExtractionPlugin>,
        Arc::new(Picstate::new()?),
        Arc::new(Pixroute::new()?),
        Arc::new(Rapidvideo::new()?),
        Arc::new(Sendvid::new()?),
        Arc::new(Wordpress::new()),
    ];
    Ok(plugins)
}

/// First capture group of `re` in `page`.
pub(crate) fn capture(re: &Regex, page: &str, what: &'static str) -> Result<String, ExtractionError> {
    re.captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ExtractionError::NoMatch(what))
}

/// Value of the `content` attribute following `property` in a meta tag,
/// e.g. `og:title`.
pub(crate) fn meta_content(page: &str, property: &str) -> Option<String> {
    let marker = format!("{}\" content=\"", property);
    let start = page.find(&marker)? + marker.len();
    let rest = &page[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}
