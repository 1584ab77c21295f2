use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use html_escape::{decode_html_entities, encode_text};
use serde::Deserialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::plugins::{
    ExtractionError, ExtractionPlugin, FeedDocument, PageFetcher, PageRequest, PluginDescriptor,
    PluginSettings, SettingSpec,
};

const POSTS_PATH: &str = "/wp-json/wp/v2/posts";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:53.0) Gecko/20100101 Firefox/53.0";
const DEFAULT_LIMIT: u64 = 20;

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    link: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    modified: String,
    #[serde(default)]
    title: Rendered,
    #[serde(default)]
    content: Rendered,
}

#[derive(Debug, Default, Deserialize)]
struct Rendered {
    #[serde(default)]
    rendered: String,
}

/// Builds an RSS feed from a WordPress site's REST API.
pub struct Wordpress {
    descriptor: PluginDescriptor,
}

impl Wordpress {
    pub fn new() -> Self {
        let mut descriptor = PluginDescriptor::new("wordpress", "WordPress");
        descriptor.capabilities.feeds = true;
        descriptor.feed_settings = vec![
            SettingSpec::text("host", "Host"),
            SettingSpec::text("search", "Search query"),
            SettingSpec::number("limit", "Maximum results", 1, 100, DEFAULT_LIMIT as i64),
        ];

        Self { descriptor }
    }
}

/// `host` with a scheme and without a trailing slash.
fn normalize_host(host: &str) -> String {
    let mut host = if host.starts_with("http") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };
    if host.ends_with('/') {
        host.pop();
    }
    host
}

/// `lastUpdated` as RFC 3339 text or epoch milliseconds.
fn last_updated(settings: &PluginSettings) -> Option<DateTime<Utc>> {
    match settings.get("lastUpdated")? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn posts_url(host: &str, settings: &PluginSettings) -> String {
    let limit = settings
        .number("limit")
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_LIMIT);
    let mut url = format!("{}{}?limit={}&per_page={}", host, POSTS_PATH, limit, limit);

    if let Some(search) = settings.text("search") {
        url.push_str("&search=");
        url.extend(form_urlencoded::byte_serialize(search.as_bytes()));
    }

    if let Some(after) = last_updated(settings).filter(|d| d.year() > 1970) {
        url.push_str("&after=");
        url.push_str(&after.to_rfc3339_opts(SecondsFormat::Millis, true));
    }

    url
}

fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

fn xml_text(html: &str) -> String {
    encode_text(&decode_html_entities(html)).to_string()
}

fn render_rss(raw_host: &str, host: &str, search: Option<&str>, posts: &[Post]) -> String {
    let mut title = format!("WordPress - {}", raw_host);
    if let Some(search) = search {
        let _ = write!(title, " - {}", search);
    }

    let mut xml = String::from(
        "<rss version=\"2.0\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:content=\"http://purl.org/rss/1.0/modules/content/\"><channel>",
    );
    let _ = write!(
        xml,
        "<title>{}</title><description>WordPress blog posts</description><link>{}</link>",
        xml_text(&title),
        xml_text(host)
    );

    for post in posts {
        let date = if post.modified.is_empty() { &post.date } else { &post.modified };
        let _ = write!(
            xml,
            "<item><link>{}</link><dc:date>{}</dc:date><title>{}</title><description>{}</description></item>",
            xml_text(&post.link),
            xml_text(date),
            xml_text(&post.title.rendered),
            cdata(&post.content.rendered)
        );
    }

    xml.push_str("</channel></rss>");
    xml
}

#[async_trait]
impl ExtractionPlugin for Wordpress {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn fetch_feed(
        &self,
        fetcher: &dyn PageFetcher,
        settings: &PluginSettings,
    ) -> Result<FeedDocument, ExtractionError> {
        let raw_host = settings
            .text("host")
            .ok_or(ExtractionError::MissingSetting("host"))?;
        let host = normalize_host(&raw_host);

        let request = PageRequest::get(posts_url(&host, settings)).header("User-Agent", USER_AGENT);
        let body = fetcher.fetch_text(&request).await?;
        let posts: Vec<Post> = serde_json::from_str(&body)?;

        let search = settings.text("search");
        Ok(FeedDocument(render_rss(&raw_host, &host, search.as_deref(), &posts)))
    }
}
