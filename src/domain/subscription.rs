use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a subscription's articles come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum SourceType {
    Url,
    LocalFile,
    Command,
    Plugin,
    None,
}

impl From<i64> for SourceType {
    fn from(value: i64) -> Self {
        match value {
            0 => SourceType::Url,
            1 => SourceType::LocalFile,
            2 => SourceType::Command,
            3 => SourceType::Plugin,
            _ => SourceType::None,
        }
    }
}

impl From<SourceType> for i64 {
    fn from(value: SourceType) -> Self {
        match value {
            SourceType::Url => 0,
            SourceType::LocalFile => 1,
            SourceType::Command => 2,
            SourceType::Plugin => 3,
            SourceType::None => 4,
        }
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "url" => Ok(SourceType::Url),
            "file" | "localfile" => Ok(SourceType::LocalFile),
            "command" => Ok(SourceType::Command),
            "plugin" => Ok(SourceType::Plugin),
            other => Err(format!(
                "Unknown source type: {}. Use url, file, command or plugin",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: serde_json::Value,
    pub source_type: SourceType,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub unread_articles: i64,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub icon_path: Option<String>,
    #[serde(default)]
    pub download_enclosures: bool,
    #[serde(default)]
    pub cache_size: i64,
    #[serde(default)]
    pub update_interval: i64,
}

impl Subscription {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }

    /// The source as text: a feed URL, file path, command line or plugin id.
    pub fn source_text(&self) -> String {
        match &self.source {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    pub fn is_plugin_backed(&self) -> bool {
        self.source_type == SourceType::Plugin
    }

    /// Parse `lastUpdated`, which the server may send with or without a zone.
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_updated.as_deref()?.trim();

        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "id": 7,
            "title": "Rust Blog",
            "description": "Posts",
            "source": "https://blog.rust-lang.org/feed.xml",
            "sourceType": 0,
            "url": "https://blog.rust-lang.org",
            "unreadArticles": 3,
            "lastUpdated": "2024-01-02T10:30:00",
            "iconPath": "",
            "downloadEnclosures": false
        })
    }

    #[test]
    fn test_deserialize_subscription() {
        let sub: Subscription = serde_json::from_value(sample()).unwrap();
        assert_eq!(sub.id, 7);
        assert_eq!(sub.source_type, SourceType::Url);
        assert_eq!(sub.unread_articles, 3);
        assert_eq!(sub.source_text(), "https://blog.rust-lang.org/feed.xml");
        assert!(!sub.is_plugin_backed());
    }

    #[test]
    fn test_source_type_serializes_as_integer() {
        assert_eq!(serde_json::to_value(SourceType::Plugin).unwrap(), json!(3));
        let unknown: SourceType = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(unknown, SourceType::None);
    }

    #[test]
    fn test_last_updated_naive_and_rfc3339() {
        let mut sub: Subscription = serde_json::from_value(sample()).unwrap();
        let naive = sub.last_updated_at().unwrap();
        assert_eq!(naive.to_rfc3339(), "2024-01-02T10:30:00+00:00");

        sub.last_updated = Some("2024-01-02T10:30:00+02:00".into());
        let zoned = sub.last_updated_at().unwrap();
        assert_eq!(zoned.to_rfc3339(), "2024-01-02T08:30:00+00:00");

        sub.last_updated = Some(String::new());
        assert!(sub.last_updated_at().is_none());
    }

    #[test]
    fn test_display_title_falls_back_to_url() {
        let mut sub: Subscription = serde_json::from_value(sample()).unwrap();
        sub.title.clear();
        assert_eq!(sub.display_title(), "https://blog.rust-lang.org");
    }

    #[test]
    fn test_parse_source_type() {
        assert_eq!("plugin".parse::<SourceType>().unwrap(), SourceType::Plugin);
        assert_eq!("URL".parse::<SourceType>().unwrap(), SourceType::Url);
        assert!("ftp".parse::<SourceType>().is_err());
    }
}
