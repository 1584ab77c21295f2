use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An extraction plugin as advertised by the server's `/plugins` resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub plugin_type: String,
    #[serde(default)]
    pub supports_feeds: bool,
    #[serde(default)]
    pub supports_articles: bool,
    #[serde(default)]
    pub supports_enclosures: bool,
    #[serde(default)]
    pub article_reg_exp: String,
    #[serde(default)]
    pub enclosure_reg_exp: String,
    #[serde(default)]
    pub feed_settings: Vec<Value>,
    #[serde(default)]
    pub article_settings: Vec<Value>,
    #[serde(default)]
    pub enclosure_settings: Vec<Value>,
    #[serde(default)]
    pub version: i64,
}

impl PluginInfo {
    /// Short capability summary, e.g. `feeds, enclosures`.
    pub fn capability_summary(&self) -> String {
        let caps: Vec<&str> = [
            self.supports_feeds.then_some("feeds"),
            self.supports_articles.then_some("articles"),
            self.supports_enclosures.then_some("enclosures"),
        ]
        .into_iter()
        .flatten()
        .collect();

        if caps.is_empty() {
            "none".to_string()
        } else {
            caps.join(", ")
        }
    }
}
