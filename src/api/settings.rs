use serde_json::Value;

use crate::api::{decode, decode_list, ApiClient, PLUGINS_PATH, SETTINGS_PATH};
use crate::app::Result;
use crate::domain::{PluginInfo, Settings};

impl ApiClient {
    pub async fn get_settings(&self) -> Result<Settings> {
        decode(self.transport.get(SETTINGS_PATH).await?, SETTINGS_PATH)
    }

    pub async fn set_settings(&self, settings: &Settings) -> Result<()> {
        self.transport
            .put(SETTINGS_PATH, &Value::Object(settings.clone()))
            .await?;
        Ok(())
    }

    pub async fn get_plugins(&self) -> Result<Vec<PluginInfo>> {
        decode_list(self.transport.get(PLUGINS_PATH).await?)
    }
}
