// アプリケーション設定のキーバリューストア
//
// 最近使ったフォルダや無効化プラグインの一覧など、ホスト
// アプリケーションが使う永続設定。コアのジョブはここへ触れない。

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

const RECENT_FOLDERS_KEY: &str = "recent_folders";
const DISABLED_PLUGINS_KEY: &str = "disabled_plugins";
const MAX_RECENT_FOLDERS: usize = 10;

pub struct SettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl SettingsStore {
    /// ファイルから読み込む（存在しない・壊れている場合は空で開始）
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();
        Self { path, values }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create settings directory: {}", parent.display())
                })?;
            }
        }
        let raw = serde_json::to_string_pretty(&Value::Object(self.values.clone()))?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write settings: {}", self.path.display()))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        if let Ok(value) = serde_json::to_value(value) {
            self.values.insert(key.to_string(), value);
        }
    }

    pub fn recent_folders(&self) -> Vec<String> {
        self.get(RECENT_FOLDERS_KEY).unwrap_or_default()
    }

    /// 先頭に追加し、重複を除き、最大件数に丸める
    pub fn add_recent_folder(&mut self, folder: &str) {
        let mut folders = self.recent_folders();
        folders.retain(|f| f != folder);
        folders.insert(0, folder.to_string());
        folders.truncate(MAX_RECENT_FOLDERS);
        self.set(RECENT_FOLDERS_KEY, folders);
    }

    pub fn disabled_plugins(&self) -> Vec<String> {
        self.get(DISABLED_PLUGINS_KEY).unwrap_or_default()
    }

    pub fn set_disabled_plugins(&mut self, names: &[String]) {
        self.set(DISABLED_PLUGINS_KEY, names.to_vec());
    }
}
