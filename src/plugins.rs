// プラグイン機能インターフェース
//
// 動的ロードは担当外（ホストアプリケーション側の責務）。ここでは
// プラグインが満たすべき能力インターフェースと、`run` しか持たない
// 旧式プラグインを包む明示的なアダプタ型、および有効/無効リストを
// 尊重するレジストリだけを定義する。

use anyhow::Result;

/// プラグインが公開するUIアクション（通常はメニュー項目として描画される）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginAction {
    pub text: String,
    pub shortcut: Option<String>,
    pub status_tip: Option<String>,
}

impl PluginAction {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shortcut: None,
            status_tip: None,
        }
    }

    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn with_status_tip(mut self, tip: impl Into<String>) -> Self {
        self.status_tip = Some(tip.into());
        self
    }
}

/// プラグインの能力インターフェース
///
/// 既定では単一の「Run」アクションを公開する。複数アクションを
/// 提供したいプラグインは `actions` を上書きする。
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str {
        "1.0"
    }

    fn description(&self) -> &str {
        "No description."
    }

    /// ロード時に一度呼ばれる（任意実装）
    fn on_load(&self) {}

    /// アンロード直前に一度呼ばれる（任意実装）
    fn on_unload(&self) {}

    fn actions(&self) -> Vec<PluginAction> {
        vec![PluginAction::new("Run")]
    }

    /// 旧式・単機能プラグイン向けのエントリポイント
    fn run(&self) -> Result<()>;
}

/// `run` しか持たない旧式オブジェクト
pub trait LegacyPlugin: Send + Sync {
    fn run(&self) -> Result<()>;
}

/// 旧式プラグインを `Plugin` として扱うための明示的アダプタ
///
/// 実行時のダックタイピングではなく型で互換性を表現する
pub struct LegacyAdapter<P: LegacyPlugin> {
    name: String,
    inner: P,
}

impl<P: LegacyPlugin> LegacyAdapter<P> {
    pub fn new(name: impl Into<String>, inner: P) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

impl<P: LegacyPlugin> Plugin for LegacyAdapter<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> Result<()> {
        self.inner.run()
    }
}

/// ロード済みプラグインの一覧を保持するレジストリ
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 無効リストに載っていないプラグインをロードする
    pub fn load(&mut self, plugins: Vec<Box<dyn Plugin>>, disabled: &[String]) {
        self.unload_all();
        for plugin in plugins {
            if disabled.iter().any(|d| d == plugin.name()) {
                continue;
            }
            plugin.on_load();
            self.plugins.push(plugin);
        }
    }

    pub fn unload_all(&mut self) {
        for plugin in &self.plugins {
            plugin.on_unload();
        }
        self.plugins.clear();
    }

    pub fn plugins(&self) -> &[Box<dyn Plugin>] {
        &self.plugins
    }

    /// プラグイン名とそのアクション一覧（メニュー構築用）
    pub fn actions(&self) -> Vec<(String, Vec<PluginAction>)> {
        self.plugins
            .iter()
            .map(|p| (p.name().to_string(), p.actions()))
            .collect()
    }

    pub fn run(&self, name: &str) -> Result<()> {
        let plugin = self
            .plugins
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| anyhow::anyhow!("プラグインが見つかりません: {name}"))?;
        plugin.run()
    }
}
