use serde::{Deserialize, Serialize};
use stockwidget_market_data::normalize_symbol;

use crate::constants::DEFAULT_WIDGET_SYMBOL;

/// Widget layout variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    /// 2x1 layout with price, change and percent.
    #[default]
    Normal,
    /// 1x1 layout with rounded price and percent.
    Small,
}

impl WidgetSize {
    /// Prefix applied to this size's preference keys.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            WidgetSize::Normal => "",
            WidgetSize::Small => "small_",
        }
    }

    /// Symbol shown before the user picks one.
    pub fn default_symbol(&self) -> &'static str {
        DEFAULT_WIDGET_SYMBOL
    }

    /// Preference key for `field` of widget `id`, e.g. `small_symbol_7`.
    pub fn pref_key(&self, field: &str, id: u32) -> String {
        format!("{}{}_{}", self.key_prefix(), field, id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetTheme {
    #[default]
    Auto,
    Light,
    Dark,
}

/// Identifies one placed widget. Ids are unique per size only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetKey {
    pub size: WidgetSize,
    pub id: u32,
}

impl WidgetKey {
    pub fn new(size: WidgetSize, id: u32) -> Self {
        Self { size, id }
    }
}

/// Per-widget configuration written by the configuration screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub id: u32,
    #[serde(default)]
    pub size: WidgetSize,
    pub symbol: String,
    #[serde(default)]
    pub launch_app: Option<String>,
    #[serde(default)]
    pub launch_url: Option<String>,
    #[serde(default)]
    pub theme: WidgetTheme,
}

impl WidgetConfig {
    /// A freshly placed widget showing the size's default symbol.
    pub fn new(id: u32, size: WidgetSize) -> Self {
        Self {
            id,
            size,
            symbol: size.default_symbol().to_string(),
            launch_app: None,
            launch_url: None,
            theme: WidgetTheme::Auto,
        }
    }

    pub fn key(&self) -> WidgetKey {
        WidgetKey::new(self.size, self.id)
    }

    /// Canonical symbol, falling back to the size default when blank.
    pub fn canonical_symbol(&self) -> String {
        normalize_symbol(&self.symbol).unwrap_or_else(|| self.size.default_symbol().to_string())
    }

    /// Sets a tap target URL, clearing any launch app.
    pub fn with_launch_url(mut self, template: impl Into<String>) -> Self {
        self.launch_url = Some(template.into());
        self.launch_app = None;
        self
    }

    /// Sets a tap target app, clearing any launch URL.
    pub fn with_launch_app(mut self, package: impl Into<String>) -> Self {
        self.launch_app = Some(package.into());
        self.launch_url = None;
        self
    }
}

/// Quote page link with `{SYMBOL}` as the placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlTemplate {
    pub name: String,
    pub template: String,
}

impl UrlTemplate {
    pub const SYMBOL_PLACEHOLDER: &'static str = "{SYMBOL}";

    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }

    pub fn build_url(&self, symbol: &str) -> String {
        self.template.replace(Self::SYMBOL_PLACEHOLDER, symbol)
    }
}

/// Quote sites offered when picking a tap target.
pub fn builtin_url_templates() -> Vec<UrlTemplate> {
    vec![
        UrlTemplate::new("Yahoo Finance", "https://finance.yahoo.com/quote/{SYMBOL}"),
        UrlTemplate::new("TradingView", "https://www.tradingview.com/symbols/{SYMBOL}/"),
        UrlTemplate::new("Finviz", "https://finviz.com/quote.ashx?t={SYMBOL}"),
        UrlTemplate::new("MarketWatch", "https://www.marketwatch.com/investing/stock/{SYMBOL}"),
        UrlTemplate::new("Seeking Alpha", "https://seekingalpha.com/symbol/{SYMBOL}"),
        UrlTemplate::new("Bloomberg", "https://www.bloomberg.com/quote/{SYMBOL}:US"),
        UrlTemplate::new("Google Finance", "https://www.google.com/finance/quote/{SYMBOL}"),
    ]
}
