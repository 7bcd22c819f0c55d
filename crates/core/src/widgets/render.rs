use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use stockwidget_market_data::Quote;

use super::{UrlTemplate, WidgetConfig, WidgetSize};

/// Direction of the day's move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn of(quote: &Quote) -> Self {
        if quote.is_gain() {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

/// Capabilities a widget surface exposes for showing a quote.
///
/// Small layouts have no change slot, so `set_change` is never called for them.
pub trait QuoteSurface {
    fn set_symbol(&mut self, symbol: &str);
    fn set_price(&mut self, text: &str);
    fn set_change(&mut self, text: &str);
    fn set_percent(&mut self, text: &str);
    fn set_trend(&mut self, trend: Trend);
}

/// Draws `quote` onto `surface` using the layout for `size`.
pub fn render_quote(quote: &Quote, size: WidgetSize, surface: &mut dyn QuoteSurface) {
    surface.set_symbol(&quote.symbol);

    match size {
        WidgetSize::Normal => {
            surface.set_price(&format!("${}", fixed(quote.price, 2)));
            let change = if quote.change >= Decimal::ZERO {
                format!("+${}", fixed(quote.change, 2))
            } else {
                format!("-${}", fixed(quote.change.abs(), 2))
            };
            surface.set_change(&change);
        }
        WidgetSize::Small => {
            surface.set_price(&format!("${}", fixed(quote.price, 0)));
        }
    }

    surface.set_percent(&percent_text(quote.percent_change));
    surface.set_trend(Trend::of(quote));
}

fn percent_text(percent: Decimal) -> String {
    if percent >= Decimal::ZERO {
        format!("+{}%", fixed(percent, 1))
    } else {
        format!("{}%", fixed(percent, 1))
    }
}

/// Half-up rounding to exactly `dp` places.
fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Plain-text surface.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSurface {
    pub symbol: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
    pub percent: String,
    pub trend: Option<Trend>,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuoteSurface for TextSurface {
    fn set_symbol(&mut self, symbol: &str) {
        self.symbol = symbol.to_string();
    }

    fn set_price(&mut self, text: &str) {
        self.price = text.to_string();
    }

    fn set_change(&mut self, text: &str) {
        self.change = Some(text.to_string());
    }

    fn set_percent(&mut self, text: &str) {
        self.percent = text.to_string();
    }

    fn set_trend(&mut self, trend: Trend) {
        self.trend = Some(trend);
    }
}

impl fmt::Display for TextSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol, self.price)?;
        if let Some(change) = &self.change {
            write!(f, " {}", change)?;
        }
        write!(f, " {}", self.percent)
    }
}

/// What tapping a widget opens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "camelCase")]
pub enum ClickTarget {
    Url(String),
    App(String),
    Home,
}

/// Resolves the tap action: URL template first, then launch app, else the
/// app's own home screen.
pub fn click_target(config: &WidgetConfig) -> ClickTarget {
    if let Some(template) = &config.launch_url {
        let url = UrlTemplate::new("", template.as_str()).build_url(&config.canonical_symbol());
        return ClickTarget::Url(url);
    }
    if let Some(package) = &config.launch_app {
        return ClickTarget::App(package.clone());
    }
    ClickTarget::Home
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn render(quote: &Quote, size: WidgetSize) -> TextSurface {
        let mut surface = TextSurface::new();
        render_quote(quote, size, &mut surface);
        surface
    }

    #[test]
    fn test_normal_layout_gain() {
        let quote = Quote::new("AAPL", dec!(123.456), dec!(1.234), dec!(1.25), Utc::now());
        let surface = render(&quote, WidgetSize::Normal);
        assert_eq!(surface.symbol, "AAPL");
        assert_eq!(surface.price, "$123.46");
        assert_eq!(surface.change.as_deref(), Some("+$1.23"));
        assert_eq!(surface.percent, "+1.3%");
        assert_eq!(surface.trend, Some(Trend::Up));
        assert_eq!(surface.to_string(), "AAPL $123.46 +$1.23 +1.3%");
    }

    #[test]
    fn test_normal_layout_loss() {
        let quote = Quote::new("TSLA", dec!(250), dec!(-4.5), dec!(-1.77), Utc::now());
        let surface = render(&quote, WidgetSize::Normal);
        assert_eq!(surface.price, "$250.00");
        assert_eq!(surface.change.as_deref(), Some("-$4.50"));
        assert_eq!(surface.percent, "-1.8%");
        assert_eq!(surface.trend, Some(Trend::Down));
    }

    #[test]
    fn test_small_layout() {
        let quote = Quote::new("NVDA", dec!(801.5), dec!(3), dec!(0.37), Utc::now());
        let surface = render(&quote, WidgetSize::Small);
        assert_eq!(surface.price, "$802");
        assert_eq!(surface.change, None);
        assert_eq!(surface.percent, "+0.4%");
        assert_eq!(surface.to_string(), "NVDA $802 +0.4%");
    }

    #[test]
    fn test_placeholder_renders() {
        let surface = render(&Quote::placeholder("SPY"), WidgetSize::Normal);
        assert_eq!(surface.to_string(), "SPY $150.00 +$2.45 +1.7%");
    }

    #[test]
    fn test_flat_day_is_up() {
        let quote = Quote::new("SPY", dec!(450), dec!(0), dec!(0), Utc::now());
        let surface = render(&quote, WidgetSize::Normal);
        assert_eq!(surface.change.as_deref(), Some("+$0.00"));
        assert_eq!(surface.trend, Some(Trend::Up));
    }

    #[test]
    fn test_click_target_priority() {
        let mut config = WidgetConfig::new(1, WidgetSize::Normal);
        config.symbol = "aapl".to_string();
        assert_eq!(click_target(&config), ClickTarget::Home);

        config.launch_app = Some("com.broker.app".to_string());
        assert_eq!(click_target(&config), ClickTarget::App("com.broker.app".to_string()));

        config.launch_url = Some("https://finviz.com/quote.ashx?t={SYMBOL}".to_string());
        assert_eq!(
            click_target(&config),
            ClickTarget::Url("https://finviz.com/quote.ashx?t=AAPL".to_string())
        );
    }
}
