//! Widget configuration, quote rendering and the host boundary.

mod render;
mod widget_model;
mod widget_traits;

pub use render::{click_target, render_quote, ClickTarget, QuoteSurface, TextSurface, Trend};
pub use widget_model::{builtin_url_templates, UrlTemplate, WidgetConfig, WidgetKey, WidgetSize, WidgetTheme};
pub use widget_traits::WidgetHost;
