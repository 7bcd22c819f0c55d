use super::WidgetKey;

/// Rendering layer boundary.
///
/// Implemented by whatever hosts the widget surfaces. The core only asks which
/// widgets exist and tells the host to redraw them from the cache.
pub trait WidgetHost: Send + Sync {
    /// Widgets currently placed by the user.
    fn installed_widgets(&self) -> Vec<WidgetKey>;

    /// Fire-and-forget request to re-render every widget from the cache.
    fn notify_widgets_to_refresh(&self);
}
