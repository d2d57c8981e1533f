//! Normalized view of the accumulated response plus auto-scroll state.

use crate::config::DisplayConfig;
use crate::config::constants::display::SCROLL_TOLERANCE_PX;
use crate::markdown::normalize::normalize_markdown;

/// Scroll position of the surface showing the response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn is_at_bottom(&self, tolerance: f64) -> bool {
        ((self.scroll_height - self.scroll_top) - self.client_height).abs() < tolerance
    }
}

#[derive(Debug, Clone)]
pub struct DisplayBuffer {
    content: String,
    last_rendered_len: usize,
    user_scrolled_away: bool,
    auto_scroll: bool,
    tolerance: f64,
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self {
            content: String::new(),
            last_rendered_len: 0,
            user_scrolled_away: false,
            auto_scroll: true,
            tolerance: SCROLL_TOLERANCE_PX,
        }
    }
}

impl DisplayBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &DisplayConfig) -> Self {
        Self {
            auto_scroll: config.auto_scroll,
            tolerance: config.scroll_tolerance_px,
            ..Self::default()
        }
    }

    /// Re-normalize from the full accumulated text.
    ///
    /// Returns `true` when the surface should follow the new bottom: the
    /// normalized text grew, auto-scroll is on and the user has not scrolled
    /// away.
    pub fn update(&mut self, accumulated: &str) -> bool {
        self.content = normalize_markdown(accumulated);
        let grew = self.content.len() > self.last_rendered_len;
        self.last_rendered_len = self.content.len();
        grew && self.auto_scroll && !self.user_scrolled_away
    }

    /// Record a scroll event. Leaving the bottom suspends auto-scroll and
    /// returning to it resumes it.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        self.user_scrolled_away = !metrics.is_at_bottom(self.tolerance);
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_following(&self) -> bool {
        self.auto_scroll && !self.user_scrolled_away
    }

    pub fn set_auto_scroll(&mut self, enabled: bool) {
        self.auto_scroll = enabled;
    }

    /// Forget content and scroll state for a new request
    pub fn reset(&mut self) {
        self.content.clear();
        self.last_rendered_len = 0;
        self.user_scrolled_away = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(scroll_top: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top,
            scroll_height: 1000.0,
            client_height: 400.0,
        }
    }

    #[test]
    fn scrolls_only_when_content_grows() {
        let mut display = DisplayBuffer::new();
        assert!(display.update("Hel"));
        assert!(display.update("Hello"));
        assert!(!display.update("Hello"));
        assert_eq!(display.content(), "Hello");
    }

    #[test]
    fn scrolling_away_suspends_until_back_at_bottom() {
        let mut display = DisplayBuffer::new();
        assert!(display.update("a"));

        display.on_scroll(at(100.0));
        assert!(!display.update("ab"));

        display.on_scroll(at(595.0));
        assert!(display.update("abc"));
    }

    #[test]
    fn tolerance_is_exclusive() {
        assert!(at(591.0).is_at_bottom(10.0));
        assert!(!at(590.0).is_at_bottom(10.0));
    }

    #[test]
    fn reset_restarts_tracking() {
        let mut display = DisplayBuffer::new();
        display.update("long text");
        display.on_scroll(at(0.0));
        display.reset();
        assert!(display.is_following());
        assert!(display.update("x"));
    }

    #[test]
    fn disabled_auto_scroll_never_follows() {
        let config = DisplayConfig {
            auto_scroll: false,
            scroll_tolerance_px: 10.0,
        };
        let mut display = DisplayBuffer::with_config(&config);
        assert!(!display.update("text"));
        assert_eq!(display.content(), "text");
    }
}
