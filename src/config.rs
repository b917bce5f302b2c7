//! Run configuration.

use std::path::PathBuf;

use crate::date::RunDate;

/// Default directory extracted images are written to.
pub const DEFAULT_IMAGES_DIR: &str = "newsletter-images";

/// `src` prefix of images that ship alongside the exported document.
pub const DEFAULT_LOCAL_PREFIX: &str = "images/";

/// Colors and fixed copy of the rendered newsletter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Background of the date banner.
    pub banner_background: String,
    /// Text color of the date banner.
    pub banner_text: String,
    /// Background of text blocks, the signup button and the community section.
    pub accent_background: String,
    /// Color of the "sign up early" link.
    pub secondary_link: String,
    /// Inline style for text inside the community section.
    pub community_text_style: String,
    /// Inline style for links inside the community section.
    pub community_link_style: String,
    /// Opening paragraph, shown above the table of contents.
    pub intro: String,
    /// Signup page; the week is appended as `?current_week=YYYY-MM-DD`.
    pub signup_url: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            banner_background: "#16232a".to_string(),
            banner_text: "#f3f3f3".to_string(),
            accent_background: "#223f4d".to_string(),
            secondary_link: "#476584".to_string(),
            community_text_style: "color: #ffffff".to_string(),
            community_link_style: "color: #aed9ef".to_string(),
            intro: "Hi Bike Brigaders! Here's what's happening this week, with quick signup links. In this e-mail:".to_string(),
            signup_url: "https://dispatch.bikebrigade.ca/campaigns/signup".to_string(),
        }
    }
}

impl Theme {
    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = intro.into();
        self
    }

    pub fn with_signup_url(mut self, url: impl Into<String>) -> Self {
        self.signup_url = url.into();
        self
    }
}

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct Config {
    pub run_date: RunDate,
    /// Where extracted images are written.
    pub images_dir: PathBuf,
    pub local_prefix: String,
    pub theme: Theme,
}

impl Config {
    pub fn new(run_date: RunDate) -> Self {
        Self {
            run_date,
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            local_prefix: DEFAULT_LOCAL_PREFIX.to_string(),
            theme: Theme::default(),
        }
    }

    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = dir.into();
        self
    }

    pub fn with_local_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.local_prefix = prefix.into();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

impl Default for Config {
    /// Configuration for the upcoming delivery date.
    fn default() -> Self {
        Self::new(RunDate::upcoming())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let date = RunDate::parse("2024-12-01").unwrap();
        let config = Config::new(date)
            .with_images_dir("/tmp/out")
            .with_local_prefix("assets/")
            .with_theme(Theme::default().with_signup_url("https://example.org/signup"));

        assert_eq!(config.run_date, date);
        assert_eq!(config.images_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.local_prefix, "assets/");
        assert_eq!(config.theme.signup_url, "https://example.org/signup");
        assert_eq!(config.theme.accent_background, "#223f4d");
    }
}
