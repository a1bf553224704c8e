use std::time::Duration;

use crate::browser::FormBrowser;
use crate::error::Result;

pub struct BrowserConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub chrome_path: Option<String>,
    /// Default timeout for page-level waits (default: 30s).
    pub default_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            chrome_path: None,
            default_timeout: Duration::from_secs(30),
        }
    }
}

pub struct BrowserBuilder {
    config: BrowserConfig,
}

impl BrowserBuilder {
    pub fn new() -> Self {
        Self {
            config: BrowserConfig::default(),
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<String>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Set the default timeout for page-level waits.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = timeout;
        self
    }

    pub fn build_config(self) -> BrowserConfig {
        self.config
    }

    pub async fn build(self) -> Result<FormBrowser> {
        FormBrowser::launch(self.build_config()).await
    }
}

impl Default for BrowserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Which flavour of label map and email template to use.
///
/// `Default` fills every label through the generic resolver. `Hardcoded`
/// adds the secondary-address labels and drives dropdown labels through the
/// sequential custom-dropdown path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DataVariant {
    #[default]
    Default,
    Hardcoded,
}

/// Settings for generation and fill passes.
#[derive(Debug, Clone)]
pub struct FillConfig {
    pub variant: DataVariant,
    /// Upper bound on waiting for a custom dropdown option to render.
    pub option_timeout: Duration,
    /// How often the dropdown panel is re-checked while waiting.
    pub option_poll_interval: Duration,
    /// Delay between `input` and `change` on a native select.
    pub select_change_delay: Duration,
    /// Fixed RNG seed; entropy is used when unset.
    pub seed: Option<u64>,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            variant: DataVariant::Default,
            option_timeout: Duration::from_secs(2),
            option_poll_interval: Duration::from_millis(50),
            select_change_delay: Duration::from_millis(500),
            seed: None,
        }
    }
}

impl FillConfig {
    pub fn builder() -> FillConfigBuilder {
        FillConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct FillConfigBuilder {
    config: FillConfig,
}

impl FillConfigBuilder {
    pub fn variant(mut self, variant: DataVariant) -> Self {
        self.config.variant = variant;
        self
    }

    pub fn option_timeout(mut self, timeout: Duration) -> Self {
        self.config.option_timeout = timeout;
        self
    }

    pub fn option_poll_interval(mut self, interval: Duration) -> Self {
        self.config.option_poll_interval = interval;
        self
    }

    pub fn select_change_delay(mut self, delay: Duration) -> Self {
        self.config.select_change_delay = delay;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> FillConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_config_defaults() {
        let config = FillConfig::default();
        assert_eq!(config.variant, DataVariant::Default);
        assert_eq!(config.option_timeout, Duration::from_secs(2));
        assert_eq!(config.select_change_delay, Duration::from_millis(500));
        assert!(config.seed.is_none());
    }

    #[test]
    fn fill_config_builder_overrides() {
        let config = FillConfig::builder()
            .variant(DataVariant::Hardcoded)
            .option_timeout(Duration::from_millis(300))
            .seed(7)
            .build();
        assert_eq!(config.variant, DataVariant::Hardcoded);
        assert_eq!(config.option_timeout, Duration::from_millis(300));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn browser_builder_sets_viewport() {
        let config = BrowserBuilder::new()
            .headless(false)
            .viewport(800, 600)
            .build_config();
        assert!(!config.headless);
        assert_eq!((config.viewport_width, config.viewport_height), (800, 600));
    }
}
