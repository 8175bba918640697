//! UI behaviour settings ([ui] section)

use serde::Deserialize;

/// UI configuration
#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    /// Reset the create form after a successful create
    pub clear_create_form_on_success: bool,
    /// Redraw/animation tick in milliseconds
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            clear_create_form_on_success: false,
            tick_ms: 200,
        }
    }
}

/// UI settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileUi {
    pub clear_create_form_on_success: Option<bool>,
    pub tick_ms: Option<u64>,
}

impl UiConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileUi>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            clear_create_form_on_success: file
                .clear_create_form_on_success
                .unwrap_or(defaults.clear_create_form_on_success),
            // A zero tick would spin the event loop
            tick_ms: file.tick_ms.filter(|&ms| ms > 0).unwrap_or(defaults.tick_ms),
        }
    }
}
