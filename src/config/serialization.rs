//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        format!(
            r#"# forum configuration

# Conductor endpoint (FORUM_URL overrides)
url = "{url}"

# Installed app id checked during the handshake (FORUM_APP_ID overrides)
installed_app_id = "{app_id}"

# Role and zome every call targets
role_name = "{role}"
zome_name = "{zome}"

# Theme: holo, terminal (FORUM_THEME overrides)
theme = "{theme}"

# Use the in-memory demo conductor instead of a real one (FORUM_DEMO=1 overrides)
demo_mode = {demo}

[ui]
# Reset the create form after a successful create
clear_create_form_on_success = {clear_create}
# Redraw/animation tick in milliseconds
tick_ms = {tick_ms}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            url = self.url,
            app_id = self.installed_app_id,
            role = self.role_name,
            zome = self.zome_name,
            theme = self.theme,
            demo = self.demo_mode,
            clear_create = self.ui.clear_create_form_on_success,
            tick_ms = self.ui.tick_ms,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
