//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Mentor Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# The provider API key is read from the OPENAI_API_KEY environment variable.

[provider]
# api_base = "https://api.openai.com"
# model = "gpt-4o-mini"
# max_tokens = 1500            # 1-16384
# temperature = 0.7            # 0.0-2.0
# request_timeout_secs = 120   # 5-600
# connect_timeout_secs = 10    # 1-60

[server]
# host = "0.0.0.0"
# port = 5000                  # overridden by PORT
# allowed_origins = ["*"]      # overridden by MENTOR_ALLOWED_ORIGINS (comma separated)

[logging]
# level = "INFO"               # TRACE, DEBUG, INFO, WARN, ERROR
"##
    .to_string()
}
