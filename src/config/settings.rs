use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Required `X-API-Key` value for `/api/v1` routes; open when unset
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Raw email module configuration as read from files and environment.
///
/// `events` stays optional here so that a missing list can be reported once
/// when the configuration is turned into [`ModuleOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Directory holding `.hbs` templates and their `.json` sidecars
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    /// Event names the subscribers are allowed to act on
    #[serde(default)]
    pub events: Option<Vec<String>>,
    /// Ask callers to attach a generated invoice to order emails
    #[serde(default)]
    pub send_invoice_on_order: bool,
    /// Sender address used when a message does not carry one
    #[serde(default)]
    pub default_from: Option<String>,
    /// Treat missing template variables as render errors
    #[serde(default)]
    pub strict_variables: bool,
    /// Public backend URL used to build links in auth emails
    #[serde(default)]
    pub public_url: Option<String>,
}

/// Validated options for the template module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOptions {
    pub templates_dir: PathBuf,
    pub events: Vec<String>,
    pub send_invoice_on_order: bool,
    pub strict_variables: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("src/templates/emails")
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8082)?
            .set_default("email.templates_dir", "src/templates/emails")?
            .set_default("email.send_invoice_on_order", false)?
            .set_default("email.strict_variables", false)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SERVER__PORT, EMAIL__TEMPLATES_DIR, EMAIL__EVENTS=order.placed,invite.created
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("email.events"),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl EmailConfig {
    /// Resolve defaults and produce the options the template module runs with.
    pub fn to_options(&self) -> ModuleOptions {
        let events = match &self.events {
            Some(events) => events
                .iter()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            None => {
                tracing::warn!("'events' not defined in config, defaulting to []");
                Vec::new()
            }
        };

        ModuleOptions {
            templates_dir: self.templates_dir.clone(),
            events,
            send_invoice_on_order: self.send_invoice_on_order,
            strict_variables: self.strict_variables,
        }
    }
}

impl ModuleOptions {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            events: Vec::new(),
            send_invoice_on_order: false,
            strict_variables: false,
        }
    }

    pub fn with_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_invoice_on_order(mut self, enabled: bool) -> Self {
        self.send_invoice_on_order = enabled;
        self
    }

    pub fn with_strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            events: None,
            send_invoice_on_order: false,
            default_from: None,
            strict_variables: false,
            public_url: None,
        }
    }
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self::new(default_templates_dir())
    }
}
