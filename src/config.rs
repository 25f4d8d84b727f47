//! menuqr runtime configuration handling

use crate::error::{Error, Result};
use crate::qr::{ErrorCorrection, MIN_BORDER, QrColor, QrRequest};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// URL printed on the menu QR code
pub const DEFAULT_PAYLOAD: &str = "https://mhanna-menu.onrender.com/";

/// File the QR code is written to, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "mhanna-menu-qr.png";

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuQrConfig {
    /// Symbol and rendering parameters
    pub qr: QrOptions,
    /// Output file handling
    pub output: OutputOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl MenuQrConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No menuqr.toml / menuqr.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["menuqr.toml", "menuqr.yaml", "menuqr.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("menuqr");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    /// Apply `MENUQR_*` overrides read through `lookup`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.qr.apply_overrides_from(&lookup);
        self.output.apply_overrides_from(&lookup);
        self.logging.apply_overrides_from(&lookup);
    }

    /// Produce a validated generation request.
    pub fn request(&self) -> Result<QrRequest> {
        self.qr.to_request()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Symbol and rendering options as written in config files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Text to encode
    pub payload: String,
    /// Symbol version (minimum when `fit` is enabled)
    pub version: i16,
    /// Grow the version until the payload fits
    pub fit: bool,
    /// Error correction level
    pub error_correction: ErrorCorrection,
    /// Pixels per module
    pub box_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
    /// Colour of dark modules (name or `#rrggbb`)
    pub fill_color: String,
    /// Background colour (name or `#rrggbb`)
    pub background_color: String,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            payload: DEFAULT_PAYLOAD.to_string(),
            version: 1,
            fit: true,
            error_correction: ErrorCorrection::Medium,
            box_size: 10,
            border: MIN_BORDER,
            fill_color: "black".to_string(),
            background_color: "white".to_string(),
        }
    }
}

impl QrOptions {
    pub(crate) fn apply_overrides_from<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(payload) = lookup("MENUQR_PAYLOAD") {
            self.payload = payload;
        }
        if let Some(version) = lookup("MENUQR_VERSION") {
            if let Ok(parsed) = version.parse::<i16>() {
                self.version = parsed;
            }
        }
        if let Some(fit) = lookup("MENUQR_FIT").as_deref().and_then(parse_bool) {
            self.fit = fit;
        }
        if let Some(level) = lookup("MENUQR_EC_LEVEL") {
            if let Some(parsed) = ErrorCorrection::parse(&level) {
                self.error_correction = parsed;
            }
        }
        if let Some(box_size) = lookup("MENUQR_BOX_SIZE") {
            if let Ok(parsed) = box_size.parse::<u32>() {
                self.box_size = parsed;
            }
        }
        if let Some(border) = lookup("MENUQR_BORDER") {
            if let Ok(parsed) = border.parse::<u32>() {
                self.border = parsed;
            }
        }
        if let Some(fill) = lookup("MENUQR_FILL") {
            self.fill_color = fill;
        }
        if let Some(background) = lookup("MENUQR_BACKGROUND") {
            self.background_color = background;
        }
    }

    /// Resolve colours and check invariants.
    pub fn to_request(&self) -> Result<QrRequest> {
        let request = QrRequest {
            payload: self.payload.clone(),
            version: self.version,
            fit: self.fit,
            error_correction: self.error_correction,
            box_size: self.box_size,
            border: self.border,
            fill_color: QrColor::parse(&self.fill_color)?,
            background_color: QrColor::parse(&self.background_color)?,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Output file options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Destination PNG path
    pub path: PathBuf,
    /// Decode the written file and compare it with the payload
    pub verify: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
            verify: false,
        }
    }
}

impl OutputOptions {
    pub(crate) fn apply_overrides_from<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("MENUQR_OUTPUT") {
            if !path.trim().is_empty() {
                self.path = PathBuf::from(path);
            }
        }
        if let Some(verify) = lookup("MENUQR_VERIFY").as_deref().and_then(parse_bool) {
            self.verify = verify;
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `MENUQR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in console logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_overrides_from<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("MENUQR_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(file) = lookup("MENUQR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(color) = lookup("MENUQR_LOG_COLOR").as_deref().and_then(parse_bool) {
            self.color = color;
        }
        if let Some(rotation) = lookup("MENUQR_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::parse(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_reproduce_menu_script() {
        let config = MenuQrConfig::default();
        let request = config.request().unwrap();
        assert_eq!(request, QrRequest::new(DEFAULT_PAYLOAD));
        assert_eq!(config.output.path, PathBuf::from("mhanna-menu-qr.png"));
        assert!(!config.output.verify);
    }

    #[test]
    fn loads_partial_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[qr]\nbox_size = 6\nerror_correction = \"high\"\nfill_color = \"#000080\"\n\n[output]\npath = \"out/menu.png\"\n"
        )
        .unwrap();

        let config = MenuQrConfig::from_file(file.path()).unwrap();
        assert_eq!(config.qr.box_size, 6);
        assert_eq!(config.qr.border, 4);
        assert_eq!(config.qr.payload, DEFAULT_PAYLOAD);
        assert_eq!(config.qr.error_correction, ErrorCorrection::High);
        assert_eq!(config.output.path, PathBuf::from("out/menu.png"));

        let request = config.request().unwrap();
        assert_eq!(request.fill_color, QrColor::rgb(0, 0, 0x80));
    }

    #[test]
    fn loads_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "qr:\n  payload: \"https://example.org/\"\n  fit: false\n  version: 4\nlogging:\n  level: debug\n  rotation: daily\n"
        )
        .unwrap();

        let config = MenuQrConfig::from_file(file.path()).unwrap();
        assert_eq!(config.qr.payload, "https://example.org/");
        assert!(!config.qr.fit);
        assert_eq!(config.qr.version, 4);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.rotation, Some(LogRotation::Daily));
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(matches!(
            MenuQrConfig::from_file(file.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn env_overrides_apply_and_ignore_garbage() {
        let mut config = MenuQrConfig::default();
        config.apply_overrides_from(lookup(&[
            ("MENUQR_PAYLOAD", "https://example.net/"),
            ("MENUQR_BOX_SIZE", "12"),
            ("MENUQR_BORDER", "not-a-number"),
            ("MENUQR_FIT", "off"),
            ("MENUQR_EC_LEVEL", "q"),
            ("MENUQR_OUTPUT", "elsewhere.png"),
            ("MENUQR_VERIFY", "yes"),
            ("MENUQR_LOG_ROTATION", "weekly"),
        ]));

        assert_eq!(config.qr.payload, "https://example.net/");
        assert_eq!(config.qr.box_size, 12);
        assert_eq!(config.qr.border, 4);
        assert!(!config.qr.fit);
        assert_eq!(config.qr.error_correction, ErrorCorrection::Quartile);
        assert_eq!(config.output.path, PathBuf::from("elsewhere.png"));
        assert!(config.output.verify);
        assert_eq!(config.logging.rotation, None);
    }

    #[test]
    fn invalid_colour_is_reported() {
        let options = QrOptions {
            fill_color: "blurple".to_string(),
            ..QrOptions::default()
        };
        assert!(matches!(options.to_request(), Err(Error::InvalidColor(_))));
    }
}
