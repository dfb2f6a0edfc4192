//! Display configuration for the depth engine.
//!
//! Defaults match the engine's documented option surface. A JSON file named
//! by `DEPTHVIEW_CONFIG` may supply any subset of fields; individual values
//! can then be overridden through environment variables:
//! - `DEPTHVIEW_LEVELS` — rows shown per side (negative values clamp to 0)
//! - `DEPTHVIEW_PRICE_PRECISION` / `DEPTHVIEW_SIZE_PRECISION`
//! - `DEPTHVIEW_QUOTE_CURRENCY`
//! - `DEPTHVIEW_SHOW_DEPTH_BARS` / `DEPTHVIEW_HIGHLIGHT_CHANGES` (`true`/`false`)

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Default number of rows rendered per side.
pub const DEFAULT_LEVELS: usize = 12;

/// Default lifetime of a change highlight.
pub const DEFAULT_HIGHLIGHT_WINDOW_MS: u64 = 300;

/// Engine and host configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Maximum rows rendered per side.
    pub levels: usize,
    /// Decimal places used for prices.
    pub price_precision: u32,
    /// Decimal places used for sizes and totals.
    pub size_precision: u32,
    /// Quote currency shown in the price column header.
    pub quote_currency: String,
    pub show_depth_bars: bool,
    pub highlight_changes: bool,
    /// How long a change highlight stays armed.
    pub highlight_window_ms: u64,
    /// UI tick period for the terminal host.
    pub tick_interval_ms: u64,
    /// Delay between replayed snapshots.
    pub replay_interval_ms: u64,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS,
            price_precision: 2,
            size_precision: 4,
            quote_currency: "USDT".to_string(),
            show_depth_bars: true,
            highlight_changes: true,
            highlight_window_ms: DEFAULT_HIGHLIGHT_WINDOW_MS,
            tick_interval_ms: 50,
            replay_interval_ms: 250,
        }
    }
}

impl DepthConfig {
    /// Loads configuration from a JSON file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::DepthViewError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Highlight lifetime as a [`Duration`].
    pub fn highlight_window(&self) -> Duration {
        Duration::from_millis(self.highlight_window_ms)
    }

    /// Applies `DEPTHVIEW_*` environment overrides on top of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`DepthViewError::Config`](crate::DepthViewError::Config) when a
    /// set variable cannot be parsed.
    pub fn apply_env(mut self) -> crate::Result<Self> {
        if let Some(levels) = parse_var::<i64>("DEPTHVIEW_LEVELS")? {
            self.levels = usize::try_from(levels.max(0)).unwrap_or(0);
        }
        if let Some(precision) = parse_var("DEPTHVIEW_PRICE_PRECISION")? {
            self.price_precision = precision;
        }
        if let Some(precision) = parse_var("DEPTHVIEW_SIZE_PRECISION")? {
            self.size_precision = precision;
        }
        if let Some(currency) = non_empty_var("DEPTHVIEW_QUOTE_CURRENCY") {
            self.quote_currency = currency;
        }
        if let Some(show) = parse_var("DEPTHVIEW_SHOW_DEPTH_BARS")? {
            self.show_depth_bars = show;
        }
        if let Some(highlight) = parse_var("DEPTHVIEW_HIGHLIGHT_CHANGES")? {
            self.highlight_changes = highlight;
        }
        Ok(self)
    }
}

/// Loads the configuration: `DEPTHVIEW_CONFIG` file (or defaults), then env overrides.
///
/// # Errors
///
/// Returns an error if the config file is unreadable or an override is malformed.
pub fn fetch_config() -> crate::Result<DepthConfig> {
    let base = match non_empty_var("DEPTHVIEW_CONFIG") {
        Some(path) => DepthConfig::load(Path::new(&path))?,
        None => DepthConfig::default(),
    };
    base.apply_env()
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Parses a non-empty environment variable.
fn parse_var<T: FromStr>(name: &str) -> crate::Result<Option<T>> {
    match non_empty_var(name) {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            crate::DepthViewError::Config(format!("{name} has invalid value {raw:?}"))
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 7] = [
        "DEPTHVIEW_CONFIG",
        "DEPTHVIEW_LEVELS",
        "DEPTHVIEW_PRICE_PRECISION",
        "DEPTHVIEW_SIZE_PRECISION",
        "DEPTHVIEW_QUOTE_CURRENCY",
        "DEPTHVIEW_SHOW_DEPTH_BARS",
        "DEPTHVIEW_HIGHLIGHT_CHANGES",
    ];

    /// Helper that temporarily sets env vars, runs `f`, then restores originals.
    ///
    /// Every variable in [`VARS`] not listed in `vars` is cleared for the
    /// duration. Tests using this helper share process env, so they hold a
    /// lock to stay serialized.
    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
        let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let originals: Vec<(&str, Option<String>)> =
            VARS.iter().map(|k| (*k, std::env::var(k).ok())).collect();

        for k in VARS {
            let value = vars.iter().find(|(name, _)| *name == k).map(|(_, v)| *v);
            // SAFETY: env mutation is serialized by LOCK.
            unsafe {
                match value {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values under the same lock.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(&[], || {
            let config = fetch_config().unwrap();
            assert_eq!(config, DepthConfig::default());
            assert_eq!(config.levels, 12);
            assert_eq!(config.price_precision, 2);
            assert_eq!(config.size_precision, 4);
            assert_eq!(config.quote_currency, "USDT");
            assert!(config.show_depth_bars);
            assert!(config.highlight_changes);
            assert_eq!(config.highlight_window(), Duration::from_millis(300));
        });
    }

    #[test]
    fn env_overrides_apply() {
        with_env(
            &[
                ("DEPTHVIEW_LEVELS", "20"),
                ("DEPTHVIEW_PRICE_PRECISION", "1"),
                ("DEPTHVIEW_QUOTE_CURRENCY", "USD"),
                ("DEPTHVIEW_SHOW_DEPTH_BARS", "false"),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.levels, 20);
                assert_eq!(config.price_precision, 1);
                assert_eq!(config.size_precision, 4);
                assert_eq!(config.quote_currency, "USD");
                assert!(!config.show_depth_bars);
            },
        );
    }

    #[test]
    fn negative_levels_clamp_to_zero() {
        with_env(&[("DEPTHVIEW_LEVELS", "-3")], || {
            let config = fetch_config().unwrap();
            assert_eq!(config.levels, 0);
        });
    }

    #[test]
    fn rejects_unparsable_override() {
        with_env(&[("DEPTHVIEW_HIGHLIGHT_CHANGES", "sometimes")], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("DEPTHVIEW_HIGHLIGHT_CHANGES"));
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        with_env(
            &[("DEPTHVIEW_LEVELS", ""), ("DEPTHVIEW_QUOTE_CURRENCY", "")],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.levels, DEFAULT_LEVELS);
                assert_eq!(config.quote_currency, "USDT");
            },
        );
    }

    #[test]
    fn missing_config_file_is_an_error() {
        with_env(&[("DEPTHVIEW_CONFIG", "/nonexistent/depthview.json")], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("failed to read"));
        });
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: DepthConfig = serde_json::from_str(r#"{ "levels": 5 }"#).unwrap();
        assert_eq!(config.levels, 5);
        assert_eq!(config.size_precision, 4);
        assert_eq!(config.highlight_window_ms, 300);
    }
}
