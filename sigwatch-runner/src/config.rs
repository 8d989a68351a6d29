//! Bot configuration: instrument table, signal/risk parameters, storage paths.
//!
//! Loaded once from TOML and passed by reference for the rest of the run.
//! When the file is absent the built-in table is used. Validation runs before
//! any instrument is processed; a failure here is the only fatal error of a run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sigwatch_core::data::FetchRequest;
use sigwatch_core::domain::{Instrument, InstrumentClass};
use sigwatch_core::{RiskParams, SignalParams};

use crate::state::DedupScope;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sigwatch.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("instrument table is empty")]
    NoInstruments,

    #[error("duplicate instrument key '{0}'")]
    DuplicateKey(String),

    #[error("instrument '{key}': risk {risk_pct}% must be in (0, {max_risk_pct}]")]
    RiskOutOfRange {
        key: String,
        risk_pct: f64,
        max_risk_pct: f64,
    },

    #[error("instrument '{key}' is correlated with unknown instrument '{partner}'")]
    UnknownPartner { key: String, partner: String },

    #[error("instrument '{0}' is correlated with itself")]
    SelfCorrelation(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),
}

/// Where state files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatePaths {
    pub session_file: PathBuf,
    pub stats_file: PathBuf,
}

impl Default for StatePaths {
    fn default() -> Self {
        Self {
            session_file: PathBuf::from("session_alert.json"),
            stats_file: PathBuf::from("stats.json"),
        }
    }
}

/// Notice content settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeSettings {
    /// Strategy name printed in execution notices.
    pub strategy_label: String,
    /// Send a "BOT STATUS ALERT" with the last candle after each successful fetch.
    pub heartbeat: bool,
}

impl Default for NoticeSettings {
    fn default() -> Self {
        Self {
            strategy_label: "Volatility Expansion (A+)".into(),
            heartbeat: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Upper bound on any instrument's base risk, in percent.
    #[serde(default = "default_max_risk_pct")]
    pub max_risk_pct: f64,
    #[serde(default)]
    pub dedup_scope: DedupScope,
    #[serde(default)]
    pub data: FetchRequest,
    #[serde(default)]
    pub signal: SignalParams,
    #[serde(default)]
    pub risk: RiskParams,
    #[serde(default)]
    pub state: StatePaths,
    #[serde(default)]
    pub notice: NoticeSettings,
    /// Processing order matters: the first instrument of a correlated pair wins.
    pub instruments: Vec<Instrument>,
}

fn default_max_risk_pct() -> f64 {
    5.0
}

/// Where a loaded config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    BuiltIn,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            max_risk_pct: default_max_risk_pct(),
            dedup_scope: DedupScope::default(),
            data: FetchRequest::default(),
            signal: SignalParams::default(),
            risk: RiskParams::default(),
            state: StatePaths::default(),
            notice: NoticeSettings::default(),
            instruments: default_instruments(),
        }
    }
}

/// Built-in instrument table.
pub fn default_instruments() -> Vec<Instrument> {
    vec![
        Instrument::new("GOLD", "XAUUSD=X", 1.0, InstrumentClass::Fx).correlated_with("USDJPY"),
        Instrument::new("USDJPY", "JPY=X", 0.7, InstrumentClass::Fx),
        Instrument::new("BTCUSD", "BTC-USD", 1.2, InstrumentClass::Crypto),
        Instrument::new("ETHUSD", "ETH-USD", 1.2, InstrumentClass::Crypto),
    ]
}

impl BotConfig {
    /// Parse and validate a TOML config string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if it exists, otherwise fall back to the built-in config.
    pub fn load_or_default(path: &Path) -> Result<(Self, ConfigOrigin), ConfigError> {
        if path.exists() {
            let config = Self::from_file(path)?;
            Ok((config, ConfigOrigin::File(path.to_path_buf())))
        } else {
            let config = Self::default();
            config.validate()?;
            Ok((config, ConfigOrigin::BuiltIn))
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instruments.is_empty() {
            return Err(ConfigError::NoInstruments);
        }

        if !(self.max_risk_pct > 0.0) {
            return Err(invalid("max_risk_pct", "must be positive"));
        }

        let mut keys = HashSet::new();
        for inst in &self.instruments {
            if !keys.insert(inst.key.as_str()) {
                return Err(ConfigError::DuplicateKey(inst.key.clone()));
            }
            if inst.ticker.trim().is_empty() {
                return Err(invalid("ticker", &format!("instrument '{}' has no ticker", inst.key)));
            }
            if !(inst.risk_pct > 0.0 && inst.risk_pct <= self.max_risk_pct) {
                return Err(ConfigError::RiskOutOfRange {
                    key: inst.key.clone(),
                    risk_pct: inst.risk_pct,
                    max_risk_pct: self.max_risk_pct,
                });
            }
        }

        for inst in &self.instruments {
            for partner in &inst.correlated_with {
                if partner == &inst.key {
                    return Err(ConfigError::SelfCorrelation(inst.key.clone()));
                }
                if !keys.contains(partner.as_str()) {
                    return Err(ConfigError::UnknownPartner {
                        key: inst.key.clone(),
                        partner: partner.clone(),
                    });
                }
            }
        }

        let s = &self.signal;
        if s.fast_span == 0 {
            return Err(invalid("signal.fast_span", "must be >= 1"));
        }
        if s.fast_span >= s.slow_span {
            return Err(invalid(
                "signal.slow_span",
                &format!("must exceed fast_span ({} >= {})", s.fast_span, s.slow_span),
            ));
        }
        if s.momentum_period == 0 {
            return Err(invalid("signal.momentum_period", "must be >= 1"));
        }
        if s.min_body_pct < 0.0 {
            return Err(invalid("signal.min_body_pct", "must not be negative"));
        }
        for (name, value) in [
            ("signal.buy_min_momentum", s.buy_min_momentum),
            ("signal.sell_max_momentum", s.sell_max_momentum),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(invalid(name, "must be within 0..=100"));
            }
        }

        let r = &self.risk;
        if !(r.stop_distance_pct > 0.0) {
            return Err(invalid("risk.stop_distance_pct", "must be positive"));
        }
        if !(r.reward_multiple > 0.0) {
            return Err(invalid("risk.reward_multiple", "must be positive"));
        }
        if !(r.reduction_factor > 0.0 && r.reduction_factor <= 1.0) {
            return Err(invalid("risk.reduction_factor", "must be in (0, 1]"));
        }

        if self.data.range.trim().is_empty() {
            return Err(invalid("data.range", "must not be empty"));
        }
        if self.data.interval.trim().is_empty() {
            return Err(invalid("data.interval", "must not be empty"));
        }

        Ok(())
    }
}

fn invalid(name: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
max_risk_pct = 2.0
dedup_scope = "global"

[data]
range = "5d"
interval = "15m"

[risk]
reward_multiple = 2.0

[notice]
heartbeat = true

[[instruments]]
key = "GOLD"
ticker = "XAUUSD=X"
risk_pct = 1.0
class = "fx"
correlated_with = ["USDJPY"]

[[instruments]]
key = "USDJPY"
ticker = "JPY=X"
risk_pct = 0.7
class = "fx"

[[instruments]]
key = "BTCUSD"
ticker = "BTC-USD"
label = "Bitcoin"
risk_pct = 1.2
class = "crypto"
"#;

    #[test]
    fn parses_sample() {
        let config = BotConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.instruments.len(), 3);
        assert_eq!(config.dedup_scope, DedupScope::Global);
        assert_eq!(config.risk.reward_multiple, 2.0);
        // unset fields keep defaults
        assert_eq!(config.risk.stop_distance_pct, 0.2);
        assert_eq!(config.signal.slow_span, 50);
        assert!(config.notice.heartbeat);
        assert_eq!(config.notice.strategy_label, "Volatility Expansion (A+)");
        let btc = config.instruments.iter().find(|i| i.key == "BTCUSD").unwrap();
        assert_eq!(btc.display_name(), "Bitcoin");
        assert_eq!(btc.class, InstrumentClass::Crypto);
    }

    #[test]
    fn built_in_table_is_valid() {
        let config = BotConfig::default();
        config.validate().unwrap();
        let keys: Vec<_> = config.instruments.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["GOLD", "USDJPY", "BTCUSD", "ETHUSD"]);
        assert_eq!(config.dedup_scope, DedupScope::PerInstrument);
        assert_eq!(config.state.session_file, PathBuf::from("session_alert.json"));
    }

    #[test]
    fn missing_file_falls_back_to_built_in() {
        let (config, origin) =
            BotConfig::load_or_default(Path::new("/nonexistent/sigwatch.toml")).unwrap();
        assert_eq!(origin, ConfigOrigin::BuiltIn);
        assert_eq!(config, BotConfig::default());
    }

    #[test]
    fn rejects_empty_table() {
        let err = BotConfig::from_toml_str("instruments = []").unwrap_err();
        assert!(matches!(err, ConfigError::NoInstruments));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let mut config = BotConfig::default();
        config.instruments.push(config.instruments[0].clone());
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateKey(k)) if k == "GOLD"));
    }

    #[test]
    fn rejects_risk_above_cap() {
        let mut config = BotConfig::default();
        config.instruments[2].risk_pct = 6.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RiskOutOfRange { .. })
        ));
        config.instruments[2].risk_pct = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RiskOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_unknown_and_self_partners() {
        let mut config = BotConfig::default();
        config.instruments[1].correlated_with.push("EURUSD".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownPartner { .. })
        ));

        let mut config = BotConfig::default();
        config.instruments[1].correlated_with.push("USDJPY".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SelfCorrelation(_))
        ));
    }

    #[test]
    fn rejects_inverted_spans() {
        let mut config = BotConfig::default();
        config.signal.fast_span = 50;
        config.signal.slow_span = 20;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "signal.slow_span", .. })
        ));
    }

    #[test]
    fn rejects_non_positive_reward_multiple() {
        let mut config = BotConfig::default();
        config.risk.reward_multiple = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(matches!(
            BotConfig::from_toml_str("instruments = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
