use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which parser an ingested body is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserKind {
    Tle,
    AlmanacText,
    HtmlTable,
    Raw,
}

/// TLS behavior of the HTTP client used for a source. `Relaxed` disables
/// certificate verification and exists only for endpoints known to present
/// verification-incompatible certificates (the QZSS DoD API).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportProfile {
    #[default]
    Standard,
    Relaxed,
}

/// One entry of the source table. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub id: String,
    pub url: String,
    pub interval_hours: u64,
    pub parser: ParserKind,
    #[serde(default)]
    pub transport: TransportProfile,
    /// Overrides the default `<data_dir>/<id>_data` sink directory.
    #[serde(default)]
    pub sink_dir: Option<PathBuf>,
}

impl SourceSpec {
    pub fn interval(&self) -> chrono::Duration {
        chrono::Duration::hours(self.interval_hours as i64)
    }

    pub fn resolve_sink_dir(&self, data_dir: &Path) -> PathBuf {
        self.sink_dir
            .clone()
            .unwrap_or_else(|| data_dir.join(format!("{}_data", self.id)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_error_dir")]
    pub error_dir: PathBuf,

    /// Upper bound on a single fetch; expiry surfaces as a transport error.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "builtin_sources")]
    pub sources: Vec<SourceSpec>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("site/public/sv_data")
}

fn default_error_dir() -> PathBuf {
    PathBuf::from("ErrorLogs")
}

fn default_fetch_timeout_secs() -> u64 {
    60
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
            error_dir: default_error_dir(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            sources: builtin_sources(),
        }
    }
}

impl HarvestConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HarvestConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Refresh intervals have 1 hour granularity. A zero-hour interval
    /// would leave its slot permanently due after every re-arm, hot-loop
    /// that source and starve every slot behind it, so the table is
    /// rejected at load.
    pub fn validate(&self) -> anyhow::Result<()> {
        for spec in &self.sources {
            if spec.interval_hours == 0 {
                anyhow::bail!(
                    "source {}: interval_hours must be at least 1",
                    spec.id
                );
            }
        }
        Ok(())
    }
}

fn source(
    id: &str,
    url: &str,
    interval_hours: u64,
    parser: ParserKind,
    transport: TransportProfile,
) -> SourceSpec {
    SourceSpec {
        id: id.to_string(),
        url: url.to_string(),
        interval_hours,
        parser,
        transport,
        sink_dir: None,
    }
}

/// The constellation sources harvested when no config file is given.
fn builtin_sources() -> Vec<SourceSpec> {
    use ParserKind::*;
    use TransportProfile::*;

    vec![
        source(
            "galileo",
            "https://celestrak.com/NORAD/elements/galileo.txt",
            48,
            Tle,
            Standard,
        ),
        source(
            "gps",
            "https://navcen.uscg.gov/sites/default/files/gps/almanac/current_yuma.alm",
            48,
            AlmanacText,
            Standard,
        ),
        source(
            "glonass",
            "https://celestrak.org/NORAD/elements/glo-ops.txt",
            48,
            Tle,
            Standard,
        ),
        source(
            "qzss",
            "https://sys.qzss.go.jp/dod/api/get/almanac",
            48,
            AlmanacText,
            Relaxed,
        ),
        source(
            "qzss_ephemeris",
            "https://sys.qzss.go.jp/dod/api/get/ephemeris",
            48,
            Raw,
            Relaxed,
        ),
        source(
            "beidou",
            "https://celestrak.com/NORAD/elements/beidou.txt",
            48,
            Tle,
            Standard,
        ),
        source(
            "gps_block_type",
            "https://www.navcen.uscg.gov/gps-constellation",
            144,
            HtmlTable,
            Standard,
        ),
    ]
}
