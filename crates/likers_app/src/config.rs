use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use likers_core::{SessionLimits, ValueSpec};
use likers_engine::{AgentSettings, CampaignSettings, CrashReporter, RecoveryPolicy, Timings};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        let defaults = AgentSettings::default();
        Self {
            endpoint: defaults.endpoint,
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
        }
    }
}

/// Everything the campaign reads from its RON configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub targets_file: Option<PathBuf>,
    /// Account the campaign runs as; never interacted with.
    pub username: Option<String>,
    pub device: DeviceConfig,
    pub follow_limit: Option<ValueSpec>,
    pub skipped_list_limit: Option<ValueSpec>,
    pub fling_when_skipped: Option<ValueSpec>,
    pub interactions_count: Option<ValueSpec>,
    pub likes_count: Option<ValueSpec>,
    pub likes_percentage: Option<ValueSpec>,
    pub follow_percentage: Option<ValueSpec>,
    pub stories_percentage: Option<ValueSpec>,
    pub comment_percentage: Option<ValueSpec>,
    pub pm_percentage: Option<ValueSpec>,
    pub screen_record: bool,
    /// Where crash reports go; none are written when unset.
    pub crash_dir: Option<PathBuf>,
    pub limits: SessionLimits,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    pub fn agent_settings(&self, endpoint_override: Option<String>) -> AgentSettings {
        AgentSettings {
            endpoint: endpoint_override.unwrap_or_else(|| self.device.endpoint.clone()),
            connect_timeout: Duration::from_secs(self.device.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.device.request_timeout_secs),
        }
    }

    pub fn campaign_settings(&self) -> CampaignSettings {
        CampaignSettings {
            follow_limit: self.follow_limit,
            skipped_list_limit: self.skipped_list_limit,
            fling_when_skipped: self.fling_when_skipped,
            interactions_count: self.interactions_count,
            likes_count: self.likes_count,
            likes_percentage: self.likes_percentage,
            follow_percentage: self.follow_percentage,
            stories_percentage: self.stories_percentage,
            comment_percentage: self.comment_percentage,
            pm_percentage: self.pm_percentage,
            timings: Timings::default(),
            recovery: RecoveryPolicy {
                screen_record: self.screen_record,
                crash_reporter: self.crash_dir.clone().map(CrashReporter::new),
                ..RecoveryPolicy::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::parse("()").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.device.endpoint, "http://127.0.0.1:9008");
        assert!(config.campaign_settings().recovery.crash_reporter.is_none());
    }

    #[test]
    fn values_accept_numbers_and_ranges() {
        let config = AppConfig::parse(
            r#"(
                targets_file: Some("posts.txt"),
                username: Some("me"),
                follow_limit: Some("10-15"),
                skipped_list_limit: Some(20),
                screen_record: true,
                crash_dir: Some("crashes"),
                limits: (total_interactions: Some(100), crashes: Some(5)),
            )"#,
        )
        .unwrap();

        assert_eq!(config.targets_file, Some(PathBuf::from("posts.txt")));
        assert_eq!(
            config.follow_limit,
            Some(ValueSpec::Range { low: 10, high: 15 })
        );
        assert_eq!(config.skipped_list_limit, Some(ValueSpec::Fixed(20)));
        assert_eq!(config.limits.crashes, Some(5));
        assert_eq!(config.limits.likes, None);

        let settings = config.campaign_settings();
        assert!(settings.recovery.screen_record);
        assert_eq!(
            settings.recovery.crash_reporter.unwrap().dir(),
            Path::new("crashes")
        );
    }

    #[test]
    fn endpoint_override_wins() {
        let config = AppConfig::default();
        let settings = config.agent_settings(Some("http://10.0.0.2:9008".into()));
        assert_eq!(settings.endpoint, "http://10.0.0.2:9008");
        assert_eq!(settings.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn invalid_values_are_reported_with_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"(follow_limit: Some("15-5"))"#).unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");

        let missing = AppConfig::load(Path::new("/definitely/not/here.ron")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
