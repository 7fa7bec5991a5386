//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use shortdash_client::ClientSettings;
use url::Url;

use super::logging::LogDestination;

#[derive(Debug, Clone, Parser)]
#[command(name = "shortdash", version, about = "Terminal dashboard for a URL-shortening backend")]
pub struct Config {
    /// Root URL of the shortening backend.
    #[arg(long, env = "SHORTDASH_BACKEND_URL")]
    pub backend_url: Url,

    /// Where the login session is kept between runs.
    #[arg(long, env = "SHORTDASH_SESSION_FILE", default_value = ".shortdash_session.ron")]
    pub session_file: PathBuf,

    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    #[arg(long, default_value = "info", value_parser = parse_level)]
    pub log_level: LevelFilter,

    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Give up on a request after this many seconds. Unset means wait.
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn client_settings(&self) -> ClientSettings {
        let mut settings = ClientSettings::new(self.backend_url.clone());
        settings.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        settings.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        settings
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse()
        .map_err(|_| format!("unknown log level {raw:?} (off, error, warn, info, debug, trace)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_request_timeout_off() {
        let config =
            Config::try_parse_from(["shortdash", "--backend-url", "http://localhost:3000/"])
                .unwrap();
        let settings = config.client_settings();

        assert_eq!(settings.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
        assert_eq!(settings.request_timeout, None);
        assert_eq!(config.log, LogDestination::File);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.session_file, PathBuf::from(".shortdash_session.ron"));
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "shortdash",
            "--backend-url",
            "https://short.example/api/",
            "--log",
            "both",
            "--log-level",
            "debug",
            "--request-timeout-secs",
            "30",
        ])
        .unwrap();

        assert_eq!(config.log, LogDestination::Both);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(
            config.client_settings().request_timeout,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn rejects_bad_url_and_level() {
        assert!(Config::try_parse_from(["shortdash", "--backend-url", "not a url"]).is_err());
        assert!(Config::try_parse_from([
            "shortdash",
            "--backend-url",
            "http://localhost/",
            "--log-level",
            "loud"
        ])
        .is_err());
    }
}
