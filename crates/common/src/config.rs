use std::time::Duration;

use serde::Deserialize;

/// Which delivery backend the notifier uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierBackend {
    /// Log the notification and drop it
    Noop,
    /// Resend HTTP API
    Resend,
    /// Plain SMTP relay
    Smtp,
}

impl std::str::FromStr for NotifierBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "noop" => Ok(NotifierBackend::Noop),
            "resend" => Ok(NotifierBackend::Resend),
            "smtp" => Ok(NotifierBackend::Smtp),
            other => Err(anyhow::anyhow!(
                "NOTIFIER_BACKEND must be one of noop, resend, smtp (got {})",
                other
            )),
        }
    }
}

impl std::fmt::Display for NotifierBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifierBackend::Noop => write!(f, "noop"),
            NotifierBackend::Resend => write!(f, "resend"),
            NotifierBackend::Smtp => write!(f, "smtp"),
        }
    }
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the annotation application (profile and standalone links)
    pub app_base_url: String,

    /// Address the API server binds to
    pub listen_addr: String,

    /// Shared secret expected on incoming annotation events
    pub event_webhook_secret: Option<String>,

    /// Timeout for fetching an annotated page, in seconds (default: 10)
    pub fetch_timeout_secs: u64,

    /// Delivery backend (default: noop)
    pub notifier_backend: NotifierBackend,

    /// Resend API key for email delivery
    pub resend_api_key: Option<String>,

    /// Resend endpoint
    pub resend_api_url: String,

    /// Email sender address
    pub email_from: String,

    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP relay port
    pub smtp_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Unset keys fall back to
    /// their defaults; malformed values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            app_base_url: var("APP_BASE_URL", "http://localhost:5000")
                .trim_end_matches('/')
                .to_string(),
            listen_addr: var("LISTEN_ADDR", "0.0.0.0:3000"),
            event_webhook_secret: lookup("EVENT_WEBHOOK_SECRET").filter(|s| !s.is_empty()),
            fetch_timeout_secs: var("FETCH_TIMEOUT_SECS", "10")
                .parse()
                .map_err(|_| anyhow::anyhow!("FETCH_TIMEOUT_SECS must be a valid u64"))?,
            notifier_backend: var("NOTIFIER_BACKEND", "noop").parse()?,
            resend_api_key: lookup("RESEND_API_KEY").filter(|s| !s.is_empty()),
            resend_api_url: var("RESEND_API_URL", "https://api.resend.com/emails"),
            email_from: var("EMAIL_FROM", "notification@localhost"),
            smtp_host: var("SMTP_HOST", "localhost"),
            smtp_port: var("SMTP_PORT", "1025")
                .parse()
                .map_err(|_| anyhow::anyhow!("SMTP_PORT must be a valid u16"))?,
        })
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_base_url: "http://localhost:5000".to_string(),
            listen_addr: "0.0.0.0:3000".to_string(),
            event_webhook_secret: None,
            fetch_timeout_secs: 10,
            notifier_backend: NotifierBackend::Noop,
            resend_api_key: None,
            resend_api_url: "https://api.resend.com/emails".to_string(),
            email_from: "notification@localhost".to_string(),
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_backend_parse_is_case_insensitive() {
        assert_eq!("Resend".parse::<NotifierBackend>().unwrap(), NotifierBackend::Resend);
        assert_eq!(" smtp ".parse::<NotifierBackend>().unwrap(), NotifierBackend::Smtp);
        assert_eq!("noop".parse::<NotifierBackend>().unwrap(), NotifierBackend::Noop);
    }

    #[test]
    fn test_backend_parse_rejects_unknown() {
        let err = "carrier-pigeon".parse::<NotifierBackend>().unwrap_err();
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.app_base_url, "http://localhost:5000");
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.event_webhook_secret, None);
        assert_eq!(config.fetch_timeout_secs, 10);
        assert_eq!(config.notifier_backend, NotifierBackend::Noop);
        assert_eq!(config.resend_api_key, None);
        assert_eq!(config.resend_api_url, "https://api.resend.com/emails");
        assert_eq!(config.email_from, "notification@localhost");
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = AppConfig::from_lookup(lookup(&[
            ("APP_BASE_URL", "https://hyp.example/"),
            ("EVENT_WEBHOOK_SECRET", ""),
            ("FETCH_TIMEOUT_SECS", "3"),
            ("NOTIFIER_BACKEND", "smtp"),
            ("SMTP_PORT", "2525"),
        ]))
        .unwrap();
        assert_eq!(config.app_base_url, "https://hyp.example");
        assert_eq!(config.event_webhook_secret, None);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(config.notifier_backend, NotifierBackend::Smtp);
        assert_eq!(config.smtp_port, 2525);
    }

    #[test]
    fn test_from_lookup_rejects_bad_numbers() {
        let err = AppConfig::from_lookup(lookup(&[("FETCH_TIMEOUT_SECS", "abc")])).unwrap_err();
        assert!(err.to_string().contains("FETCH_TIMEOUT_SECS"));

        let err = AppConfig::from_lookup(lookup(&[("SMTP_PORT", "70000")])).unwrap_err();
        assert!(err.to_string().contains("SMTP_PORT"));
    }

    #[test]
    fn test_from_lookup_rejects_unknown_backend() {
        assert!(AppConfig::from_lookup(lookup(&[("NOTIFIER_BACKEND", "fax")])).is_err());
    }

    #[test]
    fn test_default_fetch_timeout() {
        let config = AppConfig::default();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.notifier_backend.to_string(), "noop");
    }
}
