use std::env;
use std::time::Duration;

use tokio_postgres::config::SslMode;
use tokio_postgres_rustls::MakeRustlsConnect;

/// Connection parameters for the score store, read from the environment
/// with defaults matching a local development database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub sslmode: SslMode,
    /// Timeout for each individual connection attempt
    pub connect_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "mazerunner".to_string(),
            user: "postgres".to_string(),
            password: "postgres123".to_string(),
            sslmode: SslMode::Prefer,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl StoreConfig {
    /// Read `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD` and
    /// `DB_SSLMODE`, falling back to the defaults for anything absent or
    /// unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("DB_HOST", defaults.host),
            port: env::var("DB_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            dbname: env_or("DB_NAME", defaults.dbname),
            user: env_or("DB_USER", defaults.user),
            password: env_or("DB_PASSWORD", defaults.password),
            sslmode: env::var("DB_SSLMODE")
                .ok()
                .and_then(|v| parse_sslmode(&v))
                .unwrap_or(defaults.sslmode),
            connect_timeout: defaults.connect_timeout,
        }
    }

    pub(crate) fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .user(&self.user)
            .password(&self.password)
            .ssl_mode(self.sslmode)
            .connect_timeout(self.connect_timeout);
        config
    }

    /// TLS connector honoring the configured `sslmode`. With `prefer`
    /// the driver falls back to plaintext when the server declines TLS;
    /// with `require` a hosted database (e.g. Neon) gets a verified
    /// connection against the webpki root set.
    pub(crate) fn tls_connector(&self) -> MakeRustlsConnect {
        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        MakeRustlsConnect::new(tls_config)
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}

fn parse_sslmode(value: &str) -> Option<SslMode> {
    match value {
        "disable" => Some(SslMode::Disable),
        "prefer" => Some(SslMode::Prefer),
        "require" => Some(SslMode::Require),
        _ => None,
    }
}
