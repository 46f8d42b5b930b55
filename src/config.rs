use std::{
    env,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub notification_url: Url,
    pub notification_timeout: Duration,
    pub import_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://trips.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let notification_url = match env::var("NOTIFICATION_URL") {
            Ok(raw) => parse_notification_url(&raw)?,
            Err(_) => default_notification_url(listen_addr)?,
        };

        let notification_timeout = match env::var("NOTIFICATION_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout_secs(&raw)?,
            Err(_) => Duration::from_secs(5),
        };

        let import_path = env::var("TRIPS_CSV_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("trips.csv"));

        Ok(Self {
            database_url,
            listen_addr,
            notification_url,
            notification_timeout,
            import_path,
        })
    }
}

fn parse_notification_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw)
        .map_err(|err| AppError::Config(format!("invalid NOTIFICATION_URL: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::Config(format!(
            "NOTIFICATION_URL must be http(s), got {other}"
        ))),
    }
}

/// The service's own `/notifications` endpoint, reached over loopback when bound to
/// every interface.
fn default_notification_url(listen_addr: SocketAddr) -> Result<Url, AppError> {
    let mut target = listen_addr;
    if target.ip().is_unspecified() {
        target.set_ip(match target.ip() {
            IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
        });
    }
    parse_notification_url(&format!("http://{target}/notifications"))
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, AppError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|err| AppError::Config(format!("invalid NOTIFICATION_TIMEOUT_SECS: {err}")))?;
    if secs == 0 {
        return Err(AppError::Config(
            "NOTIFICATION_TIMEOUT_SECS must be at least 1".into(),
        ));
    }
    Ok(Duration::from_secs(secs))
}
