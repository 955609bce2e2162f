// dashboard/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,
  pub db_acquire_timeout: Duration,
  pub run_migrations: bool,

  /// Root served under `/images`.
  pub public_dir: PathBuf,
  pub upload_dir: PathBuf,
  pub max_upload_bytes: usize,

  /// Budget for a single product-name lookup while resolving an order.
  pub lookup_timeout: Duration,
  /// Budget for a whole order submission.
  pub order_timeout: Duration,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_source(|key| env::var(key).ok())
  }

  /// Builds the config from any key lookup. Unset keys fall back to defaults,
  /// except `DATABASE_URL`.
  pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_or(&lookup, "SERVER_PORT", 8080u16)?;
    let database_url = lookup("DATABASE_URL")
      .filter(|v| !v.trim().is_empty())
      .ok_or_else(|| AppError::Config("Missing environment variable 'DATABASE_URL'".to_string()))?;
    let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10u32)?;
    let db_acquire_timeout = Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5u64)?);
    let run_migrations = parse_or(&lookup, "RUN_MIGRATIONS", true)?;

    let public_dir = PathBuf::from(lookup("PUBLIC_DIR").unwrap_or_else(|| "public".to_string()));
    let upload_dir = PathBuf::from(lookup("UPLOAD_DIR").unwrap_or_else(|| "public/images/products".to_string()));
    let max_upload_bytes = parse_or(&lookup, "MAX_UPLOAD_BYTES", 5 * 1024 * 1024usize)?;

    let lookup_timeout = Duration::from_millis(parse_or(&lookup, "LOOKUP_TIMEOUT_MS", 2000u64)?);
    let order_timeout = Duration::from_millis(parse_or(&lookup, "ORDER_TIMEOUT_MS", 10_000u64)?);

    // One connection per open order transaction plus at least one for its lookups.
    if db_max_connections < 2 {
      return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 2".to_string()));
    }

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      db_acquire_timeout,
      run_migrations,
      public_dir,
      upload_dir,
      max_upload_bytes,
      lookup_timeout,
      order_timeout,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }

  /// Order transactions allowed open at once. One pool connection is always
  /// left for product lookups.
  pub fn order_transaction_slots(&self) -> usize {
    self.db_max_connections.saturating_sub(1).max(1) as usize
  }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match lookup(key) {
    None => Ok(default),
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", key, raw, e))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| map.get(key).cloned()
  }

  #[test]
  fn defaults_apply_when_only_database_url_is_set() {
    let cfg = AppConfig::from_source(source(&[("DATABASE_URL", "postgres://localhost/shop")])).unwrap();
    assert_eq!(cfg.bind_address(), "127.0.0.1:8080");
    assert_eq!(cfg.db_max_connections, 10);
    assert_eq!(cfg.db_acquire_timeout, Duration::from_secs(5));
    assert!(cfg.run_migrations);
    assert_eq!(cfg.upload_dir, PathBuf::from("public/images/products"));
    assert_eq!(cfg.max_upload_bytes, 5_242_880);
    assert_eq!(cfg.lookup_timeout, Duration::from_millis(2000));
    assert_eq!(cfg.order_timeout, Duration::from_secs(10));
  }

  #[test]
  fn missing_database_url_is_a_config_error() {
    let err = AppConfig::from_source(source(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("DATABASE_URL")));
  }

  #[test]
  fn invalid_numbers_and_booleans_are_rejected() {
    let err = AppConfig::from_source(source(&[("DATABASE_URL", "postgres://x"), ("SERVER_PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("SERVER_PORT")));

    let err =
      AppConfig::from_source(source(&[("DATABASE_URL", "postgres://x"), ("RUN_MIGRATIONS", "maybe")])).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("RUN_MIGRATIONS")));
  }

  #[test]
  fn pool_must_leave_room_for_lookups() {
    let err =
      AppConfig::from_source(source(&[("DATABASE_URL", "postgres://x"), ("DB_MAX_CONNECTIONS", "1")])).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("DB_MAX_CONNECTIONS")));

    let cfg = AppConfig::from_source(source(&[("DATABASE_URL", "postgres://x"), ("DB_MAX_CONNECTIONS", "2")])).unwrap();
    assert_eq!(cfg.order_transaction_slots(), 1);

    let cfg = AppConfig::from_source(source(&[("DATABASE_URL", "postgres://x")])).unwrap();
    assert_eq!(cfg.order_transaction_slots(), 9);
  }

  #[test]
  fn overrides_are_honoured() {
    let cfg = AppConfig::from_source(source(&[
      ("DATABASE_URL", "postgres://x"),
      ("SERVER_HOST", "0.0.0.0"),
      ("SERVER_PORT", "3000"),
      ("LOOKUP_TIMEOUT_MS", "150"),
      ("RUN_MIGRATIONS", "false"),
    ]))
    .unwrap();
    assert_eq!(cfg.bind_address(), "0.0.0.0:3000");
    assert_eq!(cfg.lookup_timeout, Duration::from_millis(150));
    assert!(!cfg.run_migrations);
  }
}
