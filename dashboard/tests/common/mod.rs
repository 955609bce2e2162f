// tests/common/mod.rs
#![allow(dead_code)]

use backoffice_dashboard::config::AppConfig;
use backoffice_dashboard::state::AppState;
use backoffice_dashboard::store::{MemoryStore, Store};
use backoffice_dashboard::build_app_state;
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub struct TestApp {
  pub state: AppState,
  pub store: Arc<MemoryStore>,
  pub public_dir: PathBuf,
}

/// Config rooted in a scratch public directory. `overrides` win over defaults.
pub fn test_config(public_dir: &PathBuf, overrides: &[(&str, &str)]) -> AppConfig {
  let mut values: HashMap<String, String> = HashMap::new();
  values.insert("DATABASE_URL".into(), "postgres://unused/test".into());
  values.insert("PUBLIC_DIR".into(), public_dir.display().to_string());
  values.insert(
    "UPLOAD_DIR".into(),
    public_dir.join("images").join("products").display().to_string(),
  );
  values.insert("LOOKUP_TIMEOUT_MS".into(), "1000".into());
  values.insert("ORDER_TIMEOUT_MS".into(), "3000".into());
  for (key, value) in overrides {
    values.insert(key.to_string(), value.to_string());
  }
  AppConfig::from_source(|key| values.get(key).cloned()).expect("test config must parse")
}

pub fn test_app_with(overrides: &[(&str, &str)]) -> TestApp {
  setup_tracing();
  let public_dir = std::env::temp_dir().join(format!("backoffice-test-{}", Uuid::new_v4()));
  let config = Arc::new(test_config(&public_dir, overrides));
  let store = Arc::new(MemoryStore::new());
  let dyn_store: Arc<dyn Store> = store.clone();
  let state = build_app_state(dyn_store, config).expect("app state must build");
  TestApp {
    state,
    store,
    public_dir,
  }
}

pub fn test_app() -> TestApp {
  test_app_with(&[])
}

/// Customer 7 plus products 3 ("Widget") and 5 ("Gadget").
pub fn seed_scenario(store: &MemoryStore) {
  store.seed_customer_with_id(7, "Grace Hopper", "grace@example.com");
  store.seed_product_with_id(3, "Widget", dec!(15.00));
  store.seed_product_with_id(5, "Gadget", dec!(12.50));
}

/// Initializes the full route table over `$state` for `actix_web::test` calls.
macro_rules! test_service {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state.clone()))
        .configure(backoffice_dashboard::web::configure_app_routes),
    )
    .await
  };
}
