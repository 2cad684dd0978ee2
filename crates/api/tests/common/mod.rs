use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;

use devices_api::config::{RulesConfig, ServerConfig};
use devices_api::router::build_app_router;
use devices_api::state::AppState;
use devices_core::device::{Device, DeviceRequest, DeviceStore, DeviceTypeLookup};
use devices_core::error::CoreError;
use devices_core::types::DbId;
use devices_core::validation::source::{CatalogSource, ReloadMode};
use devices_core::validation::validator::{DeviceValidator, UnknownTypePolicy};

/// Device type ids known to [`StaticDeviceTypes`].
pub const SENSOR_TYPE_ID: DbId = 1;
pub const PC_TYPE_ID: DbId = 2;
pub const UNKNOWN_TYPE_ID: DbId = 404;

/// Rule catalog used by most tests.
pub const SENSOR_RULES: &str = r#"{
    "validations": [
        {
            "type": "sensor",
            "preRequestName": "connection",
            "preRequestValue": "wireless",
            "rules": [
                { "paramName": "frequency", "regex": ["2.4GHz", "5GHz"] }
            ]
        },
        {
            "type": "pc",
            "preRequestName": "isEnabled",
            "preRequestValue": "true",
            "rules": [
                { "paramName": "operationSystem", "regex": "^(Windows|Linux)" },
                { "paramName": "ram", "regex": ["8GB", "16GB", "32GB"] },
                { "paramName": "serial", "regex": "^[A-Z]{3}-[0-9]{4}$" }
            ]
        }
    ]
}"#;

/// Lookup with a fixed id → name table.
pub struct StaticDeviceTypes(HashMap<DbId, String>);

impl Default for StaticDeviceTypes {
    fn default() -> Self {
        Self(HashMap::from([
            (SENSOR_TYPE_ID, "Sensor".to_string()),
            (PC_TYPE_ID, "PC".to_string()),
        ]))
    }
}

#[async_trait]
impl DeviceTypeLookup for StaticDeviceTypes {
    async fn device_type_name(&self, type_id: DbId) -> Result<Option<String>, CoreError> {
        Ok(self.0.get(&type_id).cloned())
    }
}

/// Lookup whose backing store is down.
pub struct UnreachableDeviceTypes;

#[async_trait]
impl DeviceTypeLookup for UnreachableDeviceTypes {
    async fn device_type_name(&self, _type_id: DbId) -> Result<Option<String>, CoreError> {
        Err(CoreError::Internal("connection refused".into()))
    }
}

/// Device store kept in memory.
#[derive(Default)]
pub struct InMemoryDevices {
    devices: Mutex<Vec<Device>>,
}

impl InMemoryDevices {
    pub async fn count(&self) -> usize {
        self.devices.lock().await.len()
    }
}

#[async_trait]
impl DeviceStore for InMemoryDevices {
    async fn list(&self) -> Result<Vec<Device>, CoreError> {
        Ok(self.devices.lock().await.clone())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Device>, CoreError> {
        Ok(self.devices.lock().await.iter().find(|d| d.id == id).cloned())
    }

    async fn create(&self, input: &DeviceRequest) -> Result<Device, CoreError> {
        let mut devices = self.devices.lock().await;
        let now = Utc::now();
        let device = Device {
            id: devices.iter().map(|d| d.id).max().unwrap_or(0) + 1,
            name: input.name.clone(),
            is_enabled: input.is_enabled,
            type_id: input.type_id,
            additional_properties: input.additional_properties.clone(),
            created_at: now,
            updated_at: now,
        };
        devices.push(device.clone());
        Ok(device)
    }

    async fn update(&self, id: DbId, input: &DeviceRequest) -> Result<Option<Device>, CoreError> {
        let mut devices = self.devices.lock().await;
        let Some(device) = devices.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        device.name = input.name.clone();
        device.is_enabled = input.is_enabled;
        device.type_id = input.type_id;
        device.additional_properties = input.additional_properties.clone();
        device.updated_at = Utc::now();
        Ok(Some(device.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        let mut devices = self.devices.lock().await;
        let before = devices.len();
        devices.retain(|d| d.id != id);
        Ok(devices.len() != before)
    }
}

/// A router plus handles on its collaborators.
pub struct TestApp {
    pub router: Router,
    pub devices: Arc<InMemoryDevices>,
    pub catalog: Arc<CatalogSource>,
    pub rules_dir: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn rules_path(&self) -> std::path::PathBuf {
        self.rules_dir.path().join("validation_rules.json")
    }
}

/// Options for [`build_test_app_with`].
pub struct TestAppOptions {
    /// Catalog file contents; `None` leaves the file missing.
    pub rules: Option<&'static str>,
    pub reload_mode: ReloadMode,
    pub unknown_type_policy: UnknownTypePolicy,
    pub lookup: Arc<dyn DeviceTypeLookup>,
    pub load_timeout: Duration,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            rules: Some(SENSOR_RULES),
            reload_mode: ReloadMode::PerRequest,
            unknown_type_policy: UnknownTypePolicy::Allow,
            lookup: Arc::new(StaticDeviceTypes::default()),
            load_timeout: Duration::from_secs(5),
        }
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(rules: RulesConfig) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 64 * 1024,
        rules,
    }
}

/// Build the full application router over in-memory collaborators and the
/// default sensor/pc rule catalog.
pub fn build_test_app() -> TestApp {
    build_test_app_with(TestAppOptions::default())
}

pub fn build_test_app_with(options: TestAppOptions) -> TestApp {
    let rules_dir = tempfile::tempdir().unwrap();
    let path = rules_dir.path().join("validation_rules.json");
    if let Some(rules) = options.rules {
        std::fs::write(&path, rules).unwrap();
    }

    let config = test_config(RulesConfig {
        path: path.clone(),
        load_timeout_secs: options.load_timeout.as_secs(),
        reload_mode: options.reload_mode,
        refresh_interval_secs: 60,
        unknown_type_policy: options.unknown_type_policy,
    });

    let catalog = Arc::new(CatalogSource::new(
        path,
        options.load_timeout,
        config.rules.reload_mode,
    ));
    let validator = DeviceValidator::new(
        Arc::clone(&catalog),
        options.lookup,
        config.rules.unknown_type_policy,
    );
    let devices = Arc::new(InMemoryDevices::default());

    let state = AppState {
        config: Arc::new(config.clone()),
        validator: Arc::new(validator),
        devices: devices.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        devices,
        catalog,
        rules_dir,
    }
}

/// Replace the rules file with a FIFO so catalog reads stall until
/// [`release_stalled_rules`] is called.
#[cfg(unix)]
pub fn stall_rules(path: &std::path::Path) {
    let _ = std::fs::remove_file(path);
    let status = std::process::Command::new("mkfifo")
        .arg(path)
        .status()
        .unwrap();
    assert!(status.success());
}

/// Open and close the FIFO for writing so a stalled reader sees EOF.
#[cfg(unix)]
pub fn release_stalled_rules(path: &std::path::Path) {
    drop(std::fs::OpenOptions::new().write(true).open(path).unwrap());
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body.to_string())).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body.to_string())).await
}

/// POST a raw (possibly malformed) JSON body.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(body.to_string())).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<String>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
