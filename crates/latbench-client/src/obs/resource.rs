//! Telemetry resource for the process.
//!
//! Three layers, lowest precedence first: SDK defaults (`telemetry.sdk.*`,
//! `OTEL_RESOURCE_ATTRIBUTES`), host/OS/process attributes, and the
//! application labels. Composed at most once per process.

use std::sync::OnceLock;

use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions as semcov;
use semcov::resource::{
    HOST_ARCH, HOST_NAME, OS_TYPE, PROCESS_EXECUTABLE_NAME, PROCESS_PID, PROCESS_RUNTIME_NAME,
    SERVICE_NAME, SERVICE_VERSION,
};

use latbench_core::ApplicationResource;

/// Application labels under their semantic-convention keys.
pub fn application_resource(app: &ApplicationResource) -> Resource {
    let mut attrs = vec![
        KeyValue::new(SERVICE_NAME, app.service_name.clone()),
        KeyValue::new(SERVICE_VERSION, app.version.clone()),
    ];
    attrs.extend(
        app.custom_labels()
            .into_iter()
            .map(|(k, v)| KeyValue::new(k, v.to_owned())),
    );
    Resource::from_schema_url(attrs, semcov::SCHEMA_URL)
}

/// Host, OS and process attributes. Unknown ones are left out.
pub fn process_resource() -> Resource {
    let mut attrs = vec![
        KeyValue::new(OS_TYPE, std::env::consts::OS),
        KeyValue::new(HOST_ARCH, std::env::consts::ARCH),
        KeyValue::new(PROCESS_PID, i64::from(std::process::id())),
        KeyValue::new(PROCESS_RUNTIME_NAME, "rust"),
    ];
    if let Some(host) = std::env::var("HOSTNAME")
        .ok()
        .map(|h| h.trim().to_owned())
        .filter(|h| !h.is_empty())
    {
        attrs.push(KeyValue::new(HOST_NAME, host));
    }
    if let Some(exe) = std::env::current_exe()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
    {
        attrs.push(KeyValue::new(PROCESS_EXECUTABLE_NAME, exe));
    }
    Resource::new(attrs)
}

/// Merge all layers; later layers win on key collisions.
pub fn compose_resource(app: &ApplicationResource) -> Resource {
    Resource::default()
        .merge(&process_resource())
        .merge(&application_resource(app))
}

static PROCESS_RESOURCE: OnceLock<Resource> = OnceLock::new();

/// Compose the process resource on first call; later calls return the first
/// result and ignore their argument.
pub fn init_resource(app: &ApplicationResource) -> &'static Resource {
    PROCESS_RESOURCE.get_or_init(|| compose_resource(app))
}
