use std::sync::Arc;

use axum::{
    Router,
    http::{Request, StatusCode},
    routing::get,
};
use tower::ServiceExt;
use yagura_core::{
    EnvOverrides, LoggingService, ServiceContainer, ServiceError, ServiceRegistration,
    ServiceResult, Settings, SharedService,
};
use yagura_http::{
    models::StatusResponse,
    plugins::{PluginError, PluginResult, PluginRoutes},
    server::{InitError, initialize_app},
};

fn test_settings() -> Arc<Settings> {
    let yaml = r#"
services:
  azure_openai:
    endpoint: "http://localhost:9"
    api_key: "test-key"
    deployment_name: "test-deploy"
"#;
    Arc::new(Settings::from_yaml(yaml, &EnvOverrides::default()).unwrap())
}

struct Marker;

fn make_marker(_settings: &Settings) -> ServiceResult<SharedService> {
    Ok(Arc::new(Marker))
}

fn echo_routes(_container: &ServiceContainer) -> PluginResult<PluginRoutes> {
    Ok(PluginRoutes {
        name: "echo",
        router: Router::new().route("/v1/echo", get(|| async { "echo" })),
    })
}

fn second_status(_container: &ServiceContainer) -> PluginResult<PluginRoutes> {
    Ok(PluginRoutes {
        name: "status",
        router: Router::new(),
    })
}

#[tokio::test]
async fn bootstraps_builtin_routes() {
    let app = initialize_app(test_settings(), Vec::new(), Vec::new()).unwrap();
    let service = app.router.into_service();

    let request = Request::builder()
        .uri("/health")
        .method("GET")
        .body(String::new())
        .unwrap();

    let response = service.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn status_reports_services_and_plugins() {
    let app = initialize_app(test_settings(), Vec::new(), Vec::new()).unwrap();
    let service = app.router.into_service();

    let request = Request::builder()
        .uri("/v1/status")
        .method("GET")
        .body(String::new())
        .unwrap();

    let response = service.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 10_000)
        .await
        .unwrap();
    let resp: StatusResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
    assert!(resp.uptime_seconds < 60);
    assert_eq!(resp.services, vec!["azure_openai", "logging"]);
    assert_eq!(resp.plugins, vec!["status", "completions", "embeddings"]);
}

#[tokio::test]
async fn app_state_shares_the_settings_instance() {
    let settings = test_settings();
    let app = initialize_app(settings.clone(), Vec::new(), Vec::new()).unwrap();

    assert!(Arc::ptr_eq(&settings, &app.state.settings));
}

#[tokio::test]
async fn custom_service_and_plugin_join_the_app() {
    let custom = ServiceRegistration {
        name: "marker",
        constructor: make_marker,
    };
    let app = initialize_app(test_settings(), vec![custom], vec![echo_routes]).unwrap();

    assert!(app.state.container.get::<Marker>("marker").is_ok());

    let service = app.router.into_service();
    let request = Request::builder()
        .uri("/v1/echo")
        .method("GET")
        .body(String::new())
        .unwrap();
    let response = service.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/v1/status")
        .method("GET")
        .body(String::new())
        .unwrap();
    let response = service.clone().oneshot(request).await.unwrap();
    let body = axum::body::to_bytes(response.into_body(), 10_000)
        .await
        .unwrap();
    let resp: StatusResponse = serde_json::from_slice(&body).unwrap();

    assert!(resp.services.contains(&"marker".to_string()));
    assert_eq!(resp.plugins.last(), Some(&"echo".to_string()));
}

#[tokio::test]
async fn custom_registration_replaces_builtin_service() {
    let custom = ServiceRegistration {
        name: "logging",
        constructor: make_marker,
    };
    let app = initialize_app(test_settings(), vec![custom], Vec::new()).unwrap();

    assert!(app.state.container.get::<Marker>("logging").is_ok());
    let err = app
        .state
        .container
        .get::<LoggingService>("logging")
        .unwrap_err();
    assert!(matches!(err, ServiceError::TypeMismatch(_)));
}

#[tokio::test]
async fn duplicate_plugin_name_aborts_startup() {
    let err = initialize_app(test_settings(), Vec::new(), vec![second_status]).unwrap_err();
    assert!(matches!(
        err,
        InitError::Plugin(PluginError::DuplicateName(name)) if name == "status"
    ));
}

#[tokio::test]
async fn incomplete_azure_section_aborts_startup() {
    let settings =
        Arc::new(Settings::from_yaml("services: {}\n", &EnvOverrides::default()).unwrap());
    let err = initialize_app(settings, Vec::new(), Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        InitError::Service(ServiceError::IncompleteConfig(_))
    ));
}
