//! HTTP surface tests against in-memory collaborators and a local fake broker

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use actix_web::{
    App, HttpResponse, HttpServer,
    http::{StatusCode, header::CONTENT_TYPE},
    test, web,
};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use odc_core::{
    ArtifactContent, ArtifactStore, Asset, ConfigurationProvider, ConfigurationSnapshot,
    EngineOptions, MemoryAssetSource, MemoryConfigurationProvider, SelfDescriptionService,
    StaticTokenSupplier, TokenSupplier,
};
use odc_server::{api::route, model::app_state::AppState, service::broker::BrokerClient};

struct RevokedTokens;

#[async_trait]
impl TokenSupplier for RevokedTokens {
    async fn security_token(&self) -> anyhow::Result<String> {
        anyhow::bail!("token revoked")
    }
}

/// CSV content for asset 7 (published) and asset 9 (not published)
struct CsvArtifacts;

#[async_trait]
impl ArtifactStore for CsvArtifacts {
    async fn artifact(
        &self,
        asset_id: i64,
        extension: Option<&str>,
    ) -> anyhow::Result<Option<ArtifactContent>> {
        if !matches!(asset_id, 7 | 9) || extension != Some("csv") {
            return Ok(None);
        }
        Ok(Some(ArtifactContent::new(
            format!("{}.csv", asset_id),
            "ts,value\n1,20.5\n",
        )))
    }
}

/// Hands out a different base URL on every read
#[derive(Default)]
struct RotatingConfiguration {
    reads: AtomicUsize,
}

#[async_trait]
impl ConfigurationProvider for RotatingConfiguration {
    async fn configuration(&self) -> anyhow::Result<Option<ConfigurationSnapshot>> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(Some(ConfigurationSnapshot {
            url: format!("https://conn{}.example/", n),
            ..demo_config()
        }))
    }
}

fn demo_config() -> ConfigurationSnapshot {
    ConfigurationSnapshot::new(
        "https://conn.example/",
        "https://org.example/m",
        "https://org.example/c",
        "Demo",
    )
}

fn state_with(
    config: Option<ConfigurationSnapshot>,
    tokens: Arc<dyn TokenSupplier>,
) -> Arc<AppState> {
    state_from(Arc::new(MemoryConfigurationProvider::new(config)), tokens)
}

fn state_from(
    configuration: Arc<dyn ConfigurationProvider>,
    tokens: Arc<dyn TokenSupplier>,
) -> Arc<AppState> {
    let assets = vec![Asset {
        dataset_title: Some("Sensors".to_string()),
        tags: vec!["iot".to_string()],
        ..Asset::new(7, Utc::now())
    }];
    let service = SelfDescriptionService::new(
        configuration,
        Arc::new(MemoryAssetSource::new(assets)),
        tokens,
        EngineOptions::default(),
    )
    .with_artifacts(Arc::new(CsvArtifacts));
    let broker_client = BrokerClient::new(Duration::from_secs(5)).unwrap();
    Arc::new(AppState::new(Arc::new(service), broker_client))
}

fn state(config: Option<ConfigurationSnapshot>) -> Arc<AppState> {
    state_with(config, Arc::new(StaticTokenSupplier::default()))
}

/// Start a broker stand-in that records request bodies and answers with `status`.
fn start_fake_broker(status: StatusCode) -> (String, Arc<Mutex<Vec<String>>>) {
    let received = Arc::new(Mutex::new(Vec::<String>::new()));
    let captured = received.clone();

    let server = HttpServer::new(move || {
        let captured = captured.clone();
        App::new().default_service(web::to(move |body: web::Bytes| {
            let captured = captured.clone();
            async move {
                captured
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&body).to_string());
                HttpResponse::build(status).finish()
            }
        }))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());

    (format!("http://{}/infrastructure", addr), received)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::from($state))
                .configure(route::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health() {
    let app = app!(state(None));
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_about_returns_connector_as_json_ld() {
    let app = app!(state(Some(demo_config())));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/about").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(CONTENT_TYPE).unwrap(),
        "application/ld+json"
    );

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["@type"], "ids:BaseConnector");
    assert_eq!(body["@id"], "https://conn.example/#Connector");
    assert_eq!(
        body["catalog"]["offer"][0]["resourceEndpoint"]["endpointArtifact"]["fileName"],
        "7"
    );
}

#[actix_web::test]
async fn test_self_description_response() {
    let app = app!(state(Some(demo_config())));

    let req = test::TestRequest::get()
        .uri("/about/self-description")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["@type"], "ids:SelfDescriptionResponse");
    assert_eq!(body["@id"], "https://conn.example/#SelfDescriptionResponse");
    assert_eq!(body["connector"]["@type"], "ids:BaseConnector");
    assert!(body.get("securityToken").is_none());
}

#[actix_web::test]
async fn test_message_preview() {
    let app = app!(state(Some(demo_config())));

    for (kind, wire_type) in [
        ("register", "ids:ConnectorAvailableMessage"),
        ("update", "ids:ConnectorUpdateMessage"),
        ("unregister", "ids:ConnectorUnavailableMessage"),
    ] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/messages/{}", kind))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["@type"], wire_type);
        assert_eq!(body["issuerConnector"], "https://conn.example/");
        assert_eq!(body["securityToken"]["tokenValue"], "abcdefg12");
        assert!(body.get("connector").is_none());
    }
}

#[actix_web::test]
async fn test_unknown_message_kind() {
    let app = app!(state(Some(demo_config())));

    let req = test::TestRequest::get()
        .uri("/api/messages/describe")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 20002);
}

#[actix_web::test]
async fn test_missing_configuration_is_unavailable() {
    let app = app!(state(None));

    for uri in ["/about", "/about/self-description", "/api/messages/register"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 30001);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("No config available.")
        );
    }
}

#[actix_web::test]
async fn test_token_failure_is_unavailable() {
    let app = app!(state_with(Some(demo_config()), Arc::new(RevokedTokens)));

    let req = test::TestRequest::get()
        .uri("/api/messages/update")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 30004);
}

#[actix_web::test]
async fn test_register_with_broker() {
    let (broker_url, received) = start_fake_broker(StatusCode::OK);
    let app = app!(state(Some(demo_config())));

    let req = test::TestRequest::post()
        .uri("/api/broker/register")
        .set_json(serde_json::json!({ "url": broker_url }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["action"], "register");
    assert!(
        body["data"]["messageId"]
            .as_str()
            .unwrap()
            .starts_with("https://w3id.org/idsa/autogen/connectorAvailableMessage/")
    );

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("name=\"header\""));
    assert!(bodies[0].contains("ids:ConnectorAvailableMessage"));
    assert!(bodies[0].contains("name=\"payload\""));
    assert!(bodies[0].contains("ids:BaseConnector"));
}

#[actix_web::test]
async fn test_unregister_sends_header_only() {
    let (broker_url, received) = start_fake_broker(StatusCode::OK);
    let app = app!(state(Some(demo_config())));

    let req = test::TestRequest::post()
        .uri("/api/broker/unregister")
        .set_json(serde_json::json!({ "url": broker_url }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("ids:ConnectorUnavailableMessage"));
    assert!(!bodies[0].contains("name=\"payload\""));
}

#[actix_web::test]
async fn test_broker_rejection_is_bad_gateway() {
    let (broker_url, received) = start_fake_broker(StatusCode::UNAUTHORIZED);
    let app = app!(state(Some(demo_config())));

    let req = test::TestRequest::post()
        .uri("/api/broker/update")
        .set_json(serde_json::json!({ "url": broker_url }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 30005);
    // No retries.
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_invalid_broker_url() {
    let app = app!(state(Some(demo_config())));

    let req = test::TestRequest::post()
        .uri("/api/broker/register")
        .set_json(serde_json::json!({ "url": "not a url" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_register_header_and_payload_share_snapshot() {
    let (broker_url, received) = start_fake_broker(StatusCode::OK);
    let provider = Arc::new(RotatingConfiguration::default());
    let app = app!(state_from(
        provider.clone(),
        Arc::new(StaticTokenSupplier::default())
    ));

    let req = test::TestRequest::post()
        .uri("/api/broker/register")
        .set_json(serde_json::json!({ "url": broker_url }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(provider.reads.load(Ordering::SeqCst), 1);

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains(r#""issuerConnector":"https://conn0.example/""#));
    assert!(bodies[0].contains("https://conn0.example/#Connector"));
    assert!(!bodies[0].contains("conn1.example"));
}

#[actix_web::test]
async fn test_download_published_artifact() {
    let app = app!(state(Some(demo_config())));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/data/7.csv").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "text/csv");
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"ts,value\n1,20.5\n");
}

#[actix_web::test]
async fn test_artifact_not_found() {
    let app = app!(state(Some(demo_config())));

    // Stored but not published, published without that extension, unknown id.
    for uri in ["/data/9.csv", "/data/7", "/data/7.json", "/data/12"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 30006);
    }

    let resp = test::call_service(&app, test::TestRequest::get().uri("/data/latest.csv").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_about_with_format_suffix() {
    let app = app!(state(Some(demo_config())));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/about/jsonld").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "application/ld+json");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/about/json").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "application/json");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["@id"], "https://conn.example/#Connector");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/about/ttl").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
}
