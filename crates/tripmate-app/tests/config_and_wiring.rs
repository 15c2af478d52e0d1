//! 설정 및 DI 와이어링 통합 테스트.
//!
//! AppConfig → 어댑터 생성 → 포트 호출 흐름 검증.

use std::sync::Arc;

use mockito::Matcher;
use tempfile::TempDir;
use tripmate_core::config::AppConfig;
use tripmate_core::config_manager::ConfigManager;
use tripmate_core::models::history::HISTORY_LIMIT;
use tripmate_core::models::itinerary::ItineraryStatus;
use tripmate_core::models::session::{AuthenticatedUser, SessionContext};
use tripmate_core::models::trip::{Pace, TripRequest};
use tripmate_core::ports::history_store::HistoryStore;
use tripmate_core::ports::identity_provider::IdentityProvider;
use tripmate_core::ports::itinerary_generator::ItineraryGenerator;
use tripmate_network::identity_client::IdentityToolkitClient;
use tripmate_network::itinerary_client::OllamaItineraryClient;
use tripmate_storage::sqlite::SqliteStorage;

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default_config();

    assert!(!config.generation.endpoint_url.is_empty());
    assert!(config.generation.probe_timeout() < config.generation.generation_timeout());
    assert!(config.generation.num_predict > 0);
    assert!(!config.identity.base_url.is_empty());
    assert!(config.identity.timeout_secs > 0);
    assert!(!config.web.allow_external);
}

#[test]
fn all_adapters_instantiate_from_config() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_path(dir.path().join("config.json")).unwrap();
    let config = manager.get();

    let _generator: Arc<dyn ItineraryGenerator> =
        Arc::new(OllamaItineraryClient::new(&config.generation).unwrap());
    let _identity: Arc<dyn IdentityProvider> =
        Arc::new(IdentityToolkitClient::new(&config.identity, "key").unwrap());
    let _history: Arc<dyn HistoryStore> =
        Arc::new(SqliteStorage::open(&dir.path().join("tripmate.db")).unwrap());
}

#[test]
fn missing_api_key_is_config_error() {
    let config = AppConfig::default_config();
    assert!(IdentityToolkitClient::new(&config.identity, "").is_err());
}

/// 엔드포인트 파일 → 생성 → 성공 시에만 저장
#[tokio::test]
async fn endpoint_file_generation_and_persistence() {
    let mut server = mockito::Server::new_async().await;
    let _tags = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body(r#"{"models":[]}"#)
        .create_async()
        .await;
    let generate = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(serde_json::json!({"model": "mistral"})))
        .with_status(200)
        .with_body(r#"{"response":"**Day 1:** Cầu Rồng\n**Day 2:** Hội An","done":true}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let url_file = dir.path().join("ollama_url.txt");
    std::fs::write(&url_file, format!("{}\n", server.url())).unwrap();

    let mut config = AppConfig::default_config();
    config.generation.endpoint_file = Some(url_file);
    let endpoint = config.generation.resolve_endpoint_url();
    assert_eq!(endpoint, server.url());

    let generator = OllamaItineraryClient::new(&config.generation).unwrap();
    let history = SqliteStorage::open_in_memory().unwrap();
    let session = SessionContext::start(AuthenticatedUser {
        user_id: "uid_1".to_string(),
        email: "traveler@example.com".to_string(),
    });

    let request = TripRequest::new(
        "Hanoi",
        "Da Nang",
        "3 days",
        vec!["Food".to_string()],
        Pace::Normal,
    )
    .unwrap();
    let result = generator.generate(&request, &endpoint).await;
    assert_eq!(result.status, ItineraryStatus::Ok);
    assert!(result.raw_text.starts_with("**Day 1:**"));

    if result.is_persistable() {
        history
            .save(&session, &request, &result.raw_text)
            .await
            .unwrap();
    }
    let records = history.recent(&session, HISTORY_LIMIT).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].itinerary, result.raw_text);
    generate.assert_async().await;
}
