//! 일정 생성 엔드포인트 클라이언트.
//!
//! Ollama 호환 HTTP API를 호출한다. 한 번의 생성은 두 단계로 진행된다:
//! `GET /api/tags` 프로브 → `POST /api/generate`.
//! 모든 실패는 `ItineraryResult` 상태 값으로 변환하며 에러로 올리지 않는다.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tripmate_core::config::GenerationConfig;
use tripmate_core::error::CoreError;
use tripmate_core::models::itinerary::{ItineraryResult, ItineraryStatus};
use tripmate_core::models::trip::TripRequest;
use tripmate_core::ports::itinerary_generator::ItineraryGenerator;

use crate::prompt::{build_itinerary_prompt, trim_to_first_day};

/// 프로브 경로
const PROBE_PATH: &str = "/api/tags";

/// 생성 경로
const GENERATE_PATH: &str = "/api/generate";

/// 에러 메시지에 포함할 응답 본문 최대 글자 수
const BODY_EXCERPT_CHARS: usize = 200;

/// `POST /api/generate` 요청 본문
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

/// `POST /api/generate` 응답 본문 (나머지 필드는 무시)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

// ============================================================
// OllamaItineraryClient: 일정 생성 클라이언트
// ============================================================

/// 일정 생성 클라이언트: `ItineraryGenerator` 포트 구현
///
/// 호출 간 공유 상태가 없어 여러 사용자의 동시 호출에 그대로 쓸 수 있다.
/// 타임아웃은 요청 단위로 건다 (프로브는 짧게, 생성은 길게).
#[derive(Debug, Clone)]
pub struct OllamaItineraryClient {
    http_client: reqwest::Client,
    model: String,
    temperature: f32,
    num_predict: u32,
    probe_timeout: Duration,
    generation_timeout: Duration,
    response_language: String,
}

impl OllamaItineraryClient {
    /// 설정으로부터 생성
    pub fn new(config: &GenerationConfig) -> Result<Self, CoreError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        debug!(
            model = %config.model,
            probe_timeout = config.probe_timeout_secs,
            generation_timeout = config.generation_timeout_secs,
            "OllamaItineraryClient 초기화"
        );

        Ok(Self {
            http_client,
            model: config.model.clone(),
            temperature: config.temperature,
            num_predict: config.num_predict,
            probe_timeout: config.probe_timeout(),
            generation_timeout: config.generation_timeout(),
            response_language: config.response_language.clone(),
        })
    }

    /// 타임아웃 재설정
    pub fn with_timeouts(mut self, probe: Duration, generation: Duration) -> Self {
        self.probe_timeout = probe;
        self.generation_timeout = generation;
        self
    }

    /// 기본 URL + 경로 결합 (절대 http(s) URL이 아니면 None)
    fn endpoint(base_url: &str, path: &str) -> Option<String> {
        let base = base_url.trim();
        let parsed = url::Url::parse(base).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }
        Some(format!("{}{}", base.trim_end_matches('/'), path))
    }

    /// 프로브: 200이면 Ok, 아니면 사용자 표시용 메시지
    async fn probe(&self, base_url: &str) -> Result<(), String> {
        let url = Self::endpoint(base_url, PROBE_PATH)
            .ok_or_else(|| format!("Generation endpoint URL is invalid: {base_url}"))?;

        let response = self
            .http_client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, "생성 엔드포인트 프로브 실패: {e}");
                "Cannot reach the generation endpoint. Restart the tunnel, then reload the page."
                    .to_string()
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(url = %url, status = %status, "생성 엔드포인트 프로브 비정상 응답");
            return Err(format!(
                "The generation endpoint is disconnected (HTTP {}). Restart the tunnel, then reload the page.",
                status.as_u16()
            ));
        }

        Ok(())
    }

    /// 전송 계층 에러 분류
    fn classify_transport_error(error: &reqwest::Error) -> ItineraryResult {
        if error.is_timeout() {
            warn!("일정 생성 타임아웃: {error}");
            ItineraryResult::failure(
                ItineraryStatus::Timeout,
                "Timed out: the model took too long. Try again with a shorter request.",
            )
        } else {
            warn!("일정 생성 연결 실패: {error}");
            ItineraryResult::failure(
                ItineraryStatus::EndpointUnreachable,
                "Lost connection to the generation endpoint. Restart the tunnel and try again.",
            )
        }
    }

    /// 성공 응답 본문 분류
    fn classify_success_body(body: &str) -> ItineraryResult {
        let text = match serde_json::from_str::<GenerateResponse>(body) {
            Ok(parsed) => parsed.response.unwrap_or_default(),
            Err(e) => {
                warn!("생성 응답 JSON 파싱 실패: {e}");
                String::new()
            }
        };

        let trimmed = trim_to_first_day(&text);
        if trimmed.is_empty() {
            return ItineraryResult::failure(
                ItineraryStatus::Empty,
                "The model returned no itinerary. Please try again.",
            );
        }

        ItineraryResult::ok(trimmed)
    }

    /// 생성 호출 + 응답 분류
    async fn request_generation(&self, url: &str, prompt: &str) -> ItineraryResult {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.num_predict,
            },
        };

        let response = match self
            .http_client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.generation_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Self::classify_transport_error(&e),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Self::classify_transport_error(&e),
        };

        if !status.is_success() {
            warn!(status = %status, "생성 엔드포인트 오류 응답");
            let excerpt: String = text.chars().take(BODY_EXCERPT_CHARS).collect();
            return ItineraryResult::failure(
                ItineraryStatus::UpstreamError {
                    code: status.as_u16(),
                },
                format!("Error {}: {}", status.as_u16(), excerpt),
            );
        }

        Self::classify_success_body(&text)
    }
}

#[async_trait]
impl ItineraryGenerator for OllamaItineraryClient {
    async fn generate(&self, request: &TripRequest, endpoint_base_url: &str) -> ItineraryResult {
        if let Err(message) = self.probe(endpoint_base_url).await {
            return ItineraryResult::failure(ItineraryStatus::EndpointUnreachable, message);
        }

        // 프로브가 통과했으면 URL은 유효하다
        let Some(url) = Self::endpoint(endpoint_base_url, GENERATE_PATH) else {
            return ItineraryResult::failure(
                ItineraryStatus::EndpointUnreachable,
                format!("Generation endpoint URL is invalid: {endpoint_base_url}"),
            );
        };

        let prompt = build_itinerary_prompt(request, &self.response_language);
        debug!(
            model = %self.model,
            destination = %request.destination(),
            dates = %request.date_spec(),
            "일정 생성 요청"
        );

        let result = self.request_generation(&url, &prompt).await;
        info!(
            status = %result.status,
            destination = %request.destination(),
            chars = result.raw_text.chars().count(),
            "일정 생성 완료"
        );
        result
    }

    async fn check_endpoint(&self, endpoint_base_url: &str) -> bool {
        self.probe(endpoint_base_url).await.is_ok()
    }
}

// ============================================================
// 테스트
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tripmate_core::models::trip::Pace;

    fn client() -> OllamaItineraryClient {
        OllamaItineraryClient::new(&GenerationConfig::default()).unwrap()
    }

    fn da_nang_request() -> TripRequest {
        TripRequest::new(
            "Hanoi",
            "Da Nang",
            "3 days 2 nights",
            vec!["Food".to_string(), "Nature".to_string()],
            Pace::Relaxed,
        )
        .unwrap()
    }

    async fn mock_probe(server: &mut mockito::ServerGuard, status: usize) -> mockito::Mock {
        server
            .mock("GET", "/api/tags")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"models":[{"name":"mistral:latest"}]}"#)
            .create_async()
            .await
    }

    /// 원시 TCP 스텁 동작 (mockito로는 연결 끊김/무응답을 만들 수 없음)
    #[derive(Clone, Copy)]
    enum RawStub {
        /// 프로브는 200, 생성 요청은 응답 없이 연결 종료
        ProbeOkThenDrop,
        /// 프로브에 응답하지 않고 붙잡아 둠
        HangProbe,
    }

    /// 기본 URL과 생성(POST) 요청 수신 횟수 반환
    async fn spawn_raw_stub(stub: RawStub) -> (String, Arc<AtomicUsize>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let posts = Arc::new(AtomicUsize::new(0));
        let counter = posts.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let counter = counter.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let is_probe = buf[..n].starts_with(b"GET /api/tags");
                    if !is_probe {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                    match (stub, is_probe) {
                        (RawStub::ProbeOkThenDrop, true) => {
                            let _ = socket
                                .write_all(
                                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 13\r\nconnection: close\r\n\r\n{\"models\":[]}",
                                )
                                .await;
                        }
                        (RawStub::HangProbe, true) => {
                            tokio::time::sleep(Duration::from_secs(5)).await;
                        }
                        // 생성 요청: 응답 없이 끊음
                        (_, false) => {}
                    }
                });
            }
        });

        (format!("http://{addr}"), posts)
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            OllamaItineraryClient::endpoint("https://abc.trycloudflare.com/", GENERATE_PATH)
                .unwrap(),
            "https://abc.trycloudflare.com/api/generate"
        );
        assert!(OllamaItineraryClient::endpoint("not a url", PROBE_PATH).is_none());
        assert!(OllamaItineraryClient::endpoint("ftp://host", PROBE_PATH).is_none());
    }

    #[test]
    fn missing_response_field_is_empty() {
        let result = OllamaItineraryClient::classify_success_body(r#"{"done":true}"#);
        assert_eq!(result.status, ItineraryStatus::Empty);
        let result = OllamaItineraryClient::classify_success_body("<html>");
        assert_eq!(result.status, ItineraryStatus::Empty);
    }

    #[tokio::test]
    async fn example_request_returns_ok() {
        let mut server = mockito::Server::new_async().await;
        let probe = mock_probe(&mut server, 200).await;
        let generate = server
            .mock("POST", "/api/generate")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "mistral",
                "stream": false,
                "options": { "num_predict": 1500 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"model":"mistral","response":"**Day 1:** Marble Mountains","done":true}"#)
            .create_async()
            .await;

        let result = client().generate(&da_nang_request(), &server.url()).await;

        assert_eq!(result.status, ItineraryStatus::Ok);
        assert!(result.raw_text.starts_with("**Day 1:**"));
        assert_eq!(result.raw_text, "**Day 1:** Marble Mountains");
        probe.assert_async().await;
        generate.assert_async().await;
    }

    #[tokio::test]
    async fn prompt_carries_trip_fields() {
        let mut server = mockito::Server::new_async().await;
        let _probe = mock_probe(&mut server, 200).await;
        let generate = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::Regex("Da Nang".to_string()))
            .with_status(200)
            .with_body(r#"{"response":"**Day 1:** ..."}"#)
            .create_async()
            .await;

        let result = client().generate(&da_nang_request(), &server.url()).await;
        assert!(result.status.is_ok());
        generate.assert_async().await;
    }

    #[tokio::test]
    async fn failed_probe_skips_generation() {
        let mut server = mockito::Server::new_async().await;
        let probe = mock_probe(&mut server, 502).await;
        let generate = server
            .mock("POST", "/api/generate")
            .expect(0)
            .create_async()
            .await;

        let result = client().generate(&da_nang_request(), &server.url()).await;

        assert_eq!(result.status, ItineraryStatus::EndpointUnreachable);
        assert!(result.raw_text.is_empty());
        assert!(result.message.contains("502"));
        probe.assert_async().await;
        generate.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_host_is_endpoint_unreachable() {
        let result = client()
            .generate(&da_nang_request(), "http://127.0.0.1:1")
            .await;
        assert_eq!(result.status, ItineraryStatus::EndpointUnreachable);
    }

    #[tokio::test]
    async fn connection_lost_during_generation_is_endpoint_unreachable() {
        let (base_url, posts) = spawn_raw_stub(RawStub::ProbeOkThenDrop).await;

        let result = client().generate(&da_nang_request(), &base_url).await;

        assert_eq!(posts.load(Ordering::SeqCst), 1);
        assert_eq!(result.status, ItineraryStatus::EndpointUnreachable);
        assert!(result.raw_text.is_empty());
        assert!(result.message.contains("Lost connection"));
    }

    #[tokio::test]
    async fn probe_timeout_skips_generation() {
        let (base_url, posts) = spawn_raw_stub(RawStub::HangProbe).await;

        let client = client().with_timeouts(Duration::from_millis(300), Duration::from_secs(5));
        let result = client.generate(&da_nang_request(), &base_url).await;

        assert_eq!(result.status, ItineraryStatus::EndpointUnreachable);
        assert!(result.raw_text.is_empty());
        assert_eq!(posts.load(Ordering::SeqCst), 0);
        assert!(!client.check_endpoint(&base_url).await);
    }

    #[tokio::test]
    async fn invalid_base_url_is_endpoint_unreachable() {
        let result = client().generate(&da_nang_request(), "not-a-url").await;
        assert_eq!(result.status, ItineraryStatus::EndpointUnreachable);
    }

    #[tokio::test]
    async fn slow_generation_times_out() {
        let mut server = mockito::Server::new_async().await;
        let _probe = mock_probe(&mut server, 200).await;
        let _generate = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(br#"{"response":"**Day 1:** late"}"#)
            })
            .create_async()
            .await;

        let client = client().with_timeouts(Duration::from_secs(5), Duration::from_millis(300));
        let result = client.generate(&da_nang_request(), &server.url()).await;

        assert_eq!(result.status, ItineraryStatus::Timeout);
        assert!(result.raw_text.is_empty());
    }

    #[tokio::test]
    async fn server_error_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _probe = mock_probe(&mut server, 200).await;
        let _generate = server
            .mock("POST", "/api/generate")
            .with_status(500)
            .with_body("model runner crashed: out of memory")
            .create_async()
            .await;

        let result = client().generate(&da_nang_request(), &server.url()).await;

        assert_eq!(result.status, ItineraryStatus::UpstreamError { code: 500 });
        assert!(result.message.contains("500"));
        assert!(result.message.contains("model runner crashed"));
        assert!(result.raw_text.is_empty());
    }

    #[tokio::test]
    async fn upstream_excerpt_is_truncated() {
        let mut server = mockito::Server::new_async().await;
        let _probe = mock_probe(&mut server, 200).await;
        let _generate = server
            .mock("POST", "/api/generate")
            .with_status(503)
            .with_body("x".repeat(1000))
            .create_async()
            .await;

        let result = client().generate(&da_nang_request(), &server.url()).await;

        assert_eq!(result.status, ItineraryStatus::UpstreamError { code: 503 });
        assert_eq!(result.message.matches('x').count(), BODY_EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn empty_response_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _probe = mock_probe(&mut server, 200).await;
        let _generate = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(r#"{"response":""}"#)
            .create_async()
            .await;

        let result = client().generate(&da_nang_request(), &server.url()).await;
        assert_eq!(result.status, ItineraryStatus::Empty);
    }

    #[tokio::test]
    async fn preamble_is_trimmed() {
        let mut server = mockito::Server::new_async().await;
        let _probe = mock_probe(&mut server, 200).await;
        let _generate = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(r#"{"response":"Here is your trip!\n**Day 1:** Beach\n**Day 2:** Hoi An"}"#)
            .create_async()
            .await;

        let result = client().generate(&da_nang_request(), &server.url()).await;
        assert_eq!(result.raw_text, "**Day 1:** Beach\n**Day 2:** Hoi An");
    }

    #[tokio::test]
    async fn repeated_calls_are_identical() {
        let mut server = mockito::Server::new_async().await;
        let probe = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .expect(2)
            .create_async()
            .await;
        let generate = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(r#"{"response":"**Day 1:** Son Tra"}"#)
            .expect(2)
            .create_async()
            .await;

        let client = client();
        let request = da_nang_request();
        let first = client.generate(&request, &server.url()).await;
        let second = client.generate(&request, &server.url()).await;

        assert_eq!(first, second);
        assert_eq!(first.status, ItineraryStatus::Ok);
        probe.assert_async().await;
        generate.assert_async().await;
    }

    #[tokio::test]
    async fn check_endpoint_reflects_probe() {
        let mut server = mockito::Server::new_async().await;
        let _probe = mock_probe(&mut server, 200).await;
        assert!(client().check_endpoint(&server.url()).await);
        assert!(!client().check_endpoint("http://127.0.0.1:1").await);
    }
}
