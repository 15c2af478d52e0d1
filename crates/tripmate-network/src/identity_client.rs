//! 신원 제공자 REST 클라이언트.
//!
//! Identity Toolkit 호환 REST API로 가입, 비밀번호 로그인, 비밀번호 재설정 메일을 처리한다.
//! 모든 요청은 `?key=<API 키>` 쿼리로 인증한다.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use tripmate_core::config::IdentityConfig;
use tripmate_core::error::{CoreError, IdentityError, MIN_PASSWORD_LEN};
use tripmate_core::models::session::AuthenticatedUser;
use tripmate_core::ports::identity_provider::IdentityProvider;

/// 가입/로그인 성공 응답
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

/// 에러 응답: `{"error": {"message": "EMAIL_EXISTS", ...}}`
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// 신원 제공자 클라이언트: `IdentityProvider` 포트 구현
pub struct IdentityToolkitClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityToolkitClient {
    /// 새 클라이언트 생성
    pub fn new(config: &IdentityConfig, api_key: impl Into<String>) -> Result<Self, CoreError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CoreError::Config(
                "신원 제공자 API 키 미설정. 설정 파일 또는 환경 변수로 지정하세요.".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// `accounts:<action>?key=...` URL
    fn action_url(&self, action: &str) -> Result<url::Url, IdentityError> {
        let mut url = url::Url::parse(&format!("{}/accounts:{action}", self.base_url))
            .map_err(|e| IdentityError::Transport(format!("잘못된 URL: {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// POST 후 성공 본문 반환, 실패는 `IdentityError`로 매핑
    async fn post(&self, action: &str, body: serde_json::Value) -> Result<String, IdentityError> {
        let url = self.action_url(action)?;

        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::map_transport_error(action, &e))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Self::map_transport_error(action, &e))?;

        if status.is_success() {
            return Ok(text);
        }

        let code = serde_json::from_str::<ErrorResponse>(&text)
            .map(|r| r.error.message)
            .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
        warn!(action, status = %status, code = %code, "신원 제공자 요청 거절");
        Err(IdentityError::from_code(&code))
    }

    fn map_transport_error(action: &str, error: &reqwest::Error) -> IdentityError {
        warn!(action, "신원 제공자 요청 실패: {error}");
        if error.is_timeout() {
            IdentityError::Timeout
        } else {
            IdentityError::Transport(error.to_string())
        }
    }

    /// 가입/로그인 공통 처리
    async fn account_request(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, IdentityError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let text = self.post(action, body).await?;
        let account: AccountResponse = serde_json::from_str(&text)
            .map_err(|e| IdentityError::Rejected(format!("응답 파싱 실패: {e}")))?;

        debug!(action, user_id = %account.local_id, "신원 확인 성공");
        Ok(AuthenticatedUser {
            user_id: account.local_id,
            email: account.email.unwrap_or_else(|| email.to_string()),
        })
    }
}

/// 이메일이 비어 있으면 요청 전에 거절
fn require_email(email: &str) -> Result<&str, IdentityError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(IdentityError::InvalidEmail);
    }
    Ok(email)
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, IdentityError> {
        let email = require_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword);
        }
        self.account_request("signUp", email, password).await
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, IdentityError> {
        let email = require_email(email)?;
        if password.is_empty() {
            return Err(IdentityError::InvalidCredentials);
        }
        self.account_request("signInWithPassword", email, password)
            .await
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        let email = require_email(email)?;
        let body = serde_json::json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });
        self.post("sendOobCode", body).await?;
        debug!("비밀번호 재설정 메일 발송 요청 완료");
        Ok(())
    }
}
