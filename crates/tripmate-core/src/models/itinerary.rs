//! 일정 생성 결과 모델.

use serde::{Deserialize, Serialize};

/// 일정 생성 결과 상태
///
/// 성공/실패 판별은 항상 이 값으로 한다. 본문 텍스트를 검사하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItineraryStatus {
    /// 생성 성공
    Ok,
    /// 생성 엔드포인트 도달 불가 (프로브 실패 또는 연결 실패)
    EndpointUnreachable,
    /// 생성 요청 타임아웃
    Timeout,
    /// 생성 엔드포인트가 비성공 상태 코드 반환
    UpstreamError {
        /// HTTP 상태 코드
        code: u16,
    },
    /// 성공 응답이지만 생성 텍스트 없음
    Empty,
}

impl ItineraryStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ItineraryStatus::Ok)
    }
}

impl std::fmt::Display for ItineraryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItineraryStatus::Ok => write!(f, "Ok"),
            ItineraryStatus::EndpointUnreachable => write!(f, "EndpointUnreachable"),
            ItineraryStatus::Timeout => write!(f, "Timeout"),
            ItineraryStatus::UpstreamError { code } => write!(f, "UpstreamError({code})"),
            ItineraryStatus::Empty => write!(f, "Empty"),
        }
    }
}

/// 일정 생성 결과
///
/// `status`가 `Ok`가 아니면 `raw_text`는 항상 비어 있고 `message`에 사용자 표시 문구가 담긴다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryResult {
    /// 결과 상태
    pub status: ItineraryStatus,
    /// 생성된 일정 본문 (`Ok`일 때만 채워짐)
    pub raw_text: String,
    /// 화면 표시용 메시지
    pub message: String,
}

impl ItineraryResult {
    /// 성공 결과
    pub fn ok(raw_text: impl Into<String>) -> Self {
        Self {
            status: ItineraryStatus::Ok,
            raw_text: raw_text.into(),
            message: "Itinerary generated.".to_string(),
        }
    }

    /// 실패 결과: 본문 없이 상태와 메시지만 가진다
    pub fn failure(status: ItineraryStatus, message: impl Into<String>) -> Self {
        debug_assert!(!status.is_ok());
        Self {
            status,
            raw_text: String::new(),
            message: message.into(),
        }
    }

    /// 성공한 일정으로 저장해도 되는지 여부
    pub fn is_persistable(&self) -> bool {
        self.status.is_ok() && !self.raw_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ok_is_persistable() {
        assert!(ItineraryResult::ok("**Day 1:** ...").is_persistable());
        assert!(!ItineraryResult::failure(ItineraryStatus::Timeout, "timeout").is_persistable());
        assert!(
            !ItineraryResult::failure(ItineraryStatus::UpstreamError { code: 500 }, "500")
                .is_persistable()
        );
        assert!(!ItineraryResult::failure(ItineraryStatus::Empty, "empty").is_persistable());
    }

    #[test]
    fn failure_never_carries_text() {
        let result = ItineraryResult::failure(ItineraryStatus::EndpointUnreachable, "down");
        assert!(result.raw_text.is_empty());
        assert_eq!(result.message, "down");
    }

    #[test]
    fn status_serializes_tagged() {
        let json = serde_json::to_value(ItineraryStatus::UpstreamError { code: 502 }).unwrap();
        assert_eq!(json["kind"], "upstream_error");
        assert_eq!(json["code"], 502);

        let json = serde_json::to_value(ItineraryStatus::EndpointUnreachable).unwrap();
        assert_eq!(json["kind"], "endpoint_unreachable");
    }

    #[test]
    fn status_display() {
        assert_eq!(
            ItineraryStatus::UpstreamError { code: 500 }.to_string(),
            "UpstreamError(500)"
        );
    }
}
