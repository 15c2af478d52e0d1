//! 여행 요청 모델.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 관심사가 비어 있을 때 프롬프트에 쓰는 기본 문구
pub const DEFAULT_INTEREST_PHRASE: &str = "general sightseeing";

/// UI가 제안하는 관심사 목록
pub const SUGGESTED_INTERESTS: [&str; 6] = [
    "Food",
    "Museums & Culture",
    "Nature",
    "Nightlife",
    "Shopping",
    "Adventure",
];

/// 여행 속도
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    /// 여유롭게
    Relaxed,
    /// 보통
    #[default]
    Normal,
    /// 빡빡하게
    Tight,
}

impl Pace {
    /// 모든 속도 (UI 선택지 순서)
    pub const ALL: [Pace; 3] = [Pace::Relaxed, Pace::Normal, Pace::Tight];

    /// 프롬프트/화면용 라벨
    pub fn label(&self) -> &'static str {
        match self {
            Pace::Relaxed => "Relaxed",
            Pace::Normal => "Normal",
            Pace::Tight => "Tight",
        }
    }
}

impl std::fmt::Display for Pace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 사용자가 제출한 여행 요청
///
/// 제출 시점마다 새로 만들어지며 이후 변경되지 않는다.
/// 필드는 공개하지 않고 [`TripRequest::new`]를 통해서만 생성한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripRequest {
    origin: String,
    destination: String,
    date_spec: String,
    interests: Vec<String>,
    pace: Pace,
}

impl TripRequest {
    /// 새 여행 요청 생성
    ///
    /// 앞뒤 공백을 제거하고, 관심사는 처음 등장한 순서를 유지하며 중복을 없앤다.
    /// 목적지가 비어 있으면 `CoreError::Validation`.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        date_spec: impl Into<String>,
        interests: impl IntoIterator<Item = String>,
        pace: Pace,
    ) -> Result<Self, CoreError> {
        let destination = destination.into().trim().to_string();
        if destination.is_empty() {
            return Err(CoreError::Validation {
                field: "destination".to_string(),
                message: "목적지가 비어 있음".to_string(),
            });
        }

        let mut unique: Vec<String> = Vec::new();
        for interest in interests {
            let interest = interest.trim().to_string();
            if !interest.is_empty() && !unique.contains(&interest) {
                unique.push(interest);
            }
        }

        Ok(Self {
            origin: origin.into().trim().to_string(),
            destination,
            date_spec: date_spec.into().trim().to_string(),
            interests: unique,
            pace,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// 자유 형식 기간 ("3 ngày 2 đêm", "1 week" 등). 파싱하지 않는다.
    pub fn date_spec(&self) -> &str {
        &self.date_spec
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    /// 관심사를 쉼표로 이어 붙인 문자열 (비어 있으면 기본 문구)
    pub fn interest_phrase(&self) -> String {
        if self.interests.is_empty() {
            DEFAULT_INTEREST_PHRASE.to_string()
        } else {
            self.interests.join(", ")
        }
    }
}
