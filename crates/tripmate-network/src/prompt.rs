//! 일정 생성 프롬프트 템플릿과 응답 후처리.
//!
//! 기간(`date_spec`)은 자유 형식 텍스트라 파싱하지 않는다.
//! 대신 템플릿에서 요청한 기간과 정확히 맞추라고 생성기에 명시한다.

use tripmate_core::models::trip::TripRequest;

/// 응답 앞부분 잡담을 잘라낼 때 찾는 첫째 날 표식
const DAY_ONE_MARKERS: [&str; 3] = ["Day 1", "DAY 1", "Ngày 1"];

/// 여행 요청 → 프롬프트 (결정적)
pub fn build_itinerary_prompt(request: &TripRequest, language: &str) -> String {
    let destination = request.destination();
    let dates = request.date_spec();

    let route = if request.origin().is_empty() {
        format!("to {destination}")
    } else {
        format!("from {} to {destination}", request.origin())
    };

    format!(
        r#"Create a detailed travel itinerary {route} for EXACTLY {dates}.

**IMPORTANT: The itinerary MUST match the requested duration "{dates}".**

INTERESTS: {interests}
PACE: {pace}

REQUIREMENTS:
1. Split the plan day by day (Morning/Afternoon/Evening) based on "{dates}"
2. Suggest specific places in {destination}
3. Add practical tips (ticket prices, opening times, things to watch out for)
4. Write in {language}
5. **If the duration is a custom phrase (for example "5 days 4 nights" or "1 week"), plan for EXACTLY that duration**

FORMAT EXAMPLE:
**Day 1:**
- **Morning (7:00-11:00):** Visit [Place]. Tip: ...
- **Afternoon (14:00-18:00):** ...
- **Evening (19:00-22:00):** ...

Create the itinerary for "{dates}" now:"#,
        interests = request.interest_phrase(),
        pace = request.pace().label(),
    )
}

/// 생성 텍스트 정리
///
/// 앞뒤 공백을 없애고, 첫째 날 표식 앞에 잡담이 있으면 표식이 있는 줄부터 남긴다.
pub fn trim_to_first_day(text: &str) -> &str {
    let text = text.trim();

    let Some(marker_at) = DAY_ONE_MARKERS
        .iter()
        .filter_map(|marker| text.find(marker))
        .min()
    else {
        return text;
    };

    let line_start = text[..marker_at].rfind('\n').map_or(0, |i| i + 1);
    &text[line_start..]
}
