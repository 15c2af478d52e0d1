//! # tripmate-storage
//!
//! 로컬 저장소 어댑터.
//! SQLite 기반 사용자별 일정 이력 저장과 스키마 마이그레이션을 담당한다.
//!
//! ## 모듈
//! - `sqlite`: 일정 이력 저장소 (HistoryStore 구현)
//! - `migration`: 스키마 마이그레이션

pub mod migration;
pub mod sqlite;
