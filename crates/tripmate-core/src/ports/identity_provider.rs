//! 신원 제공자 포트.
//!
//! 구현: `tripmate-network` crate (`IdentityToolkitClient`)

use async_trait::async_trait;

use crate::error::IdentityError;
use crate::models::session::AuthenticatedUser;

/// 이메일/비밀번호 신원 제공자
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 가입: 성공 시 바로 로그인된 사용자 반환
    async fn sign_up(&self, email: &str, password: &str)
        -> Result<AuthenticatedUser, IdentityError>;

    /// 비밀번호 로그인
    async fn sign_in(&self, email: &str, password: &str)
        -> Result<AuthenticatedUser, IdentityError>;

    /// 비밀번호 재설정 메일 발송
    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError>;
}
