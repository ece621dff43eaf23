//! 생성형 텍스트 포트.
//!
//! UI 레이어가 독립적으로 사용하는 요청/응답 텍스트 완성 호출.
//! 프롬프트 템플릿은 코어 범위 밖이다.

use async_trait::async_trait;

use crate::error::CoreError;

/// 텍스트 완성 인터페이스
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// 단일 요청/응답 완성 호출
    async fn complete(&self, prompt: &str) -> Result<String, CoreError>;
}
