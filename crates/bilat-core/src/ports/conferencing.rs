//! 화상회의 레이어 포트.
//!
//! 코어 밖 협력자 — 여기서는 인터페이스만 규정한다.
//! 연결 실패는 사용자 노출용 에러 문자열(`CoreError::Connect`)로 보고되며
//! 세션 채널과 자극 엔진은 로컬 전용으로 계속 동작한다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::settings::ConnectionParams;

/// 원격 연결 품질
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionQuality {
    Good,
    Degraded,
    Lost,
}

/// 화상회의 협력자 인터페이스
#[async_trait]
pub trait Conferencing: Send + Sync {
    /// 서버 접속 및 로컬 오디오/비디오 발행
    async fn connect(&self, params: &ConnectionParams) -> Result<(), CoreError>;

    /// 원격 트랙 구독
    async fn subscribe_remote(&self) -> Result<(), CoreError>;

    /// 현재 연결 품질 보고
    async fn connection_quality(&self) -> Result<ConnectionQuality, CoreError>;

    /// 연결 해제
    async fn disconnect(&self) -> Result<(), CoreError>;
}
