//! 자극 큐 출력 포트.
//!
//! 자극 엔진이 반환점마다 호출하는 능력(capability) 인터페이스.
//! 구현: `bilat-stimulus`의 no-op/로깅 싱크, 상위 레이어의 오디오/게임패드 어댑터.
//! 헤드리스 테스트에서 교체 가능해야 한다.

use async_trait::async_trait;

use crate::error::CoreError;

/// 큐 발생 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueSide {
    /// 좌측 — 사인파 저점(상향 영점 교차)
    Left,
    /// 우측 — 사인파 정점(하향 영점 교차)
    Right,
}

impl CueSide {
    /// 반대 방향
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// 사운드 큐 출력 인터페이스
#[async_trait]
pub trait ToneSink: Send + Sync {
    /// 짧은 엔벨로프 톤 재생 — `side` 방향으로 하드 패닝, `volume` [0,1] 스케일
    async fn play_tone(&self, side: CueSide, volume: f64) -> Result<(), CoreError>;
}

/// 햅틱(진동) 큐 출력 인터페이스
///
/// 듀얼 채널 가중치 모델: 좌/우 큐에서 서로 반대 채널이 포화된다.
#[async_trait]
pub trait HapticsSink: Send + Sync {
    /// 진동 펄스 구동 — `strong`/`weak` 채널 세기 [0,1], 지속 시간 밀리초
    async fn pulse(&self, strong: f64, weak: f64, duration_ms: u64) -> Result<(), CoreError>;
}
