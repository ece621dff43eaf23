//! 큐 싱크 구현.
//!
//! 오디오/게임패드 하드웨어 어댑터는 상위 레이어가 제공한다.
//! 여기서는 헤드리스 구동용 no-op 싱크와 진단용 로깅 싱크만 둔다.

use async_trait::async_trait;
use tracing::info;

use bilat_core::error::CoreError;
use bilat_core::ports::cue_sink::{CueSide, HapticsSink, ToneSink};

/// 아무것도 하지 않는 톤 싱크
#[derive(Debug, Default, Clone, Copy)]
pub struct NullToneSink;

#[async_trait]
impl ToneSink for NullToneSink {
    async fn play_tone(&self, _side: CueSide, _volume: f64) -> Result<(), CoreError> {
        Ok(())
    }
}

/// 아무것도 하지 않는 햅틱 싱크
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHapticsSink;

#[async_trait]
impl HapticsSink for NullHapticsSink {
    async fn pulse(&self, _strong: f64, _weak: f64, _duration_ms: u64) -> Result<(), CoreError> {
        Ok(())
    }
}

/// 큐를 로그로만 출력하는 톤 싱크 (진단용)
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingToneSink;

#[async_trait]
impl ToneSink for TracingToneSink {
    async fn play_tone(&self, side: CueSide, volume: f64) -> Result<(), CoreError> {
        info!("톤 큐: {side:?} 볼륨 {volume:.2}");
        Ok(())
    }
}

/// 펄스를 로그로만 출력하는 햅틱 싱크 (진단용)
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHapticsSink;

#[async_trait]
impl HapticsSink for TracingHapticsSink {
    async fn pulse(&self, strong: f64, weak: f64, duration_ms: u64) -> Result<(), CoreError> {
        info!("햅틱 펄스: strong={strong:.1} weak={weak:.1} {duration_ms}ms");
        Ok(())
    }
}
