//! 애플리케이션 설정 구조체.
//!
//! 채널 이름, 자극 틱 주기, 감지기 임계값 등 런타임 설정을 정의한다.
//! 모든 필드는 serde 기본값을 가지므로 부분 설정 파일도 로드 가능하다.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 세션 채널 설정
    #[serde(default)]
    pub channel: ChannelConfig,
    /// 자극 엔진 설정
    #[serde(default)]
    pub stimulus: StimulusConfig,
    /// 정지 감지기 설정
    #[serde(default)]
    pub detector: DetectorConfig,
}

impl AppConfig {
    /// 설정 파일 로드 — 파일이 없으면 기본값 반환
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            info!("설정 파일 없음, 기본값 사용: {}", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// 설정 파일 저장
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("설정 저장: {}", path.display());
        Ok(())
    }
}

// ============================================================
// 채널 설정
// ============================================================

/// 세션 채널 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// 브로드캐스트 토픽 이름
    #[serde(default = "default_topic_name")]
    pub topic_name: String,
    /// 토픽 버퍼 용량 (수신 지연 허용치)
    #[serde(default = "default_topic_capacity")]
    pub topic_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            topic_name: default_topic_name(),
            topic_capacity: default_topic_capacity(),
        }
    }
}

// ============================================================
// 자극 엔진 설정
// ============================================================

/// 자극 엔진 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StimulusConfig {
    /// 렌더 틱 주기 (밀리초)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// 햅틱 펄스 지속 시간 (밀리초)
    #[serde(default = "default_pulse_duration_ms")]
    pub pulse_duration_ms: u64,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            pulse_duration_ms: default_pulse_duration_ms(),
        }
    }
}

impl StimulusConfig {
    /// 렌더 틱 주기를 Duration으로 반환
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

// ============================================================
// 정지 감지기 설정
// ============================================================

/// 정지 감지기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// 피사체 미검출 연속 프레임 임계값
    #[serde(default = "default_low_confidence_frames")]
    pub low_confidence_frames: u32,
    /// 정지 판정 연속 프레임 임계값 (~1.5–2초 상당)
    #[serde(default = "default_stillness_frames")]
    pub stillness_frames: u32,
    /// 상태 보고 쓰로틀 (밀리초)
    #[serde(default = "default_report_throttle_ms")]
    pub report_throttle_ms: u64,
    /// 카메라 비활성 보고 쓰로틀 (밀리초)
    #[serde(default = "default_inactive_throttle_ms")]
    pub inactive_throttle_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            low_confidence_frames: default_low_confidence_frames(),
            stillness_frames: default_stillness_frames(),
            report_throttle_ms: default_report_throttle_ms(),
            inactive_throttle_ms: default_inactive_throttle_ms(),
        }
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_topic_name() -> String {
    "bilat-session".to_string()
}
fn default_topic_capacity() -> usize {
    64
}
fn default_tick_interval_ms() -> u64 {
    16 // ~60fps
}
fn default_pulse_duration_ms() -> u64 {
    120
}
fn default_low_confidence_frames() -> u32 {
    30
}
fn default_stillness_frames() -> u32 {
    45
}
fn default_report_throttle_ms() -> u64 {
    500
}
fn default_inactive_throttle_ms() -> u64 {
    1_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.channel.topic_name, "bilat-session");
        assert_eq!(config.stimulus.tick_interval_ms, 16);
        assert_eq!(config.detector.low_confidence_frames, 30);
        assert_eq!(config.detector.stillness_frames, 45);
        assert_eq!(config.detector.report_throttle_ms, 500);
    }

    #[test]
    fn partial_config_loads_with_defaults() {
        let json = r#"{"stimulus":{"tick_interval_ms":33}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.stimulus.tick_interval_ms, 33);
        assert_eq!(config.stimulus.pulse_duration_ms, 120);
        assert_eq!(config.detector.stillness_frames, 45);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.channel.topic_name, "bilat-session");
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.detector.stillness_frames = 60;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.detector.stillness_frames, 60);
        assert_eq!(loaded.stimulus.tick_interval_ms, 16);
    }
}
