//! 자극 설정 모델.
//!
//! 치료사(Therapist) 프로세스가 단독 소유하는 권위 상태.
//! 내담자(Client) 프로세스는 복제본만 보유하며 절대 권위를 갖지 않는다.

use serde::{Deserialize, Serialize};

/// 속도 범위
pub const SPEED_MIN: u8 = 1;
pub const SPEED_MAX: u8 = 100;

/// 자극 크기 범위 (뷰포트 단위)
pub const SIZE_MIN: f64 = 10.0;
pub const SIZE_MAX: f64 = 200.0;

/// 양측성 자극 이동 패턴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StimulusPattern {
    /// 수평 왕복
    #[default]
    Linear,
    /// 수평 왕복 + 2배 주파수 상하 보조 운동
    Sine,
    /// 8자 곡선 (리사주 1:2)
    FigureEight,
    /// 수직 왕복
    Vertical,
    /// 이산 좌/우 점멸 (보간 없음)
    Alternated,
    /// 고정 비정수비 리사주 (1:1.3) — 결정론적 의사 랜덤
    Random,
}

/// 외부 화상회의 레이어 연결 파라미터
///
/// 코어는 이 값을 운반만 하고 해석하지 않는다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParams {
    /// 회의 서버 URL
    #[serde(default)]
    pub server_url: String,
    /// 치료사 역할 토큰
    #[serde(default)]
    pub therapist_token: String,
    /// 내담자 역할 토큰
    #[serde(default)]
    pub client_token: String,
}

/// 자극 설정 전체
///
/// 종료 모드 불변식: `duration_seconds`와 `target_passes`는 동시에
/// 0이 아닐 수 없다 (수동 / 타이머 / 왕복 횟수는 상호 배타).
/// 전용 setter가 이를 강제한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsModel {
    /// 자극 재생 중 여부
    pub is_playing: bool,
    /// 이동 속도 [1, 100]
    pub speed: u8,
    /// 자극 크기 [10, 200]
    pub size: f64,
    /// 이동 패턴
    pub pattern: StimulusPattern,
    /// 자극 색상 (hex 문자열, 코어는 해석하지 않음)
    pub color: String,
    /// 배경 색상 (hex 문자열)
    pub background_color: String,
    /// 사운드 큐 활성화 여부
    pub sound_enabled: bool,
    /// 사운드 볼륨 [0, 1]
    pub sound_volume: f64,
    /// 치료사 측 진동 활성화 (역할별 로컬 평가)
    pub therapist_vibration_enabled: bool,
    /// 내담자 측 진동 활성화 (역할별 로컬 평가)
    pub client_vibration_enabled: bool,
    /// 세션 지속 시간 (초, 0 = 무제한)
    pub duration_seconds: u32,
    /// 목표 왕복 횟수 (0 = 미사용)
    pub target_passes: u32,
    /// 정지 감지 민감도 [0, 100]
    pub freeze_sensitivity: u8,
    /// 화상회의 연결 파라미터 (운반만)
    #[serde(default)]
    pub connection: ConnectionParams,
}

impl Default for SettingsModel {
    fn default() -> Self {
        Self {
            is_playing: false,
            speed: 50,
            size: 60.0,
            pattern: StimulusPattern::Linear,
            color: "#3b82f6".to_string(),
            background_color: "#111827".to_string(),
            sound_enabled: true,
            sound_volume: 0.5,
            therapist_vibration_enabled: true,
            client_vibration_enabled: true,
            duration_seconds: 0,
            target_passes: 0,
            freeze_sensitivity: 50,
            connection: ConnectionParams::default(),
        }
    }
}

impl SettingsModel {
    /// 수치 필드를 유효 범위로 재클램핑
    pub fn normalize(&mut self) {
        self.speed = self.speed.clamp(SPEED_MIN, SPEED_MAX);
        self.size = self.size.clamp(SIZE_MIN, SIZE_MAX);
        self.sound_volume = self.sound_volume.clamp(0.0, 1.0);
        self.freeze_sensitivity = self.freeze_sensitivity.min(100);
    }

    /// 지속 시간 설정 (초)
    ///
    /// 0이 아니면 `target_passes`를 0으로 강제한다.
    pub fn set_duration_seconds(&mut self, secs: u32) {
        self.duration_seconds = secs;
        if secs > 0 {
            self.target_passes = 0;
        }
    }

    /// 목표 왕복 횟수 설정
    ///
    /// 0이 아니면 `duration_seconds`를 0으로 강제한다.
    pub fn set_target_passes(&mut self, passes: u32) {
        self.target_passes = passes;
        if passes > 0 {
            self.duration_seconds = 0;
        }
    }

    /// 부분 스냅샷을 키 단위 얕은 병합
    ///
    /// 패치에 없는 필드는 기존 값을 유지한다. 병합 후 재클램핑 및
    /// 종료 모드 불변식 복원을 수행한다.
    pub fn apply_patch(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.is_playing {
            self.is_playing = v;
        }
        if let Some(v) = patch.speed {
            self.speed = v;
        }
        if let Some(v) = patch.size {
            self.size = v;
        }
        if let Some(v) = patch.pattern {
            self.pattern = v;
        }
        if let Some(v) = &patch.color {
            self.color = v.clone();
        }
        if let Some(v) = &patch.background_color {
            self.background_color = v.clone();
        }
        if let Some(v) = patch.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = patch.sound_volume {
            self.sound_volume = v;
        }
        if let Some(v) = patch.therapist_vibration_enabled {
            self.therapist_vibration_enabled = v;
        }
        if let Some(v) = patch.client_vibration_enabled {
            self.client_vibration_enabled = v;
        }
        if let Some(v) = patch.duration_seconds {
            self.set_duration_seconds(v);
        }
        if let Some(v) = patch.target_passes {
            self.set_target_passes(v);
        }
        if let Some(v) = patch.freeze_sensitivity {
            self.freeze_sensitivity = v;
        }
        if let Some(v) = &patch.connection {
            self.connection = v.clone();
        }
        self.normalize();
    }
}

/// 설정 부분 스냅샷 — 복제 와이어 페이로드
///
/// 모든 필드가 `Option`이며 `None`은 "변경 없음"을 뜻한다.
/// 치료사는 항상 전체 스냅샷(모든 필드 `Some`)을 발행하지만,
/// 수신 측 병합은 부분 페이로드도 관용적으로 처리한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_playing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<StimulusPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub therapist_vibration_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_vibration_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_passes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeze_sensitivity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionParams>,
}

impl From<&SettingsModel> for SettingsPatch {
    /// 전체 스냅샷 패치 생성
    fn from(m: &SettingsModel) -> Self {
        Self {
            is_playing: Some(m.is_playing),
            speed: Some(m.speed),
            size: Some(m.size),
            pattern: Some(m.pattern),
            color: Some(m.color.clone()),
            background_color: Some(m.background_color.clone()),
            sound_enabled: Some(m.sound_enabled),
            sound_volume: Some(m.sound_volume),
            therapist_vibration_enabled: Some(m.therapist_vibration_enabled),
            client_vibration_enabled: Some(m.client_vibration_enabled),
            duration_seconds: Some(m.duration_seconds),
            target_passes: Some(m.target_passes),
            freeze_sensitivity: Some(m.freeze_sensitivity),
            connection: Some(m.connection.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = SettingsModel::default();
        assert!(!s.is_playing);
        assert_eq!(s.speed, 50);
        assert_eq!(s.pattern, StimulusPattern::Linear);
        assert_eq!(s.duration_seconds, 0);
        assert_eq!(s.target_passes, 0);
        assert_eq!(s.freeze_sensitivity, 50);
    }

    #[test]
    fn termination_modes_mutually_exclusive() {
        let mut s = SettingsModel::default();

        s.set_target_passes(24);
        assert_eq!(s.target_passes, 24);
        assert_eq!(s.duration_seconds, 0);

        s.set_duration_seconds(300);
        assert_eq!(s.duration_seconds, 300);
        assert_eq!(s.target_passes, 0);

        // 둘 다 0은 유효한 "수동" 상태
        s.set_duration_seconds(0);
        assert_eq!(s.duration_seconds, 0);
        assert_eq!(s.target_passes, 0);
    }

    #[test]
    fn patch_merge_preserves_absent_fields() {
        let mut s = SettingsModel::default();
        s.speed = 80;
        s.color = "#ff0000".to_string();

        let patch = SettingsPatch {
            size: Some(120.0),
            ..Default::default()
        };
        s.apply_patch(&patch);

        assert_eq!(s.size, 120.0);
        assert_eq!(s.speed, 80);
        assert_eq!(s.color, "#ff0000");
    }

    #[test]
    fn patch_merge_reclamps() {
        let mut s = SettingsModel::default();
        let patch = SettingsPatch {
            speed: Some(0),
            size: Some(999.0),
            sound_volume: Some(3.0),
            ..Default::default()
        };
        s.apply_patch(&patch);
        assert_eq!(s.speed, SPEED_MIN);
        assert_eq!(s.size, SIZE_MAX);
        assert_eq!(s.sound_volume, 1.0);
    }

    #[test]
    fn patch_merge_restores_termination_invariant() {
        let mut s = SettingsModel::default();
        s.set_duration_seconds(600);

        let patch = SettingsPatch {
            target_passes: Some(24),
            ..Default::default()
        };
        s.apply_patch(&patch);
        assert_eq!(s.target_passes, 24);
        assert_eq!(s.duration_seconds, 0);
    }

    #[test]
    fn pattern_wire_format() {
        let json = serde_json::to_string(&StimulusPattern::FigureEight).unwrap();
        assert_eq!(json, "\"FIGURE_EIGHT\"");
        let back: StimulusPattern = serde_json::from_str("\"RANDOM\"").unwrap();
        assert_eq!(back, StimulusPattern::Random);
    }

    #[test]
    fn full_snapshot_round_trip() {
        let mut s = SettingsModel::default();
        s.pattern = StimulusPattern::FigureEight;
        s.speed = 30;

        let patch = SettingsPatch::from(&s);
        let json = serde_json::to_string(&patch).unwrap();
        let back: SettingsPatch = serde_json::from_str(&json).unwrap();

        let mut replica = SettingsModel::default();
        replica.apply_patch(&back);
        assert_eq!(replica, s);
    }
}
