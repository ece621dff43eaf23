//! 프리셋 스냅샷 및 파일 저장소.
//!
//! 플랫폼 설정 디렉토리의 JSON 파일 하나에 이름 → 프리셋 맵을 저장한다.
//!
//! 필터링 불변식: 프리셋은 연결 자격증명(`connection`)과 휘발성
//! `is_playing`을 절대 포함하지 않는다. `from_settings`가 생성 단계에서
//! 이를 구조적으로 보장한다.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::models::settings::{SettingsModel, StimulusPattern};
use crate::ports::preset_store::PresetStore;

/// 프리셋 파일 이름
const PRESET_FILE_NAME: &str = "presets.json";

/// 이름 붙은 설정 스냅샷
///
/// `SettingsModel`에서 자격증명과 재생 상태를 제외한 필드만 복사된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPreset {
    pub speed: u8,
    pub size: f64,
    pub pattern: StimulusPattern,
    pub color: String,
    pub background_color: String,
    pub sound_enabled: bool,
    pub sound_volume: f64,
    pub therapist_vibration_enabled: bool,
    pub client_vibration_enabled: bool,
    pub duration_seconds: u32,
    pub target_passes: u32,
    pub freeze_sensitivity: u8,
}

impl SettingsPreset {
    /// 설정에서 프리셋 생성 — 자격증명과 `is_playing`은 구조적으로 제외
    pub fn from_settings(settings: &SettingsModel) -> Self {
        Self {
            speed: settings.speed,
            size: settings.size,
            pattern: settings.pattern,
            color: settings.color.clone(),
            background_color: settings.background_color.clone(),
            sound_enabled: settings.sound_enabled,
            sound_volume: settings.sound_volume,
            therapist_vibration_enabled: settings.therapist_vibration_enabled,
            client_vibration_enabled: settings.client_vibration_enabled,
            duration_seconds: settings.duration_seconds,
            target_passes: settings.target_passes,
            freeze_sensitivity: settings.freeze_sensitivity,
        }
    }

    /// 프리셋을 기존 설정에 적용
    ///
    /// `is_playing`과 `connection`은 건드리지 않는다.
    pub fn apply_to(&self, settings: &mut SettingsModel) {
        settings.speed = self.speed;
        settings.size = self.size;
        settings.pattern = self.pattern;
        settings.color = self.color.clone();
        settings.background_color = self.background_color.clone();
        settings.sound_enabled = self.sound_enabled;
        settings.sound_volume = self.sound_volume;
        settings.therapist_vibration_enabled = self.therapist_vibration_enabled;
        settings.client_vibration_enabled = self.client_vibration_enabled;
        settings.duration_seconds = self.duration_seconds;
        settings.target_passes = self.target_passes;
        settings.freeze_sensitivity = self.freeze_sensitivity;
        settings.normalize();
    }
}

/// JSON 파일 기반 프리셋 저장소
#[derive(Debug, Clone)]
pub struct FilePresetStore {
    /// 메모리 캐시 (스레드 안전)
    presets: Arc<RwLock<BTreeMap<String, SettingsPreset>>>,
    /// 프리셋 파일 경로
    path: PathBuf,
}

impl FilePresetStore {
    /// 지정된 디렉토리에 저장소 생성 및 기존 파일 로드
    pub fn with_dir(dir: PathBuf) -> Result<Self, CoreError> {
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                CoreError::Config(format!("프리셋 디렉토리 생성 실패: {}: {}", dir.display(), e))
            })?;
            info!("프리셋 디렉토리 생성: {}", dir.display());
        }
        let path = dir.join(PRESET_FILE_NAME);

        let presets = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            presets: Arc::new(RwLock::new(presets)),
            path,
        })
    }

    /// 현재 맵 전체를 파일로 저장
    fn persist(&self) -> Result<(), CoreError> {
        let presets = self.presets.read();
        let json = serde_json::to_string_pretty(&*presets)?;
        fs::write(&self.path, json)?;
        debug!("프리셋 저장: {} ({}개)", self.path.display(), presets.len());
        Ok(())
    }
}

#[async_trait]
impl PresetStore for FilePresetStore {
    async fn save(&self, name: &str, preset: &SettingsPreset) -> Result<(), CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "name".to_string(),
                message: "프리셋 이름이 비어 있음".to_string(),
            });
        }
        self.presets
            .write()
            .insert(name.to_string(), preset.clone());
        self.persist()
    }

    async fn load(&self, name: &str) -> Result<SettingsPreset, CoreError> {
        self.presets
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                resource_type: "Preset".to_string(),
                id: name.to_string(),
            })
    }

    async fn list(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.presets.read().keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<(), CoreError> {
        let removed = self.presets.write().remove(name);
        if removed.is_none() {
            return Err(CoreError::NotFound {
                resource_type: "Preset".to_string(),
                id: name.to_string(),
            });
        }
        self.persist()
    }
}
