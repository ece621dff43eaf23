//! 프리셋 저장소 포트.
//!
//! 이름 붙은 설정 스냅샷의 키-값 저장.
//! 구현: `bilat-core::preset::FilePresetStore` (JSON 파일).

use async_trait::async_trait;

use crate::error::CoreError;
use crate::preset::SettingsPreset;

/// 프리셋 저장소 인터페이스
///
/// 저장 대상은 반드시 `SettingsPreset` — 연결 자격증명과 휘발성
/// `is_playing`이 제거된 스냅샷이다 (필터링 불변식).
#[async_trait]
pub trait PresetStore: Send + Sync {
    /// 이름으로 프리셋 저장 (동명 프리셋은 덮어쓴다)
    async fn save(&self, name: &str, preset: &SettingsPreset) -> Result<(), CoreError>;

    /// 이름으로 프리셋 로드
    async fn load(&self, name: &str) -> Result<SettingsPreset, CoreError>;

    /// 저장된 프리셋 이름 목록
    async fn list(&self) -> Result<Vec<String>, CoreError>;

    /// 프리셋 삭제
    async fn delete(&self, name: &str) -> Result<(), CoreError>;
}
