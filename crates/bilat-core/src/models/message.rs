//! 세션 와이어 메시지.
//!
//! 역할 간 브로드캐스트 토픽으로 오가는 판별 유니온. 영속화되지 않는다.
//!
//! 발신 역할 불변식:
//! - `SYNC_SETTINGS`는 치료사 프로세스만 발행
//! - `REQUEST_SYNC` / `CLIENT_STATUS`는 내담자 프로세스만 발행
//!
//! 역할 핸들(`bilat-session`)이 API 수준에서 이를 강제한다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::settings::SettingsPatch;
use super::status::ClientStatus;

/// 세션 메시지 — 판별 유니온
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum SessionMessage {
    /// 설정 스냅샷 복제 (치료사 → 내담자)
    SyncSettings {
        /// 전체 또는 부분 스냅샷 — 수신 측이 키 단위 병합
        payload: SettingsPatch,
        /// 발신 시각
        sent_at: DateTime<Utc>,
    },
    /// 재동기화 요청 (내담자 → 치료사, 마운트 시 1회)
    RequestSync {
        /// 발신 시각
        sent_at: DateTime<Utc>,
    },
    /// 바이오피드백 상태 보고 (내담자 → 치료사)
    ClientStatus {
        /// 상태 레코드 (전체 교체, last-write-wins)
        status: ClientStatus,
        /// 발신 시각
        sent_at: DateTime<Utc>,
    },
}

impl SessionMessage {
    /// 발신 시각 조회
    pub fn sent_at(&self) -> DateTime<Utc> {
        match self {
            Self::SyncSettings { sent_at, .. }
            | Self::RequestSync { sent_at }
            | Self::ClientStatus { sent_at, .. } => *sent_at,
        }
    }
}
