//! 세션 역할 및 복제 상태.

use serde::{Deserialize, Serialize};

/// 세션 참여 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionRole {
    /// 치료사 — 설정의 단독 권위 소유자
    Therapist,
    /// 내담자 — 설정 복제본 보유, 상태 보고 소유자
    Client,
}

/// 내담자 측 복제 상태 머신
///
/// `Disconnected → AwaitingSync → Synced`.
/// `Synced` 이후에는 되돌아가지 않고 모든 후속 갱신을 적용한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplicaState {
    /// 채널 미가입
    Disconnected,
    /// REQUEST_SYNC 발행 후 첫 스냅샷 대기 중
    AwaitingSync,
    /// 첫 SYNC_SETTINGS 수신 완료
    Synced,
}

/// 치료사 측 발행 상태 머신
///
/// `Idle → Active`. Active 동안에는 항상 REQUEST_SYNC에 응답한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishState {
    /// 아직 발행한 설정 없음
    Idle,
    /// 최소 1회 발행함
    Active,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_format() {
        assert_eq!(
            serde_json::to_string(&SessionRole::Therapist).unwrap(),
            "\"THERAPIST\""
        );
        assert_eq!(
            serde_json::to_string(&SessionRole::Client).unwrap(),
            "\"CLIENT\""
        );
    }
}
