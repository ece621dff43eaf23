//! BILAT 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 실패를 `CoreError`로 래핑한다.
//! 코어에서 치명적 에러는 없다 — 모든 실패는 기능 저하로 수렴하며
//! 세션 자체를 종료시키지 않는다.

use thiserror::Error;

/// 코어 레이어 에러
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 화상회의 연결 실패 — 사용자에게 그대로 노출되는 메시지.
    /// 채널/자극 엔진은 영향 없이 로컬 전용으로 계속 동작한다.
    #[error("연결 실패: {0}")]
    Connect(String),

    /// 브로드캐스트 토픽 종료 후 송수신 시도
    #[error("채널 종료됨: {0}")]
    ChannelClosed(String),

    /// 센서(카메라/랜드마크) 사용 불가 — 상태 보고는 "비활성"으로 저하
    #[error("센서 사용 불가: {0}")]
    SensorUnavailable(String),

    /// 리소스를 찾을 수 없음
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "Preset")
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
