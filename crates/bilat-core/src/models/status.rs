//! 내담자 상태 모델.
//!
//! 내담자(Client)가 소유하고 치료사에게 보고하는 휘발성 레코드.
//! 보고마다 전체 교체되며 병합되지 않는다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 내담자 바이오피드백 상태
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStatus {
    /// 카메라/랜드마크 추적 활성 여부
    pub is_camera_active: bool,
    /// 정지(freeze) 판정 여부
    pub is_frozen: bool,
    /// 움직임 점수 [0, 100]
    pub motion_score: f64,
    /// 마지막 갱신 시각
    pub last_update: DateTime<Utc>,
}

impl ClientStatus {
    /// 카메라 비활성 상태 레코드 생성
    ///
    /// 센서 불가 시의 "평가 불능" 상태. 에러가 아니라 저하된 정상 상태다.
    pub fn camera_inactive() -> Self {
        Self {
            is_camera_active: false,
            is_frozen: false,
            motion_score: 0.0,
            last_update: Utc::now(),
        }
    }
}
