//! 랜드마크 소스 포트.
//!
//! 외부 검출 레이어(화상회의 카메라 트랙 기반)가 프레임마다
//! 0개 또는 1개의 정규화 3D 키포인트 집합을 공급한다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::landmark::LandmarkFrame;

/// 랜드마크 샘플 스트림 인터페이스
#[async_trait]
pub trait LandmarkSource: Send + Sync {
    /// 다음 샘플 프레임 대기
    ///
    /// 피사체 미검출은 `LandmarkFrame::empty()`로 정상 반환된다.
    /// `Err(SensorUnavailable)`은 센서 자체의 실패(권한 거부 등)를 뜻한다.
    async fn next_frame(&self) -> Result<LandmarkFrame, CoreError>;
}
