//! # bilat-biofeedback
//!
//! 움직임/정지 감지 엔진.
//!
//! 노이즈 섞인 랜드마크 샘플 스트림을 디바운스된 주의 신호
//! (`ClientStatus`)로 변환한다. 판정은 연속 카운터 기반 상태 머신,
//! 보고는 샘플 레이트와 무관한 쓰로틀을 거친다.

pub mod detector;
pub mod keypoints;
pub mod runner;

pub use detector::{freeze_threshold, FreezeDetector};
pub use runner::DetectorRunner;
