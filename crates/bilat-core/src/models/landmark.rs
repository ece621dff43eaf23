//! 랜드마크 샘플 모델.
//!
//! 외부 랜드마크 검출 레이어가 프레임마다 공급하는 정규화 3D 키포인트.

use serde::{Deserialize, Serialize};

/// 정규화 3D 좌표 (각 축 대략 [0, 1], z는 상대 깊이)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 3D 유클리드 거리
    pub fn distance(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// 프레임당 랜드마크 샘플
///
/// `keypoints`가 `None`이면 해당 프레임에서 피사체 미검출.
#[derive(Debug, Clone, Default)]
pub struct LandmarkFrame {
    /// 검출된 키포인트 집합 (검출 실패 시 None)
    pub keypoints: Option<Vec<Point3>>,
}

impl LandmarkFrame {
    /// 피사체 미검출 프레임
    pub fn empty() -> Self {
        Self { keypoints: None }
    }

    /// 검출 프레임 생성
    pub fn detected(keypoints: Vec<Point3>) -> Self {
        Self {
            keypoints: Some(keypoints),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 0.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn empty_frame_has_no_keypoints() {
        assert!(LandmarkFrame::empty().keypoints.is_none());
    }
}
