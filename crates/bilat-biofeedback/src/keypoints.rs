//! 키포인트 부분집합 및 이동량 계측.
//!
//! 전체 랜드마크 중 해부학적으로 의미 있는 고정 인덱스만 사용한다:
//! 코끝, 양눈 바깥 모서리, 입꼬리 양쪽, 턱 (face-mesh 인덱스 체계).

use bilat_core::models::landmark::Point3;

/// 추적 대상 키포인트 인덱스 (face-mesh)
pub const KEYPOINT_INDICES: [usize; 6] = [
    1,   // 코끝
    33,  // 왼눈 바깥 모서리
    61,  // 입꼬리 왼쪽
    199, // 턱
    263, // 오른눈 바깥 모서리
    291, // 입꼬리 오른쪽
];

/// 두 프레임 간 평균 키포인트 이동량 (정규화 3D 유클리드 거리)
///
/// 두 프레임 모두에 존재하는 인덱스만 집계한다.
/// 집계 가능한 키포인트가 하나도 없으면 `None`.
pub fn average_movement(prev: &[Point3], curr: &[Point3]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &idx in &KEYPOINT_INDICES {
        if let (Some(p), Some(c)) = (prev.get(idx), curr.get(idx)) {
            sum += p.distance(c);
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 키포인트 인덱스까지 채워진 프레임 생성
    pub fn frame_with_offset(offset: f64) -> Vec<Point3> {
        let size = KEYPOINT_INDICES.iter().max().unwrap() + 1;
        (0..size)
            .map(|i| Point3::new(i as f64 * 0.001 + offset, 0.5, 0.0))
            .collect()
    }

    #[test]
    fn zero_delta_gives_zero_movement() {
        let frame = frame_with_offset(0.0);
        assert_eq!(average_movement(&frame, &frame), Some(0.0));
    }

    #[test]
    fn uniform_shift_measured_exactly() {
        let prev = frame_with_offset(0.0);
        let curr = frame_with_offset(0.003);
        let avg = average_movement(&prev, &curr).unwrap();
        assert!((avg - 0.003).abs() < 1e-12);
    }

    #[test]
    fn short_frame_yields_none() {
        let prev = frame_with_offset(0.0);
        let curr = vec![Point3::default(); 1]; // 인덱스 부족
        assert!(average_movement(&prev, &curr).is_none());
    }
}
