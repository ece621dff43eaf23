//! 정지 감지 상태 머신.
//!
//! 프레임 단위 랜드마크 샘플 스트림을 "정지/활동"으로 분류한다.
//! 연속 카운터 기반 디바운싱으로 노이즈 한 프레임에 판정이 튀지 않고,
//! 외부 보고는 샘플 레이트와 무관하게 쓰로틀된다.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use bilat_core::config::DetectorConfig;
use bilat_core::models::landmark::{LandmarkFrame, Point3};
use bilat_core::models::status::ClientStatus;

use crate::keypoints::average_movement;

/// 이동량 → 점수 스케일 (정규화 공간 거리 × 10000)
const SCORE_SCALE: f64 = 10_000.0;

/// 민감도에서 정지 임계값 유도
///
/// `sensitivity ∈ [0,100]` → `[2.0, 17.0]`. 민감도가 높을수록
/// 더 큰 움직임도 "정지"로 분류된다.
pub fn freeze_threshold(sensitivity: u8) -> f64 {
    2.0 + (f64::from(sensitivity) / 100.0) * 15.0
}

/// 정지 감지기
#[derive(Debug)]
pub struct FreezeDetector {
    config: DetectorConfig,
    /// 직전 프레임 키포인트 (이동량 기준점)
    prev_keypoints: Option<Vec<Point3>>,
    /// 연속 미검출 프레임 수
    low_confidence: u32,
    /// 연속 정지 프레임 수
    stillness: u32,
    frozen: bool,
    last_report: Option<DateTime<Utc>>,
    last_inactive_report: Option<DateTime<Utc>>,
}

impl FreezeDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            prev_keypoints: None,
            low_confidence: 0,
            stillness: 0,
            frozen: false,
            last_report: None,
            last_inactive_report: None,
        }
    }

    /// 현재 정지 판정 (디바운스 적용 후)
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// 샘플 1프레임 처리
    ///
    /// 보고할 상태가 있고 쓰로틀 창이 지났을 때만 `Some`을 반환한다.
    /// `now`는 주입 가능한 시각 — 테스트에서 벽시계 대기 없이 구동한다.
    pub fn on_frame(
        &mut self,
        frame: &LandmarkFrame,
        sensitivity: u8,
        now: DateTime<Utc>,
    ) -> Option<ClientStatus> {
        match &frame.keypoints {
            None => self.on_miss(now),
            Some(keypoints) => self.on_detection(keypoints.clone(), sensitivity, now),
        }
    }

    /// 피사체 미검출 프레임
    fn on_miss(&mut self, now: DateTime<Utc>) -> Option<ClientStatus> {
        self.prev_keypoints = None;
        self.stillness = 0;
        self.frozen = false;
        self.low_confidence = self.low_confidence.saturating_add(1);

        if self.low_confidence <= self.config.low_confidence_frames {
            return None;
        }
        // 평가 불능 — 최대 1회/inactive_throttle_ms로 비활성 보고
        if !throttle_elapsed(
            self.last_inactive_report,
            now,
            self.config.inactive_throttle_ms,
        ) {
            return None;
        }
        self.last_inactive_report = Some(now);
        let mut status = ClientStatus::camera_inactive();
        status.last_update = now;
        Some(status)
    }

    /// 피사체 검출 프레임
    fn on_detection(
        &mut self,
        keypoints: Vec<Point3>,
        sensitivity: u8,
        now: DateTime<Utc>,
    ) -> Option<ClientStatus> {
        self.low_confidence = 0;

        let Some(prev) = self.prev_keypoints.take() else {
            // 기준 프레임 — 아직 이동량 없음
            self.prev_keypoints = Some(keypoints);
            return None;
        };
        let movement = average_movement(&prev, &keypoints);
        self.prev_keypoints = Some(keypoints);
        let Some(avg_movement) = movement else {
            // 키포인트 부족 — 판정 보류
            return None;
        };

        let raw_score = avg_movement * SCORE_SCALE;
        let motion_score = raw_score.min(100.0);

        if raw_score < freeze_threshold(sensitivity) {
            self.stillness = self.stillness.saturating_add(1);
        } else {
            self.stillness = 0;
        }

        let was_frozen = self.frozen;
        self.frozen = self.stillness >= self.config.stillness_frames;
        if self.frozen != was_frozen {
            debug!(
                "정지 판정 전이: {} → {} (정지 {}프레임, 점수 {:.1})",
                was_frozen, self.frozen, self.stillness, raw_score
            );
        }

        if !throttle_elapsed(self.last_report, now, self.config.report_throttle_ms) {
            return None;
        }
        self.last_report = Some(now);
        Some(ClientStatus {
            is_camera_active: true,
            is_frozen: self.frozen,
            motion_score,
            last_update: now,
        })
    }
}

/// 쓰로틀 창 경과 여부
fn throttle_elapsed(last: Option<DateTime<Utc>>, now: DateTime<Utc>, window_ms: u64) -> bool {
    match last {
        None => true,
        Some(last) => now - last >= Duration::milliseconds(window_ms as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoints::KEYPOINT_INDICES;

    fn frame_at(offset: f64) -> LandmarkFrame {
        let size = KEYPOINT_INDICES.iter().max().unwrap() + 1;
        LandmarkFrame::detected(
            (0..size)
                .map(|i| Point3::new(i as f64 * 0.001 + offset, 0.5, 0.0))
                .collect(),
        )
    }

    fn detector() -> FreezeDetector {
        FreezeDetector::new(DetectorConfig::default())
    }

    fn times(step_ms: i64) -> impl Iterator<Item = DateTime<Utc>> {
        let start = Utc::now();
        (0..).map(move |i| start + Duration::milliseconds(i * step_ms))
    }

    #[test]
    fn threshold_scales_with_sensitivity() {
        assert!((freeze_threshold(0) - 2.0).abs() < 1e-12);
        assert!((freeze_threshold(100) - 17.0).abs() < 1e-12);
        assert!(freeze_threshold(50) > freeze_threshold(10));
    }

    /// 민감도 50에서 정지 프레임 50개 연속 ⇒ 46번째 이전에 frozen
    #[test]
    fn freezes_within_46_still_frames() {
        let mut det = detector();
        let mut clock = times(33);
        let mut frozen_at = None;

        for i in 1..=50 {
            det.on_frame(&frame_at(0.0), 50, clock.next().unwrap());
            if det.is_frozen() && frozen_at.is_none() {
                frozen_at = Some(i);
            }
        }

        let frame = frozen_at.expect("frozen 미도달");
        assert!(frame <= 46, "{frame}번째에야 frozen");
    }

    /// raw_score=20은 민감도 0에서 절대 frozen이 아니다
    #[test]
    fn score_twenty_never_freezes_at_zero_sensitivity() {
        let mut det = detector();
        let mut clock = times(33);

        // 이동량 0.002 ⇒ raw_score = 20
        let mut offset = 0.0;
        for _ in 0..200 {
            det.on_frame(&frame_at(offset), 0, clock.next().unwrap());
            offset += 0.002;
            assert!(!det.is_frozen());
        }
    }

    #[test]
    fn movement_resets_stillness_counter() {
        let mut det = detector();
        let mut clock = times(33);

        for _ in 0..40 {
            det.on_frame(&frame_at(0.0), 50, clock.next().unwrap());
        }
        assert!(!det.is_frozen());

        // 큰 움직임 한 번 — 카운터 리셋
        det.on_frame(&frame_at(0.05), 50, clock.next().unwrap());

        for _ in 0..40 {
            det.on_frame(&frame_at(0.05), 50, clock.next().unwrap());
        }
        // 리셋 이후 40프레임뿐이므로 아직 frozen 아님
        assert!(!det.is_frozen());
    }

    #[test]
    fn recovers_from_frozen_on_movement() {
        let mut det = detector();
        let mut clock = times(33);

        for _ in 0..50 {
            det.on_frame(&frame_at(0.0), 50, clock.next().unwrap());
        }
        assert!(det.is_frozen());

        det.on_frame(&frame_at(0.05), 50, clock.next().unwrap());
        assert!(!det.is_frozen());
    }

    #[test]
    fn reports_throttled_to_500ms() {
        let mut det = detector();
        // 33ms 간격 샘플 — 쓰로틀 창(500ms)당 보고 1건
        let mut clock = times(33);
        let mut reports = 0;

        for _ in 0..61 {
            // 2초어치
            if det
                .on_frame(&frame_at(0.0), 50, clock.next().unwrap())
                .is_some()
            {
                reports += 1;
            }
        }
        // 첫 보고 + 500ms마다 1건 ⇒ 2초에 최대 5건
        assert!(reports <= 5, "보고 {reports}건 — 쓰로틀 미동작");
        assert!(reports >= 3);
    }

    #[test]
    fn camera_inactive_after_miss_run() {
        let mut det = detector();
        let mut clock = times(33);
        let mut inactive_reports = 0;

        for _ in 0..40 {
            if let Some(status) = det.on_frame(&LandmarkFrame::empty(), 50, clock.next().unwrap()) {
                assert!(!status.is_camera_active);
                assert!(!status.is_frozen);
                assert_eq!(status.motion_score, 0.0);
                inactive_reports += 1;
            }
        }
        // 31번째 미검출부터 보고 가능, 1000ms 쓰로틀 ⇒ 40×33ms 동안 1건
        assert_eq!(inactive_reports, 1);
    }

    #[test]
    fn detection_after_miss_rebaselines() {
        let mut det = detector();
        let mut clock = times(33);

        for _ in 0..10 {
            det.on_frame(&frame_at(0.0), 50, clock.next().unwrap());
        }
        det.on_frame(&LandmarkFrame::empty(), 50, clock.next().unwrap());

        // 미검출 후 첫 검출은 기준 프레임 — 점수/보고 없음
        let report = det.on_frame(&frame_at(0.3), 50, clock.next().unwrap());
        assert!(report.is_none() || report.unwrap().motion_score == 0.0);
    }
}
