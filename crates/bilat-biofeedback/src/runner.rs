//! 감지기 구동 루프.
//!
//! 랜드마크 소스에서 프레임을 당겨 감지기에 공급하고, 쓰로틀된 상태
//! 보고를 채널로 내보낸다. 센서 실패는 에러가 아니라 지속적
//! "카메라 비활성" 보고로 저하된다 (저하되었지만 동작 중인 상태).
//!
//! 해제 시 태스크를 abort한다.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use bilat_core::config::DetectorConfig;
use bilat_core::models::settings::SettingsModel;
use bilat_core::models::status::ClientStatus;
use bilat_core::ports::landmark_source::LandmarkSource;

use crate::detector::FreezeDetector;

/// 센서 실패 후 재시도 간격
const SENSOR_RETRY: Duration = Duration::from_millis(250);

/// 감지기 구동 핸들
pub struct DetectorRunner {
    task: JoinHandle<()>,
}

impl DetectorRunner {
    /// 구동 루프 시작
    ///
    /// `settings`는 내담자 설정 복제 셀 — 민감도 변경이 즉시 반영된다.
    /// 보고는 `tx`로 전송되며 수신 측이 사라지면 조용히 버린다.
    pub fn spawn(
        source: Arc<dyn LandmarkSource>,
        settings: Arc<RwLock<SettingsModel>>,
        config: DetectorConfig,
        tx: mpsc::UnboundedSender<ClientStatus>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let inactive_throttle_ms = config.inactive_throttle_ms;
            let mut detector = FreezeDetector::new(config);
            let mut last_sensor_report: Option<DateTime<Utc>> = None;

            loop {
                match source.next_frame().await {
                    Ok(frame) => {
                        let sensitivity = settings.read().freeze_sensitivity;
                        if let Some(status) = detector.on_frame(&frame, sensitivity, Utc::now()) {
                            let _ = tx.send(status);
                        }
                    }
                    Err(e) => {
                        warn!("랜드마크 센서 실패 — 비활성 보고로 저하: {e}");
                        let now = Utc::now();
                        let elapsed = last_sensor_report
                            .map(|t| now - t >= chrono::Duration::milliseconds(inactive_throttle_ms as i64))
                            .unwrap_or(true);
                        if elapsed {
                            last_sensor_report = Some(now);
                            let _ = tx.send(ClientStatus::camera_inactive());
                        }
                        tokio::time::sleep(SENSOR_RETRY).await;
                    }
                }
            }
        });
        Self { task }
    }
}

impl Drop for DetectorRunner {
    fn drop(&mut self) {
        self.task.abort();
        debug!("감지기 구동 루프 해제");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    use bilat_core::error::CoreError;
    use bilat_core::models::landmark::{LandmarkFrame, Point3};

    /// 대본대로 프레임을 내보내는 소스 — 소진 후 센서 실패
    struct ScriptedSource {
        frames: Mutex<VecDeque<LandmarkFrame>>,
    }

    #[async_trait]
    impl LandmarkSource for ScriptedSource {
        async fn next_frame(&self) -> Result<LandmarkFrame, CoreError> {
            match self.frames.lock().pop_front() {
                Some(frame) => Ok(frame),
                None => Err(CoreError::SensorUnavailable("카메라 권한 거부".to_string())),
            }
        }
    }

    fn still_frame() -> LandmarkFrame {
        LandmarkFrame::detected(vec![Point3::new(0.5, 0.5, 0.0); 300])
    }

    #[tokio::test]
    async fn sensor_failure_degrades_to_inactive_report() {
        let source = Arc::new(ScriptedSource {
            frames: Mutex::new(VecDeque::new()),
        });
        let settings = Arc::new(RwLock::new(SettingsModel::default()));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _runner = DetectorRunner::spawn(source, settings, DetectorConfig::default(), tx);

        let status = rx.recv().await.expect("비활성 보고 기대");
        assert!(!status.is_camera_active);
        assert!(!status.is_frozen);
    }

    #[tokio::test]
    async fn scripted_frames_feed_detector() {
        // 기준 + 정지 50프레임 — 쓰로틀 창이 0ms가 아니므로 보고는 드물지만
        // 루프가 프레임을 전부 소비하고 센서 실패로 저하되는지 확인
        let frames: VecDeque<_> = (0..51).map(|_| still_frame()).collect();
        let source = Arc::new(ScriptedSource {
            frames: Mutex::new(frames),
        });
        let settings = Arc::new(RwLock::new(SettingsModel::default()));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _runner = DetectorRunner::spawn(source, settings, DetectorConfig::default(), tx);

        // 프레임은 즉시 소비되어 첫 보고(활성)가 도착하고,
        // 소진 후에는 비활성 보고가 뒤따른다
        let first = rx.recv().await.expect("보고 기대");
        assert!(first.is_camera_active);

        let mut saw_inactive = false;
        while let Some(status) = rx.recv().await {
            if !status.is_camera_active {
                saw_inactive = true;
                break;
            }
        }
        assert!(saw_inactive);
    }
}
