//! 엔진 구동 루프.
//!
//! 설정 복제 셀을 틱마다 읽어 엔진을 전진시키고 큐 부수효과를
//! 싱크로 내보낸다. 복제 경로는 이 루프를 절대 막지 않는다
//! (셀 읽기는 짧은 RwLock, 대기 없음).
//!
//! 해제 시 태스크를 abort하여 잔류 톤/진동을 남기지 않는다.
//! 결정론적 큐 타이밍 테스트는 루프 없이 `StimulusEngine::advance`를
//! 직접 구동한다.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use bilat_core::config::StimulusConfig;
use bilat_core::models::session::SessionRole;
use bilat_core::models::settings::SettingsModel;
use bilat_core::ports::cue_sink::{CueSide, HapticsSink, ToneSink};

use crate::engine::StimulusEngine;
use crate::pattern::Position;

/// 큐 1개를 싱크로 내보낸다
///
/// 사운드와 햅틱은 독립적으로 게이팅된다. 햅틱은 로컬 역할의 플래그만
/// 본다. 싱크 실패는 기능 저하일 뿐이므로 경고 로그 후 계속한다.
pub async fn dispatch_cue(
    cue: CueSide,
    role: SessionRole,
    settings: &SettingsModel,
    tone: &Arc<dyn ToneSink>,
    haptics: &Arc<dyn HapticsSink>,
    pulse_duration_ms: u64,
) {
    if settings.sound_enabled {
        if let Err(e) = tone.play_tone(cue, settings.sound_volume).await {
            warn!("톤 재생 실패: {e}");
        }
    }

    let vibration_enabled = match role {
        SessionRole::Therapist => settings.therapist_vibration_enabled,
        SessionRole::Client => settings.client_vibration_enabled,
    };
    if vibration_enabled {
        // 좌/우에서 서로 반대 채널 포화
        let (strong, weak) = match cue {
            CueSide::Left => (1.0, 0.0),
            CueSide::Right => (0.0, 1.0),
        };
        if let Err(e) = haptics.pulse(strong, weak, pulse_duration_ms).await {
            warn!("햅틱 펄스 실패: {e}");
        }
    }
}

/// 엔진 구동 핸들
///
/// drop 시 루프가 중단된다.
pub struct EngineRunner {
    task: JoinHandle<()>,
    position: Arc<RwLock<Position>>,
    completed_rx: watch::Receiver<bool>,
}

impl EngineRunner {
    /// 구동 루프 시작
    pub fn spawn(
        settings: Arc<RwLock<SettingsModel>>,
        role: SessionRole,
        tone: Arc<dyn ToneSink>,
        haptics: Arc<dyn HapticsSink>,
        config: StimulusConfig,
    ) -> Self {
        let position = Arc::new(RwLock::new(Position::CENTER));
        let (completed_tx, completed_rx) = watch::channel(false);

        let pos_cell = Arc::clone(&position);
        let task = tokio::spawn(async move {
            let mut engine = StimulusEngine::new();
            let mut interval = tokio::time::interval(config.tick_interval());
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last = Instant::now();

            loop {
                interval.tick().await;
                let now = Instant::now();
                let dt = now - last;
                last = now;

                // 복제 셀에서 최신 설정 스냅샷을 읽는다 (블로킹 없음)
                let snapshot = settings.read().clone();
                let out = engine.advance(dt, &snapshot);
                *pos_cell.write() = out.position;

                for cue in out.cues {
                    dispatch_cue(
                        cue,
                        role,
                        &snapshot,
                        &tone,
                        &haptics,
                        config.pulse_duration_ms,
                    )
                    .await;
                }

                if out.completed {
                    // 호출자가 is_playing=false로 전환하도록 신호
                    let _ = completed_tx.send(true);
                }
            }
        });

        Self {
            task,
            position,
            completed_rx,
        }
    }

    /// 현재 렌더 위치 (단위 공간)
    pub fn position(&self) -> Position {
        *self.position.read()
    }

    /// 목표 왕복 완료 신호 구독
    pub fn completion(&self) -> watch::Receiver<bool> {
        self.completed_rx.clone()
    }
}

impl Drop for EngineRunner {
    fn drop(&mut self) {
        self.task.abort();
        debug!("엔진 구동 루프 해제");
    }
}
