//! 치료사 역할 채널 핸들.
//!
//! 권위 설정 셀을 단독 소유한다. 모든 로컬 변경은 전체 스냅샷으로
//! 즉시 발행되고, REQUEST_SYNC 수신 시 살아 있는 셀을 처리 시점에
//! 읽어 재발행한다 (구독 시점에 캡처한 복사본 금지 — 정확성 요건).
//!
//! 발신 불변식: 이 핸들은 `SYNC_SETTINGS`만 발행할 수 있다.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use bilat_core::models::message::SessionMessage;
use bilat_core::models::session::PublishState;
use bilat_core::models::settings::{SettingsModel, SettingsPatch, StimulusPattern};
use bilat_core::models::status::ClientStatus;

use crate::autostop::AutoStop;
use crate::topic::ChannelHandle;

/// 치료사 측 세션 채널
pub struct TherapistChannel {
    handle: ChannelHandle,
    /// 권위 설정 셀 — 수신 루프가 처리 시점에 읽는다
    settings: Arc<RwLock<SettingsModel>>,
    publish_state: Arc<RwLock<PublishState>>,
    /// 마지막 내담자 상태 — 전체 교체 (last-write-wins)
    last_status: Arc<RwLock<Option<ClientStatus>>>,
    autostop: AutoStop,
    recv_task: JoinHandle<()>,
}

impl TherapistChannel {
    /// 채널 가입 및 수신 루프 시작
    pub fn new(handle: ChannelHandle, initial: SettingsModel) -> Self {
        let mut initial = initial;
        initial.normalize();

        let settings = Arc::new(RwLock::new(initial));
        let publish_state = Arc::new(RwLock::new(PublishState::Idle));
        let last_status = Arc::new(RwLock::new(None));

        let recv_task = tokio::spawn(Self::recv_loop(
            handle.subscribe(),
            handle.clone(),
            Arc::clone(&settings),
            Arc::clone(&publish_state),
            Arc::clone(&last_status),
        ));

        Self {
            handle,
            settings,
            publish_state,
            last_status,
            autostop: AutoStop::new(),
            recv_task,
        }
    }

    /// 수신 루프 — REQUEST_SYNC 응답 및 CLIENT_STATUS 반영
    async fn recv_loop(
        mut rx: broadcast::Receiver<SessionMessage>,
        handle: ChannelHandle,
        settings: Arc<RwLock<SettingsModel>>,
        publish_state: Arc<RwLock<PublishState>>,
        last_status: Arc<RwLock<Option<ClientStatus>>>,
    ) {
        loop {
            match rx.recv().await {
                Ok(SessionMessage::RequestSync { .. }) => {
                    // 처리 시점의 살아 있는 상태를 읽는다
                    let snapshot = SettingsPatch::from(&*settings.read());
                    debug!("재동기화 요청 수신 — 현재 스냅샷 재발행");
                    handle.publish(SessionMessage::SyncSettings {
                        payload: snapshot,
                        sent_at: Utc::now(),
                    });
                    *publish_state.write() = PublishState::Active;
                }
                Ok(SessionMessage::ClientStatus { status, .. }) => {
                    debug!(
                        "내담자 상태 수신: frozen={} score={:.1}",
                        status.is_frozen, status.motion_score
                    );
                    *last_status.write() = Some(status);
                }
                // 자기 발행 메시지 에코는 무시
                Ok(SessionMessage::SyncSettings { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("수신 지연으로 {n}개 메시지 유실 — 계속 진행");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        debug!("치료사 수신 루프 종료");
    }

    /// 현재 스냅샷을 발행하고 Active로 전이
    fn publish_snapshot(&self) {
        let snapshot = SettingsPatch::from(&*self.settings.read());
        self.handle.publish(SessionMessage::SyncSettings {
            payload: snapshot,
            sent_at: Utc::now(),
        });
        *self.publish_state.write() = PublishState::Active;
    }

    /// 패치 적용 후 전체 스냅샷 발행
    ///
    /// `is_playing` 또는 `duration_seconds`가 바뀌면 자동 종료 타이머를
    /// 취소 후 재예약한다.
    pub fn update(&self, patch: SettingsPatch) {
        let timer_inputs_changed = {
            let mut s = self.settings.write();
            let before = (s.is_playing, s.duration_seconds);
            s.apply_patch(&patch);
            before != (s.is_playing, s.duration_seconds)
        };
        self.publish_snapshot();
        if timer_inputs_changed {
            self.autostop.reschedule(&self.settings, &self.handle);
        }
    }

    /// 재생/일시정지 전환
    pub fn set_playing(&self, playing: bool) {
        self.update(SettingsPatch {
            is_playing: Some(playing),
            ..Default::default()
        });
    }

    /// 이동 패턴 변경
    pub fn set_pattern(&self, pattern: StimulusPattern) {
        self.update(SettingsPatch {
            pattern: Some(pattern),
            ..Default::default()
        });
    }

    /// 세션 지속 시간 설정 (초, 0 = 무제한) — 왕복 목표와 상호 배타
    pub fn set_duration_seconds(&self, secs: u32) {
        self.update(SettingsPatch {
            duration_seconds: Some(secs),
            ..Default::default()
        });
    }

    /// 목표 왕복 횟수 설정 (0 = 미사용) — 지속 시간과 상호 배타
    pub fn set_target_passes(&self, passes: u32) {
        self.update(SettingsPatch {
            target_passes: Some(passes),
            ..Default::default()
        });
    }

    /// 현재 설정 스냅샷 (복제본)
    pub fn settings(&self) -> SettingsModel {
        self.settings.read().clone()
    }

    /// 마지막 내담자 상태
    pub fn last_status(&self) -> Option<ClientStatus> {
        self.last_status.read().clone()
    }

    /// 발행 상태 머신 조회
    pub fn publish_state(&self) -> PublishState {
        *self.publish_state.read()
    }
}

impl Drop for TherapistChannel {
    fn drop(&mut self) {
        self.recv_task.abort();
        self.autostop.cancel();
        debug!("치료사 채널 해제");
    }
}
