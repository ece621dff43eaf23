//! 내담자 역할 채널 핸들.
//!
//! 설정 복제본을 보유하며 절대 권위를 갖지 않는다.
//! 마운트 시 REQUEST_SYNC를 1회 발행하고, 이후 수신하는 모든
//! SYNC_SETTINGS를 키 단위 얕은 병합으로 반영한다.
//!
//! 발신 불변식: 이 핸들은 `REQUEST_SYNC`와 `CLIENT_STATUS`만 발행할 수 있다.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use bilat_core::models::message::SessionMessage;
use bilat_core::models::session::ReplicaState;
use bilat_core::models::settings::SettingsModel;
use bilat_core::models::status::ClientStatus;

use crate::topic::ChannelHandle;

/// 내담자 측 세션 채널
pub struct ClientChannel {
    handle: ChannelHandle,
    /// 설정 복제본 — 렌더 루프가 틱마다 읽는다 (복제 경로는 렌더를 막지 않음)
    replica: Arc<RwLock<SettingsModel>>,
    state: Arc<RwLock<ReplicaState>>,
    recv_task: JoinHandle<()>,
}

impl ClientChannel {
    /// 채널 가입, REQUEST_SYNC 1회 발행, 수신 루프 시작
    ///
    /// `Disconnected → AwaitingSync`로 전이한다. 치료사가 없으면 요청은
    /// 조용히 버려지고, 이후 치료사의 임의 발행으로 동기화된다.
    pub fn mount(handle: ChannelHandle) -> Self {
        let replica = Arc::new(RwLock::new(SettingsModel::default()));
        let state = Arc::new(RwLock::new(ReplicaState::AwaitingSync));

        // 수신 가입을 요청 발행보다 먼저 — 응답 유실 방지
        let rx = handle.subscribe();
        handle.publish(SessionMessage::RequestSync { sent_at: Utc::now() });
        debug!("내담자 마운트: 재동기화 요청 발행");

        let recv_task = tokio::spawn(Self::recv_loop(
            rx,
            Arc::clone(&replica),
            Arc::clone(&state),
        ));

        Self {
            handle,
            replica,
            state,
            recv_task,
        }
    }

    /// 수신 루프 — SYNC_SETTINGS 병합, 그 외 변형 무시
    async fn recv_loop(
        mut rx: broadcast::Receiver<SessionMessage>,
        replica: Arc<RwLock<SettingsModel>>,
        state: Arc<RwLock<ReplicaState>>,
    ) {
        loop {
            match rx.recv().await {
                Ok(SessionMessage::SyncSettings { payload, .. }) => {
                    replica.write().apply_patch(&payload);
                    let mut st = state.write();
                    if *st != ReplicaState::Synced {
                        debug!("첫 스냅샷 수신 — SYNCED 전이");
                        *st = ReplicaState::Synced;
                    }
                }
                // 자기 발행 변형 에코는 소비하지 않는다
                Ok(SessionMessage::RequestSync { .. })
                | Ok(SessionMessage::ClientStatus { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("수신 지연으로 {n}개 메시지 유실 — 최신 스냅샷이 곧 도착");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        debug!("내담자 수신 루프 종료");
    }

    /// 바이오피드백 상태 보고 발행
    pub fn report_status(&self, status: ClientStatus) {
        self.handle.publish(SessionMessage::ClientStatus {
            status,
            sent_at: Utc::now(),
        });
    }

    /// 복제본 스냅샷 (복제본이며 수정해도 전파되지 않는다)
    pub fn settings(&self) -> SettingsModel {
        self.replica.read().clone()
    }

    /// 렌더 루프용 공유 복제 셀
    pub fn replica_cell(&self) -> Arc<RwLock<SettingsModel>> {
        Arc::clone(&self.replica)
    }

    /// 복제 상태 머신 조회
    pub fn state(&self) -> ReplicaState {
        *self.state.read()
    }
}

impl Drop for ClientChannel {
    fn drop(&mut self) {
        self.recv_task.abort();
        debug!("내담자 채널 해제");
    }
}
