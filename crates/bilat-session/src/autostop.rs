//! 자동 종료 타이머.
//!
//! `is_playing=true`이고 `duration_seconds>0`인 동안 치료사 측에서
//! 로컬 지연 작업을 예약한다. 시간이 다 되면 `is_playing=false`로
//! 뒤집고 스냅샷을 재발행한다.
//!
//! 수명 규칙: `is_playing`/`duration_seconds` 변경 시 기존 타이머를
//! 취소 후 재예약하고, 세션 해제 시 완전히 취소한다 (해제 후
//! 잔류 부수효과 금지).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use bilat_core::models::message::SessionMessage;
use bilat_core::models::settings::{SettingsModel, SettingsPatch};

use crate::topic::ChannelHandle;

/// 자동 종료 타이머
#[derive(Debug, Default)]
pub struct AutoStop {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AutoStop {
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 설정에 맞춰 타이머 재예약
    ///
    /// 기존 타이머는 항상 취소된다. `is_playing=false`이거나
    /// `duration_seconds=0`이면 취소만 하고 새로 예약하지 않는다.
    pub fn reschedule(
        &self,
        settings: &Arc<RwLock<SettingsModel>>,
        handle: &ChannelHandle,
    ) {
        self.cancel();

        let (playing, secs) = {
            let s = settings.read();
            (s.is_playing, s.duration_seconds)
        };
        if !playing || secs == 0 {
            return;
        }

        debug!("자동 종료 예약: {secs}초");
        let settings = Arc::clone(settings);
        let handle = handle.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(u64::from(secs))).await;

            let snapshot = {
                let mut s = settings.write();
                s.is_playing = false;
                SettingsPatch::from(&*s)
            };
            info!("자동 종료: {secs}초 경과, 재생 중지");
            handle.publish(SessionMessage::SyncSettings {
                payload: snapshot,
                sent_at: Utc::now(),
            });
        });
        *self.task.lock() = Some(task);
    }

    /// 타이머 취소
    pub fn cancel(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
            debug!("자동 종료 타이머 취소");
        }
    }

    /// 타이머 예약 여부 (테스트/진단용)
    pub fn is_scheduled(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map(|t| !t.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for AutoStop {
    fn drop(&mut self) {
        self.cancel();
    }
}
