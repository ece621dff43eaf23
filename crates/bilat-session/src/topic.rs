//! 프로세스 내 브로드캐스트 토픽.
//!
//! 동일 이름으로 `open_channel`을 호출한 모든 핸들이 하나의 버스를 공유한다.
//! 전달 보장 없음: 수신자가 없으면 메시지는 조용히 버려지고,
//! 늦게 가입한 수신자를 위한 재생/버퍼링도 없다 (재동기화 핸드셰이크가
//! 이를 대신한다). 발신자별 FIFO 순서만 가정한다.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use bilat_core::models::message::SessionMessage;

/// 프로세스 전역 토픽 레지스트리
static TOPICS: Lazy<RwLock<HashMap<String, broadcast::Sender<SessionMessage>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 기본 토픽 버퍼 용량
const DEFAULT_CAPACITY: usize = 64;

/// 토픽 핸들
///
/// clone 가능하며, 모든 clone이 같은 버스를 가리킨다.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    name: String,
    tx: broadcast::Sender<SessionMessage>,
}

/// 이름 붙은 토픽 가입 (기본 용량)
pub fn open_channel(name: &str) -> ChannelHandle {
    open_channel_with_capacity(name, DEFAULT_CAPACITY)
}

/// 이름 붙은 토픽 가입 (용량 지정)
pub fn open_channel_with_capacity(name: &str, capacity: usize) -> ChannelHandle {
    let mut topics = TOPICS.write();
    let tx = topics
        .entry(name.to_string())
        .or_insert_with(|| {
            debug!("토픽 생성: {name} (용량 {capacity})");
            broadcast::channel(capacity).0
        })
        .clone();
    ChannelHandle {
        name: name.to_string(),
        tx,
    }
}

impl ChannelHandle {
    /// 토픽 이름
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 수신 스트림 가입
    pub fn subscribe(&self) -> broadcast::Receiver<SessionMessage> {
        self.tx.subscribe()
    }

    /// 메시지 발행 — best-effort
    ///
    /// 수신자가 없으면 에러가 아니라 무음 드롭이다 (전송 부재는
    /// 프로토콜상 정상 상태).
    pub fn publish(&self, msg: SessionMessage) {
        match self.tx.send(msg) {
            Ok(n) => debug!("발행: 토픽={} 수신자={n}", self.name),
            Err(_) => debug!("발행 드롭: 토픽={} (수신자 없음)", self.name),
        }
    }

    /// 현재 수신자 수 (테스트/진단용)
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
