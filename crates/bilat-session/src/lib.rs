//! # bilat-session
//!
//! 역할 인지 세션 채널 어댑터.
//!
//! 치료사 → 내담자 방향의 권위 설정 복제, 내담자 → 치료사 방향의
//! 상태 보고 중계, 가입/재동기화 핸드셰이크, 자동 종료 타이머를 담당한다.
//!
//! 전송은 프로세스 내 best-effort 브로드캐스트 토픽이다: 전달 보장 없음,
//! 수신자 0/1/다수 모두 허용, 늦은 가입은 재생이 아니라 재동기화
//! 핸드셰이크로 해결한다.

pub mod autostop;
pub mod bootstrap;
pub mod client;
pub mod therapist;
pub mod topic;

pub use client::ClientChannel;
pub use therapist::TherapistChannel;
pub use topic::{open_channel, open_channel_with_capacity, ChannelHandle};
