//! # bilat-stimulus
//!
//! 결정론적 자극 엔진.
//!
//! 추상 설정과 벽시계 틱을 위상 고정(phase-locked) 2D 운동으로 사상하고,
//! 운동 위상의 극값마다 동기화된 오디오/햅틱 큐를 정확히 1회 발화한다.
//! 큐 출력은 `ToneSink`/`HapticsSink` 포트를 통해서만 이루어지므로
//! 헤드리스 환경에서 큐 타이밍을 결정론적으로 테스트할 수 있다.

pub mod engine;
pub mod pattern;
pub mod runner;
pub mod sinks;

pub use engine::{frequency_hz, StimulusEngine, TickOutput};
pub use pattern::{position, Position};
pub use runner::EngineRunner;
