//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 어댑터 crate가 이 trait들을 구현하며 앱 와이어링에서 `Arc<dyn T>`로 주입한다.
//! 모든 async trait은 `async_trait` 매크로로 object safety를 보장한다.

pub mod conferencing;
pub mod cue_sink;
pub mod landmark_source;
pub mod preset_store;
pub mod text_completion;
