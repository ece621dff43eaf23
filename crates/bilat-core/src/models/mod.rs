//! 도메인 데이터 모델.

pub mod landmark;
pub mod message;
pub mod session;
pub mod settings;
pub mod status;
