//! 세션 부트스트랩.
//!
//! 공유 링크에서 화상회의 연결 파라미터를 추출하고 검증한다.
//! 누락/불량 값은 패닉이 아니라 사용자 노출용 에러 문자열
//! (`CoreError::Connect`)로 실패한다. 연결 실패 시에도 세션 채널과
//! 자극 엔진은 로컬 전용으로 계속 동작한다.

use url::Url;

use bilat_core::error::CoreError;
use bilat_core::models::session::SessionRole;
use bilat_core::models::settings::ConnectionParams;
use bilat_core::ports::conferencing::Conferencing;
use tracing::{info, warn};

/// 파싱된 공유 링크
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    /// 연결 파라미터 (토큰은 링크에 직접 실려온 경우에만 채워짐)
    pub params: ConnectionParams,
    /// 토큰 대신 실려온 방 식별자 — 회의 레이어가 토큰으로 교환
    pub room: Option<String>,
}

/// 공유 링크 파싱
///
/// 쿼리 파라미터: `server`(필수), `therapistToken`/`clientToken`
/// 또는 `room`. 호출 역할에 해당하는 토큰과 `room`이 모두 없으면 실패.
pub fn parse_share_link(link: &str, role: SessionRole) -> Result<ParsedLink, CoreError> {
    let url = Url::parse(link)
        .map_err(|e| CoreError::Connect(format!("잘못된 세션 링크: {e}")))?;

    let mut params = ConnectionParams::default();
    let mut room = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "server" => params.server_url = value.to_string(),
            "therapistToken" => params.therapist_token = value.to_string(),
            "clientToken" => params.client_token = value.to_string(),
            "room" => room = Some(value.to_string()),
            _ => {}
        }
    }

    if params.server_url.trim().is_empty() {
        return Err(CoreError::Connect(
            "세션 링크에 회의 서버 주소가 없습니다".to_string(),
        ));
    }

    let role_token = match role {
        SessionRole::Therapist => &params.therapist_token,
        SessionRole::Client => &params.client_token,
    };
    if role_token.trim().is_empty() && room.is_none() {
        return Err(CoreError::Connect(
            "세션 링크에 역할 토큰 또는 방 식별자가 없습니다".to_string(),
        ));
    }

    Ok(ParsedLink { params, room })
}

/// 화상회의 레이어 접속
///
/// 실패는 사용자에게 표시할 에러 문자열로 보고되며 호출자는
/// 로컬 전용 모드로 계속 진행해야 한다.
pub async fn connect_conferencing(
    conferencing: &dyn Conferencing,
    parsed: &ParsedLink,
) -> Result<(), CoreError> {
    match conferencing.connect(&parsed.params).await {
        Ok(()) => {
            info!("회의 서버 접속: {}", parsed.params.server_url);
            Ok(())
        }
        Err(e) => {
            warn!("회의 접속 실패 — 로컬 전용으로 계속: {e}");
            Err(CoreError::Connect(e.to_string()))
        }
    }
}
