//! 패턴별 위치 매핑.
//!
//! 위상 `t`를 단위 공간 좌표 `[-1, 1]²`로 사상한다.
//! 크기/뷰포트 스케일링은 호출자(렌더 레이어)의 몫이다.

use bilat_core::models::settings::StimulusPattern;

/// 단위 공간 2D 위치
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// 중앙 (정지 위치)
    pub const CENTER: Position = Position { x: 0.0, y: 0.0 };
}

/// 위상 `t`에서의 패턴 위치
pub fn position(pattern: StimulusPattern, t: f64) -> Position {
    match pattern {
        StimulusPattern::Linear => Position {
            x: t.sin(),
            y: 0.0,
        },
        // 2배 주파수 상하 보조 운동
        StimulusPattern::Sine => Position {
            x: t.sin(),
            y: (2.0 * t).cos(),
        },
        StimulusPattern::FigureEight => Position {
            x: t.sin(),
            y: (2.0 * t).sin(),
        },
        StimulusPattern::Vertical => Position {
            x: 0.0,
            y: t.sin(),
        },
        // 이산 좌/우 — 보간 없음
        StimulusPattern::Alternated => Position {
            x: t.sin().signum(),
            y: 0.0,
        },
        // 고정 비정수비 리사주 — 엔트로피 아닌 결정론적 의사 랜덤
        StimulusPattern::Random => Position {
            x: t.sin(),
            y: (1.3 * t).sin(),
        },
    }
}
