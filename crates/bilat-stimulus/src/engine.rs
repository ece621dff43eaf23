//! 자극 엔진 코어.
//!
//! 경과 시간과 설정을 결정론적으로 2D 위치로 사상하고, 운동 위상의
//! 반환점마다 정확히 1회의 좌/우 큐를 산출한다. 틱 지터와 무관하게
//! 반주기당 큐 1개가 보장된다.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::time::Duration;

use tracing::debug;

use bilat_core::models::settings::SettingsModel;
use bilat_core::ports::cue_sink::CueSide;

use crate::pattern::{position, Position};

/// 속도 → 각주파수 변환
///
/// `speed ∈ [1,100]`에서 단조 증가, `[0.1, 2.1]` Hz로 유계.
pub fn frequency_hz(speed: u8) -> f64 {
    0.1 + (f64::from(speed) / 100.0) * 2.0
}

/// 한 틱의 산출물
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    /// 단위 공간 위치
    pub position: Position,
    /// 이번 틱에서 발화한 큐 (위상 경계 교차 순서대로)
    pub cues: Vec<CueSide>,
    /// 목표 왕복 도달 — 호출자가 `is_playing=false`로 전환할 것
    pub completed: bool,
}

/// 자극 엔진
///
/// 내부 위상 누적기 `t`를 유지한다. `is_playing=false`인 동안 위상은
/// 동결되고 위치는 중앙에 고정되지만, 엔진 자체는 계속 틱을 받아
/// 뷰포트 변화 등에 대응할 수 있다.
#[derive(Debug)]
pub struct StimulusEngine {
    /// 위상 누적기 (라디안)
    phase: f64,
    /// 완료된 왕복(좌+우 큐 쌍) 수
    passes: u32,
    /// 쌍 미완성 상태의 직전 큐
    pending_cue: Option<CueSide>,
    /// 완료 신호 발화 여부 (1회만)
    completed_signalled: bool,
}

impl Default for StimulusEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StimulusEngine {
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            passes: 0,
            pending_cue: None,
            completed_signalled: false,
        }
    }

    /// 현재 위상 (라디안)
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// 완료된 왕복 수
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// 왕복 카운터 리셋 (새 세션 시작 시)
    pub fn reset_passes(&mut self) {
        self.passes = 0;
        self.pending_cue = None;
        self.completed_signalled = false;
    }

    /// 한 틱 진행
    ///
    /// `dt`는 측정 또는 고정 틱 간격. 위상은 `dt · f · 2π`만큼 전진하며,
    /// 전진 구간이 가로지른 모든 반주기 경계에 대해 큐를 발화한다
    /// (틱이 반주기보다 길어도 큐가 유실되지 않는다).
    pub fn advance(&mut self, dt: Duration, settings: &SettingsModel) -> TickOutput {
        if !settings.is_playing {
            // 일시정지: 위치 중앙 고정, 위상 동결
            return TickOutput {
                position: Position::CENTER,
                cues: Vec::new(),
                completed: false,
            };
        }

        let f = frequency_hz(settings.speed);
        let prev_phase = self.phase;
        self.phase += dt.as_secs_f64() * f * TAU;

        let cues = self.crossed_cues(prev_phase, self.phase);
        let completed = self.count_passes(&cues, settings.target_passes);

        TickOutput {
            position: position(settings.pattern, self.phase),
            cues,
            completed,
        }
    }

    /// `cos t`의 영점 교차(= sin의 극값) 수집
    ///
    /// 경계는 `t = π/2 + kπ`. k 짝수 ⇒ sin 정점(하향 교차) ⇒ 우측 큐,
    /// k 홀수 ⇒ 저점(상향 교차) ⇒ 좌측 큐.
    fn crossed_cues(&self, from: f64, to: f64) -> Vec<CueSide> {
        let idx = |t: f64| ((t - FRAC_PI_2) / PI).floor() as i64;
        let (a, b) = (idx(from), idx(to));
        (a..b)
            .map(|k| {
                // 교차한 경계 번호는 a+1..=b
                let boundary = k + 1;
                if boundary.rem_euclid(2) == 0 {
                    CueSide::Right
                } else {
                    CueSide::Left
                }
            })
            .collect()
    }

    /// 좌+우 큐 쌍을 왕복 1회로 집계하고 목표 도달 시 완료 신호 반환
    fn count_passes(&mut self, cues: &[CueSide], target_passes: u32) -> bool {
        for &cue in cues {
            match self.pending_cue {
                Some(prev) if prev != cue => {
                    self.passes += 1;
                    self.pending_cue = None;
                }
                _ => self.pending_cue = Some(cue),
            }
        }

        if target_passes > 0 && self.passes >= target_passes && !self.completed_signalled {
            self.completed_signalled = true;
            debug!("목표 왕복 도달: {}회", self.passes);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilat_core::models::settings::StimulusPattern;

    fn playing(speed: u8) -> SettingsModel {
        let mut s = SettingsModel::default();
        s.is_playing = true;
        s.speed = speed;
        s
    }

    #[test]
    fn frequency_monotone_and_bounded() {
        let mut prev = 0.0;
        for speed in 1..=100u8 {
            let f = frequency_hz(speed);
            assert!(f > prev, "speed={speed}에서 단조성 위반");
            assert!((0.1..=2.1).contains(&f));
            prev = f;
        }
        assert!((frequency_hz(100) - 2.1).abs() < 1e-12);
    }

    /// 틱 간격과 무관하게 2π당 좌 1회 + 우 1회
    #[test]
    fn one_cue_pair_per_cycle_at_any_granularity() {
        for tick_ms in [1u64, 7, 16, 33, 250] {
            let mut engine = StimulusEngine::new();
            let settings = playing(50); // f = 1.1 Hz
            let mut lefts = 0;
            let mut rights = 0;

            // 정확히 10주기 진행
            let cycle_secs = 1.0 / frequency_hz(50);
            let total = Duration::from_secs_f64(cycle_secs * 10.0);
            let tick = Duration::from_millis(tick_ms);
            let mut elapsed = Duration::ZERO;
            while elapsed < total {
                let dt = tick.min(total - elapsed);
                let out = engine.advance(dt, &settings);
                for cue in out.cues {
                    match cue {
                        CueSide::Left => lefts += 1,
                        CueSide::Right => rights += 1,
                    }
                }
                elapsed += dt;
            }

            assert_eq!(rights, 10, "tick={tick_ms}ms 우측 큐 수");
            assert_eq!(lefts, 10, "tick={tick_ms}ms 좌측 큐 수");
        }
    }

    #[test]
    fn first_cue_is_right_at_positive_peak() {
        let mut engine = StimulusEngine::new();
        let settings = playing(50);
        // 반주기보다 긴 단일 틱
        let half_cycle = 0.5 / frequency_hz(50);
        let out = engine.advance(Duration::from_secs_f64(half_cycle * 1.2), &settings);
        assert_eq!(out.cues, vec![CueSide::Right]);
    }

    #[test]
    fn long_tick_does_not_lose_cues() {
        let mut engine = StimulusEngine::new();
        let settings = playing(50);
        // 3주기를 한 틱에 — 큐 6개 전부 산출
        let cycles = 3.0 / frequency_hz(50);
        let out = engine.advance(Duration::from_secs_f64(cycles), &settings);
        assert_eq!(out.cues.len(), 6);
        // 우/좌 교대
        assert_eq!(out.cues[0], CueSide::Right);
        assert_eq!(out.cues[1], CueSide::Left);
        assert_eq!(out.cues[2], CueSide::Right);
    }

    #[test]
    fn paused_freezes_phase_at_center() {
        let mut engine = StimulusEngine::new();
        let mut settings = playing(50);
        engine.advance(Duration::from_millis(700), &settings);
        let phase = engine.phase();
        assert!(phase > 0.0);

        settings.is_playing = false;
        let out = engine.advance(Duration::from_secs(10), &settings);
        assert_eq!(out.position, Position::CENTER);
        assert!(out.cues.is_empty());
        assert_eq!(engine.phase(), phase);
    }

    #[test]
    fn pass_target_signals_completion_once() {
        let mut engine = StimulusEngine::new();
        let mut settings = playing(100);
        settings.set_target_passes(3);

        let tick = Duration::from_millis(50);
        let mut completions = 0;
        for _ in 0..200 {
            let out = engine.advance(tick, &settings);
            if out.completed {
                completions += 1;
                // 호출자 역할: 재생 중지
                assert_eq!(engine.passes(), 3);
            }
        }
        assert_eq!(completions, 1);
        assert!(engine.passes() >= 3);
    }

    #[test]
    fn reset_passes_clears_completion_state() {
        let mut engine = StimulusEngine::new();
        let mut settings = playing(100);
        settings.set_target_passes(1);

        // 목표 도달까지 진행
        let mut reached = false;
        for _ in 0..100 {
            if engine.advance(Duration::from_millis(50), &settings).completed {
                reached = true;
                break;
            }
        }
        assert!(reached);

        engine.reset_passes();
        assert_eq!(engine.passes(), 0);
        // 리셋 후 다시 완료 신호 가능
        let mut reached_again = false;
        for _ in 0..100 {
            if engine.advance(Duration::from_millis(50), &settings).completed {
                reached_again = true;
                break;
            }
        }
        assert!(reached_again);
    }

    #[test]
    fn position_follows_configured_pattern() {
        let mut engine = StimulusEngine::new();
        let mut settings = playing(50);
        settings.pattern = StimulusPattern::Vertical;
        let out = engine.advance(Duration::from_millis(100), &settings);
        assert_eq!(out.position.x, 0.0);
    }
}
