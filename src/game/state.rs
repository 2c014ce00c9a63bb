use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use super::geometry::{clamp_x, Rect};
use crate::config::Config;

/// セッションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

/// 1 tick の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 障害物が1段落下した
    Advanced,
    /// 障害物が画面下に抜けてスコア加算
    Scored,
    /// 衝突してゲームオーバーに遷移
    Collided,
    /// ゲームオーバー中なので何もしない
    Idle,
}

/// プレイヤー、障害物、スコアをまとめたゲームセッション
///
/// ループから毎 tick `tick` を呼ぶ唯一の書き手が所有する。
/// 指先の座標は正規化座標 (0.0〜1.0) で受け取り、ここでピクセルに変換する。
pub struct GameSession {
    width: f32,
    height: f32,
    paddle: Rect,
    obstacle: Rect,
    speed: f32,
    score: u32,
    high_score: u32,
    phase: Phase,
    started_at: Option<Instant>,
    final_elapsed: Option<Duration>,
    rng: StdRng,
}

impl GameSession {
    pub fn new(config: &Config) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: &Config, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &Config, rng: StdRng) -> Self {
        let width = config.window.width as f32;
        let height = config.window.height as f32;
        let paddle = Rect::new(
            0.0,
            height - config.paddle.height - config.paddle.bottom_margin,
            config.paddle.width,
            config.paddle.height,
        );
        let obstacle = Rect::new(0.0, 0.0, config.obstacle.width, config.obstacle.height);

        let mut session = Self {
            width,
            height,
            paddle,
            obstacle,
            speed: config.obstacle.speed,
            score: 0,
            high_score: 0,
            phase: Phase::Playing,
            started_at: None,
            final_elapsed: None,
            rng,
        };
        session.center_paddle();
        session.respawn_obstacle();
        session
    }

    /// 1 tick 進める
    ///
    /// `fingertip_x` は平滑化済みの正規化X座標。手が無い tick では None で、
    /// パドルは前の位置に留まる。
    pub fn tick(&mut self, fingertip_x: Option<f32>, now: Instant) -> TickOutcome {
        if self.phase == Phase::GameOver {
            return TickOutcome::Idle;
        }
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if let Some(x) = fingertip_x {
            self.steer(x);
        }

        self.obstacle.y += self.speed;

        if self.paddle.overlaps(&self.obstacle) {
            self.enter_game_over(now);
            return TickOutcome::Collided;
        }

        if self.obstacle.y >= self.height {
            self.respawn_obstacle();
            self.score += 1;
            return TickOutcome::Scored;
        }

        TickOutcome::Advanced
    }

    /// ゲームオーバーから再開。ハイスコアは保持する。
    pub fn restart(&mut self, now: Instant) {
        self.phase = Phase::Playing;
        self.score = 0;
        self.center_paddle();
        self.respawn_obstacle();
        self.started_at = Some(now);
        self.final_elapsed = None;
    }

    /// 経過時間。ゲームオーバー時点で止まる。
    pub fn elapsed(&self, now: Instant) -> Duration {
        if let Some(frozen) = self.final_elapsed {
            return frozen;
        }
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    fn steer(&mut self, normalized_x: f32) {
        let center = normalized_x * self.width;
        self.paddle.x = clamp_x(center - self.paddle.width / 2.0, self.paddle.width, self.width);
    }

    fn enter_game_over(&mut self, now: Instant) {
        self.final_elapsed = Some(self.elapsed(now));
        self.phase = Phase::GameOver;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    fn center_paddle(&mut self) {
        self.paddle.x = (self.width - self.paddle.width) / 2.0;
    }

    fn respawn_obstacle(&mut self) {
        let max_x = (self.width - self.obstacle.width).max(0.0) as u32;
        self.obstacle.x = self.rng.gen_range(0..=max_x) as f32;
        self.obstacle.y = 0.0;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn paddle(&self) -> &Rect {
        &self.paddle
    }

    pub fn obstacle(&self) -> &Rect {
        &self.obstacle
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::with_seed(&Config::default(), 7)
    }

    /// パドルを右端に寄せ、障害物を左端に置く（衝突しない配置）
    fn park_apart(s: &mut GameSession) {
        s.obstacle.x = 0.0;
        s.obstacle.y = 0.0;
        s.paddle.x = s.width - s.paddle.width;
    }

    /// 障害物をパドルの真上、次の tick で重なる位置に置く
    fn drop_on_paddle(s: &mut GameSession) {
        s.obstacle.x = s.paddle.x;
        s.obstacle.y = s.paddle.y - s.obstacle.height;
    }

    #[test]
    fn test_initial_state() {
        let s = session();
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.score(), 0);
        assert_eq!(s.high_score(), 0);
        assert_eq!(s.paddle().x, 375.0);
        assert_eq!(s.paddle().y, 540.0);
        assert_eq!(s.obstacle().y, 0.0);
        assert!(s.obstacle().x >= 0.0 && s.obstacle().x <= 750.0);
    }

    #[test]
    fn test_obstacle_falls_by_speed() {
        let mut s = session();
        park_apart(&mut s);
        let now = Instant::now();
        assert_eq!(s.tick(None, now), TickOutcome::Advanced);
        assert_eq!(s.obstacle().y, 3.0);
        s.tick(None, now);
        assert_eq!(s.obstacle().y, 6.0);
    }

    #[test]
    fn test_fingertip_maps_to_paddle_center() {
        let mut s = session();
        park_apart(&mut s);
        s.tick(Some(0.5), Instant::now());
        assert_eq!(s.paddle().x, 375.0);
    }

    #[test]
    fn test_paddle_clamped_at_both_ends() {
        let mut s = session();
        s.obstacle.x = 375.0;
        let now = Instant::now();
        s.tick(Some(-3.0), now);
        assert_eq!(s.paddle().x, 0.0);
        s.tick(Some(0.0), now);
        assert_eq!(s.paddle().x, 0.0);
        s.tick(Some(1.0), now);
        assert_eq!(s.paddle().x, 750.0);
        s.tick(Some(42.0), now);
        assert_eq!(s.paddle().x, 750.0);
    }

    #[test]
    fn test_missing_hand_keeps_paddle() {
        let mut s = session();
        park_apart(&mut s);
        let now = Instant::now();
        s.tick(Some(0.9), now);
        let x = s.paddle().x;
        s.tick(None, now);
        assert_eq!(s.paddle().x, x);
    }

    #[test]
    fn test_two_hundred_ticks_scores_once() {
        let mut s = session();
        park_apart(&mut s);
        let now = Instant::now();
        for _ in 0..199 {
            assert_eq!(s.tick(None, now), TickOutcome::Advanced);
        }
        assert_eq!(s.obstacle().y, 597.0);
        assert_eq!(s.score(), 0);

        assert_eq!(s.tick(None, now), TickOutcome::Scored);
        assert_eq!(s.score(), 1);
        assert_eq!(s.obstacle().y, 0.0);
        assert!(s.obstacle().x >= 0.0 && s.obstacle().x <= 750.0);
    }

    #[test]
    fn test_score_only_on_crossing() {
        let mut s = session();
        let now = Instant::now();
        let mut scored = 0;
        for _ in 0..1000 {
            // 毎 tick 障害物の反対側へ逃げる
            let away = if s.obstacle().x > 375.0 { 0.0 } else { 1.0 };
            match s.tick(Some(away), now) {
                TickOutcome::Scored => {
                    scored += 1;
                    let x = s.obstacle().x;
                    assert!((0.0..=750.0).contains(&x), "obstacle x {} out of range", x);
                }
                TickOutcome::Advanced => {}
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        assert_eq!(s.score(), scored);
        assert_eq!(scored, 5);
    }

    #[test]
    fn test_collision_enters_game_over() {
        let mut s = session();
        drop_on_paddle(&mut s);
        let now = Instant::now();
        assert_eq!(s.tick(None, now), TickOutcome::Collided);
        assert!(s.is_game_over());
        // ゲームオーバー中は自律的に遷移しない
        let y = s.obstacle().y;
        assert_eq!(s.tick(Some(0.0), now), TickOutcome::Idle);
        assert_eq!(s.obstacle().y, y);
        assert!(s.is_game_over());
    }

    #[test]
    fn test_touching_edges_does_not_collide() {
        let mut s = session();
        // 1 tick 後に障害物の下辺がパドルの上辺にちょうど接する
        s.obstacle.x = s.paddle.x;
        s.obstacle.y = s.paddle.y - s.obstacle.height - s.speed;
        assert_eq!(s.tick(None, Instant::now()), TickOutcome::Advanced);
        assert!(!s.is_game_over());
    }

    #[test]
    fn test_high_score_updates_on_game_over() {
        let mut s = session();
        s.score = 7;
        s.high_score = 5;
        drop_on_paddle(&mut s);
        let t0 = Instant::now();
        s.tick(None, t0);
        assert!(s.is_game_over());
        assert_eq!(s.high_score(), 7);

        s.restart(t0);
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.score(), 0);
        assert_eq!(s.high_score(), 7);
        assert_eq!(s.paddle().x, 375.0);
        assert_eq!(s.obstacle().y, 0.0);
    }

    #[test]
    fn test_high_score_kept_when_not_exceeded() {
        let mut s = session();
        s.score = 3;
        s.high_score = 5;
        drop_on_paddle(&mut s);
        s.tick(None, Instant::now());
        assert_eq!(s.high_score(), 5);

        s.score = 5;
        s.high_score = 5;
        s.restart(Instant::now());
        s.score = 5;
        drop_on_paddle(&mut s);
        s.tick(None, Instant::now());
        assert_eq!(s.high_score(), 5);
    }

    #[test]
    fn test_elapsed_starts_on_first_tick_and_freezes() {
        let mut s = session();
        let t0 = Instant::now();
        assert_eq!(s.elapsed(t0), Duration::ZERO);

        park_apart(&mut s);
        s.tick(None, t0);
        let t1 = t0 + Duration::from_secs(3);
        assert_eq!(s.elapsed(t1), Duration::from_secs(3));

        drop_on_paddle(&mut s);
        s.tick(None, t1);
        let t2 = t1 + Duration::from_secs(10);
        assert_eq!(s.elapsed(t2), Duration::from_secs(3));

        s.restart(t2);
        assert_eq!(s.elapsed(t2 + Duration::from_secs(1)), Duration::from_secs(1));
    }
}
