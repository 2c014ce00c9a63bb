use std::thread;
use std::time::{Duration, Instant};

/// 固定 tick レートの上限制御
///
/// 前回の `wait` からの経過が1 tick未満なら残りを sleep する。
pub struct TickLimiter {
    frame_duration: Duration,
    last: Instant,
}

impl TickLimiter {
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame_duration: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            last: Instant::now(),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// 次の tick まで待つ
    pub fn wait(&mut self) {
        let remaining = remaining(self.last.elapsed(), self.frame_duration);
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
        self.last = Instant::now();
    }
}

/// 1 tick の残り時間
pub fn remaining(elapsed: Duration, frame_duration: Duration) -> Duration {
    frame_duration.saturating_sub(elapsed)
}

/// 1秒ごとのFPS計測
pub struct FpsCounter {
    frame_count: u32,
    timer: Instant,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            timer: Instant::now(),
        }
    }

    /// 1フレーム数え、1秒経過していればFPSを返してリセット
    pub fn tick(&mut self) -> Option<f32> {
        self.frame_count += 1;
        let elapsed = self.timer.elapsed().as_secs_f32();
        if elapsed < 1.0 {
            return None;
        }
        let fps = self.frame_count as f32 / elapsed;
        self.frame_count = 0;
        self.timer = Instant::now();
        Some(fps)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
