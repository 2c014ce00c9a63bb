use anyhow::Result;
use std::time::Instant;

use fingertip_dodge::camera::OpenCvCamera;
use fingertip_dodge::clock::{FpsCounter, TickLimiter};
use fingertip_dodge::config::Config;
use fingertip_dodge::game::{GameSession, TickOutcome};
use fingertip_dodge::hand::HandDetector;
use fingertip_dodge::render::{GameView, MinifbRenderer};
use fingertip_dodge::tracker::Smoother;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("fingertip_dodge {}", env!("GIT_VERSION"));
    let config = Config::load_or_default(CONFIG_PATH);
    config.validate()?;

    // カメラとウィンドウはスコープ終了時（エラー経路を含む）に Drop で解放される
    let mut camera = OpenCvCamera::from_config(&config.camera)?;
    let (width, height) = camera.resolution();

    log::info!(
        "loading palm detection model from {} and hand landmark model from {}",
        config.palm.model_path,
        config.hand.model_path
    );
    let mut detector = HandDetector::new(&config.hand, &config.palm)?;

    let mut game_view = GameView::new(&config.window)?;
    let mut preview = MinifbRenderer::new(&config.window.preview_title, width as usize, height as usize)?;
    log::info!(
        "game window {}x{}, target {} fps",
        config.window.width,
        config.window.height,
        config.app.target_fps
    );

    run(&config, &mut camera, &mut detector, &mut game_view, &mut preview);

    log::info!("shutting down");
    Ok(())
}

fn run(
    config: &Config,
    camera: &mut OpenCvCamera,
    detector: &mut HandDetector,
    game_view: &mut GameView,
    preview: &mut MinifbRenderer,
) {
    let mut session = GameSession::new(config);
    let mut smoother = Smoother::from_config(&config.smooth);
    let mut limiter = TickLimiter::new(config.app.target_fps);
    let mut fps = FpsCounter::new();
    let mut hand_visible = false;

    loop {
        // 1. UI入力
        let ui = game_view.poll(session.is_game_over());
        if ui.quit {
            log::info!("game window closed");
            break;
        }
        if ui.restart {
            session.restart(Instant::now());
            log::info!("restarted (high score {})", session.high_score());
        }

        // 2. フレーム取得。失敗したらセッション終了
        let frame = match camera.next_frame() {
            Ok(f) => f,
            Err(e) => {
                log::warn!("camera stream ended: {:#}", e);
                break;
            }
        };

        // 3. 手の検出。推論エラーはその tick だけ「手なし」扱い
        let hand = match detector.detect(&frame) {
            Ok(h) => h,
            Err(e) => {
                log::warn!("hand detection failed: {:#}", e);
                detector.reset();
                None
            }
        };
        if hand.is_some() != hand_visible {
            hand_visible = hand.is_some();
            log::debug!(
                "hand {} (roi tracking: {})",
                if hand_visible { "acquired" } else { "lost" },
                detector.is_tracking()
            );
        }

        // 4. 平滑化（見失ったらリセット）
        let fingertip_x = smoother.update(hand.as_ref().map(|h| h.index_finger_tip().x));

        // 5. ゲーム更新と描画
        let now = Instant::now();
        match session.tick(fingertip_x, now) {
            TickOutcome::Collided => {
                if session.score() > 0 && session.score() == session.high_score() {
                    log::info!("game over: score {} (new high score)", session.score());
                } else {
                    log::info!("game over: score {} (high score {})", session.score(), session.high_score());
                }
            }
            TickOutcome::Scored => log::debug!("obstacle avoided, score {}", session.score()),
            TickOutcome::Advanced | TickOutcome::Idle => {}
        }
        if !keep_running("game window update", game_view.render(&session, session.elapsed(now))) {
            break;
        }

        // 6. プレビュー
        if !keep_running("preview frame conversion", preview.draw_frame(&frame)) {
            break;
        }
        if let Some(ref hand) = hand {
            preview.draw_hand(hand);
        }
        if !keep_running("preview window update", preview.update()) {
            break;
        }

        // 7. tick レート制御
        limiter.wait();
        if let Some(rate) = fps.tick() {
            if config.debug.show_fps {
                log::info!("FPS: {:.1}", rate);
            } else {
                log::debug!("FPS: {:.1}", rate);
            }
        }

        // 8. 終了キー
        if !preview.is_open() || preview.quit_requested() {
            log::info!("quit requested from preview window");
            break;
        }
    }
}

/// 描画系の失敗はセッション終了（カメラ読み取り失敗と同じく正常終了）
fn keep_running(step: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{} failed: {:#}", step, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_ends_session_without_propagating() {
        assert!(keep_running("game window update", Ok(())));
        assert!(!keep_running("game window update", Err(anyhow::anyhow!("window closed"))));
    }
}
