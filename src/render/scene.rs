use std::time::Duration;

use super::canvas::Canvas;
use super::layout::{Layout, BUTTON_SCALE, GAME_OVER_TEXT, HUD_SCALE, RESTART_TEXT, TITLE_SCALE};
use crate::game::GameSession;

pub const BACKGROUND_COLOR: u32 = 0x000000;
pub const PADDLE_COLOR: u32 = 0xFFFFFF;
pub const OBSTACLE_COLOR: u32 = 0xFF0000;
pub const TEXT_COLOR: u32 = 0xFFFFFF;
pub const BUTTON_COLOR: u32 = 0x0000FF;

/// セッションの現在状態をキャンバスに描く
pub fn draw_game(canvas: &mut Canvas, layout: &Layout, session: &GameSession, elapsed: Duration) {
    canvas.fill(BACKGROUND_COLOR);
    canvas.fill_rect(session.paddle(), PADDLE_COLOR);
    canvas.fill_rect(session.obstacle(), OBSTACLE_COLOR);

    let (x, y) = layout.score;
    canvas.draw_text(&format!("Score: {}", session.score()), x, y, HUD_SCALE, TEXT_COLOR);
    let (x, y) = layout.high_score;
    canvas.draw_text(&format!("High Score: {}", session.high_score()), x, y, HUD_SCALE, TEXT_COLOR);
    let (x, y) = layout.time;
    canvas.draw_text(&format!("Time: {}s", elapsed.as_secs()), x, y, HUD_SCALE, TEXT_COLOR);

    if session.is_game_over() {
        let (x, y) = layout.title;
        canvas.draw_text(GAME_OVER_TEXT, x, y, TITLE_SCALE, TEXT_COLOR);
        canvas.fill_rect(&layout.restart_button, BUTTON_COLOR);
        let (x, y) = layout.restart_label;
        canvas.draw_text(RESTART_TEXT, x, y, BUTTON_SCALE, TEXT_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Instant;

    fn center_of(r: &crate::game::Rect) -> (usize, usize) {
        ((r.x + r.width / 2.0) as usize, (r.y + r.height / 2.0) as usize)
    }

    #[test]
    fn test_draws_paddle_and_obstacle() {
        let session = GameSession::with_seed(&Config::default(), 1);
        let layout = Layout::new(800, 600);
        let mut canvas = Canvas::new(800, 600);
        draw_game(&mut canvas, &layout, &session, Duration::ZERO);

        let (px, py) = center_of(session.paddle());
        assert_eq!(canvas.pixel(px, py), Some(PADDLE_COLOR));
        let o = session.obstacle();
        assert_eq!(canvas.pixel(o.x as usize + 1, o.y as usize + 45), Some(OBSTACLE_COLOR));
        // ボタンはゲームオーバー時のみ
        let (bx, by) = (layout.restart_button.x as usize + 1, layout.restart_button.y as usize + 1);
        assert_ne!(canvas.pixel(bx, by), Some(BUTTON_COLOR));
    }

    #[test]
    fn test_game_over_overlay() {
        let config = Config::default();
        let mut session = GameSession::with_seed(&config, 1);
        let now = Instant::now();
        // 障害物の列へパドルを動かし、落ちてくるまで待つ
        let target = (session.obstacle().x + 25.0) / 800.0;
        while !session.is_game_over() {
            session.tick(Some(target), now);
        }
        let layout = Layout::new(800, 600);
        let mut canvas = Canvas::new(800, 600);
        draw_game(&mut canvas, &layout, &session, session.elapsed(now));

        let (bx, by) = (layout.restart_button.x as usize + 1, layout.restart_button.y as usize + 1);
        assert_eq!(canvas.pixel(bx, by), Some(BUTTON_COLOR));
    }
}
