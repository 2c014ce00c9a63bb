use super::font::{text_height, text_width};
use crate::game::Rect;

pub const HUD_SCALE: usize = 3;
pub const TITLE_SCALE: usize = 8;
pub const BUTTON_SCALE: usize = 4;
/// ボタン枠とラベルの余白
pub const BUTTON_PADDING: f32 = 8.0;

pub const GAME_OVER_TEXT: &str = "Game Over";
pub const RESTART_TEXT: &str = "Restart";

/// ゲーム画面の固定レイアウト
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub score: (i32, i32),
    pub high_score: (i32, i32),
    pub time: (i32, i32),
    pub title: (i32, i32),
    pub restart_label: (i32, i32),
    pub restart_button: Rect,
}

impl Layout {
    pub fn new(width: usize, height: usize) -> Self {
        let cx = width as f32 / 2.0;
        let cy = height as f32 / 2.0;

        let title_w = text_width(GAME_OVER_TEXT, TITLE_SCALE) as f32;
        let title_h = text_height(TITLE_SCALE) as f32;

        let label_w = text_width(RESTART_TEXT, BUTTON_SCALE) as f32;
        let label_h = text_height(BUTTON_SCALE) as f32;
        let restart_button = Rect::centered(
            cx,
            cy + 50.0,
            label_w + BUTTON_PADDING * 2.0,
            label_h + BUTTON_PADDING * 2.0,
        );

        Self {
            score: (10, 10),
            high_score: (10, 50),
            time: (10, 90),
            title: ((cx - title_w / 2.0) as i32, (cy - title_h / 2.0) as i32),
            restart_label: (
                (restart_button.x + BUTTON_PADDING) as i32,
                (restart_button.y + BUTTON_PADDING) as i32,
            ),
            restart_button,
        }
    }

    pub fn hits_restart(&self, x: f32, y: f32) -> bool {
        self.restart_button.contains(x, y)
    }
}
