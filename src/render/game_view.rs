use anyhow::{Context, Result};
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};
use std::time::Duration;

use super::canvas::Canvas;
use super::input::{restart_signal, ClickEdge, UiSignals};
use super::layout::Layout;
use super::scene::draw_game;
use crate::config::WindowConfig;
use crate::game::GameSession;

/// ゲーム本体のウィンドウ
pub struct GameView {
    window: Window,
    canvas: Canvas,
    layout: Layout,
    click: ClickEdge,
}

impl GameView {
    pub fn new(config: &WindowConfig) -> Result<Self> {
        let window = Window::new(
            &config.title,
            config.width,
            config.height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .with_context(|| format!("Failed to create window '{}'", config.title))?;

        Ok(Self {
            window,
            canvas: Canvas::new(config.width, config.height),
            layout: Layout::new(config.width, config.height),
            click: ClickEdge::new(),
        })
    }

    /// ウィンドウイベントを読む
    pub fn poll(&mut self, game_over: bool) -> UiSignals {
        let quit = !self.window.is_open() || self.window.is_key_down(Key::Escape);

        // マウスは tick ごとのサンプリング。minifb にマウスイベントのキューは無く、
        // 1 tick（推論時間込み）より短いクリックは取りこぼす
        let pressed = self.click.update(self.window.get_mouse_down(MouseButton::Left));
        let pos = self.window.get_mouse_pos(MouseMode::Discard);
        let restart = restart_signal(game_over, pressed, pos, &self.layout);

        UiSignals { quit, restart }
    }

    pub fn render(&mut self, session: &GameSession, elapsed: Duration) -> Result<()> {
        draw_game(&mut self.canvas, &self.layout, session, elapsed);
        self.window
            .update_with_buffer(self.canvas.buffer(), self.canvas.width(), self.canvas.height())?;
        Ok(())
    }
}
