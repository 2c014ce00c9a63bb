use anyhow::{Context, Result};
use minifb::{Key, Window, WindowOptions};
use opencv::core::Mat;
use opencv::prelude::*;

use super::canvas::Canvas;
use crate::hand::skeleton::{BONE_COLOR, FINGERTIP_COLOR, FINGERTIP_RADIUS, LANDMARK_COLOR};
use crate::hand::{Hand, HAND_CONNECTIONS};

/// カメラ映像と手の骨格を表示するプレビューウィンドウ
pub struct MinifbRenderer {
    window: Window,
    canvas: Canvas,
}

impl MinifbRenderer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .with_context(|| format!("Failed to create window '{}'", title))?;

        Ok(Self {
            window,
            canvas: Canvas::new(width, height),
        })
    }

    /// ウィンドウが開いているか
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// 終了キー (Q)
    pub fn quit_requested(&self) -> bool {
        self.window.is_key_down(Key::Q)
    }

    /// BGR Mat をバッファにコピー
    pub fn draw_frame(&mut self, frame: &Mat) -> Result<()> {
        let frame_width = frame.cols() as usize;
        let frame_height = frame.rows() as usize;

        // サイズが異なる場合はクロップ/パディング
        for y in 0..self.canvas.height().min(frame_height) {
            for x in 0..self.canvas.width().min(frame_width) {
                let pixel = frame.at_2d::<opencv::core::Vec3b>(y as i32, x as i32)?;
                // BGR -> RGB -> u32
                let r = pixel[2] as u32;
                let g = pixel[1] as u32;
                let b = pixel[0] as u32;
                self.canvas.set_pixel(x as i32, y as i32, (r << 16) | (g << 8) | b);
            }
        }

        Ok(())
    }

    /// 手の骨格と人差し指の先端を描画
    pub fn draw_hand(&mut self, hand: &Hand) {
        let w = self.canvas.width() as u32;
        let h = self.canvas.height() as u32;

        for (start_idx, end_idx) in HAND_CONNECTIONS.iter() {
            let (x1, y1) = hand.get(*start_idx).to_pixel(w, h);
            let (x2, y2) = hand.get(*end_idx).to_pixel(w, h);
            self.canvas.draw_line(x1, y1, x2, y2, BONE_COLOR);
        }

        for lm in hand.landmarks.iter() {
            let (px, py) = lm.to_pixel(w, h);
            self.canvas.draw_circle(px, py, 3, LANDMARK_COLOR);
        }

        let (tx, ty) = hand.index_finger_tip().to_pixel(w, h);
        self.canvas.draw_circle(tx, ty, FINGERTIP_RADIUS, FINGERTIP_COLOR);
    }

    /// バッファをウィンドウに表示
    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(self.canvas.buffer(), self.canvas.width(), self.canvas.height())?;
        Ok(())
    }
}
