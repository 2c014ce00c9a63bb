use super::font::{glyph, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::game::Rect;

/// 0x00RRGGBB のソフトウェアフレームバッファ
pub struct Canvas {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: vec![0u32; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.buffer[y * self.width + x])
        } else {
            None
        }
    }

    pub fn fill(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// 矩形を塗りつぶす（画面外はクリップ）
    pub fn fill_rect(&mut self, rect: &Rect, color: u32) {
        let x0 = rect.x.round().max(0.0) as usize;
        let y0 = rect.y.round().max(0.0) as usize;
        let x1 = (rect.right().round().max(0.0) as usize).min(self.width);
        let y1 = (rect.bottom().round().max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            let row = y * self.width;
            self.buffer[row + x0.min(x1)..row + x1].fill(color);
        }
    }

    /// Bresenhamのアルゴリズムで線を描画
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 円を描画（塗りつぶし）
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// ビットマップフォントで文字列を描く。(x, y) は左上。
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: usize, color: u32) {
        let s = scale as i32;
        let mut cx = x;
        for ch in text.chars() {
            let rows = glyph(ch);
            for (row, bits) in rows.iter().enumerate().take(GLYPH_HEIGHT) {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    let px = cx + col as i32 * s;
                    let py = y + row as i32 * s;
                    for oy in 0..s {
                        for ox in 0..s {
                            self.set_pixel(px + ox, py + oy, color);
                        }
                    }
                }
            }
            cx += (ADVANCE * scale) as i32;
        }
    }

    /// ピクセルをセット（境界チェック付き）
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0xFF0000;

    #[test]
    fn test_fill_rect_clips() {
        let mut c = Canvas::new(10, 10);
        c.fill_rect(&Rect::new(-5.0, 8.0, 8.0, 8.0), RED);
        assert_eq!(c.pixel(0, 8), Some(RED));
        assert_eq!(c.pixel(2, 9), Some(RED));
        assert_eq!(c.pixel(3, 9), Some(0));
        assert_eq!(c.pixel(0, 7), Some(0));
    }

    #[test]
    fn test_fill_rect_fully_outside() {
        let mut c = Canvas::new(10, 10);
        c.fill_rect(&Rect::new(20.0, 20.0, 5.0, 5.0), RED);
        c.fill_rect(&Rect::new(-20.0, -20.0, 5.0, 5.0), RED);
        assert!(c.buffer().iter().all(|p| *p == 0));
    }

    #[test]
    fn test_draw_line_endpoints() {
        let mut c = Canvas::new(10, 10);
        c.draw_line(1, 1, 8, 5, RED);
        assert_eq!(c.pixel(1, 1), Some(RED));
        assert_eq!(c.pixel(8, 5), Some(RED));
    }

    #[test]
    fn test_draw_circle_center_and_outside() {
        let mut c = Canvas::new(20, 20);
        c.draw_circle(10, 10, 3, RED);
        assert_eq!(c.pixel(10, 10), Some(RED));
        assert_eq!(c.pixel(13, 10), Some(RED));
        assert_eq!(c.pixel(13, 13), Some(0));
    }

    #[test]
    fn test_draw_text_scaled() {
        let mut c = Canvas::new(40, 20);
        // 'T' の1行目は全点灯
        c.draw_text("T", 0, 0, 2, RED);
        assert_eq!(c.pixel(0, 0), Some(RED));
        assert_eq!(c.pixel(9, 1), Some(RED));
        assert_eq!(c.pixel(10, 0), Some(0));
        // 縦棒は中央列
        assert_eq!(c.pixel(4, 12), Some(RED));
        assert_eq!(c.pixel(0, 12), Some(0));
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_ignored() {
        let mut c = Canvas::new(4, 4);
        c.set_pixel(-1, 0, RED);
        c.set_pixel(4, 0, RED);
        c.set_pixel(0, 4, RED);
        assert!(c.buffer().iter().all(|p| *p == 0));
    }
}
