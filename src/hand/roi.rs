//! 追跡用ROIとレターボックスの座標変換
//!
//! ランドマークモデルは正方形入力を取るため、クロップ領域を縦横比を保って
//! 縮小し、余白をパディングする。出力座標はその逆変換でフレーム全体の
//! 正規化座標に戻す。

use super::landmark::{Hand, Landmark, LandmarkIndex};

/// クロップ領域（正規化座標 0.0〜1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// ピクセル単位の整数矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CropRegion {
    pub fn full() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.x <= 0.0 && self.y <= 0.0 && self.width >= 1.0 && self.height >= 1.0
    }

    /// フレーム内に収まるピクセル矩形に変換（最低1x1）
    pub fn to_pixels(&self, frame_w: u32, frame_h: u32) -> PixelRect {
        let fw = frame_w as i32;
        let fh = frame_h as i32;
        let x = ((self.x * frame_w as f32).round() as i32).clamp(0, (fw - 1).max(0));
        let y = ((self.y * frame_h as f32).round() as i32).clamp(0, (fh - 1).max(0));
        let width = ((self.width * frame_w as f32).round() as i32).clamp(1, (fw - x).max(1));
        let height = ((self.height * frame_h as f32).round() as i32).clamp(1, (fh - y).max(1));
        PixelRect { x, y, width, height }
    }
}

/// 前フレームの手からROIを推定
///
/// ランドマークのBBoxを中心保持で `scale` 倍した正方形（ピクセル基準）を
/// フレーム境界でクリップする。小さすぎる場合はNone。
pub fn roi_from_hand(hand: &Hand, frame_w: u32, frame_h: u32, scale: f32) -> Option<CropRegion> {
    let fw = frame_w as f32;
    let fh = frame_h as f32;
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;

    for lm in &hand.landmarks {
        let px = lm.x * fw;
        let py = lm.y * fh;
        min_x = min_x.min(px);
        min_y = min_y.min(py);
        max_x = max_x.max(px);
        max_y = max_y.max(py);
    }

    let side = (max_x - min_x).max(max_y - min_y) * scale;
    square_region((min_x + max_x) / 2.0, (min_y + max_y) / 2.0, side, frame_w, frame_h)
}

/// 中心 (cx, cy)・一辺 `side`（ピクセル）の正方形をフレーム境界でクリップ
pub fn square_region(cx: f32, cy: f32, side: f32, frame_w: u32, frame_h: u32) -> Option<CropRegion> {
    let fw = frame_w as f32;
    let fh = frame_h as f32;
    if !side.is_finite() || side < MIN_ROI_SIDE {
        return None;
    }

    let x0 = (cx - side / 2.0).max(0.0);
    let y0 = (cy - side / 2.0).max(0.0);
    let x1 = (cx + side / 2.0).min(fw);
    let y1 = (cy + side / 2.0).min(fh);
    if x1 - x0 < MIN_ROI_SIDE || y1 - y0 < MIN_ROI_SIDE {
        return None;
    }

    Some(CropRegion {
        x: x0 / fw,
        y: y0 / fh,
        width: (x1 - x0) / fw,
        height: (y1 - y0) / fh,
    })
}

/// これより小さいROIは追跡に使わない（ピクセル）
const MIN_ROI_SIDE: f32 = 16.0;

/// 縦横比を保った正方形へのレターボックス情報
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub input_size: i32,
    pub scale: f32,
    pub resized_width: i32,
    pub resized_height: i32,
    pub pad_left: i32,
    pub pad_top: i32,
}

impl Letterbox {
    pub fn new(src_w: i32, src_h: i32, input_size: i32) -> Self {
        let scale = input_size as f32 / src_w.max(src_h).max(1) as f32;
        let resized_width = ((src_w as f32 * scale).round() as i32).clamp(1, input_size);
        let resized_height = ((src_h as f32 * scale).round() as i32).clamp(1, input_size);
        Self {
            input_size,
            scale,
            resized_width,
            resized_height,
            pad_left: (input_size - resized_width) / 2,
            pad_top: (input_size - resized_height) / 2,
        }
    }

    pub fn pad_right(&self) -> i32 {
        self.input_size - self.resized_width - self.pad_left
    }

    pub fn pad_bottom(&self) -> i32 {
        self.input_size - self.resized_height - self.pad_top
    }

    /// モデル入力上のピクセル座標 → クロップ画像上のピクセル座標
    pub fn unmap(&self, lx: f32, ly: f32) -> (f32, f32) {
        (
            (lx - self.pad_left as f32) / self.scale,
            (ly - self.pad_top as f32) / self.scale,
        )
    }
}

/// モデル出力 [x0, y0, z0, x1, ...]（入力ピクセル単位）をフレーム正規化座標に戻す
pub fn remap_landmarks(
    raw: &[f32],
    letterbox: &Letterbox,
    crop: &PixelRect,
    frame_w: u32,
    frame_h: u32,
) -> Option<[Landmark; LandmarkIndex::COUNT]> {
    if raw.len() < LandmarkIndex::COUNT * 3 {
        return None;
    }
    let fw = frame_w as f32;
    let fh = frame_h as f32;
    let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
    for (i, lm) in landmarks.iter_mut().enumerate() {
        let (cx, cy) = letterbox.unmap(raw[i * 3], raw[i * 3 + 1]);
        *lm = Landmark {
            x: (crop.x as f32 + cx) / fw,
            y: (crop.y as f32 + cy) / fh,
            z: raw[i * 3 + 2] / letterbox.scale / fw,
        };
    }
    Some(landmarks)
}
