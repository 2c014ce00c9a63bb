//! 手のひら検出（SSD）の出力デコード
//!
//! 手のひら検出モデルは固定アンカーごとに `[dx, dy, w, h, kp0x, kp0y, ...]`
//! （入力ピクセル単位）とロジットのスコアを出す。最もスコアの高い1件だけを
//! 取り出し、ランドマークモデル用のROIに変換する。

use super::roi::{square_region, CropRegion, Letterbox};

/// 正規化座標のアンカー中心（サイズは固定 1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

/// 入力正方形に対する SSD アンカーを生成
///
/// 連続する同じストライドのレイヤーはまとめて1つの特徴マップになり、
/// レイヤーごとにセルあたり2個（アスペクト比 1.0 と補間スケール）のアンカーを持つ。
pub fn generate_anchors(input_size: i32, strides: &[i32]) -> Vec<Anchor> {
    let mut anchors = Vec::new();
    let mut layer = 0;
    while layer < strides.len() {
        let stride = strides[layer];
        let mut per_cell = 0;
        while layer < strides.len() && strides[layer] == stride {
            per_cell += 2;
            layer += 1;
        }
        if stride <= 0 {
            continue;
        }

        let grid = (input_size + stride - 1) / stride;
        for y in 0..grid {
            for x in 0..grid {
                let anchor = Anchor {
                    x: (x as f32 + 0.5) / grid as f32,
                    y: (y as f32 + 0.5) / grid as f32,
                };
                anchors.extend(std::iter::repeat(anchor).take(per_cell));
            }
        }
    }
    anchors
}

/// 入力正規化座標の検出結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPalm {
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
    pub score: f32,
}

/// フレームピクセル座標の手のひらBBox
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PalmBox {
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
    pub score: f32,
}

impl RawPalm {
    /// レターボックスを戻してフレームピクセル座標へ（フレーム全体を入力した場合）
    pub fn to_frame(&self, letterbox: &Letterbox) -> PalmBox {
        let size = letterbox.input_size as f32;
        let (cx, cy) = letterbox.unmap(self.cx * size, self.cy * size);
        PalmBox {
            cx,
            cy,
            width: self.width * size / letterbox.scale,
            height: self.height * size / letterbox.scale,
            score: self.score,
        }
    }
}

/// 最もスコアの高いアンカーを `min_score` 以上なら返す
///
/// `boxes` はアンカー数 × 要素数のフラット配列、`scores` はアンカーごとのロジット。
/// 長さが合わない場合はNone。
pub fn decode_best(
    boxes: &[f32],
    scores: &[f32],
    anchors: &[Anchor],
    input_size: i32,
    min_score: f32,
) -> Option<RawPalm> {
    if anchors.is_empty() || scores.len() != anchors.len() || boxes.len() % anchors.len() != 0 {
        return None;
    }
    let stride = boxes.len() / anchors.len();
    if stride < 4 {
        return None;
    }

    let (idx, score) = scores
        .iter()
        .map(|&s| sigmoid(s.clamp(-100.0, 100.0)))
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))?;
    if score < min_score {
        return None;
    }

    let size = input_size as f32;
    let raw = &boxes[idx * stride..idx * stride + 4];
    let anchor = anchors[idx];
    Some(RawPalm {
        cx: raw[0] / size + anchor.x,
        cy: raw[1] / size + anchor.y,
        width: raw[2] / size,
        height: raw[3] / size,
        score,
    })
}

/// 手のひらBBoxから手全体を覆うROIを作る
///
/// 長辺を `scale` 倍した正方形を、指の方向（画像上方）へ高さ×`shift_y` ずらす。
pub fn roi_from_palm(palm: &PalmBox, frame_w: u32, frame_h: u32, scale: f32, shift_y: f32) -> Option<CropRegion> {
    let side = palm.width.max(palm.height) * scale;
    let cy = palm.cy - palm.height * shift_y;
    square_region(palm.cx, cy, side, frame_w, frame_h)
}

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
