use anyhow::{Context, Result};
use ndarray::Array4;
use opencv::{
    core::{self, AlgorithmHint, Mat, Rect, Scalar, Size, CV_32FC3},
    imgproc,
    prelude::*,
};

use super::roi::{Letterbox, PixelRect};

/// 入力テンソルの値域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelRange {
    /// 0.0〜1.0
    Unit,
    /// -1.0〜1.0
    Signed,
}

impl PixelRange {
    fn alpha_beta(self) -> (f64, f64) {
        match self {
            PixelRange::Unit => (1.0 / 255.0, 0.0),
            PixelRange::Signed => (2.0 / 255.0, -1.0),
        }
    }
}

/// フレームの一部を手モデル用の入力テンソルに変換
///
/// - ROI でクロップ
/// - BGR -> RGB
/// - 縦横比を保って縮小し、正方形に黒でパディング
/// - [1, size, size, 3] の f32 テンソル（値域は `range`）
pub fn preprocess_for_hand(
    frame: &Mat,
    roi: &PixelRect,
    input_size: i32,
    range: PixelRange,
) -> Result<(Array4<f32>, Letterbox)> {
    let cropped = Mat::roi(frame, Rect::new(roi.x, roi.y, roi.width, roi.height))
        .context("ROI outside of frame")?;

    // BGR -> RGB
    let mut rgb = Mat::default();
    imgproc::cvt_color(&*cropped, &mut rgb, imgproc::COLOR_BGR2RGB, 0, AlgorithmHint::ALGO_HINT_DEFAULT)?;

    let letterbox = Letterbox::new(roi.width, roi.height, input_size);
    let mut resized = Mat::default();
    imgproc::resize(
        &rgb,
        &mut resized,
        Size::new(letterbox.resized_width, letterbox.resized_height),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    let mut padded = Mat::default();
    core::copy_make_border(
        &resized,
        &mut padded,
        letterbox.pad_top,
        letterbox.pad_bottom(),
        letterbox.pad_left,
        letterbox.pad_right(),
        core::BORDER_CONSTANT,
        Scalar::all(0.0),
    )?;

    let (alpha, beta) = range.alpha_beta();
    let mut float_mat = Mat::default();
    padded.convert_to(&mut float_mat, CV_32FC3, alpha, beta)?;

    let size = input_size as usize;
    let mut tensor = Array4::<f32>::zeros((1, size, size, 3));

    for y in 0..input_size {
        for x in 0..input_size {
            let pixel = float_mat.at_2d::<core::Vec3f>(y, x)?;
            tensor[[0, y as usize, x as usize, 0]] = pixel[0];
            tensor[[0, y as usize, x as usize, 1]] = pixel[1];
            tensor[[0, y as usize, x as usize, 2]] = pixel[2];
        }
    }

    Ok((tensor, letterbox))
}
