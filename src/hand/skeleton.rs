use super::landmark::LandmarkIndex::{self, *};

/// 手の骨格の接続定義 (開始, 終了)。MediaPipe の HAND_CONNECTIONS と同じ。
pub const HAND_CONNECTIONS: [(LandmarkIndex, LandmarkIndex); 21] = [
    // 手のひら
    (Wrist, ThumbCmc),
    (Wrist, IndexFingerMcp),
    (IndexFingerMcp, MiddleFingerMcp),
    (MiddleFingerMcp, RingFingerMcp),
    (RingFingerMcp, PinkyMcp),
    (Wrist, PinkyMcp),
    // 親指
    (ThumbCmc, ThumbMcp),
    (ThumbMcp, ThumbIp),
    (ThumbIp, ThumbTip),
    // 人差し指
    (IndexFingerMcp, IndexFingerPip),
    (IndexFingerPip, IndexFingerDip),
    (IndexFingerDip, IndexFingerTip),
    // 中指
    (MiddleFingerMcp, MiddleFingerPip),
    (MiddleFingerPip, MiddleFingerDip),
    (MiddleFingerDip, MiddleFingerTip),
    // 薬指
    (RingFingerMcp, RingFingerPip),
    (RingFingerPip, RingFingerDip),
    (RingFingerDip, RingFingerTip),
    // 小指
    (PinkyMcp, PinkyPip),
    (PinkyPip, PinkyDip),
    (PinkyDip, PinkyTip),
];

/// 骨格線の色 (RGB)
pub const BONE_COLOR: u32 = 0xFFFFFF;

/// ランドマークの色 (RGB)
pub const LANDMARK_COLOR: u32 = 0xFF0000;

/// 指先マーカーの色 (RGB)
pub const FINGERTIP_COLOR: u32 = 0x00FF00; // 緑

pub const FINGERTIP_RADIUS: i32 = 10;
