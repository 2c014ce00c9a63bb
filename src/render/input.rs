use super::layout::Layout;

/// マウスボタンの押下エッジ検出
///
/// ボタンを押し続けても1回のクリックとして扱う。
#[derive(Debug, Default)]
pub struct ClickEdge {
    was_down: bool,
}

impl ClickEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在のボタン状態を渡し、離→押の遷移ならtrue
    pub fn update(&mut self, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        pressed
    }
}

/// リスタート操作の判定
///
/// ゲームオーバー中に、押下エッジがリスタートボタン内で起きた時のみtrue。
/// カーソル位置が取れない（ウィンドウ外）押下は無視する。
pub fn restart_signal(game_over: bool, pressed: bool, pos: Option<(f32, f32)>, layout: &Layout) -> bool {
    game_over && pressed && pos.is_some_and(|(x, y)| layout.hits_restart(x, y))
}

/// 1 tick 分のUI入力
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UiSignals {
    /// ウィンドウが閉じられた、または終了キー
    pub quit: bool,
    /// ゲームオーバー中にリスタートボタンがクリックされた
    pub restart: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_edge() {
        let mut edge = ClickEdge::new();
        assert!(!edge.update(false));
        assert!(edge.update(true));
        assert!(!edge.update(true));
        assert!(!edge.update(false));
        assert!(edge.update(true));
    }

    fn button_center(layout: &Layout) -> (f32, f32) {
        let b = layout.restart_button;
        ((b.x + b.right()) / 2.0, (b.y + b.bottom()) / 2.0)
    }

    #[test]
    fn test_restart_click_in_button_during_game_over() {
        let layout = Layout::new(800, 600);
        assert!(restart_signal(true, true, Some(button_center(&layout)), &layout));
    }

    #[test]
    fn test_restart_click_ignored_while_playing() {
        let layout = Layout::new(800, 600);
        assert!(!restart_signal(false, true, Some(button_center(&layout)), &layout));
    }

    #[test]
    fn test_restart_click_outside_button_ignored() {
        let layout = Layout::new(800, 600);
        assert!(!restart_signal(true, true, Some((10.0, 10.0)), &layout));
        assert!(!restart_signal(true, true, Some((400.0, 300.0)), &layout));
    }

    #[test]
    fn test_restart_held_button_fires_once() {
        let layout = Layout::new(800, 600);
        let pos = Some(button_center(&layout));
        let mut edge = ClickEdge::new();
        let fired: Vec<bool> = [true, true, true, false, true]
            .iter()
            .map(|&down| restart_signal(true, edge.update(down), pos, &layout))
            .collect();
        assert_eq!(fired, vec![true, false, false, false, true]);
    }

    #[test]
    fn test_restart_press_without_cursor_ignored() {
        let layout = Layout::new(800, 600);
        assert!(!restart_signal(true, true, None, &layout));
    }
}
