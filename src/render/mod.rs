pub mod canvas;
pub mod font;
#[cfg(feature = "desktop")]
pub mod game_view;
pub mod input;
pub mod layout;
pub mod scene;
#[cfg(feature = "desktop")]
pub mod window;

pub use canvas::Canvas;
#[cfg(feature = "desktop")]
pub use game_view::GameView;
pub use input::{restart_signal, ClickEdge, UiSignals};
pub use layout::Layout;
#[cfg(feature = "desktop")]
pub use window::MinifbRenderer;
