pub mod appearance;
pub mod drag;
pub mod hotkey;
pub mod model;
pub mod view;

pub use appearance::{AppearancePlan, FontSize, HudElement};
pub use drag::{DragController, Point};
pub use hotkey::{KeyPress, Shortcut, Visibility};
pub use model::{HudFrame, HudModel};
pub use view::{BarView, MatchStatus, MatchView, MemberView, PLACEHOLDER, PlayerView};
