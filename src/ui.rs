pub mod actions;
mod app;
pub mod interaction;
mod render;
mod scene;
pub mod signals;
mod toolbar;
mod widget;

pub use actions::{Action, ActionSet, ZoomAction};
pub use app::{ViewerOptions, run};
pub use interaction::events::{CanvasButton, CanvasEvent, CanvasEventKind, CanvasModifiers};
pub use interaction::roi::{ImageRect, PixelRect, SelectionState};
pub use render::RenderBackend;
pub use scene::{Scene, SceneItem, TransformationMode};
pub use signals::{ConnectionId, RoiSelected, Signal, ZoomChanged};
pub use toolbar::{CLEAR_ROI_COMMAND, SELECT_ROI_COMMAND, Toolbar, ToolbarItem};
pub use widget::{IntoDisplayImage, ZoomableImage, ZoomableImageResponse};
