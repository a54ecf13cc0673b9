pub mod components;
mod entity;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod timers;

pub use entity::{AsAny, Component, ComponentContext, Entity, EntityId};
pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    Color, DrawCommand, FrameRenderer, Particle, PixelCanvas, RecordingRenderer, Renderer,
    SpriteCache, SpriteKeyError,
};
pub use scene::{Scene, SceneCommand, SceneWorld, Vec2, WorldView};
pub use timers::DeferredTimers;
