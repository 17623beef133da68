// Controller topology, button maps and input routing for libretro-style emulation cores

pub mod core;
pub mod engine;

pub use engine::input::{
    ButtonMapper, ControllerTopology, GameController, GameInputEvent, InputConfig, InputManager,
    ReloadPolicy,
};
pub use engine::resources::ResourceLoader;
