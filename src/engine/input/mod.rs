// Input handling system
//
// Decides which controllers may occupy which ports of the emulated system and
// routes host input to the device sitting in each port.
//
// ## Architecture
//
// - `topology`: Port/controller tree loaded from `topology.xml`
// - `ffi`: Flat array form of the topology for native callers
// - `button_mapper`: Controller records loaded from `buttonmap.xml`
// - `device`: A controller attached to a port, with its feature map
// - `device_input`: Live input state of an attached controller
// - `keyboard`: Keys currently held, for polling
// - `manager`: Port registry and event/poll routing
// - `bridge`: Entry points the emulation core calls back into
// - `libretro`, `translator`, `keys`, `default_controller`: Name tables
//
// ## Usage Example
//
// ```rust
// use retro_input::engine::input::{InputConfig, InputManager, GameController};
//
// let manager = InputManager::from_config(&InputConfig::new("resources"));
// manager.load_resources()?;
//
// manager.set_controller("1/game.controller.snes", Some(&GameController::new("game.controller.snes")));
// let pressed = manager.button_state(1, 0, 8);
// ```

pub mod bridge;
pub mod button_mapper;
pub mod config;
pub mod default_controller;
pub mod device;
pub mod device_input;
pub mod event;
pub mod ffi;
pub mod keyboard;
pub mod keys;
pub mod libretro;
pub mod manager;
pub mod topology;
pub mod translator;

use crate::engine::resources::ResourceError;

// Re-export commonly used types
pub use bridge::{ClientBridge, Frontend, FrontendBridge};
pub use button_mapper::ButtonMapper;
pub use config::{InputConfig, ReloadPolicy};
pub use device::LibretroDevice;
pub use device_input::LibretroDeviceInput;
pub use event::{
    ControllerDescription, GameController, GameInputEvent, InputDescriptor, InputEventKind,
    KeyEvent,
};
pub use ffi::{free_ports, GameInputDevice, GameInputPort, PortArray};
pub use keyboard::PressedKeys;
pub use libretro::{DeviceType, LibretroFeature, RumbleEffect};
pub use manager::{InputManager, PORT_MOUSE};
pub use topology::{Controller, ControllerTopology, Port};

/// Topology document errors
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Can't find root <{0}> tag")]
    MissingRoot(&'static str),

    #[error("Can't find <{0}> tag")]
    MissingElement(&'static str),

    #[error("<{element}> tag has no \"{attribute}\" attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Could not locate controller topology \"{0}\"")]
    NotFound(String),

    #[error("Attribute contains an interior NUL byte")]
    InteriorNul(#[from] std::ffi::NulError),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Button map document errors
#[derive(Debug, thiserror::Error)]
pub enum ButtonMapError {
    #[error("Can't find root <{0}> tag")]
    MissingRoot(&'static str),

    #[error("Can't find <{0}> tag")]
    MissingElement(&'static str),

    #[error("<{element}> tag has no \"{attribute}\" attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("<controller> tag has invalid device type: \"{0}\"")]
    InvalidDeviceType(String),

    #[error("Can't find <feature> tag for controller \"{0}\"")]
    NoFeatures(String),

    #[error("<feature> tag has invalid \"mapto\" attribute: \"{0}\"")]
    InvalidFeature(String),

    #[error("Could not locate buttonmap \"{0}\"")]
    NotFound(String),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TopologyError::MissingAttribute {
            element: "port",
            attribute: "id",
        };
        assert_eq!(err.to_string(), "<port> tag has no \"id\" attribute");

        let err = ButtonMapError::InvalidFeature("RETRO_DEVICE_ID_JOYPAD_Z".to_string());
        assert!(err.to_string().contains("RETRO_DEVICE_ID_JOYPAD_Z"));
    }

    #[test]
    fn test_resource_error_converts() {
        let err: TopologyError = ResourceError::NotFound("topology.xml".to_string()).into();
        assert!(matches!(err, TopologyError::Resource(_)));
    }
}
