// Input events and controller descriptions exchanged with the host and the core

use super::keys::KeyModifiers;

/// A controller the host attaches to a port
///
/// The feature counts size the live input state kept for the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameController {
    pub controller_id: String,
    pub digital_button_count: u32,
    pub analog_button_count: u32,
    pub analog_stick_count: u32,
    pub accelerometer_count: u32,
    pub rel_pointer_count: u32,
    pub abs_pointer_count: u32,
    pub motor_count: u32,
}

impl GameController {
    /// Create a controller description with no features
    pub fn new(controller_id: impl Into<String>) -> Self {
        Self {
            controller_id: controller_id.into(),
            ..Default::default()
        }
    }
}

/// A single keyboard key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub pressed: bool,
    /// Host key symbol
    pub character: u32,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// Create a key press
    pub fn press(character: u32) -> Self {
        Self {
            pressed: true,
            character,
            modifiers: KeyModifiers::empty(),
        }
    }

    /// Create a key release
    pub fn release(character: u32) -> Self {
        Self {
            pressed: false,
            ..Self::press(character)
        }
    }
}

/// Payload of an input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEventKind {
    DigitalButton { pressed: bool },
    AnalogButton { magnitude: f32 },
    AnalogStick { x: f32, y: f32 },
    Accelerometer { x: f32, y: f32, z: f32 },
    Key(KeyEvent),
    RelativePointer { x: i32, y: i32 },
    AbsolutePointer { pressed: bool, x: f32, y: f32 },
    Motor { magnitude: f32 },
}

/// An input event for one feature of one controller
#[derive(Debug, Clone, PartialEq)]
pub struct GameInputEvent {
    pub controller_id: String,
    pub feature_name: String,
    pub kind: InputEventKind,
}

impl GameInputEvent {
    /// Create an event for a controller feature
    pub fn new(
        controller_id: impl Into<String>,
        feature_name: impl Into<String>,
        kind: InputEventKind,
    ) -> Self {
        Self {
            controller_id: controller_id.into(),
            feature_name: feature_name.into(),
            kind,
        }
    }

    /// Create a keyboard event
    pub fn key(key: KeyEvent) -> Self {
        Self::new("game.controller.keyboard", "", InputEventKind::Key(key))
    }
}

/// Binding description a core publishes for one of its inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    pub port: u32,
    pub device: u32,
    pub index: u32,
    pub id: u32,
    /// A missing or empty description terminates a descriptor list
    pub description: Option<String>,
}

/// Controller type a core reports as supported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDescription {
    pub description: Option<String>,
    /// Device type, optionally packed with a subclass
    pub id: u32,
}
