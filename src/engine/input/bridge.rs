// Callbacks between the input subsystem, the emulation core and the host

use super::event::{GameInputEvent, InputEventKind};
use super::keys::RetroModifiers;
use super::libretro::{
    DeviceType, RumbleEffect, MAX_RUMBLE_STRENGTH, RETRO_DEVICE_ID_ANALOG_X,
    RETRO_DEVICE_ID_ANALOG_Y, RETRO_DEVICE_ID_MOUSE_X, RETRO_DEVICE_ID_MOUSE_Y,
    RETRO_DEVICE_ID_POINTER_PRESSED, RETRO_DEVICE_ID_POINTER_X, RETRO_DEVICE_ID_POINTER_Y,
    RETRO_DEVICE_MASK, RETRO_SENSOR_ACCELEROMETER_X, RETRO_SENSOR_ACCELEROMETER_Y,
    RETRO_SENSOR_ACCELEROMETER_Z,
};
use super::manager::{read, InputManager};
use super::translator;
use crate::core::math;
use log::debug;
use std::sync::Arc;

/// Receives keyboard events on behalf of the emulation core
pub trait ClientBridge: Send + Sync {
    fn keyboard_event(&self, down: bool, keycode: u32, character: u32, modifiers: RetroModifiers);
}

/// The host side of the input subsystem
pub trait Frontend: Send + Sync {
    /// Deliver an event, such as a rumble motor change, to the host
    fn input_event(&self, address: &str, event: &GameInputEvent) -> bool;
}

/// Answers the input callbacks of the emulation core
pub struct FrontendBridge {
    manager: Arc<InputManager>,
    frontend: Option<Arc<dyn Frontend>>,
}

impl FrontendBridge {
    /// Create a bridge over an input manager
    pub fn new(manager: Arc<InputManager>, frontend: Option<Arc<dyn Frontend>>) -> Self {
        Self { manager, frontend }
    }

    /// Input manager the bridge polls
    pub fn manager(&self) -> &Arc<InputManager> {
        &self.manager
    }

    /// Polled input state in libretro ranges
    ///
    /// Buttons are 0 or 1, analog axes span the signed 16-bit range with Y
    /// pointing up, pointer coordinates span `[-0x7fff, 0x7fff]`. Anything
    /// unknown or absent reads as 0.
    pub fn input_state(&self, port: u32, device: u32, index: u32, id: u32) -> i16 {
        let device = device & RETRO_DEVICE_MASK;

        match DeviceType::from_id(device) {
            DeviceType::Joypad => i16::from(self.manager.button_state(device, port, id)),
            DeviceType::Mouse | DeviceType::Lightgun => match id {
                RETRO_DEVICE_ID_MOUSE_X => saturate(self.manager.delta_x(device, port)),
                RETRO_DEVICE_ID_MOUSE_Y => saturate(self.manager.delta_y(device, port)),
                _ => i16::from(self.manager.button_state(device, port, id)),
            },
            DeviceType::Analog => match self.manager.analog_stick_state(port, index) {
                Some((x, _)) if id == RETRO_DEVICE_ID_ANALOG_X => math::axis_to_i16(x),
                // Y axis is inverted
                Some((_, y)) if id == RETRO_DEVICE_ID_ANALOG_Y => math::axis_to_i16(-y),
                _ => 0,
            },
            DeviceType::Pointer => match self.manager.absolute_pointer_state(port, index) {
                Some((x, _)) if id == RETRO_DEVICE_ID_POINTER_X => math::pointer_to_i16(x),
                Some((_, y)) if id == RETRO_DEVICE_ID_POINTER_Y => math::pointer_to_i16(y),
                Some(_) if id == RETRO_DEVICE_ID_POINTER_PRESSED => 1,
                _ => 0,
            },
            DeviceType::Keyboard | DeviceType::None => 0,
        }
    }

    /// One accelerometer axis, 0.0 if there is no reading
    pub fn sensor_get_input(&self, port: u32, id: u32) -> f32 {
        let Some((x, y, z)) = self.manager.accelerometer_state(port) else {
            return 0.0;
        };

        match id {
            RETRO_SENSOR_ACCELEROMETER_X => x,
            RETRO_SENSOR_ACCELEROMETER_Y => y,
            RETRO_SENSOR_ACCELEROMETER_Z => z,
            _ => 0.0,
        }
    }

    /// Forward a rumble request to the host as a motor event
    ///
    /// Returns false if there is no host to forward to.
    pub fn rumble_set_state(&self, port: u32, effect: RumbleEffect, strength: u16) -> bool {
        let Some(frontend) = &self.frontend else {
            return false;
        };

        let controller_id = self.manager.controller_id(port);
        let motor = translator::motor_name(effect);
        let feature_name = read(self.manager.button_mapper())
            .controller_feature(&controller_id, motor)
            .unwrap_or_default();
        let magnitude = f32::from(strength) / f32::from(MAX_RUMBLE_STRENGTH);

        let event = GameInputEvent::new(
            controller_id,
            feature_name,
            InputEventKind::Motor {
                magnitude: math::clamp(magnitude, 0.0, 1.0),
            },
        );

        let address = i32::try_from(port)
            .map(|port| self.manager.address(port))
            .unwrap_or_default();

        debug!(
            "Rumble {} on \"{}\" ({})",
            motor, address, event.feature_name
        );
        frontend.input_event(&address, &event);
        true
    }
}

fn saturate(value: i32) -> i16 {
    math::clamp(value, i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}
