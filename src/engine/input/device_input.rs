// Live input state of a controller attached to a port

use super::event::{GameController, InputEventKind};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Analog buttons count as pressed past this magnitude
const ANALOG_PRESS_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AbsolutePointer {
    pressed: bool,
    x: f32,
    y: f32,
}

#[derive(Debug, Default)]
struct InputState {
    /// Digital and analog buttons, indexed by libretro id
    buttons: Vec<bool>,
    analog_sticks: Vec<(f32, f32)>,
    accelerometers: Vec<(f32, f32, f32)>,
    /// Deltas accumulated since the last poll
    relative_pointers: Vec<(i32, i32)>,
    absolute_pointers: Vec<AbsolutePointer>,
}

/// Input state for one attached controller
///
/// Sized from the feature counts of the controller. Events arrive on the
/// host's event thread while the core polls from its own thread, so all
/// state sits behind one lock.
#[derive(Debug, Default)]
pub struct LibretroDeviceInput {
    state: Mutex<InputState>,
}

impl LibretroDeviceInput {
    /// Create input state sized for a controller
    pub fn new(controller: &GameController) -> Self {
        let button_count = controller.digital_button_count + controller.analog_button_count;

        let state = InputState {
            buttons: vec![false; button_count as usize],
            analog_sticks: vec![(0.0, 0.0); controller.analog_stick_count as usize],
            accelerometers: vec![(0.0, 0.0, 0.0); controller.accelerometer_count as usize],
            relative_pointers: vec![(0, 0); controller.rel_pointer_count as usize],
            absolute_pointers: vec![AbsolutePointer::default(); controller.abs_pointer_count as usize],
        };

        Self {
            state: Mutex::new(state),
        }
    }

    /// Store an event at a libretro index
    ///
    /// Returns false if the index is out of range for the event's feature
    /// type. Keys and motors are never handled here.
    pub fn input_event(&self, kind: &InputEventKind, index: u32) -> bool {
        let index = index as usize;
        let mut state = self.lock();

        match *kind {
            InputEventKind::DigitalButton { pressed } => {
                set_at(&mut state.buttons, index, pressed)
            }
            InputEventKind::AnalogButton { magnitude } => {
                set_at(&mut state.buttons, index, magnitude > ANALOG_PRESS_THRESHOLD)
            }
            InputEventKind::AnalogStick { x, y } => set_at(&mut state.analog_sticks, index, (x, y)),
            InputEventKind::Accelerometer { x, y, z } => {
                set_at(&mut state.accelerometers, index, (x, y, z))
            }
            InputEventKind::RelativePointer { x, y } => match state.relative_pointers.get_mut(index) {
                Some(delta) => {
                    delta.0 = delta.0.saturating_add(x);
                    delta.1 = delta.1.saturating_add(y);
                    true
                }
                None => false,
            },
            InputEventKind::AbsolutePointer { pressed, x, y } => set_at(
                &mut state.absolute_pointers,
                index,
                AbsolutePointer { pressed, x, y },
            ),
            InputEventKind::Key(_) | InputEventKind::Motor { .. } => false,
        }
    }

    /// Check if the button at a libretro index is pressed
    pub fn button_state(&self, index: u32) -> bool {
        self.lock()
            .buttons
            .get(index as usize)
            .copied()
            .unwrap_or(false)
    }

    /// Position of an analog stick
    pub fn analog_stick_state(&self, index: u32) -> Option<(f32, f32)> {
        self.lock().analog_sticks.get(index as usize).copied()
    }

    /// Take the horizontal delta accumulated since the last call
    pub fn relative_pointer_delta_x(&self) -> i32 {
        self.lock()
            .relative_pointers
            .first_mut()
            .map_or(0, |delta| std::mem::take(&mut delta.0))
    }

    /// Take the vertical delta accumulated since the last call
    pub fn relative_pointer_delta_y(&self) -> i32 {
        self.lock()
            .relative_pointers
            .first_mut()
            .map_or(0, |delta| std::mem::take(&mut delta.1))
    }

    /// Position of an absolute pointer, only while it is pressed
    pub fn absolute_pointer_state(&self, index: u32) -> Option<(f32, f32)> {
        self.lock()
            .absolute_pointers
            .get(index as usize)
            .filter(|pointer| pointer.pressed)
            .map(|pointer| (pointer.x, pointer.y))
    }

    /// Reading of the first accelerometer
    pub fn accelerometer_state(&self) -> Option<(f32, f32, f32)> {
        self.lock().accelerometers.first().copied()
    }

    fn lock(&self) -> MutexGuard<'_, InputState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn set_at<T>(slots: &mut [T], index: usize, value: T) -> bool {
    match slots.get_mut(index) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}
