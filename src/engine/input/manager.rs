// Input manager - port registry and routing of events and polls

use super::bridge::ClientBridge;
use super::button_mapper::ButtonMapper;
use super::config::InputConfig;
use super::device::LibretroDevice;
use super::event::{ControllerDescription, GameController, GameInputEvent, InputDescriptor, InputEventKind};
use super::keyboard::PressedKeys;
use super::keys;
use super::libretro::{self, DeviceType};
use super::topology::ControllerTopology;
use super::translator;
use crate::engine::resources::ResourceLoader;
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Reserved port number of the mouse pseudo-device
pub const PORT_MOUSE: i32 = -2;

/// Reserved address of the mouse pseudo-device
pub const MOUSE_ADDRESS: &str = "-2/game.controller.mouse";

/// Routes host input to the devices attached to each port
///
/// Attach/detach and document loads take write locks; events and polls only
/// read the registry. Every method takes `&self`, so the manager can be
/// shared between the event thread and the polling thread.
pub struct InputManager {
    config: InputConfig,

    topology: Arc<RwLock<ControllerTopology>>,

    button_mapper: Arc<RwLock<ButtonMapper>>,

    /// Port number -> attached device
    devices: RwLock<BTreeMap<i32, Arc<LibretroDevice>>>,

    /// Keyboard keys held down, for polling
    pressed_keys: PressedKeys,

    /// Receives keyboard events for the emulation core
    client_bridge: RwLock<Option<Arc<dyn ClientBridge>>>,
}

impl InputManager {
    /// Create an input manager over a topology and a button map
    pub fn new(
        topology: Arc<RwLock<ControllerTopology>>,
        button_mapper: Arc<RwLock<ButtonMapper>>,
    ) -> Self {
        Self {
            config: InputConfig::default(),
            topology,
            button_mapper,
            devices: RwLock::new(BTreeMap::new()),
            pressed_keys: PressedKeys::new(),
            client_bridge: RwLock::new(None),
        }
    }

    /// Create an input manager with empty documents, to be filled by
    /// [`InputManager::load_resources`]
    pub fn from_config(config: &InputConfig) -> Self {
        Self {
            config: config.clone(),
            ..Self::default()
        }
    }

    /// Load the topology and the button map named by the configuration
    pub fn load_resources(&self) -> Result<()> {
        let loader = ResourceLoader::new(&self.config.resource_path);

        let port_count = write(&self.topology)
            .load_topology(
                &loader,
                &self.config.topology_file,
                self.config.reload_policy,
            )
            .with_context(|| format!("Failed to load {}", self.config.topology_file))?;

        let controller_count = write(&self.button_mapper)
            .load_button_map(&loader, &self.config.buttonmap_file)
            .with_context(|| format!("Failed to load {}", self.config.buttonmap_file))?;

        info!(
            "Loaded input resources: {} ports, {} button map entries",
            port_count, controller_count
        );
        Ok(())
    }

    /// Configuration the manager was built from
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Shared controller topology
    pub fn topology(&self) -> &Arc<RwLock<ControllerTopology>> {
        &self.topology
    }

    /// Shared button map
    pub fn button_mapper(&self) -> &Arc<RwLock<ButtonMapper>> {
        &self.button_mapper
    }

    /// Install or remove the receiver of keyboard events
    pub fn set_client_bridge(&self, bridge: Option<Arc<dyn ClientBridge>>) {
        *self
            .client_bridge
            .write()
            .unwrap_or_else(PoisonError::into_inner) = bridge;
    }

    /// Device types the input subsystem can emulate
    pub fn device_caps(&self) -> u32 {
        [
            DeviceType::Joypad,
            DeviceType::Mouse,
            DeviceType::Keyboard,
            DeviceType::Lightgun,
            DeviceType::Analog,
            DeviceType::Pointer,
        ]
        .iter()
        .fold(0, |caps, device| caps | 1 << device.id())
    }

    /// Resolve an address to a port number
    ///
    /// Returns [`PORT_MOUSE`] for the mouse address, 0 for every address when
    /// no topology is configured, the leading digit minus one otherwise, and
    /// `None` if the address can't be resolved.
    pub fn port_number(&self, address: &str) -> Option<i32> {
        if address == MOUSE_ADDRESS {
            return Some(PORT_MOUSE);
        }

        if read(&self.topology).port_count() == 0 {
            return Some(0);
        }

        match address.as_bytes().first().copied() {
            Some(digit @ b'1'..=b'9') => Some(i32::from(digit - b'1')),
            _ => None,
        }
    }

    /// Address of the device in a port, empty if the port is free
    ///
    /// Not an inverse of [`InputManager::port_number`]: the address is built
    /// from the port number as-is.
    pub fn address(&self, port: i32) -> String {
        self.device(port)
            .map(|device| format!("{}/{}", port, device.controller_id()))
            .unwrap_or_default()
    }

    /// Attach a controller to the port an address resolves to, or free the
    /// port if `controller` is `None`
    ///
    /// Returns false, leaving the registry untouched, if the address doesn't
    /// resolve.
    pub fn set_controller(&self, address: &str, controller: Option<&GameController>) -> bool {
        let Some(port) = self.port_number(address) else {
            return false;
        };

        match controller {
            Some(controller) => {
                let device = LibretroDevice::new(controller, &read(&self.button_mapper));
                debug!(
                    "Attached \"{}\" to port {} as {}",
                    controller.controller_id,
                    port,
                    device.device_type().name()
                );
                write(&self.devices).insert(port, Arc::new(device));
            }
            None => {
                debug!("Detached controller from port {}", port);
                write(&self.devices).remove(&port);
            }
        }

        true
    }

    /// Libretro device type at an address, with the subclass packed in
    pub fn device_type(&self, address: &str) -> u32 {
        let Some(device) = self.port_number(address).and_then(|port| self.device(port)) else {
            return DeviceType::None.id();
        };

        match device.subclass() {
            Some(subclass) => libretro::subclass_id(device.device_type().id(), subclass),
            None => device.device_type().id(),
        }
    }

    /// Detach every device, leaving the topology alone
    pub fn close_ports(&self) {
        write(&self.devices).clear();
    }

    /// Deliver a host input event
    ///
    /// Keyboard events are always handled: they go to the client bridge and
    /// into the pressed-key set. Other events go to the device at the
    /// address; returns false if there is none or it ignored the event.
    pub fn input_event(&self, address: &str, event: &GameInputEvent) -> bool {
        if let InputEventKind::Key(key) = event.kind {
            if let Some(bridge) = self.client_bridge() {
                let keycode = keys::key_code(key.character);
                let modifiers = keys::key_modifiers(key.modifiers);

                debug!(
                    "Key {}: {} (host key: 0x{:04x}, RETROK: 0x{:04x}, modifiers: 0x{:02x})",
                    if key.pressed { "down" } else { "up" },
                    keys::key_name(key.character),
                    key.character,
                    keycode,
                    modifiers.bits()
                );

                bridge.keyboard_event(key.pressed, keycode, key.character, modifiers);
            }

            self.pressed_keys.handle_press(&key);
            return true;
        }

        let Some(device) = self.port_number(address).and_then(|port| self.device(port)) else {
            return false;
        };

        device.input_event(event, &read(&self.button_mapper))
    }

    /// Check if a key is held down
    pub fn is_pressed(&self, character: u32) -> bool {
        self.pressed_keys.is_pressed(character)
    }

    /// Button state of a device
    ///
    /// Keyboard buttons are looked up by character in the pressed-key set,
    /// mouse buttons on the mouse pseudo-port.
    pub fn button_state(&self, device: u32, port: u32, id: u32) -> bool {
        if device == DeviceType::Keyboard.id() {
            return self.is_pressed(id);
        }

        self.polled_device(device, port)
            .map_or(false, |device| device.input().button_state(id))
    }

    /// Horizontal pointer movement since the last poll
    pub fn delta_x(&self, device: u32, port: u32) -> i32 {
        self.polled_device(device, port)
            .map_or(0, |device| device.input().relative_pointer_delta_x())
    }

    /// Vertical pointer movement since the last poll
    pub fn delta_y(&self, device: u32, port: u32) -> i32 {
        self.polled_device(device, port)
            .map_or(0, |device| device.input().relative_pointer_delta_y())
    }

    /// Position of an analog stick
    pub fn analog_stick_state(&self, port: u32, index: u32) -> Option<(f32, f32)> {
        self.port_device(port)?.input().analog_stick_state(index)
    }

    /// Position of a pressed absolute pointer
    pub fn absolute_pointer_state(&self, port: u32, index: u32) -> Option<(f32, f32)> {
        self.port_device(port)?.input().absolute_pointer_state(index)
    }

    /// Accelerometer reading
    pub fn accelerometer_state(&self, port: u32) -> Option<(f32, f32, f32)> {
        self.port_device(port)?.input().accelerometer_state()
    }

    /// Controller id of the device in a port, empty if the port is free
    pub fn controller_id(&self, port: u32) -> String {
        self.port_device(port)
            .map(|device| device.controller_id().to_string())
            .unwrap_or_default()
    }

    /// Log the input bindings a core publishes
    ///
    /// The list ends at the first descriptor without a description. Returns
    /// the number of descriptors logged.
    pub fn log_input_descriptors(&self, descriptors: &[InputDescriptor]) -> usize {
        debug!("Libretro input bindings:");
        debug!("------------------------------------------------------------");

        let mut count = 0;
        for descriptor in descriptors {
            let Some(description) = descriptor.description.as_deref().filter(|d| !d.is_empty())
            else {
                break;
            };

            let device = translator::device_name(descriptor.device);
            let feature =
                translator::feature_name(descriptor.device, descriptor.index, descriptor.id);
            let component =
                translator::component_name(descriptor.device, descriptor.index, descriptor.id);

            if component.is_empty() {
                debug!(
                    "Port: {}, Device: {}, Feature: {}, Description: {}",
                    descriptor.port, device, feature, description
                );
            } else {
                debug!(
                    "Port: {}, Device: {}, Feature: {}, Component: {}, Description: {}",
                    descriptor.port, device, feature, component, description
                );
            }
            count += 1;
        }

        debug!("------------------------------------------------------------");
        count
    }

    /// Log the controller types a core supports
    pub fn set_controller_info(&self, types: &[ControllerDescription]) {
        debug!("Libretro controller info:");
        debug!("------------------------------------------------------------");

        for controller in types {
            let description = controller.description.as_deref().unwrap_or_default();
            let (base, subclass) = libretro::split_device_id(controller.id);

            match subclass {
                Some(subclass) => debug!(
                    "Device: {}, Subclass: {}, Description: \"{}\"",
                    translator::device_name(base),
                    subclass,
                    description
                ),
                None => debug!(
                    "Device: {}, Description: \"{}\"",
                    translator::device_name(base),
                    description
                ),
            }
        }

        debug!("------------------------------------------------------------");
    }

    fn device(&self, port: i32) -> Option<Arc<LibretroDevice>> {
        read(&self.devices).get(&port).cloned()
    }

    fn port_device(&self, port: u32) -> Option<Arc<LibretroDevice>> {
        i32::try_from(port).ok().and_then(|port| self.device(port))
    }

    // Mouse state always lives on the mouse pseudo-port
    fn polled_device(&self, device: u32, port: u32) -> Option<Arc<LibretroDevice>> {
        if device == DeviceType::Mouse.id() {
            self.device(PORT_MOUSE)
        } else {
            self.port_device(port)
        }
    }

    fn client_bridge(&self) -> Option<Arc<dyn ClientBridge>> {
        self.client_bridge
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(
            Arc::new(RwLock::new(ControllerTopology::new())),
            Arc::new(RwLock::new(ButtonMapper::new())),
        )
    }
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
