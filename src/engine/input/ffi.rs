// Flat, C-compatible form of the controller topology
//
// Each level of the tree becomes a freshly allocated array. Strings are not
// copied: they point into the topology tree and stay valid only while the
// tree is neither cleared nor reloaded. Every array is released exactly once,
// depth first, by `free_ports`.

use super::topology::{Controller, Port};
use std::ffi::{c_char, c_uint, CStr};
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr;

/// A port in the flat topology form
#[repr(C)]
#[derive(Debug)]
pub struct GameInputPort {
    port_id: *const c_char,
    device_count: c_uint,
    accepted_devices: *mut GameInputDevice,
}

impl GameInputPort {
    /// Port identifier
    pub fn port_id(&self) -> &CStr {
        // SAFETY: `port_id` is taken from a `CString` in the topology tree,
        // which the owning `PortArray` borrows for its whole lifetime.
        unsafe { CStr::from_ptr(self.port_id) }
    }

    /// Controllers accepted by this port
    pub fn accepted_devices(&self) -> &[GameInputDevice] {
        // SAFETY: pointer and count were produced together by `alloc_devices`.
        unsafe { slice_or_empty(self.accepted_devices, self.device_count) }
    }
}

/// A controller in the flat topology form
#[repr(C)]
#[derive(Debug)]
pub struct GameInputDevice {
    controller_id: *const c_char,
    model: *const c_char,
    exclusive: bool,
    port_count: c_uint,
    available_ports: *mut GameInputPort,
}

impl GameInputDevice {
    /// Controller identifier
    pub fn controller_id(&self) -> &CStr {
        // SAFETY: see `GameInputPort::port_id`.
        unsafe { CStr::from_ptr(self.controller_id) }
    }

    /// Controller model, null when unspecified
    pub fn model(&self) -> Option<&CStr> {
        if self.model.is_null() {
            return None;
        }

        // SAFETY: see `GameInputPort::port_id`.
        Some(unsafe { CStr::from_ptr(self.model) })
    }

    /// Whether the controller excludes others from its port
    pub fn exclusive(&self) -> bool {
        self.exclusive
    }

    /// Ports this controller exposes
    pub fn available_ports(&self) -> &[GameInputPort] {
        // SAFETY: pointer and count were produced together by `alloc_ports`.
        unsafe { slice_or_empty(self.available_ports, self.port_count) }
    }
}

/// Owned flat form of a topology, borrowed from the tree it was built from
///
/// Dropping the value releases every array it allocated. Use
/// [`PortArray::into_raw`] to hand the arrays across a native boundary; the
/// receiver must then release them with [`free_ports`].
#[derive(Debug)]
pub struct PortArray<'a> {
    ports: *mut GameInputPort,
    count: c_uint,
    _topology: PhantomData<&'a [Port]>,
}

impl<'a> PortArray<'a> {
    pub(crate) fn new(ports: &'a [Port]) -> Self {
        let (ports, count) = alloc_ports(ports);
        Self {
            ports,
            count,
            _topology: PhantomData,
        }
    }

    /// Top-level ports
    pub fn as_slice(&self) -> &[GameInputPort] {
        // SAFETY: pointer and count were produced together by `alloc_ports`.
        unsafe { slice_or_empty(self.ports, self.count) }
    }

    /// Number of top-level ports
    pub fn len(&self) -> usize {
        self.count as usize
    }

    /// Check if there are no top-level ports
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Give up ownership of the arrays
    ///
    /// The strings inside still point into the topology tree.
    pub fn into_raw(self) -> (*mut GameInputPort, c_uint) {
        let array = ManuallyDrop::new(self);
        (array.ports, array.count)
    }
}

impl Drop for PortArray<'_> {
    fn drop(&mut self) {
        // SAFETY: the arrays are owned by `self` and released exactly once here.
        unsafe { free_ports(self.ports, self.count) };
    }
}

/// Release a port array obtained from [`PortArray::into_raw`]
///
/// # Safety
///
/// `ports` and `count` must come from a single call to `into_raw` and must
/// not be released twice.
pub unsafe fn free_ports(ports: *mut GameInputPort, count: c_uint) {
    if ports.is_null() {
        return;
    }

    // SAFETY: the caller guarantees this is the boxed slice built by `alloc_ports`.
    let array = unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(ports, count as usize)) };
    for port in array.iter() {
        // SAFETY: each nested array was built by `alloc_devices` and is owned by `array`.
        unsafe { free_devices(port.accepted_devices, port.device_count) };
    }
    track_release();
}

unsafe fn free_devices(devices: *mut GameInputDevice, count: c_uint) {
    if devices.is_null() {
        return;
    }

    // SAFETY: built by `alloc_devices` with exactly this count.
    let array = unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(devices, count as usize)) };
    for device in array.iter() {
        // SAFETY: each nested array was built by `alloc_ports` and is owned by `array`.
        unsafe { free_ports(device.available_ports, device.port_count) };
    }
    track_release();
}

fn alloc_ports(ports: &[Port]) -> (*mut GameInputPort, c_uint) {
    let count = c_uint::try_from(ports.len()).unwrap_or(c_uint::MAX);
    if count == 0 {
        return (ptr::null_mut(), 0);
    }

    let array: Box<[GameInputPort]> = ports
        .iter()
        .take(count as usize)
        .map(|port| {
            let (accepted_devices, device_count) = alloc_devices(port.accepts());
            GameInputPort {
                port_id: port.port_id_cstr().as_ptr(),
                device_count,
                accepted_devices,
            }
        })
        .collect();

    track_allocation();
    (Box::into_raw(array).cast::<GameInputPort>(), count)
}

fn alloc_devices(controllers: &[Controller]) -> (*mut GameInputDevice, c_uint) {
    let count = c_uint::try_from(controllers.len()).unwrap_or(c_uint::MAX);
    if count == 0 {
        return (ptr::null_mut(), 0);
    }

    let array: Box<[GameInputDevice]> = controllers
        .iter()
        .take(count as usize)
        .map(|controller| {
            let (available_ports, port_count) = alloc_ports(controller.ports());
            GameInputDevice {
                controller_id: controller.controller_id_cstr().as_ptr(),
                model: controller
                    .model_cstr()
                    .map_or(ptr::null(), |model| model.as_ptr()),
                exclusive: controller.exclusive(),
                port_count,
                available_ports,
            }
        })
        .collect();

    track_allocation();
    (Box::into_raw(array).cast::<GameInputDevice>(), count)
}

/// # Safety
///
/// `data` must be null or point to `count` initialized elements that outlive `'a`.
unsafe fn slice_or_empty<'a, T>(data: *mut T, count: c_uint) -> &'a [T] {
    if data.is_null() {
        &[]
    } else {
        // SAFETY: upheld by the caller.
        unsafe { std::slice::from_raw_parts(data, count as usize) }
    }
}

#[cfg(test)]
thread_local! {
    static LIVE_ARRAYS: std::cell::Cell<isize> = const { std::cell::Cell::new(0) };
}

/// Arrays allocated and not yet released on the current thread
#[cfg(test)]
pub(crate) fn live_arrays() -> isize {
    LIVE_ARRAYS.with(|live| live.get())
}

#[cfg(test)]
fn track_allocation() {
    LIVE_ARRAYS.with(|live| live.set(live.get() + 1));
}

#[cfg(test)]
fn track_release() {
    LIVE_ARRAYS.with(|live| live.set(live.get() - 1));
}

#[cfg(not(test))]
fn track_allocation() {}

#[cfg(not(test))]
fn track_release() {}
