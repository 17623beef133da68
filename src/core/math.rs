// Math utilities for converting polled input to libretro value ranges

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Convert an analog axis in `[-1.0, 1.0]` to the signed 16-bit libretro range
///
/// Out-of-range input is clamped first so the result never wraps.
pub fn axis_to_i16(value: f32) -> i16 {
    let normalized = (clamp(value, -1.0, 1.0) + 1.0) / 2.0;
    let scaled = (normalized * 65535.0) as i32 - 0x8000;
    clamp(scaled, i16::MIN as i32, i16::MAX as i32) as i16
}

/// Convert an absolute pointer coordinate in `[-1.0, 1.0]` to the libretro pointer range
pub fn pointer_to_i16(value: f32) -> i16 {
    (clamp(value, -1.0, 1.0) * 32767.0) as i16
}
