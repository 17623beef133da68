// Name translation between button map vocabularies and libretro identifiers

use super::libretro::{
    DeviceType, LibretroFeature, RumbleEffect, RETRO_DEVICE_ID_ANALOG_X, RETRO_DEVICE_ID_ANALOG_Y,
    RETRO_DEVICE_ID_POINTER_PRESSED,
};

/// Resolve a version 1 device type name (`joypad`, `analog`, ...)
pub fn device_type_v1(name: &str) -> DeviceType {
    DeviceType::ALL
        .into_iter()
        .find(|device| device.legacy_name() == name)
        .unwrap_or(DeviceType::None)
}

/// Resolve a version 2 device type name (`RETRO_DEVICE_JOYPAD`, ...)
pub fn device_type_v2(name: &str) -> DeviceType {
    DeviceType::ALL
        .into_iter()
        .find(|device| device.name() == name)
        .unwrap_or(DeviceType::None)
}

/// Translate a version 1 feature name to its version 2 name
///
/// Unknown names translate to an empty string, which no feature lookup accepts.
pub fn feature_v2(legacy: &str) -> &'static str {
    LibretroFeature::from_legacy_name(legacy)
        .map(LibretroFeature::name)
        .unwrap_or("")
}

/// Libretro index of a version 2 feature name
pub fn feature_index_v2(name: &str) -> Option<u32> {
    LibretroFeature::from_name(name).map(LibretroFeature::index)
}

/// Feature name a rumble motor is mapped through
pub fn motor_name(effect: RumbleEffect) -> &'static str {
    effect.feature().name()
}

/// Name of a numeric device type, ignoring subclass bits
pub fn device_name(device: u32) -> &'static str {
    DeviceType::from_id(device).name()
}

/// Name of the feature a descriptor refers to
pub fn feature_name(device: u32, index: u32, id: u32) -> &'static str {
    let device_type = DeviceType::from_id(device);

    let matches = |feature: &LibretroFeature| -> bool {
        let family = match device_type {
            DeviceType::Joypad => feature.name().starts_with("RETRO_DEVICE_ID_JOYPAD_"),
            DeviceType::Analog => feature.name().starts_with("RETRO_DEVICE_INDEX_ANALOG_"),
            DeviceType::Mouse => feature.name().starts_with("RETRO_DEVICE_ID_MOUSE_"),
            DeviceType::Lightgun => feature.name().starts_with("RETRO_DEVICE_ID_LIGHTGUN_"),
            _ => false,
        };
        let key = if device_type == DeviceType::Analog { index } else { id };
        family && feature.index() == key
    };

    match device_type {
        DeviceType::Mouse if id == 0 => "RETRO_DEVICE_ID_MOUSE_X",
        DeviceType::Mouse if id == 1 => "RETRO_DEVICE_ID_MOUSE_Y",
        DeviceType::Lightgun if id == 0 => "RETRO_DEVICE_ID_LIGHTGUN_X",
        DeviceType::Lightgun if id == 1 => "RETRO_DEVICE_ID_LIGHTGUN_Y",
        DeviceType::Pointer => match id {
            0 => "RETRO_DEVICE_ID_POINTER_X",
            1 => "RETRO_DEVICE_ID_POINTER_Y",
            RETRO_DEVICE_ID_POINTER_PRESSED => "RETRO_DEVICE_ID_POINTER_PRESSED",
            _ => "",
        },
        _ => LibretroFeature::ALL
            .iter()
            .copied()
            .find(|feature| matches(feature))
            .map(LibretroFeature::name)
            .unwrap_or(""),
    }
}

/// Name of the axis component an analog descriptor refers to
///
/// Only analog sticks have components; every other device yields an empty string.
pub fn component_name(device: u32, index: u32, id: u32) -> &'static str {
    if DeviceType::from_id(device) != DeviceType::Analog || index > 1 {
        return "";
    }

    match id {
        RETRO_DEVICE_ID_ANALOG_X => "RETRO_DEVICE_ID_ANALOG_X",
        RETRO_DEVICE_ID_ANALOG_Y => "RETRO_DEVICE_ID_ANALOG_Y",
        _ => "",
    }
}
