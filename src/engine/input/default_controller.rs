// Built-in feature table for the default controller
//
// Used for `game.controller.default` whenever the button map doesn't list it.

use super::libretro::LibretroFeature;

/// Controller id of the host's default controller
pub const DEFAULT_CONTROLLER_ID: &str = "game.controller.default";

const FEATURES: &[(&str, LibretroFeature)] = &[
    ("a", LibretroFeature::JoypadB),
    ("b", LibretroFeature::JoypadA),
    ("x", LibretroFeature::JoypadY),
    ("y", LibretroFeature::JoypadX),
    ("start", LibretroFeature::JoypadStart),
    ("back", LibretroFeature::JoypadSelect),
    ("up", LibretroFeature::JoypadUp),
    ("down", LibretroFeature::JoypadDown),
    ("right", LibretroFeature::JoypadRight),
    ("left", LibretroFeature::JoypadLeft),
    ("leftbumper", LibretroFeature::JoypadL),
    ("rightbumper", LibretroFeature::JoypadR),
    ("lefttrigger", LibretroFeature::JoypadL2),
    ("righttrigger", LibretroFeature::JoypadR2),
    ("leftthumb", LibretroFeature::JoypadL3),
    ("rightthumb", LibretroFeature::JoypadR3),
    ("leftstick", LibretroFeature::AnalogLeft),
    ("rightstick", LibretroFeature::AnalogRight),
    ("leftmotor", LibretroFeature::RumbleStrong),
    ("rightmotor", LibretroFeature::RumbleWeak),
];

/// Libretro index of a default controller feature
pub fn libretro_index(feature_name: &str) -> Option<u32> {
    FEATURES
        .iter()
        .find(|(name, _)| *name == feature_name)
        .map(|(_, feature)| feature.index())
}

/// Default controller feature mapped to a libretro feature name
pub fn controller_feature(libretro_feature: &str) -> Option<&'static str> {
    FEATURES
        .iter()
        .find(|(_, feature)| feature.name() == libretro_feature)
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_buttons_are_swapped() {
        assert_eq!(libretro_index("a"), Some(LibretroFeature::JoypadB.index()));
        assert_eq!(libretro_index("b"), Some(LibretroFeature::JoypadA.index()));
        assert_eq!(libretro_index("y"), Some(9));
    }

    #[test]
    fn test_unknown_feature() {
        assert_eq!(libretro_index("guide"), None);
        assert_eq!(controller_feature("RETRO_DEVICE_ID_MOUSE_LEFT"), None);
    }

    #[test]
    fn test_reverse_lookup() {
        assert_eq!(controller_feature("RETRO_DEVICE_ID_JOYPAD_SELECT"), Some("back"));
        assert_eq!(controller_feature("RETRO_RUMBLE_STRONG"), Some("leftmotor"));
        assert_eq!(controller_feature("RETRO_RUMBLE_WEAK"), Some("rightmotor"));
    }
}
