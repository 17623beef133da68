// Libretro device types, feature identifiers and device-type packing

/// Bits of a device id holding the base device type
pub const RETRO_DEVICE_MASK: u32 = 0xff;

/// Shift applied to a subclass when packed into a device id
pub const RETRO_DEVICE_TYPE_SHIFT: u32 = 8;

/// Pack a base device type and a subclass into one device id
pub const fn subclass_id(base: u32, subclass: u32) -> u32 {
    ((subclass + 1) << RETRO_DEVICE_TYPE_SHIFT) | base
}

/// Split a packed device id into its base type and optional subclass
pub const fn split_device_id(id: u32) -> (u32, Option<u32>) {
    let base = id & RETRO_DEVICE_MASK;
    if id & !RETRO_DEVICE_MASK != 0 {
        (base, Some((id >> RETRO_DEVICE_TYPE_SHIFT) - 1))
    } else {
        (base, None)
    }
}

/// Libretro base device classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum DeviceType {
    #[default]
    None,
    Joypad,
    Mouse,
    Keyboard,
    Lightgun,
    Analog,
    Pointer,
}

impl DeviceType {
    /// Every device class that carries input
    pub const ALL: [DeviceType; 6] = [
        DeviceType::Joypad,
        DeviceType::Mouse,
        DeviceType::Keyboard,
        DeviceType::Lightgun,
        DeviceType::Analog,
        DeviceType::Pointer,
    ];

    /// Numeric libretro id
    pub const fn id(self) -> u32 {
        match self {
            DeviceType::None => 0,
            DeviceType::Joypad => 1,
            DeviceType::Mouse => 2,
            DeviceType::Keyboard => 3,
            DeviceType::Lightgun => 4,
            DeviceType::Analog => 5,
            DeviceType::Pointer => 6,
        }
    }

    /// Look up a device class from its numeric id, ignoring any subclass bits
    pub fn from_id(id: u32) -> DeviceType {
        let base = id & RETRO_DEVICE_MASK;
        Self::ALL
            .into_iter()
            .find(|device| device.id() == base)
            .unwrap_or(DeviceType::None)
    }

    /// Name used by version 2 button maps (`RETRO_DEVICE_JOYPAD`, ...)
    pub const fn name(self) -> &'static str {
        match self {
            DeviceType::None => "RETRO_DEVICE_NONE",
            DeviceType::Joypad => "RETRO_DEVICE_JOYPAD",
            DeviceType::Mouse => "RETRO_DEVICE_MOUSE",
            DeviceType::Keyboard => "RETRO_DEVICE_KEYBOARD",
            DeviceType::Lightgun => "RETRO_DEVICE_LIGHTGUN",
            DeviceType::Analog => "RETRO_DEVICE_ANALOG",
            DeviceType::Pointer => "RETRO_DEVICE_POINTER",
        }
    }

    /// Name used by version 1 button maps (`joypad`, ...)
    pub const fn legacy_name(self) -> &'static str {
        match self {
            DeviceType::None => "none",
            DeviceType::Joypad => "joypad",
            DeviceType::Mouse => "mouse",
            DeviceType::Keyboard => "keyboard",
            DeviceType::Lightgun => "lightgun",
            DeviceType::Analog => "analog",
            DeviceType::Pointer => "pointer",
        }
    }
}

/// Analog axis ids
pub const RETRO_DEVICE_ID_ANALOG_X: u32 = 0;
pub const RETRO_DEVICE_ID_ANALOG_Y: u32 = 1;

/// Pointer ids
pub const RETRO_DEVICE_ID_POINTER_X: u32 = 0;
pub const RETRO_DEVICE_ID_POINTER_Y: u32 = 1;
pub const RETRO_DEVICE_ID_POINTER_PRESSED: u32 = 2;

/// Mouse and lightgun share their X/Y ids
pub const RETRO_DEVICE_ID_MOUSE_X: u32 = 0;
pub const RETRO_DEVICE_ID_MOUSE_Y: u32 = 1;

/// Accelerometer sensor ids
pub const RETRO_SENSOR_ACCELEROMETER_X: u32 = 0;
pub const RETRO_SENSOR_ACCELEROMETER_Y: u32 = 1;
pub const RETRO_SENSOR_ACCELEROMETER_Z: u32 = 2;

/// Rumble motors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RumbleEffect {
    Strong,
    Weak,
}

impl RumbleEffect {
    /// Feature a rumble motor is mapped through
    pub const fn feature(self) -> LibretroFeature {
        match self {
            RumbleEffect::Strong => LibretroFeature::RumbleStrong,
            RumbleEffect::Weak => LibretroFeature::RumbleWeak,
        }
    }
}

/// Largest strength a core can request for a rumble motor
pub const MAX_RUMBLE_STRENGTH: u16 = 0xffff;

macro_rules! features {
    ($( $variant:ident => ($name:literal, $legacy:literal, $index:expr) ),+ $(,)?) => {
        /// Abstract libretro features that a controller's physical features map onto
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum LibretroFeature {
            $( $variant, )+
        }

        impl LibretroFeature {
            /// Every known feature
            pub const ALL: &'static [LibretroFeature] = &[ $( LibretroFeature::$variant, )+ ];

            /// Name used by version 2 button maps
            pub const fn name(self) -> &'static str {
                match self {
                    $( LibretroFeature::$variant => $name, )+
                }
            }

            /// Name used by version 1 button maps
            pub const fn legacy_name(self) -> &'static str {
                match self {
                    $( LibretroFeature::$variant => $legacy, )+
                }
            }

            /// Libretro id or index the feature is reported under
            pub const fn index(self) -> u32 {
                match self {
                    $( LibretroFeature::$variant => $index, )+
                }
            }
        }
    };
}

features! {
    JoypadB => ("RETRO_DEVICE_ID_JOYPAD_B", "b", 0),
    JoypadY => ("RETRO_DEVICE_ID_JOYPAD_Y", "y", 1),
    JoypadSelect => ("RETRO_DEVICE_ID_JOYPAD_SELECT", "select", 2),
    JoypadStart => ("RETRO_DEVICE_ID_JOYPAD_START", "start", 3),
    JoypadUp => ("RETRO_DEVICE_ID_JOYPAD_UP", "up", 4),
    JoypadDown => ("RETRO_DEVICE_ID_JOYPAD_DOWN", "down", 5),
    JoypadLeft => ("RETRO_DEVICE_ID_JOYPAD_LEFT", "left", 6),
    JoypadRight => ("RETRO_DEVICE_ID_JOYPAD_RIGHT", "right", 7),
    JoypadA => ("RETRO_DEVICE_ID_JOYPAD_A", "a", 8),
    JoypadX => ("RETRO_DEVICE_ID_JOYPAD_X", "x", 9),
    JoypadL => ("RETRO_DEVICE_ID_JOYPAD_L", "l", 10),
    JoypadR => ("RETRO_DEVICE_ID_JOYPAD_R", "r", 11),
    JoypadL2 => ("RETRO_DEVICE_ID_JOYPAD_L2", "l2", 12),
    JoypadR2 => ("RETRO_DEVICE_ID_JOYPAD_R2", "r2", 13),
    JoypadL3 => ("RETRO_DEVICE_ID_JOYPAD_L3", "l3", 14),
    JoypadR3 => ("RETRO_DEVICE_ID_JOYPAD_R3", "r3", 15),
    AnalogLeft => ("RETRO_DEVICE_INDEX_ANALOG_LEFT", "leftstick", 0),
    AnalogRight => ("RETRO_DEVICE_INDEX_ANALOG_RIGHT", "rightstick", 1),
    Mouse => ("RETRO_DEVICE_MOUSE", "mouse", 0),
    MouseLeft => ("RETRO_DEVICE_ID_MOUSE_LEFT", "mouseleft", 2),
    MouseRight => ("RETRO_DEVICE_ID_MOUSE_RIGHT", "mouseright", 3),
    MouseWheelUp => ("RETRO_DEVICE_ID_MOUSE_WHEELUP", "wheelup", 4),
    MouseWheelDown => ("RETRO_DEVICE_ID_MOUSE_WHEELDOWN", "wheeldown", 5),
    MouseMiddle => ("RETRO_DEVICE_ID_MOUSE_MIDDLE", "mousemiddle", 6),
    MouseHorizWheelUp => ("RETRO_DEVICE_ID_MOUSE_HORIZ_WHEELUP", "horizwheelup", 7),
    MouseHorizWheelDown => ("RETRO_DEVICE_ID_MOUSE_HORIZ_WHEELDOWN", "horizwheeldown", 8),
    Lightgun => ("RETRO_DEVICE_LIGHTGUN", "lightgun", 0),
    LightgunTrigger => ("RETRO_DEVICE_ID_LIGHTGUN_TRIGGER", "trigger", 2),
    LightgunCursor => ("RETRO_DEVICE_ID_LIGHTGUN_CURSOR", "cursor", 3),
    LightgunTurbo => ("RETRO_DEVICE_ID_LIGHTGUN_TURBO", "turbo", 4),
    LightgunPause => ("RETRO_DEVICE_ID_LIGHTGUN_PAUSE", "pause", 5),
    LightgunStart => ("RETRO_DEVICE_ID_LIGHTGUN_START", "lightgunstart", 6),
    Pointer => ("RETRO_DEVICE_POINTER", "pointer", 0),
    Accelerometer => ("RETRO_SENSOR_ACCELEROMETER", "accelerometer", 0),
    RumbleStrong => ("RETRO_RUMBLE_STRONG", "strong", 0),
    RumbleWeak => ("RETRO_RUMBLE_WEAK", "weak", 1),
}

impl LibretroFeature {
    /// Look up a feature by its version 2 name
    pub fn from_name(name: &str) -> Option<LibretroFeature> {
        Self::ALL.iter().copied().find(|feature| feature.name() == name)
    }

    /// Look up a feature by its version 1 name
    pub fn from_legacy_name(name: &str) -> Option<LibretroFeature> {
        Self::ALL
            .iter()
            .copied()
            .find(|feature| feature.legacy_name() == name)
    }
}
