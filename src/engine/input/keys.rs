// Keyboard key codes and modifier translation
//
// Host key symbols follow the SDL 1.2 numbering, as do libretro's RETROK
// codes, so most keys translate to the same value. Keys outside the known
// ranges translate to `RETROK_UNKNOWN`.

use bitflags::bitflags;

pub const RETROK_UNKNOWN: u32 = 0;
pub const KEY_BACKSPACE: u32 = 8;
pub const KEY_TAB: u32 = 9;
pub const KEY_CLEAR: u32 = 12;
pub const KEY_RETURN: u32 = 13;
pub const KEY_PAUSE: u32 = 19;
pub const KEY_ESCAPE: u32 = 27;
pub const KEY_SPACE: u32 = 32;
pub const KEY_DELETE: u32 = 127;
pub const KEY_KP0: u32 = 256;
pub const KEY_KP_EQUALS: u32 = 272;
pub const KEY_UP: u32 = 273;
pub const KEY_DOWN: u32 = 274;
pub const KEY_RIGHT: u32 = 275;
pub const KEY_LEFT: u32 = 276;
pub const KEY_INSERT: u32 = 277;
pub const KEY_HOME: u32 = 278;
pub const KEY_END: u32 = 279;
pub const KEY_PAGEUP: u32 = 280;
pub const KEY_PAGEDOWN: u32 = 281;
pub const KEY_F1: u32 = 282;
pub const KEY_F15: u32 = 296;
pub const KEY_NUMLOCK: u32 = 300;
pub const KEY_CAPSLOCK: u32 = 301;
pub const KEY_SCROLLOCK: u32 = 302;
pub const KEY_RSHIFT: u32 = 303;
pub const KEY_LSHIFT: u32 = 304;
pub const KEY_RCTRL: u32 = 305;
pub const KEY_LCTRL: u32 = 306;
pub const KEY_RALT: u32 = 307;
pub const KEY_LALT: u32 = 308;
pub const KEY_MENU: u32 = 319;

bitflags! {
    /// Modifier state reported by the host with each key event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u32 {
        const SHIFT = 0x0001;
        const CTRL = 0x0002;
        const ALT = 0x0004;
        const META = 0x0008;
        const SUPER = 0x0010;
        const NUMLOCK = 0x0100;
        const CAPSLOCK = 0x0200;
        const SCROLLOCK = 0x0400;
    }
}

bitflags! {
    /// Modifier state in libretro's `retro_mod` layout
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RetroModifiers: u16 {
        const SHIFT = 0x01;
        const CTRL = 0x02;
        const ALT = 0x04;
        const META = 0x08;
        const NUMLOCK = 0x10;
        const CAPSLOCK = 0x20;
        const SCROLLOCK = 0x40;
    }
}

const MODIFIER_TABLE: [(KeyModifiers, RetroModifiers); 8] = [
    (KeyModifiers::SHIFT, RetroModifiers::SHIFT),
    (KeyModifiers::CTRL, RetroModifiers::CTRL),
    (KeyModifiers::ALT, RetroModifiers::ALT),
    (KeyModifiers::META, RetroModifiers::META),
    (KeyModifiers::SUPER, RetroModifiers::META),
    (KeyModifiers::NUMLOCK, RetroModifiers::NUMLOCK),
    (KeyModifiers::CAPSLOCK, RetroModifiers::CAPSLOCK),
    (KeyModifiers::SCROLLOCK, RetroModifiers::SCROLLOCK),
];

/// Translate host modifiers to libretro modifiers
pub fn key_modifiers(modifiers: KeyModifiers) -> RetroModifiers {
    MODIFIER_TABLE
        .iter()
        .filter(|(host, _)| modifiers.contains(*host))
        .fold(RetroModifiers::empty(), |acc, (_, retro)| acc | *retro)
}

/// Translate a host key symbol to a libretro key code
pub fn key_code(key: u32) -> u32 {
    match key {
        KEY_BACKSPACE | KEY_TAB | KEY_CLEAR | KEY_RETURN | KEY_PAUSE | KEY_ESCAPE => key,
        KEY_SPACE..=KEY_DELETE => key,
        KEY_KP0..=KEY_KP_EQUALS => key,
        KEY_UP..=KEY_F15 => key,
        KEY_NUMLOCK..=KEY_MENU => key,
        _ => RETROK_UNKNOWN,
    }
}

/// Human-readable name of a host key, for logging
pub fn key_name(key: u32) -> String {
    let name = match key {
        KEY_BACKSPACE => "backspace",
        KEY_TAB => "tab",
        KEY_CLEAR => "clear",
        KEY_RETURN => "return",
        KEY_PAUSE => "pause",
        KEY_ESCAPE => "escape",
        KEY_SPACE => "space",
        KEY_DELETE => "delete",
        KEY_UP => "up",
        KEY_DOWN => "down",
        KEY_RIGHT => "right",
        KEY_LEFT => "left",
        KEY_INSERT => "insert",
        KEY_HOME => "home",
        KEY_END => "end",
        KEY_PAGEUP => "pageup",
        KEY_PAGEDOWN => "pagedown",
        KEY_NUMLOCK => "numlock",
        KEY_CAPSLOCK => "capslock",
        KEY_SCROLLOCK => "scrollock",
        KEY_RSHIFT => "rightshift",
        KEY_LSHIFT => "leftshift",
        KEY_RCTRL => "rightctrl",
        KEY_LCTRL => "leftctrl",
        KEY_RALT => "rightalt",
        KEY_LALT => "leftalt",
        KEY_MENU => "menu",
        KEY_F1..=KEY_F15 => return format!("f{}", key - KEY_F1 + 1),
        KEY_KP0..=265 => return format!("keypad{}", key - KEY_KP0),
        33..=126 => {
            return char::from_u32(key)
                .map(|c| c.to_string())
                .unwrap_or_default()
        }
        _ => "unknown",
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_keys_translate_verbatim() {
        assert_eq!(key_code('a' as u32), 'a' as u32);
        assert_eq!(key_code('7' as u32), '7' as u32);
        assert_eq!(key_code(KEY_RETURN), KEY_RETURN);
        assert_eq!(key_code(KEY_F1 + 4), KEY_F1 + 4);
    }

    #[test]
    fn test_unknown_keys() {
        assert_eq!(key_code(1), RETROK_UNKNOWN);
        assert_eq!(key_code(0x1000), RETROK_UNKNOWN);
        assert_eq!(key_code(297), RETROK_UNKNOWN);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(key_name('q' as u32), "q");
        assert_eq!(key_name(KEY_F1 + 11), "f12");
        assert_eq!(key_name(KEY_KP0 + 3), "keypad3");
        assert_eq!(key_name(KEY_ESCAPE), "escape");
        assert_eq!(key_name(5000), "unknown");
    }

    #[test]
    fn test_modifier_translation() {
        let host = KeyModifiers::SHIFT | KeyModifiers::CAPSLOCK;
        assert_eq!(
            key_modifiers(host),
            RetroModifiers::SHIFT | RetroModifiers::CAPSLOCK
        );
        assert_eq!(key_modifiers(KeyModifiers::SUPER), RetroModifiers::META);
        assert_eq!(key_modifiers(KeyModifiers::empty()), RetroModifiers::empty());
    }
}
