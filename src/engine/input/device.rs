// A controller attached to a port, or a controller record from the button map

use super::button_mapper::ButtonMapper;
use super::device_input::LibretroDeviceInput;
use super::event::{GameController, GameInputEvent};
use super::libretro::{DeviceType, LibretroFeature};
use super::topology::child_elements;
use super::translator;
use super::ButtonMapError;
use roxmltree::Node;
use std::collections::BTreeMap;

pub(crate) const BUTTONMAP_XML_ELM_CONTROLLER: &str = "controller";
const BUTTONMAP_XML_ELM_FEATURE: &str = "feature";
const BUTTONMAP_XML_ATTR_CONTROLLER_ID: &str = "id";
const BUTTONMAP_XML_ATTR_CONTROLLER_TYPE: &str = "type";
const BUTTONMAP_XML_ATTR_CONTROLLER_SUBCLASS: &str = "subclass";
const BUTTONMAP_XML_ATTR_FEATURE_NAME: &str = "name";
const BUTTONMAP_XML_ATTR_FEATURE_MAPTO: &str = "mapto";

/// Identity, feature map and live input of a libretro device
#[derive(Debug, Default)]
pub struct LibretroDevice {
    controller_id: String,
    device_type: DeviceType,
    subclass: Option<u32>,
    /// Controller feature name -> libretro feature
    features: BTreeMap<String, LibretroFeature>,
    input: LibretroDeviceInput,
}

impl LibretroDevice {
    /// Create the device for a controller the host attached to a port
    ///
    /// Type and subclass come from the button map entry for the controller id.
    pub fn new(controller: &GameController, mapper: &ButtonMapper) -> Self {
        let controller_id = controller.controller_id.clone();
        let device_type = mapper.libretro_type(&controller_id);
        let subclass = if mapper.has_subclass(&controller_id) {
            Some(mapper.subclass(&controller_id))
        } else {
            None
        };

        Self {
            controller_id,
            device_type,
            subclass,
            features: BTreeMap::new(),
            input: LibretroDeviceInput::new(controller),
        }
    }

    /// Parse a `<controller>` element of the button map
    ///
    /// Version 1 documents use the legacy type and feature vocabularies.
    /// Any missing attribute or unknown name rejects the whole record.
    pub fn deserialize(node: Node<'_, '_>, version: u32) -> Result<Self, ButtonMapError> {
        let controller_id = required_attribute(
            node,
            BUTTONMAP_XML_ELM_CONTROLLER,
            BUTTONMAP_XML_ATTR_CONTROLLER_ID,
        )?;
        let type_name = required_attribute(
            node,
            BUTTONMAP_XML_ELM_CONTROLLER,
            BUTTONMAP_XML_ATTR_CONTROLLER_TYPE,
        )?;

        let device_type = if version == 1 {
            translator::device_type_v1(type_name)
        } else {
            translator::device_type_v2(type_name)
        };

        if device_type == DeviceType::None {
            return Err(ButtonMapError::InvalidDeviceType(type_name.to_string()));
        }

        // A present attribute always marks the device as subclassed
        let subclass = node
            .attribute(BUTTONMAP_XML_ATTR_CONTROLLER_SUBCLASS)
            .map(|value| parse_leading_u32(value).unwrap_or(0));

        let mut features = BTreeMap::new();
        for child in child_elements(node, BUTTONMAP_XML_ELM_FEATURE) {
            let name = required_attribute(
                child,
                BUTTONMAP_XML_ELM_FEATURE,
                BUTTONMAP_XML_ATTR_FEATURE_NAME,
            )?;
            let mapto = required_attribute(
                child,
                BUTTONMAP_XML_ELM_FEATURE,
                BUTTONMAP_XML_ATTR_FEATURE_MAPTO,
            )?;

            let libretro_name = if version == 1 {
                translator::feature_v2(mapto)
            } else {
                mapto
            };

            let feature = LibretroFeature::from_name(libretro_name)
                .ok_or_else(|| ButtonMapError::InvalidFeature(mapto.to_string()))?;

            // Last duplicate wins
            features.insert(name.to_string(), feature);
        }

        if features.is_empty() {
            return Err(ButtonMapError::NoFeatures(controller_id.to_string()));
        }

        Ok(Self {
            controller_id: controller_id.to_string(),
            device_type,
            subclass,
            features,
            input: LibretroDeviceInput::default(),
        })
    }

    /// Controller id
    pub fn controller_id(&self) -> &str {
        &self.controller_id
    }

    /// Libretro device type
    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Check if the device has a subclass
    pub fn has_subclass(&self) -> bool {
        self.subclass.is_some()
    }

    /// Device subclass, if any
    pub fn subclass(&self) -> Option<u32> {
        self.subclass
    }

    /// Controller feature names and the libretro features they map to
    pub fn features(&self) -> &BTreeMap<String, LibretroFeature> {
        &self.features
    }

    /// Libretro feature a controller feature maps to
    pub fn feature(&self, name: &str) -> Option<LibretroFeature> {
        self.features.get(name).copied()
    }

    /// Live input state
    pub fn input(&self) -> &LibretroDeviceInput {
        &self.input
    }

    /// Route an event to the live input state
    ///
    /// Returns false if the event's feature has no libretro index.
    pub fn input_event(&self, event: &GameInputEvent, mapper: &ButtonMapper) -> bool {
        mapper
            .libretro_index(&event.controller_id, &event.feature_name)
            .map_or(false, |index| self.input.input_event(&event.kind, index))
    }
}

fn required_attribute<'a>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, ButtonMapError> {
    node.attribute(attribute)
        .ok_or(ButtonMapError::MissingAttribute { element, attribute })
}

/// Read the leading decimal digits of an attribute value
///
/// Leading whitespace and a `+` sign are skipped and parsing stops at the first
/// non-digit, so `"2.0"` reads as 2. Returns `None` if no digit follows.
/// Values past `u32::MAX` saturate.
pub(crate) fn parse_leading_u32(value: &str) -> Option<u32> {
    let trimmed = value.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }

    Some(digits[..len].bytes().fold(0u32, |acc, digit| {
        acc.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
    }))
}
