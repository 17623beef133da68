// Button map: controller records loaded from `buttonmap.xml`

use super::default_controller::{self, DEFAULT_CONTROLLER_ID};
use super::device::{parse_leading_u32, LibretroDevice, BUTTONMAP_XML_ELM_CONTROLLER};
use super::libretro::DeviceType;
use super::topology::child_elements;
use super::translator;
use super::ButtonMapError;
use crate::engine::resources::ResourceLoader;
use log::{debug, error, warn};
use roxmltree::{Document, Node};

/// Default file name of the button map document
pub const BUTTONMAP_XML: &str = "buttonmap.xml";

const BUTTONMAP_XML_ROOT: &str = "buttonmap";
const BUTTONMAP_XML_ATTR_VERSION: &str = "version";

/// Version assumed when the document doesn't declare one
const DEFAULT_VERSION: u32 = 1;

/// Controller records from the button map, in document order
#[derive(Debug, Default)]
pub struct ButtonMapper {
    devices: Vec<LibretroDevice>,
}

impl ButtonMapper {
    /// Create an empty button map
    pub fn new() -> Self {
        Self::default()
    }

    /// Locate and load the button map document
    ///
    /// The current records are dropped first. Returns the number of
    /// controller records loaded; any failing record rejects the document.
    pub fn load_button_map(
        &mut self,
        loader: &ResourceLoader,
        file_name: &str,
    ) -> Result<usize, ButtonMapError> {
        self.devices.clear();

        let result = Self::read_document(loader, file_name).and_then(|xml| Self::parse(&xml));
        self.commit(result)
    }

    /// Load the button map from an in-memory document
    pub fn load_from_str(&mut self, xml: &str) -> Result<usize, ButtonMapError> {
        self.devices.clear();
        self.commit(Self::parse(xml))
    }

    /// Parse the `<buttonmap>` root element
    pub fn deserialize(root: Node<'_, '_>) -> Result<Vec<LibretroDevice>, ButtonMapError> {
        if !root.has_tag_name(BUTTONMAP_XML_ROOT) {
            return Err(ButtonMapError::MissingRoot(BUTTONMAP_XML_ROOT));
        }

        let version = match root.attribute(BUTTONMAP_XML_ATTR_VERSION) {
            Some(value) => match parse_leading_u32(value) {
                Some(version) => {
                    debug!("Detected buttonmap version {}", version);
                    version
                }
                None => {
                    warn!(
                        "Invalid buttonmap version \"{}\", defaulting to version {}",
                        value, DEFAULT_VERSION
                    );
                    DEFAULT_VERSION
                }
            },
            None => {
                debug!("No version detected, defaulting to version {}", DEFAULT_VERSION);
                DEFAULT_VERSION
            }
        };

        let mut devices = Vec::new();
        for child in child_elements(root, BUTTONMAP_XML_ELM_CONTROLLER) {
            devices.push(LibretroDevice::deserialize(child, version)?);
        }

        if devices.is_empty() {
            return Err(ButtonMapError::MissingElement(BUTTONMAP_XML_ELM_CONTROLLER));
        }

        debug!("Loaded buttonmap at version {}", version);
        Ok(devices)
    }

    /// Loaded controller records
    pub fn devices(&self) -> &[LibretroDevice] {
        &self.devices
    }

    /// Check if the button map has a record for a controller
    pub fn has_controller(&self, controller_id: &str) -> bool {
        self.device(controller_id).is_some()
    }

    /// Libretro device type of a controller
    ///
    /// The default controller is always an analog device.
    pub fn libretro_type(&self, controller_id: &str) -> DeviceType {
        if controller_id == DEFAULT_CONTROLLER_ID {
            return DeviceType::Analog;
        }

        self.device(controller_id)
            .map_or(DeviceType::None, LibretroDevice::device_type)
    }

    /// Check if a controller's record declares a subclass
    pub fn has_subclass(&self, controller_id: &str) -> bool {
        if controller_id == DEFAULT_CONTROLLER_ID {
            return false;
        }

        self.device(controller_id)
            .map_or(false, LibretroDevice::has_subclass)
    }

    /// Subclass of a controller, zero if it has none
    pub fn subclass(&self, controller_id: &str) -> u32 {
        self.device(controller_id)
            .and_then(LibretroDevice::subclass)
            .unwrap_or(0)
    }

    /// Libretro index of a controller feature
    pub fn libretro_index(&self, controller_id: &str, feature_name: &str) -> Option<u32> {
        if controller_id.is_empty() || feature_name.is_empty() {
            return None;
        }

        if self.uses_default_table(controller_id) {
            return default_controller::libretro_index(feature_name);
        }

        self.device(controller_id)
            .and_then(|device| device.feature(feature_name))
            .and_then(|feature| translator::feature_index_v2(feature.name()))
    }

    /// Controller feature mapped to a libretro feature name
    pub fn controller_feature(&self, controller_id: &str, libretro_feature: &str) -> Option<String> {
        if controller_id.is_empty() || libretro_feature.is_empty() {
            return None;
        }

        if self.uses_default_table(controller_id) {
            return default_controller::controller_feature(libretro_feature).map(str::to_string);
        }

        self.device(controller_id).and_then(|device| {
            device
                .features()
                .iter()
                .find(|(_, feature)| feature.name() == libretro_feature)
                .map(|(name, _)| name.clone())
        })
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.devices.clear();
    }

    fn device(&self, controller_id: &str) -> Option<&LibretroDevice> {
        self.devices
            .iter()
            .find(|device| device.controller_id() == controller_id)
    }

    // The default controller uses the built-in table unless the button map overrides it
    fn uses_default_table(&self, controller_id: &str) -> bool {
        controller_id == DEFAULT_CONTROLLER_ID && !self.has_controller(DEFAULT_CONTROLLER_ID)
    }

    fn read_document(loader: &ResourceLoader, file_name: &str) -> Result<String, ButtonMapError> {
        let Some(path) = loader.locate(file_name) else {
            return Err(ButtonMapError::NotFound(file_name.to_string()));
        };

        debug!("Loading libretro buttonmap {}", path.display());
        Ok(loader.load_string(file_name)?)
    }

    fn parse(xml: &str) -> Result<Vec<LibretroDevice>, ButtonMapError> {
        let document = Document::parse(xml)?;
        Self::deserialize(document.root_element())
    }

    fn commit(
        &mut self,
        result: Result<Vec<LibretroDevice>, ButtonMapError>,
    ) -> Result<usize, ButtonMapError> {
        match result {
            Ok(devices) => {
                self.devices = devices;
                Ok(self.devices.len())
            }
            Err(err) => {
                error!("Failed to load buttonmap: {}", err);
                Err(err)
            }
        }
    }
}
