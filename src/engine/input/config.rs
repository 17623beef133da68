// Input subsystem configuration

use super::button_mapper::BUTTONMAP_XML;
use super::topology::TOPOLOGY_XML;
use std::path::PathBuf;

/// What a failed topology reload does to the topology already loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReloadPolicy {
    /// Drop the current tree before loading, so a failed load leaves nothing
    #[default]
    Clear,
    /// Keep the current tree unless the new document loads successfully
    KeepPrevious,
}

/// Where the input documents live and how they are reloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    /// Directory holding the resource documents
    pub resource_path: PathBuf,

    /// File name of the controller topology
    pub topology_file: String,

    /// File name of the button map
    pub buttonmap_file: String,

    pub reload_policy: ReloadPolicy,
}

impl InputConfig {
    /// Create a configuration with the default document names
    pub fn new(resource_path: impl Into<PathBuf>) -> Self {
        Self {
            resource_path: resource_path.into(),
            topology_file: TOPOLOGY_XML.to_string(),
            buttonmap_file: BUTTONMAP_XML.to_string(),
            reload_policy: ReloadPolicy::default(),
        }
    }

    /// Use a different topology document
    pub fn with_topology_file(mut self, file_name: impl Into<String>) -> Self {
        self.topology_file = file_name.into();
        self
    }

    /// Use a different button map document
    pub fn with_buttonmap_file(mut self, file_name: impl Into<String>) -> Self {
        self.buttonmap_file = file_name.into();
        self
    }

    /// Set the reload policy
    pub fn with_reload_policy(mut self, policy: ReloadPolicy) -> Self {
        self.reload_policy = policy;
        self
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new("resources")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = InputConfig::default();
        assert_eq!(config.topology_file, "topology.xml");
        assert_eq!(config.buttonmap_file, "buttonmap.xml");
        assert_eq!(config.reload_policy, ReloadPolicy::Clear);
    }

    #[test]
    fn test_config_builders() {
        let config = InputConfig::new("/tmp/retro")
            .with_topology_file("snes.xml")
            .with_buttonmap_file("snes-buttons.xml")
            .with_reload_policy(ReloadPolicy::KeepPrevious);

        assert_eq!(config.resource_path, PathBuf::from("/tmp/retro"));
        assert_eq!(config.topology_file, "snes.xml");
        assert_eq!(config.buttonmap_file, "snes-buttons.xml");
        assert_eq!(config.reload_policy, ReloadPolicy::KeepPrevious);
    }
}
