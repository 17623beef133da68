// Controller topology: which controllers may occupy which ports
//
// The topology is a strict tree. Ports accept controllers, and a controller
// may expose ports of its own (multitaps and the like). A document either
// parses into a fully valid tree or is rejected as a whole.

use super::config::ReloadPolicy;
use super::ffi::PortArray;
use super::TopologyError;
use crate::engine::resources::ResourceLoader;
use log::{debug, error};
use roxmltree::{Document, Node};
use std::ffi::{CStr, CString};

/// Default file name of the topology document
pub const TOPOLOGY_XML: &str = "topology.xml";

const TOPOLOGY_XML_ROOT: &str = "logicaltopology";
const TOPOLOGY_XML_ELEM_PORT: &str = "port";
const TOPOLOGY_XML_ELEM_ACCEPTS: &str = "accepts";
const TOPOLOGY_XML_ATTR_PORT_ID: &str = "id";
const TOPOLOGY_XML_ATTR_CONTROLLER_ID: &str = "controller";
const TOPOLOGY_XML_ATTR_MODEL: &str = "model";
const TOPOLOGY_XML_ATTR_EXCLUSIVE: &str = "exclusive";

/// A port and the controllers it accepts, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    port_id: CString,
    accepts: Vec<Controller>,
}

impl Port {
    /// Port identifier
    pub fn port_id(&self) -> &str {
        self.port_id.to_str().unwrap_or_default()
    }

    pub(crate) fn port_id_cstr(&self) -> &CStr {
        &self.port_id
    }

    /// Controllers allowed in this port
    pub fn accepts(&self) -> &[Controller] {
        &self.accepts
    }
}

/// A controller allowed in a port, and the ports it exposes itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controller {
    controller_id: CString,
    model: Option<CString>,
    exclusive: bool,
    ports: Vec<Port>,
}

impl Controller {
    /// Controller identifier
    pub fn controller_id(&self) -> &str {
        self.controller_id.to_str().unwrap_or_default()
    }

    pub(crate) fn controller_id_cstr(&self) -> &CStr {
        &self.controller_id
    }

    /// Model of the controller, if one was specified
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref().and_then(|model| model.to_str().ok())
    }

    pub(crate) fn model_cstr(&self) -> Option<&CStr> {
        self.model.as_deref()
    }

    /// Whether the controller excludes other controllers from its port
    pub fn exclusive(&self) -> bool {
        self.exclusive
    }

    /// Ports the controller exposes
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }
}

/// The parsed controller topology
#[derive(Debug, Default)]
pub struct ControllerTopology {
    ports: Vec<Port>,
}

impl ControllerTopology {
    /// Create an empty topology
    pub fn new() -> Self {
        Self::default()
    }

    /// Locate and load the topology document
    ///
    /// Returns the number of top-level ports. With [`ReloadPolicy::Clear`]
    /// the current tree is dropped before loading, so a failed load leaves
    /// the topology empty. With [`ReloadPolicy::KeepPrevious`] the current
    /// tree survives a failed load.
    pub fn load_topology(
        &mut self,
        loader: &ResourceLoader,
        file_name: &str,
        policy: ReloadPolicy,
    ) -> Result<usize, TopologyError> {
        if policy == ReloadPolicy::Clear {
            self.clear();
        }

        let result = Self::read_document(loader, file_name).and_then(|xml| Self::parse(&xml));
        self.commit(result)
    }

    /// Load the topology from an in-memory document
    pub fn load_from_str(&mut self, xml: &str, policy: ReloadPolicy) -> Result<usize, TopologyError> {
        if policy == ReloadPolicy::Clear {
            self.clear();
        }

        self.commit(Self::parse(xml))
    }

    /// Drop the whole tree
    pub fn clear(&mut self) {
        self.ports.clear();
    }

    /// Number of top-level ports; zero means no topology is configured
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Top-level ports
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Build the flat array form of the tree
    ///
    /// Returns `None` if the topology is empty. The arrays are released when
    /// the returned value is dropped, or by [`super::ffi::free_ports`] after
    /// [`PortArray::into_raw`].
    pub fn get_ports(&self) -> Option<PortArray<'_>> {
        if self.ports.is_empty() {
            return None;
        }

        Some(PortArray::new(&self.ports))
    }

    /// Parse the children of the root element into top-level ports
    pub fn deserialize(root: Node<'_, '_>) -> Result<Vec<Port>, TopologyError> {
        if !root.has_tag_name(TOPOLOGY_XML_ROOT) {
            return Err(TopologyError::MissingRoot(TOPOLOGY_XML_ROOT));
        }

        let mut ports = Vec::new();
        for child in child_elements(root, TOPOLOGY_XML_ELEM_PORT) {
            ports.push(Self::deserialize_port(child)?);
        }

        if ports.is_empty() {
            return Err(TopologyError::MissingElement(TOPOLOGY_XML_ELEM_PORT));
        }

        Ok(ports)
    }

    fn deserialize_port(node: Node<'_, '_>) -> Result<Port, TopologyError> {
        let port_id = required_attribute(node, TOPOLOGY_XML_ELEM_PORT, TOPOLOGY_XML_ATTR_PORT_ID)?;

        let mut port = Port {
            port_id: CString::new(port_id)?,
            accepts: Vec::new(),
        };

        for child in child_elements(node, TOPOLOGY_XML_ELEM_ACCEPTS) {
            port.accepts.push(Self::deserialize_controller(child)?);
        }

        if port.accepts.is_empty() {
            debug!(
                "<{}> tag with ID \"{}\" is missing <{}> node, port won't accept any controllers",
                TOPOLOGY_XML_ELEM_PORT, port_id, TOPOLOGY_XML_ELEM_ACCEPTS
            );
        }

        Ok(port)
    }

    fn deserialize_controller(node: Node<'_, '_>) -> Result<Controller, TopologyError> {
        let controller_id = required_attribute(
            node,
            TOPOLOGY_XML_ELEM_ACCEPTS,
            TOPOLOGY_XML_ATTR_CONTROLLER_ID,
        )?;

        let model = match node.attribute(TOPOLOGY_XML_ATTR_MODEL) {
            Some(model) if !model.is_empty() => Some(CString::new(model)?),
            _ => None,
        };

        // Only the literal "false" clears the flag
        let exclusive = node
            .attribute(TOPOLOGY_XML_ATTR_EXCLUSIVE)
            .map_or(true, |value| value != "false");

        let mut ports = Vec::new();
        for child in child_elements(node, TOPOLOGY_XML_ELEM_PORT) {
            ports.push(Self::deserialize_port(child)?);
        }

        Ok(Controller {
            controller_id: CString::new(controller_id)?,
            model,
            exclusive,
            ports,
        })
    }

    fn read_document(loader: &ResourceLoader, file_name: &str) -> Result<String, TopologyError> {
        let Some(path) = loader.locate(file_name) else {
            debug!("Could not locate controller topology \"{}\"", file_name);
            return Err(TopologyError::NotFound(file_name.to_string()));
        };

        debug!("Loading controller topology \"{}\"", path.display());
        Ok(loader.load_string(file_name)?)
    }

    fn parse(xml: &str) -> Result<Vec<Port>, TopologyError> {
        let document = Document::parse(xml)?;
        Self::deserialize(document.root_element())
    }

    fn commit(&mut self, result: Result<Vec<Port>, TopologyError>) -> Result<usize, TopologyError> {
        match result {
            Ok(ports) => {
                self.ports = ports;
                debug!("Loaded controller topology with {} ports", self.ports.len());
                Ok(self.ports.len())
            }
            Err(err) => {
                error!("Failed to load controller topology: {}", err);
                Err(err)
            }
        }
    }
}

/// Child elements of `node` with the given tag name, in document order
pub(crate) fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.has_tag_name(tag))
}

fn required_attribute<'a>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, TopologyError> {
    node.attribute(attribute)
        .ok_or(TopologyError::MissingAttribute { element, attribute })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::ffi::{free_ports, live_arrays};

    const TOPOLOGY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<logicaltopology>
  <port id="1">
    <accepts controller="game.controller.snes"/>
    <accepts controller="game.controller.snes.multitap" model="hori" exclusive="false">
      <port id="1"><accepts controller="game.controller.snes"/></port>
      <port id="2"><accepts controller="game.controller.snes"/></port>
    </accepts>
  </port>
  <port id="2">
    <accepts controller="game.controller.snes" exclusive="0"/>
  </port>
  <port id="3"/>
</logicaltopology>
"#;

    fn loaded(xml: &str) -> ControllerTopology {
        let mut topology = ControllerTopology::new();
        topology.load_from_str(xml, ReloadPolicy::Clear).unwrap();
        topology
    }

    #[test]
    fn test_load_counts_top_level_ports() {
        let topology = loaded(TOPOLOGY);
        assert_eq!(topology.port_count(), 3);
        assert_eq!(topology.ports()[0].port_id(), "1");
        assert_eq!(topology.ports()[0].accepts().len(), 2);
    }

    #[test]
    fn test_nested_ports() {
        let topology = loaded(TOPOLOGY);
        let multitap = &topology.ports()[0].accepts()[1];

        assert_eq!(multitap.controller_id(), "game.controller.snes.multitap");
        assert_eq!(multitap.model(), Some("hori"));
        assert_eq!(multitap.ports().len(), 2);
        assert_eq!(multitap.ports()[1].port_id(), "2");
        assert_eq!(
            multitap.ports()[1].accepts()[0].controller_id(),
            "game.controller.snes"
        );
    }

    #[test]
    fn test_exclusive_flag() {
        let topology = loaded(TOPOLOGY);

        // Omitted
        assert!(topology.ports()[0].accepts()[0].exclusive());
        // Literal "false"
        assert!(!topology.ports()[0].accepts()[1].exclusive());
        // Anything else
        assert!(topology.ports()[1].accepts()[0].exclusive());
    }

    #[test]
    fn test_exclusive_is_case_sensitive() {
        let topology = loaded(
            r#"<logicaltopology><port id="1"><accepts controller="a" exclusive="False"/></port></logicaltopology>"#,
        );
        assert!(topology.ports()[0].accepts()[0].exclusive());
    }

    #[test]
    fn test_port_without_accepts_is_legal() {
        let topology = loaded(TOPOLOGY);
        assert!(topology.ports()[2].accepts().is_empty());
    }

    #[test]
    fn test_empty_model_is_unspecified() {
        let topology = loaded(
            r#"<logicaltopology><port id="1"><accepts controller="a" model=""/></port></logicaltopology>"#,
        );
        assert_eq!(topology.ports()[0].accepts()[0].model(), None);
    }

    #[test]
    fn test_zero_port_root_fails() {
        let mut topology = ControllerTopology::new();
        let result = topology.load_from_str("<logicaltopology/>", ReloadPolicy::Clear);

        assert!(matches!(result, Err(TopologyError::MissingElement("port"))));
        assert_eq!(topology.port_count(), 0);
    }

    #[test]
    fn test_wrong_root_fails() {
        let mut topology = ControllerTopology::new();
        let result = topology.load_from_str(
            r#"<topology><port id="1"/></topology>"#,
            ReloadPolicy::Clear,
        );
        assert!(matches!(result, Err(TopologyError::MissingRoot(_))));
    }

    #[test]
    fn test_malformed_document_fails() {
        let mut topology = ControllerTopology::new();
        let result = topology.load_from_str("<logicaltopology><port", ReloadPolicy::Clear);
        assert!(matches!(result, Err(TopologyError::Xml(_))));
    }

    #[test]
    fn test_missing_port_id_fails_whole_load() {
        let mut topology = ControllerTopology::new();
        let result = topology.load_from_str(
            r#"<logicaltopology>
                 <port id="1"><accepts controller="a"/></port>
                 <port><accepts controller="a"/></port>
                 <port id="3"><accepts controller="a"/></port>
               </logicaltopology>"#,
            ReloadPolicy::Clear,
        );

        assert!(matches!(
            result,
            Err(TopologyError::MissingAttribute {
                element: "port",
                attribute: "id"
            })
        ));
        assert_eq!(topology.port_count(), 0);
    }

    #[test]
    fn test_nested_failure_discards_everything() {
        let mut topology = ControllerTopology::new();
        let result = topology.load_from_str(
            r#"<logicaltopology>
                 <port id="1">
                   <accepts controller="tap">
                     <port id="1"><accepts model="missing-controller"/></port>
                   </accepts>
                 </port>
               </logicaltopology>"#,
            ReloadPolicy::Clear,
        );

        assert!(matches!(
            result,
            Err(TopologyError::MissingAttribute {
                element: "accepts",
                attribute: "controller"
            })
        ));
        assert_eq!(topology.port_count(), 0);
    }

    #[test]
    fn test_failed_reload_clears_by_default() {
        let mut topology = loaded(TOPOLOGY);
        assert!(topology
            .load_from_str("<logicaltopology/>", ReloadPolicy::Clear)
            .is_err());
        assert_eq!(topology.port_count(), 0);
    }

    #[test]
    fn test_failed_reload_can_keep_previous() {
        let mut topology = loaded(TOPOLOGY);
        assert!(topology
            .load_from_str("<logicaltopology/>", ReloadPolicy::KeepPrevious)
            .is_err());
        assert_eq!(topology.port_count(), 3);
    }

    #[test]
    fn test_missing_document_fails() {
        let mut topology = loaded(TOPOLOGY);
        let loader = ResourceLoader::new("/nonexistent/resources");
        let result = topology.load_topology(&loader, TOPOLOGY_XML, ReloadPolicy::Clear);

        assert!(matches!(result, Err(TopologyError::NotFound(_))));
        assert_eq!(topology.port_count(), 0);
    }

    #[test]
    fn test_load_from_resource_directory() {
        let dir = std::env::temp_dir().join("retro_input_topology_load");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(TOPOLOGY_XML), TOPOLOGY).unwrap();

        let mut topology = ControllerTopology::new();
        let loader = ResourceLoader::new(&dir);
        assert_eq!(
            topology
                .load_topology(&loader, TOPOLOGY_XML, ReloadPolicy::Clear)
                .unwrap(),
            3
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_clear() {
        let mut topology = loaded(TOPOLOGY);
        topology.clear();
        assert_eq!(topology.port_count(), 0);
        assert!(topology.get_ports().is_none());
    }

    #[test]
    fn test_flat_form_mirrors_tree() {
        let topology = loaded(TOPOLOGY);
        let array = topology.get_ports().unwrap();
        let ports = array.as_slice();

        assert_eq!(ports.len(), 3);
        assert_eq!(ports[0].port_id().to_str().unwrap(), "1");

        let devices = ports[0].accepted_devices();
        assert_eq!(devices.len(), 2);
        assert!(devices[0].model().is_none());
        assert!(devices[0].exclusive());
        assert_eq!(devices[1].model().unwrap().to_str().unwrap(), "hori");
        assert!(!devices[1].exclusive());

        let nested = devices[1].available_ports();
        assert_eq!(nested.len(), 2);
        assert_eq!(
            nested[1].accepted_devices()[0]
                .controller_id()
                .to_str()
                .unwrap(),
            "game.controller.snes"
        );

        assert!(ports[2].accepted_devices().is_empty());
        assert!(devices[0].available_ports().is_empty());
    }

    #[test]
    fn test_flat_form_strings_borrow_tree() {
        let topology = loaded(TOPOLOGY);
        let array = topology.get_ports().unwrap();

        assert_eq!(
            array.as_slice()[0].port_id().as_ptr(),
            topology.ports()[0].port_id_cstr().as_ptr()
        );
    }

    #[test]
    fn test_get_and_free_are_balanced() {
        let topology = loaded(TOPOLOGY);
        let before = live_arrays();

        for _ in 0..10 {
            let array = topology.get_ports().unwrap();
            // Top-level ports, two device arrays, the multitap's ports and their two device arrays
            assert_eq!(live_arrays() - before, 6);
            drop(array);
            assert_eq!(live_arrays(), before);
        }
    }

    #[test]
    fn test_raw_handoff_and_free() {
        let topology = loaded(TOPOLOGY);
        let before = live_arrays();

        let (ports, count) = topology.get_ports().unwrap().into_raw();
        assert_eq!(count, 3);
        assert!(!ports.is_null());
        assert_eq!(live_arrays() - before, 6);

        // SAFETY: the pointer and count come straight from `into_raw`.
        unsafe { free_ports(ports, count) };
        assert_eq!(live_arrays(), before);
    }
}
