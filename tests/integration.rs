// End-to-end tests against the bundled resource documents

use retro_input::engine::input::{
    free_ports, ButtonMapper, DeviceType, FrontendBridge, GameController, GameInputEvent,
    InputConfig, InputEventKind, InputManager, LibretroFeature, ReloadPolicy,
};
use retro_input::ResourceLoader;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError};

fn resource_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources")
}

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn loaded_manager() -> InputManager {
    let manager = InputManager::from_config(&InputConfig::new(resource_dir()));
    manager.load_resources().unwrap();
    manager
}

#[test]
fn test_bundled_resources_load() {
    let manager = loaded_manager();

    let topology = manager.topology().read().unwrap();
    assert_eq!(topology.port_count(), 2);

    let multitap = &topology.ports()[0].accepts()[2];
    assert_eq!(multitap.controller_id(), "game.controller.snes.multitap");
    assert!(!multitap.exclusive());
    assert_eq!(multitap.ports().len(), 4);

    let mapper = manager.button_mapper().read().unwrap();
    assert_eq!(mapper.devices().len(), 5);
}

#[test]
fn test_flat_form_round_trips_repeatedly() {
    let manager = loaded_manager();
    let topology = manager.topology().read().unwrap();

    for _ in 0..100 {
        let ports = topology.get_ports().unwrap();
        assert_eq!(ports.len(), 2);

        let multitap = &ports.as_slice()[0].accepted_devices()[2];
        assert_eq!(multitap.available_ports().len(), 4);
        assert_eq!(
            multitap.available_ports()[3].port_id().to_str().unwrap(),
            "4"
        );

        let superscope = &ports.as_slice()[1].accepted_devices()[1];
        assert_eq!(superscope.model().unwrap().to_str().unwrap(), "nintendo");

        let (raw, count) = ports.into_raw();
        // SAFETY: the pair comes straight from `into_raw` and is released once.
        unsafe { free_ports(raw, count) };
    }
}

#[test]
fn test_legacy_button_map_matches_current() {
    let loader = ResourceLoader::new(data_dir());
    let mut legacy = ButtonMapper::new();
    legacy
        .load_button_map(&loader, "buttonmap_v1.xml")
        .unwrap();

    let manager = loaded_manager();
    let current = manager.button_mapper().read().unwrap();

    assert_eq!(legacy.devices().len(), current.devices().len());
    for (old, new) in legacy.devices().iter().zip(current.devices()) {
        assert_eq!(old.controller_id(), new.controller_id());
        assert_eq!(old.device_type(), new.device_type());
        assert_eq!(old.subclass(), new.subclass());
        assert_eq!(old.features(), new.features());
    }
}

#[test]
fn test_attach_route_and_poll() {
    let manager = Arc::new(loaded_manager());

    let snes = GameController {
        digital_button_count: 12,
        ..GameController::new("game.controller.snes")
    };
    assert!(manager.set_controller("1/game.controller.snes", Some(&snes)));
    assert_eq!(manager.address(0), "0/game.controller.snes");
    assert_eq!(manager.device_type("1/game.controller.snes"), DeviceType::Joypad.id());

    let press = GameInputEvent::new(
        "game.controller.snes",
        "start",
        InputEventKind::DigitalButton { pressed: true },
    );
    assert!(manager.input_event("1/game.controller.snes", &press));

    let bridge = FrontendBridge::new(Arc::clone(&manager), None);
    let start = LibretroFeature::JoypadStart.index();
    assert_eq!(bridge.input_state(0, DeviceType::Joypad.id(), 0, start), 1);
    assert_eq!(bridge.input_state(1, DeviceType::Joypad.id(), 0, start), 0);

    manager.close_ports();
    assert_eq!(bridge.input_state(0, DeviceType::Joypad.id(), 0, start), 0);
}

#[test]
fn test_subclassed_device_type() {
    let manager = loaded_manager();
    let superscope = GameController::new("game.controller.snes.superscope");

    assert!(manager.set_controller("2/game.controller.snes.superscope", Some(&superscope)));
    assert_eq!(
        manager.device_type("2/game.controller.snes.superscope"),
        (1 << 8) | DeviceType::Lightgun.id()
    );
}

#[test]
fn test_failed_reload_policies() {
    let clear = InputManager::from_config(&InputConfig::new(resource_dir()));
    clear.load_resources().unwrap();

    let missing = InputConfig::new(resource_dir()).with_topology_file("missing.xml");
    let loader = ResourceLoader::new(&missing.resource_path);

    let mut topology = clear
        .topology()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    assert!(topology
        .load_topology(&loader, &missing.topology_file, ReloadPolicy::KeepPrevious)
        .is_err());
    assert_eq!(topology.port_count(), 2);

    assert!(topology
        .load_topology(&loader, &missing.topology_file, ReloadPolicy::Clear)
        .is_err());
    assert_eq!(topology.port_count(), 0);
}

#[test]
fn test_missing_resources_fail_to_load() {
    let config = InputConfig::new(data_dir());
    let manager = InputManager::from_config(&config);

    assert!(manager.load_resources().is_err());
    assert_eq!(manager.topology().read().unwrap().port_count(), 0);
}
