//! Scenario driven by data files instead of hand-built definitions.

use std::io::Write;

use glam::Vec2;

use skirmish_content::{ItemLoader, TuningLoader};
use skirmish_core::{GameEvent, InputAction, ItemId};
use skirmish_runtime::Session;

const CATALOG_RON: &str = r#"
ItemCatalog(
    items: [
        ItemDefinition(
            id: "knife",
            name: "Throwing Knife",
            attributes: { "attack_power": 1.0, "throw_damage": 4.0, "durability": 3.0 },
            world_scene: Some("knife"),
            max_stack: 10,
        ),
    ],
)
"#;

const TUNING_RON: &str = r#"
GameTuning(
    interaction: InteractionConfig(
        drop_offset: (24.0, 0.0),
        throw_offset: (48.0, -10.0),
        throw_impulse: 800.0,
        pickup_range: 150.0,
    ),
)
"#;

#[test]
fn catalog_loaded_items_flow_through_the_pipeline() {
    let mut catalog_file = tempfile::NamedTempFile::new().unwrap();
    catalog_file.write_all(CATALOG_RON.as_bytes()).unwrap();
    let catalog = ItemLoader::load_index(catalog_file.path()).unwrap();

    let mut tuning_file = tempfile::NamedTempFile::new().unwrap();
    tuning_file.write_all(TUNING_RON.as_bytes()).unwrap();
    let tuning = TuningLoader::load(tuning_file.path()).unwrap();

    let knife = catalog.get(&ItemId::new("knife")).unwrap();
    assert_eq!(knife.max_stack, 10);

    let mut session = Session::new(&["knife"]);
    session.player.interaction =
        skirmish_core::ItemInteractionComponent::new(tuning.interaction.clone());
    session.give_player(&knife, 2);

    session.input.press(InputAction::PutDown);
    session.tick(0.1);

    // the loaded drop offset positioned the spawned entity
    let entity = session.arena.items.entities().next().expect("spawned");
    assert_eq!(entity.position(), Vec2::new(24.0, 0.0));
    // durability came from the catalog attribute table
    assert_eq!(entity.durability(), Some(3));

    let events = session.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::ItemRemoved { item } if item.as_str() == "knife")));
}
