use std::collections::HashSet;

use dreamstory_game::{ActionCatalog, ActionId, DailyLedger, RoomId, Valence};

#[test]
fn every_room_action_is_defined() {
    let catalog = ActionCatalog::default_catalog();
    for room in &catalog.rooms {
        assert!(!room.name.is_empty());
        for action in &room.actions {
            let def = catalog
                .get(*action)
                .unwrap_or_else(|| panic!("{} offers undefined {action}", room.id));
            assert_eq!(catalog.room_of(def.id).map(|r| r.id), Some(room.id));
        }
    }
}

#[test]
fn rooms_cover_every_action_but_the_branch() {
    let catalog = ActionCatalog::default_catalog();
    let offered: HashSet<ActionId> = catalog
        .rooms
        .iter()
        .flat_map(|room| room.actions.iter().copied())
        .collect();
    for id in ActionId::ALL {
        if id == catalog.branch_action {
            assert!(!offered.contains(&id), "{id} should live in no room");
        } else {
            assert!(offered.contains(&id), "{id} is unreachable");
        }
    }
    let rooms: Vec<RoomId> = catalog.rooms.iter().map(|room| room.id).collect();
    assert_eq!(
        rooms,
        vec![
            RoomId::Bedroom,
            RoomId::Living,
            RoomId::Kitchen,
            RoomId::Gym,
            RoomId::Bathroom
        ]
    );
}

#[test]
fn valence_matches_point_sign() {
    for def in &ActionCatalog::default_catalog().actions {
        assert_eq!(def.valence, Valence::from_points(def.points), "{}", def.id);
        assert!(!def.message.is_empty(), "{} has no message", def.id);
        assert!(!def.description.is_empty(), "{} has no description", def.id);
        assert!(!def.consequences.is_empty(), "{} has no consequences", def.id);
        assert!(!def.effects.is_empty(), "{} has no effects", def.id);
    }
}

#[test]
fn base_points_match_the_table() {
    let expected = [
        (ActionId::Sleep, 25),
        (ActionId::BrushTeeth, 15),
        (ActionId::Shower, 20),
        (ActionId::CookHealthy, 30),
        (ActionId::Eat, -15),
        (ActionId::DrinkWater, 12),
        (ActionId::Exercise, 25),
        (ActionId::WeightLifting, 28),
        (ActionId::ReadBook, 22),
        (ActionId::WatchTv, -12),
        (ActionId::Meditation, 20),
        (ActionId::Relax, 15),
    ];
    let catalog = ActionCatalog::default_catalog();
    for (id, points) in expected {
        assert_eq!(catalog.get(id).map(|def| def.points), Some(points), "{id}");
    }
}

#[test]
fn ledger_keys_mirror_the_catalog() {
    let catalog = ActionCatalog::default_catalog();
    let ledger = DailyLedger::for_catalog(catalog);
    let keys: Vec<ActionId> = ledger.entries().map(|(id, _)| id).collect();
    let mut ids: Vec<ActionId> = catalog.ids().collect();
    ids.sort();
    assert_eq!(keys, ids);

    let json = serde_json::to_value(&ledger).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), ActionId::ALL.len());
    assert!(object.contains_key("watchTV"));
    assert!(object.contains_key("brushTeeth"));
}
