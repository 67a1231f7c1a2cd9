//! The procedural world is a pure function of cell identity: independent
//! registries agree, published draws match, and restore never re-draws.

use geocoin_game::{
    CacheRegistry, Cell, CoinPick, Command, GameSession, GeoPosition, MemoryStorage, Player,
    Snapshot, WorldConfig, collect, initial_value_key, luck, spawn_key,
};

#[test]
fn independent_registries_generate_identical_worlds() {
    let mut a = CacheRegistry::new(WorldConfig::default());
    let mut b = CacheRegistry::new(WorldConfig::default());
    a.materialize_neighborhood(Cell::new(0, 0));
    // Different visitation order, same world.
    for i in (-8..=8).rev() {
        for j in (-8..=8).rev() {
            b.materialize(Cell::new(i, j));
        }
    }
    assert_eq!(a.minted_value(), b.minted_value());
    for i in -8..=8 {
        for j in -8..=8 {
            let cell = Cell::new(i, j);
            assert_eq!(a.get(cell), b.get(cell), "disagreement at {cell}");
        }
    }
}

#[test]
fn origin_cell_follows_published_draws() {
    let mut registry = CacheRegistry::new(WorldConfig::default());
    registry.materialize(Cell::new(0, 0));
    let spawns = luck("0,0,spawn") < 0.1;
    assert_eq!(spawn_key(Cell::new(0, 0)), "0,0,spawn");
    assert_eq!(initial_value_key(Cell::new(0, 0)), "0,0,initialValue");
    assert_eq!(registry.get(Cell::new(0, 0)).is_some(), spawns);
    if let Some(cache) = registry.get(Cell::new(0, 0)) {
        let expected = (luck("0,0,initialValue") * 100.0).floor();
        assert_eq!(f64::from(cache.coins[0].value), expected);
    }
}

#[test]
fn restore_preserves_mutations_instead_of_redrawing() {
    let mut registry = CacheRegistry::new(WorldConfig::default());
    let mut player = Player::at(GeoPosition::new(0.0, 0.0));
    registry.materialize_neighborhood(Cell::new(0, 0));
    let cell = registry.active_caches().next().unwrap().cell;
    collect(&mut registry, &mut player, cell, CoinPick::All).unwrap();

    let snapshot = Snapshot::capture(&player, &registry);
    let (restored_player, restored_registry) = snapshot.restore(WorldConfig::default());

    // The collected cache stays empty after restore; a re-draw would have
    // refilled it with its initial mint.
    assert!(restored_registry.get(cell).unwrap().is_empty());
    assert_eq!(restored_player.held, player.held);
    assert_eq!(
        restored_registry.cached_value() + restored_player.total_value(),
        restored_registry.minted_value()
    );
}

#[test]
fn session_restart_sees_the_same_world() {
    // Simulate a reload by handing a second session storage primed with the
    // first session's snapshot.
    let mut session = GameSession::new(MemoryStorage::default());
    session.execute(Command::Move { di: 2, dj: -1 }).unwrap();
    let mut storage = MemoryStorage::default();
    let snapshot = Snapshot::capture(session.player(), session.registry());
    geocoin_game::save_snapshot(&mut storage, geocoin_game::constants::SAVE_KEY, &snapshot)
        .unwrap();

    let reloaded = GameSession::new(storage);
    let mut fresh = CacheRegistry::new(WorldConfig::default());
    for cache in reloaded.registry().active_caches() {
        fresh.materialize(cache.cell);
        assert_eq!(fresh.get(cache.cell), Some(cache));
    }
}
