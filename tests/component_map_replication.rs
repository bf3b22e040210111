use shoal::{
    Authority, Component, ComponentMap, Dispatcher, EntityId, MapEvents, WorldOp,
};

#[derive(Clone, Debug, PartialEq)]
struct Position {
    x: f64,
    y: f64,
    z: f64,
}

impl Position {
    fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Component for Position {
    type Update = Position;

    fn apply_update(&mut self, update: Position) {
        *self = update;
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Stamina {
    current: u32,
}

impl Component for Stamina {
    type Update = i32;

    fn apply_update(&mut self, update: i32) {
        self.current = self.current.saturating_add_signed(update);
    }
}

#[test]
fn stale_echo_is_rejected_end_to_end() {
    let mut dispatcher = Dispatcher::new();
    let positions: ComponentMap<Position> = ComponentMap::new();
    dispatcher.register(&positions, MapEvents::ALL);

    let entity = EntityId::new(7);
    dispatcher.process(vec![
        WorldOp::add(entity, Position::new(0.0, 0.0, 0.0)),
        WorldOp::authority_change::<Position>(entity, Authority::NotAuthoritative),
        WorldOp::update::<Position>(entity, Position::new(4.0, 5.0, 6.0)),
    ]);
    assert_eq!(positions.get(&entity), Some(Position::new(4.0, 5.0, 6.0)));

    // Once authoritative, a late remote echo must not clobber the value
    dispatcher.process(vec![
        WorldOp::authority_change::<Position>(entity, Authority::Authoritative),
        WorldOp::update::<Position>(entity, Position::new(9.0, 9.0, 9.0)),
    ]);
    assert_eq!(positions.get(&entity), Some(Position::new(4.0, 5.0, 6.0)));
}

#[test]
fn authority_change_may_precede_add() {
    let mut dispatcher = Dispatcher::new();
    let positions: ComponentMap<Position> = ComponentMap::new();
    dispatcher.register(&positions, MapEvents::ALL);

    let entity = EntityId::new(3);
    dispatcher.process(vec![WorldOp::authority_change::<Position>(
        entity,
        Authority::Authoritative,
    )]);

    assert!(positions.has_authority(&entity), "Authority tracked without a stored value");
    assert_eq!(positions.get(&entity), None);

    dispatcher.process(vec![WorldOp::add(entity, Position::new(1.0, 1.0, 1.0))]);
    assert_eq!(positions.get(&entity), Some(Position::new(1.0, 1.0, 1.0)));
    assert!(positions.has_authority(&entity));
}

#[test]
fn loss_imminent_still_allows_local_finalization_reads() {
    let mut dispatcher = Dispatcher::new();
    let positions: ComponentMap<Position> = ComponentMap::new();
    dispatcher.register(&positions, MapEvents::ALL);

    let entity = EntityId::new(4);
    dispatcher.process(vec![
        WorldOp::add(entity, Position::new(2.0, 2.0, 2.0)),
        WorldOp::authority_change::<Position>(entity, Authority::Authoritative),
        WorldOp::authority_change::<Position>(entity, Authority::AuthorityLossImminent),
    ]);

    assert!(!positions.has_authority(&entity));
    assert!(positions.has_authority_loss_imminent(&entity));
    assert_eq!(positions.get(&entity), Some(Position::new(2.0, 2.0, 2.0)));
}

#[test]
fn delta_updates_merge_into_stored_value() {
    let mut dispatcher = Dispatcher::new();
    let stamina: ComponentMap<Stamina> = ComponentMap::new();
    dispatcher.register(&stamina, MapEvents::ALL);

    let entity = EntityId::new(12);
    dispatcher.process(vec![
        WorldOp::add(entity, Stamina { current: 50 }),
        WorldOp::update::<Stamina>(entity, -20),
        WorldOp::update::<Stamina>(entity, 5),
    ]);

    assert_eq!(stamina.get(&entity), Some(Stamina { current: 35 }));
}

#[test]
fn change_flag_spans_batches_until_acknowledged() {
    let mut dispatcher = Dispatcher::new();
    let positions: ComponentMap<Position> = ComponentMap::new();
    dispatcher.register(&positions, MapEvents::ALL);
    positions.acknowledge();

    let entity = EntityId::new(9);
    dispatcher.process(vec![WorldOp::add(entity, Position::new(0.0, 0.0, 0.0))]);
    assert!(positions.has_changed());

    // An empty drain does not clear the notification
    dispatcher.process(Vec::new());
    assert!(positions.has_changed());

    positions.acknowledge();
    assert!(!positions.has_changed());

    dispatcher.process(vec![WorldOp::remove_entity(entity)]);
    assert!(positions.has_changed(), "Accepted removal marks the map changed");
}

#[test]
fn read_only_map_sees_adds_but_ignores_authority() {
    let mut dispatcher = Dispatcher::new();
    let primary: ComponentMap<Position> = ComponentMap::new();
    let analytics: ComponentMap<Position> = ComponentMap::new();
    dispatcher.register(&primary, MapEvents::ALL);
    dispatcher.register(&analytics, MapEvents::ALL.without(MapEvents::AUTHORITY));

    let entity = EntityId::new(21);
    dispatcher.process(vec![
        WorldOp::add(entity, Position::new(5.0, 5.0, 5.0)),
        WorldOp::authority_change::<Position>(entity, Authority::Authoritative),
    ]);

    assert_eq!(primary.get(&entity), Some(Position::new(5.0, 5.0, 5.0)));
    assert_eq!(analytics.get(&entity), Some(Position::new(5.0, 5.0, 5.0)));
    assert!(primary.has_authority(&entity));
    assert!(!analytics.has_authority(&entity));
}

#[test]
fn random_authoritative_returns_a_tracked_member() {
    let positions: ComponentMap<Position> = ComponentMap::new();
    assert_eq!(positions.random_authoritative(), None);

    for id in 1..=5 {
        positions.apply_authority_change(EntityId::new(id), Authority::Authoritative);
    }

    let picked = positions
        .random_authoritative()
        .expect("Non-empty authoritative set must yield a member");
    assert!((1..=5).contains(&picked.value()));
    assert!(positions.has_authority(&picked));
}
