use space_invaders::arena::{Active, Arena};

#[derive(Debug, Clone, PartialEq)]
struct Dummy {
    id: u32,
    active: bool,
}

impl Active for Dummy {
    fn is_active(&self) -> bool {
        self.active
    }
}

fn dummy(id: u32) -> Dummy {
    Dummy { id, active: true }
}

#[test]
fn insert_and_get() {
    let mut arena = Arena::new();
    let a = arena.insert(dummy(1));
    let b = arena.insert(dummy(2));

    assert_eq!(arena.len(), 2);
    assert_eq!(arena.get(a).map(|d| d.id), Some(1));
    assert_eq!(arena.get(b).map(|d| d.id), Some(2));
}

#[test]
fn iteration_is_in_slot_order() {
    let mut arena = Arena::new();
    for id in 0..5 {
        arena.insert(dummy(id));
    }
    let ids: Vec<u32> = arena.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[test]
fn sweep_removes_only_inactive() {
    let mut arena = Arena::new();
    for id in 0..5 {
        arena.insert(dummy(id));
    }
    for d in arena.iter_mut().filter(|d| d.id % 2 == 0) {
        d.active = false;
    }

    assert_eq!(arena.sweep(), 3);
    assert_eq!(arena.len(), 2);
    let ids: Vec<u32> = arena.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 3]);

    // Nothing left to sweep
    assert_eq!(arena.sweep(), 0);
}

#[test]
fn stale_handles_are_rejected() {
    let mut arena = Arena::new();
    let first = arena.insert(dummy(1));
    if let Some(d) = arena.get_mut(first) {
        d.active = false;
    }
    arena.sweep();

    assert!(arena.get(first).is_none());

    // The freed slot is reused under a new generation
    let second = arena.insert(dummy(2));
    assert_eq!(second.index, first.index);
    assert_ne!(second.generation, first.generation);
    assert!(arena.get(first).is_none());
    assert_eq!(arena.get(second).map(|d| d.id), Some(2));
}

#[test]
fn remove_returns_value_once() {
    let mut arena = Arena::new();
    let h = arena.insert(dummy(7));
    assert_eq!(arena.remove(h).map(|d| d.id), Some(7));
    assert!(arena.remove(h).is_none());
    assert!(arena.is_empty());
}

#[test]
fn clear_is_idempotent() {
    let mut arena = Arena::new();
    let h = arena.insert(dummy(1));
    arena.insert(dummy(2));

    arena.clear();
    assert!(arena.is_empty());
    assert!(arena.get(h).is_none());

    arena.clear();
    assert!(arena.is_empty());
    assert_eq!(arena.handles().count(), 0);

    arena.insert(dummy(3));
    assert_eq!(arena.len(), 1);
}
