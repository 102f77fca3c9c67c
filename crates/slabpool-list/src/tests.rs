use super::*;
use core::sync::atomic::AtomicBool;
use rand::Rng;
use std::thread;

fn slots(count: usize) -> Vec<Link> {
  (0..count).map(|_| Link::new()).collect()
}

#[test]
fn test_tagged_packing() {
  let tagged = Tagged::new(0, 0);
  assert_eq!(tagged.raw(), 1 << 32);
  assert_eq!(tagged.slot(), Some(0));
  assert_eq!(tagged.generation(), 0);

  let tagged = Tagged::new(41, u32::MAX);
  assert_eq!(tagged.slot(), Some(41));
  assert_eq!(tagged.generation(), u32::MAX);
  assert!(!tagged.is_empty());

  assert!(Tagged::EMPTY.is_empty());
  assert_eq!(Tagged::EMPTY.slot(), None);
  assert_eq!(tagged.raw(), (42 << 32) | u32::MAX as u64);
}

#[test]
fn test_chained_links_in_index_order() {
  let slots = slots(4);
  let list = FreeList::chained(&slots).unwrap();

  assert_eq!(list.head(), Tagged::new(0, 0));
  assert_eq!(slots[0].next(), Tagged::new(1, 0));
  assert_eq!(slots[2].next(), Tagged::new(3, 0));
  assert_eq!(slots[3].next(), Tagged::EMPTY);

  let order: Vec<usize> = list.iter(&slots).collect();
  assert_eq!(order, vec![0, 1, 2, 3]);
}

#[test]
fn test_chained_empty() {
  let slots = slots(0);
  let list = FreeList::chained(&slots).unwrap();
  assert!(list.is_empty());
  assert_eq!(list.pop(&slots), None);
}

#[test]
fn test_pop_drains_in_order() {
  let slots = slots(3);
  let list = FreeList::chained(&slots).unwrap();

  assert_eq!(list.pop(&slots), Some(0));
  assert_eq!(list.pop(&slots), Some(1));
  assert_eq!(list.pop(&slots), Some(2));
  assert_eq!(list.pop(&slots), None);
  assert!(list.is_empty());

  assert!(slots.iter().all(|s| !s.is_linked()));
}

#[test]
fn test_push_is_lifo() {
  let slots = slots(3);
  let list = FreeList::chained(&slots).unwrap();

  let a = list.pop(&slots).unwrap();
  let b = list.pop(&slots).unwrap();
  list.push(&slots, a);
  list.push(&slots, b);

  assert_eq!(list.pop(&slots), Some(b));
  assert_eq!(list.pop(&slots), Some(a));
  assert_eq!(list.pop(&slots), Some(2));
}

#[test]
fn test_generation_bumps_on_push_only() {
  let slots = slots(2);
  let list = FreeList::chained(&slots).unwrap();

  let slot = list.pop(&slots).unwrap();
  assert_eq!(slots[slot].generation(), 0);

  list.push(&slots, slot);
  assert_eq!(slots[slot].generation(), 1);
  assert_eq!(list.head(), Tagged::new(slot, 1));

  let again = list.pop(&slots).unwrap();
  assert_eq!(again, slot);
  assert_eq!(slots[slot].generation(), 1);
}

#[test]
fn test_reused_slot_changes_head() {
  let slots = slots(2);
  let list = FreeList::chained(&slots).unwrap();

  let stale = list.head();
  let slot = list.pop(&slots).unwrap();
  list.push(&slots, slot);

  let fresh = list.head();
  assert_eq!(fresh.slot(), stale.slot());
  assert_ne!(fresh, stale);
}

#[test]
fn test_generation_wraps() {
  let slots = slots(2);
  let list = FreeList::chained(&slots).unwrap();
  slots[0].generation.store(u32::MAX, Ordering::Relaxed);

  let slot = list.pop(&slots).unwrap();
  list.push(&slots, slot);
  assert_eq!(slots[slot].generation(), 0);
}

#[test]
#[should_panic(expected = "double free")]
fn test_double_push_panics() {
  let slots = slots(3);
  let list = FreeList::chained(&slots).unwrap();

  let slot = list.pop(&slots).unwrap();
  list.push(&slots, slot);
  list.push(&slots, slot);
}

#[test]
fn test_concurrent_pop_push_never_shares_a_slot() {
  const SLOTS: usize = 32;
  const THREADS: usize = 8;
  const ROUNDS: usize = 20_000;

  let slots = slots(SLOTS);
  let list = FreeList::chained(&slots).unwrap();
  let owned: Vec<AtomicBool> = (0..SLOTS).map(|_| AtomicBool::new(false)).collect();

  thread::scope(|scope| {
    for _ in 0..THREADS {
      scope.spawn(|| {
        let mut rng = rand::rng();
        let mut held = Vec::new();
        for _ in 0..ROUNDS {
          if held.len() < 4 && rng.random_bool(0.6) {
            if let Some(slot) = list.pop(&slots) {
              let was = owned[slot].swap(true, Ordering::AcqRel);
              assert!(!was, "slot {slot} handed out twice");
              held.push(slot);
            }
          } else if let Some(slot) = held.pop() {
            owned[slot].store(false, Ordering::Release);
            list.push(&slots, slot);
          }
        }
        for slot in held {
          owned[slot].store(false, Ordering::Release);
          list.push(&slots, slot);
        }
      });
    }
  });

  let mut free: Vec<usize> = list.iter(&slots).collect();
  free.sort_unstable();
  assert_eq!(free, (0..SLOTS).collect::<Vec<_>>());
}
