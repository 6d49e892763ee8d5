//! Tests for 2-D and 3-D matrix maps

use crate::Error;
use crate::app::models::{MatrixMap2, MatrixMap3};

fn create_test_map2() -> MatrixMap2<String, i32, f32> {
    MatrixMap2::new(
        vec!["A".to_string(), "B".to_string()],
        vec![1, 2, 3],
        -1.0,
    )
}

#[test]
fn test_new_map_is_empty_with_defaults() {
    let map = create_test_map2();

    assert!(map.is_empty());
    assert!(!map.is_full());
    assert_eq!(*map.get(&"A".to_string(), &2).unwrap(), -1.0);
    assert_eq!(map.get_explicit(&"A".to_string(), &2).unwrap(), None);
}

#[test]
fn test_put_and_get() {
    let mut map = create_test_map2();
    map.put(&"B".to_string(), &3, 4.5).unwrap();

    assert_eq!(*map.get(&"B".to_string(), &3).unwrap(), 4.5);
    assert_eq!(*map.get(&"A".to_string(), &3).unwrap(), -1.0);
    assert!(!map.is_empty());
    assert!(!map.is_full());
}

#[test]
fn test_key_outside_dimension_is_error() {
    let mut map = create_test_map2();

    assert!(matches!(
        map.get(&"C".to_string(), &1),
        Err(Error::ResourceValidation { .. })
    ));
    assert!(map.get(&"A".to_string(), &4).is_err());
    assert!(map.put(&"A".to_string(), &0, 1.0).is_err());
}

#[test]
fn test_set_all_fills_every_cell() {
    let mut map = create_test_map2();
    map.set_all(|k1, k2| if k1 == "A" { *k2 as f32 } else { *k2 as f32 * 10.0 });

    assert!(map.is_full());
    assert!(!map.is_empty());
    assert_eq!(*map.get(&"A".to_string(), &2).unwrap(), 2.0);
    assert_eq!(*map.get(&"B".to_string(), &3).unwrap(), 30.0);
}

#[test]
fn test_remove_restores_default() {
    let mut map = create_test_map2();
    map.fill(3.0);
    let previous = map.remove(&"A".to_string(), &1).unwrap();

    assert_eq!(previous, Some(3.0));
    assert!(!map.is_full());
    assert_eq!(*map.get(&"A".to_string(), &1).unwrap(), -1.0);
}

#[test]
fn test_get_mut_materializes_default() {
    let mut map = create_test_map2();
    *map.get_mut(&"A".to_string(), &1).unwrap() += 2.0;

    assert_eq!(map.get_explicit(&"A".to_string(), &1).unwrap(), Some(&1.0));
}

#[test]
fn test_iter_visits_every_cell() {
    let mut map = create_test_map2();
    map.put(&"A".to_string(), &1, 9.0).unwrap();

    let cells: Vec<_> = map.iter().collect();
    assert_eq!(cells.len(), 6);
    assert_eq!(cells[0], (&"A".to_string(), &1, &9.0));
    assert_eq!(cells[1], (&"B".to_string(), &1, &-1.0));
}

#[test]
fn test_repeated_keys_are_collapsed() {
    let map: MatrixMap2<i32, i32, i32> = MatrixMap2::new(vec![1, 1, 2], vec![5], 0);
    assert_eq!(map.keys1(), &[1, 2]);
}

#[test]
fn test_map3_addressing() {
    let mut map: MatrixMap3<i32, char, bool, Option<i32>> =
        MatrixMap3::new(vec![1, 2], vec!['x', 'y', 'z'], vec![true, false], None);

    assert!(map.is_empty());
    map.put(&2, &'z', &false, Some(42)).unwrap();
    map.put(&1, &'x', &true, Some(7)).unwrap();

    assert_eq!(*map.get(&2, &'z', &false).unwrap(), Some(42));
    assert_eq!(*map.get(&1, &'x', &true).unwrap(), Some(7));
    assert_eq!(*map.get(&2, &'z', &true).unwrap(), None);
    assert!(map.get(&3, &'x', &true).is_err());
    assert!(map.get(&1, &'w', &true).is_err());

    let explicit: Vec<_> = map
        .iter()
        .filter(|(_, _, _, value)| value.is_some())
        .map(|(k1, k2, k3, _)| (*k1, *k2, *k3))
        .collect();
    assert_eq!(explicit, vec![(1, 'x', true), (2, 'z', false)]);
}

#[test]
fn test_map3_set_all() {
    let mut map: MatrixMap3<i32, i32, i32, i32> =
        MatrixMap3::new(vec![1, 2], vec![10, 20], vec![100, 200], 0);
    map.set_all(|a, b, c| a + b + c);

    assert!(map.is_full());
    assert_eq!(*map.get(&2, &10, &200).unwrap(), 212);
    assert_eq!(*map.get(&1, &20, &100).unwrap(), 121);
}

#[test]
fn test_map2_full_after_every_cell_is_put() {
    let mut map = create_test_map2();
    let cells: Vec<(String, i32)> = ["A", "B"]
        .iter()
        .flat_map(|k1| [1, 2, 3].map(|k2| (k1.to_string(), k2)))
        .collect();

    for (count, (k1, k2)) in cells.iter().enumerate() {
        assert!(!map.is_full());
        map.put(k1, k2, count as f32).unwrap();
        assert!(!map.is_empty());
    }

    assert!(map.is_full());
    assert_eq!(*map.get(&"B".to_string(), &3).unwrap(), 5.0);

    map.remove(&"A".to_string(), &1).unwrap();
    assert!(!map.is_full());
}

#[test]
fn test_map3_empty_partial_and_full() {
    let mut map: MatrixMap3<i32, i32, i32, i32> =
        MatrixMap3::new(vec![1, 2], vec![10, 20], vec![100], 0);
    assert!(map.is_empty());
    assert!(!map.is_full());

    map.put(&1, &10, &100, 1).unwrap();
    map.put(&2, &10, &100, 2).unwrap();
    map.put(&1, &20, &100, 3).unwrap();
    assert!(!map.is_empty());
    assert!(!map.is_full());

    map.put(&2, &20, &100, 4).unwrap();
    assert!(map.is_full());
}
