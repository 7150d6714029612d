/// Scale tests for the map.
///
/// Each test interns tens of thousands of keys, starting from a table far smaller than that, so as to go through
/// many expansions.
///
/// Reminder: to run only these tests, run `cargo test --test scenarios`.
use endor_intern_map::{InternMap, InternMapError, KeyId};

const INITIAL_CAPACITY: usize = 128;
const NUMBER_KEYS: u32 = 32768;

#[test]
fn create() {
    assert!(InternMap::new(INITIAL_CAPACITY, 16).is_ok());

    assert_eq!(Some(InternMapError::InvalidCapacity), InternMap::new(127, 16).err());
    assert_eq!(Some(InternMapError::InvalidCapacity), InternMap::new(0, 16).err());
}

//  Too expensive for MIRI to run.
#[cfg(not(miri))]
#[test]
fn insert_and_get() {
    let mut map = InternMap::new(INITIAL_CAPACITY, 0).unwrap();

    for i in 0..NUMBER_KEYS {
        let id = map.get_or_insert_str(&make_key(i)).unwrap();

        assert_eq!(i, id.get());
    }

    assert_eq!(NUMBER_KEYS as usize, map.len());

    //  Lookups do not insert.
    for i in 0..NUMBER_KEYS {
        let id = map.get_or_insert_str(&make_key(i)).unwrap();

        assert_eq!(i, id.get());
    }

    assert_eq!(NUMBER_KEYS as usize, map.len());

    assert_key_recovery(&map, 0..NUMBER_KEYS);
    assert_key_recovery(&map, (0..NUMBER_KEYS).rev());

    //  Permuted order, stepping by a number co-prime with the number of keys.
    assert_key_recovery(&map, (0..NUMBER_KEYS).map(|i| (i * 7919) % NUMBER_KEYS));

    assert_eq!(NUMBER_KEYS as usize, map.len());
}

//  Too expensive for MIRI to run.
#[cfg(not(miri))]
#[test]
fn growth_keeps_ids() {
    //  Check all previous keys after each expansion.
    let mut map = InternMap::new(4, 8).unwrap();

    let mut capacity = map.capacity();

    for i in 0..(1u32 << 12) + 1 {
        let id = map.get_or_insert_str(&make_key(i)).unwrap();

        assert_eq!(i, id.get());

        if map.capacity() != capacity {
            capacity = map.capacity();

            for j in 0..=i {
                assert_eq!(Some(KeyId::new(j)), map.get_by_str(&make_key(j)), "after growth to {capacity}");
            }

            assert_key_recovery(&map, 0..=i);
        }
    }

    //  The last expansion occurs on inserting the 2049th key.
    assert_eq!(8192, map.capacity());
}

//  Too expensive for MIRI to run.
#[cfg(not(miri))]
#[test]
fn different_payload_sizes() {
    let mut maps: Vec<_> = [0, 32, 36, 127]
        .into_iter()
        .map(|size| InternMap::new(INITIAL_CAPACITY, size).unwrap())
        .collect();

    for map in &mut maps {
        for i in 0..NUMBER_KEYS {
            let id = map.get_or_insert_str(&make_key(i)).unwrap();

            assert_eq!(i, id.get());
        }

        assert_key_recovery(map, 0..NUMBER_KEYS);
    }

    let reference = &maps[0];

    for map in &maps[1..] {
        assert!(reference.iter().eq(map.iter()));
    }
}

//  Too expensive for MIRI to run.
#[cfg(not(miri))]
#[test]
fn records_store_strings() {
    //  A record holding the key, much like a user would hold a name next to their symbol.
    const RECORD_SIZE: usize = 128;

    let mut map = InternMap::new(INITIAL_CAPACITY, RECORD_SIZE).unwrap();

    for i in 0..NUMBER_KEYS {
        let key = make_key(i);
        let id = map.get_or_insert_str(&key).unwrap();

        let record = map.get_record_mut(id).unwrap();

        assert!(record.len() >= RECORD_SIZE);
        assert!(record.iter().all(|&b| b == 0));

        record[..key.len()].copy_from_slice(key.as_bytes());
    }

    for i in (0..NUMBER_KEYS).chain((0..NUMBER_KEYS).rev()) {
        let key = make_key(i);
        let record = map.get_record(KeyId::new(i)).unwrap();

        assert_eq!(key.as_bytes(), &record[..key.len()]);
        assert!(record[key.len()..].iter().all(|&b| b == 0), "{key}");
    }
}

#[test]
fn c_strings() {
    let mut map = InternMap::new(INITIAL_CAPACITY, 0).unwrap();

    for i in 0..256 {
        map.get_or_insert_str(&make_key(i)).unwrap();
    }

    for i in 0..256 {
        let c_str = map.get_c_str(KeyId::new(i)).unwrap();

        assert_eq!(make_key(i).as_bytes(), c_str.to_bytes());
    }
}

fn make_key(i: u32) -> String {
    format!("key-{i}")
}

#[track_caller]
fn assert_key_recovery<I>(map: &InternMap, ids: I)
where
    I: IntoIterator<Item = u32>,
{
    for i in ids {
        let key = map.get_key(KeyId::new(i)).unwrap();

        assert_eq!(make_key(i).as_bytes(), key, "difference on {i}th key");
        assert_eq!(make_key(i), map.get_str(KeyId::new(i)).unwrap());
    }
}
