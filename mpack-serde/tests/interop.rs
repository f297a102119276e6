//! Messages written by `rmp-serde` must be readable here and vice versa.

use mpack_serde::{from_bytes, to_bytes};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
enum Status {
    Active,
    Suspended(u32),
    Moved { to: String },
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Account {
    id: u64,
    name: String,
    balance: i64,
    ratio: f64,
    tags: Vec<String>,
    status: Status,
    parent: Option<u32>,
    #[serde(with = "serde_bytes")]
    avatar: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Flags {
    on: bool,
    level: u8,
    name: String,
    none: Option<u8>,
}

fn account() -> Account {
    Account {
        id: 70000,
        name: "Ada".to_string(),
        balance: -1234567,
        ratio: 0.25,
        tags: vec!["admin".to_string(), "ops".to_string()],
        status: Status::Moved { to: "Zürich".to_string() },
        parent: Some(7),
        avatar: vec![0, 1, 2, 254, 255],
    }
}

#[test]
fn read_named() {
    let account = account();
    let bytes = rmp_serde::to_vec_named(&account).unwrap();
    assert_eq!(account, from_bytes::<Account>(&bytes).unwrap());
    assert!(mpack::unpack_exact(&bytes).is_ok());
}

#[test]
fn read_compact() {
    let account = account();
    let bytes = rmp_serde::to_vec(&account).unwrap();
    assert_eq!(account, from_bytes::<Account>(&bytes).unwrap());
}

#[test]
fn written_is_readable() {
    for status in [Status::Active, Status::Suspended(3), Status::Moved { to: String::new() }] {
        let account = Account { status, parent: None, ..account() };
        let bytes = to_bytes(&account).unwrap();
        assert_eq!(account, rmp_serde::from_slice::<Account>(&bytes).unwrap());
    }
}

#[test]
fn identical_bytes() {
    let flags = Flags { on: true, level: 5, name: "fast".to_string(), none: None };
    assert_eq!(rmp_serde::to_vec_named(&flags).unwrap(), to_bytes(&flags).unwrap());
}

fn status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Active),
        any::<u32>().prop_map(Status::Suspended),
        ".{0,20}".prop_map(|to| Status::Moved { to }),
    ]
}

prop_compose! {
    fn arbitrary_account()(
        id in any::<u64>(),
        name in ".{0,40}",
        balance in any::<i64>(),
        ratio in -1e12f64..1e12,
        tags in prop::collection::vec("[a-z]{1,8}", 0..20),
        status in status(),
        parent in any::<Option<u32>>(),
        avatar in prop::collection::vec(any::<u8>(), 0..300),
    ) -> Account {
        Account { id, name, balance, ratio, tags, status, parent, avatar }
    }
}

proptest! {
    #[test]
    fn both_directions(account in arbitrary_account()) {
        let ours = to_bytes(&account).unwrap();
        prop_assert_eq!(&account, &rmp_serde::from_slice::<Account>(&ours).unwrap());
        let theirs = rmp_serde::to_vec_named(&account).unwrap();
        prop_assert_eq!(&account, &from_bytes::<Account>(&theirs).unwrap());
    }
}
