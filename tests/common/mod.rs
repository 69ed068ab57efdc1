//! Shared fixtures, every store has to behave the same.

#![allow(dead_code)]

use binder::import::{self, ImportEntry};
use binder::prelude::*;
use binder::store::{CatalogCard, StoreError, Variant};
use pretty_assertions::assert_eq;
use uuid::Uuid;

pub const BOLT_M10: Uuid = Uuid::from_u128(0x10);
pub const BOLT_2XM: Uuid = Uuid::from_u128(0x11);
pub const BOLT_2XM_BORDERLESS: Uuid = Uuid::from_u128(0x12);
pub const ELVES: Uuid = Uuid::from_u128(0x20);
pub const HELIX: Uuid = Uuid::from_u128(0x30);
pub const KNIGHT: Uuid = Uuid::from_u128(0x40);
pub const COUNTERSPELL: Uuid = Uuid::from_u128(0x50);
pub const VIAL: Uuid = Uuid::from_u128(0x60);

fn card(
    uuid: Uuid,
    name: &str,
    set_code: &str,
    type_line: &str,
    mana_cost: &str,
    colors: &str,
) -> CatalogCard {
    CatalogCard {
        uuid,
        name: name.into(),
        type_line: type_line.into(),
        oracle_text: String::new(),
        mana_cost: mana_cost.into(),
        colors: colors.into(),
        rarity: "common".into(),
        set_code: set_code.into(),
        scryfall_id: Some(Uuid::from_u128(uuid.as_u128() + 0x1000)),
        tcgplayer_product_id: None,
        variant: None,
    }
}

pub fn catalog() -> Vec<CatalogCard> {
    vec![
        CatalogCard {
            tcgplayer_product_id: Some(33450),
            oracle_text: "Lightning Bolt deals 3 damage to any target.".into(),
            ..card(BOLT_M10, "Lightning Bolt", "M10", "Instant", "{R}", "R")
        },
        card(BOLT_2XM, "Lightning Bolt", "2XM", "Instant", "{R}", "R"),
        CatalogCard {
            variant: Some(Variant::Borderless),
            ..card(BOLT_2XM_BORDERLESS, "Lightning Bolt", "2XM", "Instant", "{R}", "R")
        },
        CatalogCard {
            oracle_text: "{T}: Add {G}.".into(),
            ..card(ELVES, "Llanowar Elves", "M19", "Creature - Elf Druid", "{G}", "G")
        },
        card(HELIX, "Lightning Helix", "RAV", "Instant", "{R}{W}", "R,W"),
        card(
            KNIGHT,
            "Knight of the Reliquary",
            "CON",
            "Creature - Human Knight",
            "{1}{G}{W}",
            "G,W",
        ),
        card(COUNTERSPELL, "Counterspell", "MH2", "Instant", "{U}{U}", "U"),
    ]
}

fn names(cards: &[CardRecord]) -> Vec<&str> {
    cards.iter().map(|card| card.name.as_str()).collect()
}

/// A store with the catalogue loaded and one card of each kind owned by `alice`.
pub async fn setup<S: CardStore>(store: &S) -> User {
    assert_eq!(store.upsert_catalog(&catalog()).await.unwrap(), 7);
    let alice = store.create_user("alice").await.unwrap();
    store
        .add_cards(
            alice.id,
            &[
                (BOLT_M10, 4),
                (ELVES, 2),
                (HELIX, 1),
                (KNIGHT, 1),
                (COUNTERSPELL, 3),
            ],
        )
        .await
        .unwrap();
    alice
}

pub async fn check_users<S: CardStore>(store: &S) {
    let alice = store.create_user("Alice").await.unwrap();
    assert_eq!(alice.name, "alice");
    let bob = store.create_user("bob").await.unwrap();
    assert_ne!(alice.id, bob.id);

    assert!(matches!(
        store.create_user("ALICE").await,
        Err(StoreError::DuplicateUser(name)) if name == "alice"
    ));

    assert_eq!(store.user("ALICE").await.unwrap(), Some(alice.clone()));
    assert_eq!(store.user("carol").await.unwrap(), None);
    assert_eq!(store.users().await.unwrap(), vec![alice, bob]);
}

pub async fn check_resolve<S: CardStore>(store: &S) {
    store.upsert_catalog(&catalog()).await.unwrap();

    let by_product = ImportEntry {
        product_id: Some(33450),
        ..ImportEntry::new("Something Else", 1)
    };
    assert_eq!(store.resolve(&by_product).await.unwrap(), Some(BOLT_M10));

    let by_set = ImportEntry::new("lightning bolt", 1).with_set("2xm");
    assert_eq!(store.resolve(&by_set).await.unwrap(), Some(BOLT_2XM));

    let borderless = ImportEntry {
        variant: Some(Variant::Borderless),
        ..ImportEntry::new("Lightning Bolt", 1).with_set("2XM")
    };
    assert_eq!(
        store.resolve(&borderless).await.unwrap(),
        Some(BOLT_2XM_BORDERLESS)
    );

    let unknown = ImportEntry::new("Black Lotus", 1);
    assert_eq!(store.resolve(&unknown).await.unwrap(), None);

    let wrong_set = ImportEntry::new("Counterspell", 1).with_set("M10");
    assert_eq!(store.resolve(&wrong_set).await.unwrap(), None);
}

pub async fn check_search<S: CardStore>(store: &S) {
    let owner = setup(store).await.id;
    let find = |q: &'static str, limit: Option<u64>| async move {
        let predicate = search(q, owner).unwrap();
        store.find_cards(&predicate, owner, limit).await.unwrap()
    };

    assert_eq!(
        names(&find("", None).await),
        vec![
            "Counterspell",
            "Knight of the Reliquary",
            "Lightning Bolt",
            "Lightning Helix",
            "Llanowar Elves",
        ]
    );
    assert_eq!(
        names(&find("t:creature", None).await),
        vec!["Knight of the Reliquary", "Llanowar Elves"]
    );
    assert_eq!(
        names(&find("n:lightning t:instant", None).await),
        vec!["Lightning Bolt", "Lightning Helix"]
    );
    assert_eq!(
        names(&find("c:g", None).await),
        vec!["Knight of the Reliquary", "Llanowar Elves"]
    );
    assert_eq!(names(&find("c>rw", None).await), vec!["Lightning Helix"]);
    assert_eq!(names(&find("c>=g", None).await).len(), 2);
    assert_eq!(
        names(&find("c<r", None).await),
        vec!["Counterspell", "Knight of the Reliquary", "Llanowar Elves"]
    );
    assert_eq!(
        names(&find("c<rg", None).await),
        vec!["Counterspell"]
    );
    assert_eq!(names(&find(r#"o:"3 damage""#, None).await), vec!["Lightning Bolt"]);
    assert_eq!(names(&find("s:m1", None).await), vec!["Lightning Bolt", "Llanowar Elves"]);
    assert_eq!(find("", Some(2)).await.len(), 2);
    assert!(find("n:lotus", None).await.is_empty());

    let bolt = find("n=bolt", None).await;
    assert_eq!(bolt.len(), 1);
    assert_eq!(bolt[0].quantity, 4);
    assert_eq!(bolt[0].uuid, BOLT_M10);
}

pub async fn check_literal_matching<S: CardStore>(store: &S) {
    let owner = setup(store).await.id;
    store
        .upsert_catalog(&[card(VIAL, "Æther Vial", "DST", "Artifact", "{1}", "")])
        .await
        .unwrap();
    store.add_cards(owner, &[(VIAL, 1)]).await.unwrap();

    let find = |q: &'static str| async move {
        let predicate = search(q, owner).unwrap();
        names(&store.find_cards(&predicate, owner, None).await.unwrap())
            .into_iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
    };

    // `_` and `%` are plain characters
    assert!(find("n:_").await.is_empty());
    assert!(find("n:%").await.is_empty());
    assert!(find("n:l_ghtning").await.is_empty());
    assert!(find("n:l%bolt").await.is_empty());

    // only ASCII letters ignore case
    assert_eq!(find("n:ÆTHER").await, vec!["Æther Vial"]);
    assert_eq!(find(r#"n:"æther vial""#).await, Vec::<String>::new());
    assert_eq!(find("n:vial").await, vec!["Æther Vial"]);
}

pub async fn check_scope<S: CardStore>(store: &S) {
    let alice = setup(store).await;
    let bob = store.create_user("bob").await.unwrap();

    assert!(store.list_cards(bob.id, None).await.unwrap().is_empty());

    // a predicate built for alice finds nothing when asked for bob
    let predicate = search("t:creature", alice.id).unwrap();
    assert!(store
        .find_cards(&predicate, bob.id, None)
        .await
        .unwrap()
        .is_empty());
}

pub async fn check_quantities<S: CardStore>(store: &S) {
    let owner = setup(store).await.id;
    let quantity = |uuid: Uuid| async move {
        store
            .list_cards(owner, None)
            .await
            .unwrap()
            .into_iter()
            .find(|card| card.uuid == uuid)
            .map(|card| card.quantity)
    };

    store.add_cards(owner, &[(ELVES, 3)]).await.unwrap();
    assert_eq!(quantity(ELVES).await, Some(5));

    assert_eq!(
        store
            .remove_cards(owner, &[(ELVES, 2), (BOLT_2XM, 1)])
            .await
            .unwrap(),
        1
    );
    assert_eq!(quantity(ELVES).await, Some(3));

    store.remove_cards(owner, &[(ELVES, 10)]).await.unwrap();
    assert_eq!(quantity(ELVES).await, None);
}

pub async fn check_errors<S: CardStore>(store: &S) {
    let alice = setup(store).await;

    assert!(matches!(
        store.add_cards(OwnerId(999), &[(ELVES, 1)]).await,
        Err(StoreError::UnknownUser(_))
    ));
    assert!(matches!(
        store.add_cards(alice.id, &[(Uuid::from_u128(0xdead), 1)]).await,
        Err(StoreError::UnknownCard(uuid)) if uuid == Uuid::from_u128(0xdead)
    ));
    assert!(matches!(
        store.remove_cards(OwnerId(999), &[(ELVES, 1)]).await,
        Err(StoreError::UnknownUser(_))
    ));
}

pub async fn check_import<S: CardStore>(store: &S) {
    store.upsert_catalog(&catalog()).await.unwrap();
    let alice = store.create_user("alice").await.unwrap();

    let entries = vec![
        ImportEntry::new("Lightning Bolt", 2).with_set("M10"),
        ImportEntry::new("Lightning Bolt", 1).with_set("M10"),
        ImportEntry::new("Black Lotus", 1),
        ImportEntry::new("Counterspell", 4),
    ];
    let summary = import::import(store, alice.id, entries).await.unwrap();

    assert_eq!(summary.copies, 7);
    assert_eq!(summary.unresolved, vec![ImportEntry::new("Black Lotus", 1)]);

    let cards = store.list_cards(alice.id, None).await.unwrap();
    assert_eq!(names(&cards), vec!["Counterspell", "Lightning Bolt"]);
    assert_eq!(cards[1].quantity, 3);
}
