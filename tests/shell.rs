mod common;

use binder::import::{ImportEntry, ImportError};
use binder::prelude::*;
use binder::prices::ScryfallClient;
use binder::shell::{Flow, Shell, ShellError};
use binder::store::MemoryStore;
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn shell(server: &MockServer) -> Shell<MemoryStore> {
    let store = MemoryStore::new();
    let alice = common::setup(&store).await;
    let prices = ScryfallClient::new(server.uri()).unwrap();
    Shell::new(store, alice, prices, 10)
}

async fn execute(shell: &mut Shell<MemoryStore>, line: &str) -> Result<String, ShellError> {
    let mut out = Vec::new();
    let flow = shell.execute(line, &mut out).await?;
    assert_eq!(flow, Flow::Continue);
    Ok(String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_search_and_explain() {
    let server = MockServer::start().await;
    let mut shell = shell(&server).await;

    let out = execute(&mut shell, "search t:creature").await.unwrap();
    assert!(out.contains("Knight of the Reliquary"), "{out}");
    assert!(out.contains("Llanowar Elves"), "{out}");
    assert!(!out.contains("Counterspell"), "{out}");
    assert_eq!(shell.results().len(), 2);

    let out = execute(&mut shell, "search n:lotus").await.unwrap();
    assert_eq!(out, "No cards found\n");

    let out = execute(&mut shell, "explain c>wu").await.unwrap();
    assert!(
        out.contains("Where: colors CONTAINS 'w' AND colors CONTAINS 'u' AND colors MULTICOLOR"),
        "{out}"
    );
}

#[tokio::test]
async fn test_search_errors_are_typed() {
    let server = MockServer::start().await;
    let mut shell = shell(&server).await;

    let err = execute(&mut shell, "search n:bolt n:shock").await.unwrap_err();
    assert!(matches!(
        err,
        ShellError::Search(Error::DuplicateField(Field::Name))
    ));

    let err = execute(&mut shell, "shuffle").await.unwrap_err();
    assert!(matches!(err, ShellError::Usage(_)));
}

#[tokio::test]
async fn test_print_with_limit() {
    let server = MockServer::start().await;
    let mut shell = shell(&server).await;

    let out = execute(&mut shell, "print").await.unwrap();
    assert!(out.contains("Counterspell"), "{out}");
    assert!(out.contains("Llanowar Elves"), "{out}");

    let out = execute(&mut shell, "print --limit 1").await.unwrap();
    assert!(out.contains("Counterspell"), "{out}");
    assert!(!out.contains("Llanowar Elves"), "{out}");
}

#[tokio::test]
async fn test_hand_workflow() {
    let server = MockServer::start().await;
    let mut shell = shell(&server).await;

    execute(&mut shell, "search t:creature").await.unwrap();

    // Llanowar Elves is the second result, two copies are owned
    let out = execute(&mut shell, "hand add 2 5").await.unwrap();
    assert_eq!(out, "2 in hand\n");
    execute(&mut shell, "hand add 1").await.unwrap();
    assert_eq!(shell.hand().len(), 2);

    let err = execute(&mut shell, "hand add 3").await.unwrap_err();
    assert!(matches!(err, ShellError::Usage(_)));
    let err = execute(&mut shell, "hand add 1 0").await.unwrap_err();
    assert!(matches!(err, ShellError::Usage(_)));
    assert_eq!(shell.hand().len(), 2);

    let out = execute(&mut shell, "hand").await.unwrap();
    assert!(out.contains("Llanowar Elves"), "{out}");

    execute(&mut shell, "hand remove").await.unwrap();
    assert!(shell.hand().is_empty());

    let owner = shell.user().id;
    let left = shell.store().list_cards(owner, None).await.unwrap();
    assert_eq!(left.len(), 3);
    assert!(left.iter().all(|card| card.name != "Llanowar Elves"));
}

#[tokio::test]
async fn test_hand_clear() {
    let server = MockServer::start().await;
    let mut shell = shell(&server).await;

    execute(&mut shell, "search n:counterspell").await.unwrap();
    execute(&mut shell, "hand add 1 2").await.unwrap();
    let out = execute(&mut shell, "hand clear").await.unwrap();
    assert_eq!(out, "Hand cleared\n");
    assert!(shell.hand().is_empty());

    let out = execute(&mut shell, "hand print").await.unwrap();
    assert_eq!(out, "No cards in hand\n");
}

#[tokio::test]
async fn test_prices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cards/collection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "not_found": [],
            "data": [
                { "id": "00000000-0000-0000-0000-000000001050", "prices": { "usd": "2.00", "usd_foil": null } }
            ]
        })))
        .mount(&server)
        .await;
    let mut shell = shell(&server).await;

    let out = execute(&mut shell, "prices").await.unwrap();
    // three copies of Counterspell
    assert!(out.contains("Total: $6.00"), "{out}");
}

#[tokio::test]
async fn test_add_deck_list() {
    let server = MockServer::start().await;
    let mut shell = shell(&server).await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Deck\n1 Lightning Bolt [2XM]\n2 Black Lotus [LEA]").unwrap();
    file.flush().unwrap();

    let out = execute(&mut shell, &format!("add txt {}", file.path().display()))
        .await
        .unwrap();
    assert!(out.contains("Added 1 copies of 1 cards"), "{out}");
    assert!(out.contains("2 Black Lotus [LEA]"), "{out}");
}

#[tokio::test]
async fn test_hand_from_deck_list() {
    let server = MockServer::start().await;
    let mut shell = shell(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("burn and  elves.txt");
    std::fs::write(
        &file,
        "Deck\n3 Lightning Bolt [M10]\n4 Llanowar Elves\n1 helix\n1 Lightning\n1 Black Lotus\n",
    )
    .unwrap();

    let out = execute(&mut shell, &format!(r#"hand list "{}""#, file.display()))
        .await
        .unwrap();
    assert!(out.contains("Only 2 of 4 Llanowar Elves [M19] owned"), "{out}");
    // "Lightning" names both Bolt and Helix
    assert!(
        out.contains("Not in the collection:\n  1 Lightning\n  1 Black Lotus\n"),
        "{out}"
    );

    let hand: Vec<_> = shell
        .hand()
        .iter()
        .map(|entry| (entry.card.name.as_str(), entry.card.set_code.as_str(), entry.amount))
        .collect();
    assert_eq!(
        hand,
        vec![
            ("Lightning Bolt", "M10", 3),
            ("Llanowar Elves", "M19", 2),
            ("Lightning Helix", "RAV", 1),
        ]
    );

    // taking the list again stays within the owned copies
    execute(&mut shell, &format!(r#"hand list "{}""#, file.display()))
        .await
        .unwrap();
    let amounts: Vec<_> = shell.hand().iter().map(|entry| entry.amount).collect();
    assert_eq!(amounts, vec![4, 2, 1]);
}

#[tokio::test]
async fn test_quoted_path_with_spaces() {
    let server = MockServer::start().await;
    let mut shell = shell(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("my  deck.txt");
    std::fs::write(&file, "2 Lightning Bolt [2XM]\n").unwrap();

    let out = execute(&mut shell, &format!(r#"add txt "{}""#, file.display()))
        .await
        .unwrap();
    assert!(out.contains("Added 2 copies of 1 cards"), "{out}");

    let err = execute(&mut shell, r#"add txt "unterminated.txt"#)
        .await
        .unwrap_err();
    assert!(matches!(err, ShellError::Usage(_)));
}

#[tokio::test]
async fn test_search_keeps_quoted_spacing() {
    let server = MockServer::start().await;
    let mut shell = shell(&server).await;

    let out = execute(&mut shell, r#"explain n:"of  the""#).await.unwrap();
    assert!(out.contains("name CONTAINS 'of  the'"), "{out}");

    let out = execute(&mut shell, r#"search n:"of  the""#).await.unwrap();
    assert_eq!(out, "No cards found\n");
    let out = execute(&mut shell, r#"search n:"of the""#).await.unwrap();
    assert!(out.contains("Knight of the Reliquary"), "{out}");
}

#[tokio::test]
async fn test_catalog_download() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v5/csv/cards.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "uuid,name,type,manaCost,colors,rarity,setCode,borderColor\n\
             00000000-0000-0000-0000-000000000070,Black Lotus,Artifact,{0},,rare,LEA,black\n",
        ))
        .expect(1)
        .mount(&server)
        .await;
    let mut shell = shell(&server)
        .await
        .with_catalog_url(format!("{}/api/v5/csv/cards.csv", server.uri()));

    let out = execute(&mut shell, "catalog --download").await.unwrap();
    assert_eq!(out, "Loaded 1 printings\n");

    let lotus = ImportEntry::new("Black Lotus", 1).with_set("LEA");
    assert_eq!(
        shell.store().resolve(&lotus).await.unwrap(),
        Some(uuid::Uuid::from_u128(0x70))
    );
    // the rest of the catalogue is kept
    let bolt = ImportEntry::new("Lightning Bolt", 1).with_set("M10");
    assert_eq!(
        shell.store().resolve(&bolt).await.unwrap(),
        Some(common::BOLT_M10)
    );
}

#[tokio::test]
async fn test_catalog_download_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let mut shell = shell(&server)
        .await
        .with_catalog_url(format!("{}/cards.csv", server.uri()));

    let err = execute(&mut shell, "catalog --download").await.unwrap_err();
    assert!(matches!(
        err,
        ShellError::Import(ImportError::Status(status)) if status.as_u16() == 404
    ));
}

#[tokio::test]
async fn test_run_session() {
    let server = MockServer::start().await;
    let mut shell = shell(&server).await;

    let input = "search c>rw\n\nsearch c>\nusers\nquit\nprint\n";
    let mut out = Vec::new();
    shell.run(input.as_bytes(), &mut out).await.unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Lightning Helix"), "{out}");
    assert!(out.contains("Missing value"), "{out}");
    assert!(out.contains("alice"), "{out}");
    // nothing is executed after quit
    assert!(!out.contains("Counterspell"), "{out}");
}

#[tokio::test]
async fn test_quit() {
    let server = MockServer::start().await;
    let mut shell = shell(&server).await;

    let mut out = Vec::new();
    assert_eq!(shell.execute("exit", &mut out).await.unwrap(), Flow::Quit);
}
