use flashdeck_core::model::{Card, CardId, CardStatus};
use storage::repository::{CardRepository, SessionStateRepository, StateKey};
use storage::sqlite::SqliteRepository;

fn build_card(id: u64) -> Card {
    Card::new(CardId::new(id), format!("Q{id}"), format!("A{id}\r\nmore"))
}

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_status_and_edits() {
    let repo = connect("memdb_roundtrip").await;

    let card = build_card(1)
        .with_status(CardStatus::ReviewSoon)
        .edit("Q1 revised", "A1");
    repo.put(&card).await.unwrap();
    repo.put(&build_card(2)).await.unwrap();

    let fetched = repo.get(CardId::new(1)).await.unwrap().expect("card");
    assert_eq!(fetched, card);
    assert!(fetched.is_edited());

    let plain = repo.get(CardId::new(2)).await.unwrap().expect("card");
    assert_eq!(plain.status(), CardStatus::Unset);
    assert_eq!(plain.back_lines(), vec!["A2", "more"]);
}

#[tokio::test]
async fn sqlite_put_is_last_write_wins() {
    let repo = connect("memdb_lww").await;

    repo.put(&build_card(7)).await.unwrap();
    repo.put(&build_card(7).with_status(CardStatus::Known))
        .await
        .unwrap();
    repo.put(&build_card(7).with_status(CardStatus::DontShow))
        .await
        .unwrap();

    let all = repo.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status(), CardStatus::DontShow);
}

#[tokio::test]
async fn sqlite_status_query_and_clear() {
    let repo = connect("memdb_status").await;

    repo.put_many(&[
        build_card(1).with_status(CardStatus::Known),
        build_card(2),
        build_card(3).with_status(CardStatus::Known),
        build_card(4).with_status(CardStatus::Unknown),
    ])
    .await
    .unwrap();

    let known: Vec<CardId> = repo
        .with_status(CardStatus::Known)
        .await
        .unwrap()
        .iter()
        .map(Card::id)
        .collect();
    assert_eq!(known, vec![CardId::new(1), CardId::new(3)]);

    let unset = repo.with_status(CardStatus::Unset).await.unwrap();
    assert_eq!(unset.len(), 1);
    assert_eq!(unset[0].id(), CardId::new(2));

    CardRepository::clear_all(&repo).await.unwrap();
    assert!(repo.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_session_state_round_trips() {
    let repo = connect("memdb_state").await;

    assert_eq!(repo.current_card_id().await.unwrap(), None);
    assert_eq!(repo.next_review_card_id().await.unwrap(), None);
    assert!(repo.deck_order().await.unwrap().is_empty());

    let order = vec![CardId::new(3), CardId::new(1), CardId::new(2)];
    repo.set_deck_order(&order).await.unwrap();
    repo.set_current_card_id(Some(CardId::new(1))).await.unwrap();
    repo.set_next_review_card_id(Some(CardId::new(0)))
        .await
        .unwrap();

    assert_eq!(repo.deck_order().await.unwrap(), order);
    assert_eq!(repo.current_card_id().await.unwrap(), Some(CardId::new(1)));
    assert_eq!(
        repo.next_review_card_id().await.unwrap(),
        Some(CardId::new(0))
    );

    SessionStateRepository::clear_all(&repo).await.unwrap();
    for key in StateKey::ALL {
        assert!(repo.get_state(key).await.unwrap().is_none());
    }
}
