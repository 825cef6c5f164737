use std::sync::Arc;

use flashdeck_core::model::{Card, CardStatus, SeedCard};
use services::{DeckService, JsonSeed, SeedProvider};
use storage::repository::Storage;

async fn sqlite_storage(name: &str) -> Storage {
    Storage::sqlite(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("sqlite storage")
}

#[tokio::test]
async fn bundled_deck_survives_reconnect() {
    let url = "sqlite:file:memdb_bundled_restart?mode=memory&cache=shared";
    let storage = Storage::sqlite(url).await.expect("sqlite storage");
    let seed: Arc<dyn SeedProvider> = Arc::new(JsonSeed::bundled());
    let svc = DeckService::from_storage(&storage, Arc::clone(&seed));

    let session = svc.initialize().await.unwrap();
    let bundled = JsonSeed::bundled().load().unwrap();
    assert_eq!(session.len(), bundled.len());

    let session = svc.go_next(&session).await.unwrap();
    let session = svc
        .set_status(&session, CardStatus::ReviewSoon)
        .await
        .unwrap();

    // A second handle on the same database sees the same deck and position.
    let reopened = Storage::sqlite(url).await.expect("reopen");
    let again = DeckService::from_storage(&reopened, seed)
        .initialize()
        .await
        .unwrap();
    assert_eq!(again.ids(), session.ids());
    assert_eq!(again.current_card(), session.current_card());
    assert_eq!(
        again.current_card().map(Card::status),
        Some(CardStatus::ReviewSoon)
    );
    drop(storage);
}

#[tokio::test]
async fn sqlite_merge_then_reset() {
    let storage = sqlite_storage("memdb_merge_reset").await;
    let initial: Vec<SeedCard> = (1..=3)
        .map(|id| SeedCard::new(id, format!("f{id}"), format!("b{id}")))
        .collect();
    let svc = DeckService::from_storage(&storage, Arc::new(initial.clone()));
    let session = svc.initialize().await.unwrap();
    svc.set_status(&session, CardStatus::Known).await.unwrap();

    let mut extended = initial;
    extended.push(SeedCard::new(4, "f4", "b4"));
    let svc = DeckService::from_storage(&storage, Arc::new(extended));

    let merged = svc.merge().await.unwrap();
    assert_eq!(merged.len(), 4);
    let known = svc.cards_with_status(CardStatus::Known).await.unwrap();
    assert_eq!(known.len(), 1);

    let fresh = svc.reset().await.unwrap();
    assert_eq!(fresh.len(), 4);
    assert!(
        svc.cards_with_status(CardStatus::Known)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        svc.cards_with_status(CardStatus::Unset)
            .await
            .unwrap()
            .len(),
        4
    );
}
