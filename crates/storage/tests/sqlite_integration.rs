use chrono::Duration;
use storage::repository::{HighScoreRepository, Storage};
use storage::sqlite::SqliteRepository;
use trivia_core::model::{HighScore, Score};
use trivia_core::time::fixed_now;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_starts_without_high_score() {
    let repo = connect("memdb_empty").await;
    assert!(repo.get_high_score().await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_ratchet_only_moves_up() {
    let repo = connect("memdb_ratchet").await;
    let first = fixed_now();
    let later = first + Duration::minutes(5);

    assert!(
        repo.ratchet_high_score(HighScore::new(Score::new(40), first))
            .await
            .unwrap()
    );
    assert!(
        !repo
            .ratchet_high_score(HighScore::new(Score::new(30), later))
            .await
            .unwrap()
    );
    assert!(
        !repo
            .ratchet_high_score(HighScore::new(Score::new(40), later))
            .await
            .unwrap()
    );

    let stored = repo.get_high_score().await.unwrap().expect("stored");
    assert_eq!(stored.score().value(), 40);
    assert_eq!(stored.achieved_at(), first);

    assert!(
        repo.ratchet_high_score(HighScore::new(Score::new(70), later))
            .await
            .unwrap()
    );
    let stored = repo.get_high_score().await.unwrap().expect("stored");
    assert_eq!(stored.score().value(), 70);
    assert_eq!(stored.achieved_at(), later);
}

#[tokio::test]
async fn sqlite_high_score_survives_reconnect() {
    let url = "sqlite:file:memdb_reconnect?mode=memory&cache=shared";
    let storage = Storage::sqlite(url).await.expect("open");
    storage
        .high_scores
        .ratchet_high_score(HighScore::new(Score::new(90), fixed_now()))
        .await
        .unwrap();

    // Migrations are idempotent and the shared-cache database outlives the second pool.
    let reopened = Storage::sqlite(url).await.expect("reopen");
    let stored = reopened.high_scores.get_high_score().await.unwrap();
    assert_eq!(stored.map(|h| h.score().value()), Some(90));
    drop(storage);
}
