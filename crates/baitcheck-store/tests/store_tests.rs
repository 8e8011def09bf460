use baitcheck_core::traits::{ArticleStore, PredictionStore};
use baitcheck_core::types::InsertOutcome;
use baitcheck_store::SqliteGateway;

async fn memory_gateway() -> SqliteGateway {
    SqliteGateway::open("sqlite::memory:").await.expect("open in-memory store")
}

#[tokio::test]
async fn find_article_unknown_url_is_none() {
    let store = memory_gateway().await;
    let found = store
        .find_article_by_url("https://news.example/none")
        .await
        .expect("query");
    assert!(found.is_none());
}

#[tokio::test]
async fn save_article_is_find_or_insert() {
    let store = memory_gateway().await;
    let url = "https://news.example/a/1";

    let first = store.save_article(url, "Title", "Body").await.expect("insert");
    let second = store.save_article(url, "Title", "Body").await.expect("re-save");
    assert_eq!(first, second, "same URL resolves to the same article id");

    let article = store
        .find_article_by_url(url)
        .await
        .expect("query")
        .expect("article exists");
    assert_eq!(article.id, first);
    assert_eq!(article.title, "Title");
    assert_eq!(article.content, "Body");
    assert_eq!(article.url, url);
}

#[tokio::test]
async fn insert_prediction_enforces_uniqueness() {
    let store = memory_gateway().await;
    let id = store
        .save_article("https://news.example/a/2", "T", "C")
        .await
        .expect("article");

    let first = store.insert_prediction(id, 0.8, 0.2).await.expect("insert");
    assert_eq!(first, InsertOutcome::Inserted);

    let stored = store
        .find_prediction(id)
        .await
        .expect("query")
        .expect("row exists");

    // A second insert is a benign no-op outcome, not an error,
    // and the stored row is untouched.
    let second = store.insert_prediction(id, 0.1, 0.9).await.expect("re-insert");
    assert_eq!(second, InsertOutcome::AlreadyExists);

    let after = store
        .find_prediction(id)
        .await
        .expect("query")
        .expect("row still exists");
    assert_eq!(after.real_probability, stored.real_probability);
    assert_eq!(after.fake_probability, stored.fake_probability);
    assert_eq!(after.created_at, stored.created_at);
}

#[tokio::test]
async fn rows_survive_a_reopen_of_a_file_backed_store() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db_url = format!("sqlite://{}", tmp.path().join("baitcheck.db").display());
    let url = "https://news.example/persist";

    let id = {
        let store = SqliteGateway::open(&db_url).await.expect("open");
        let id = store.save_article(url, "T", "C").await.expect("article");
        store.insert_prediction(id, 0.6, 0.4).await.expect("insert");
        store.close().await;
        id
    };

    let reopened = SqliteGateway::open(&db_url).await.expect("reopen");
    let row = reopened
        .find_prediction(id)
        .await
        .expect("query")
        .expect("row persisted");
    assert!((row.real_probability - 0.6).abs() < 1e-9);
}

#[tokio::test]
async fn find_prediction_by_url_joins_article_title() {
    let store = memory_gateway().await;
    let url = "https://news.example/a/3";
    let id = store.save_article(url, "Headline", "Body").await.expect("article");

    assert!(store
        .find_prediction_by_url(url)
        .await
        .expect("query")
        .is_none());

    store.insert_prediction(id, 0.75, 0.25).await.expect("insert");

    let (prediction, title) = store
        .find_prediction_by_url(url)
        .await
        .expect("query")
        .expect("joined row");
    assert_eq!(title, "Headline");
    assert_eq!(prediction.article_id, id);
    assert!((prediction.real_probability - 0.75).abs() < 1e-9);
    assert!((prediction.fake_probability - 0.25).abs() < 1e-9);
}
