use baitcheck_core::traits::{ArticleStore, PredictionStore};
use baitcheck_model::get_default_classifier;
use baitcheck_pipeline::PredictionPipeline;
use baitcheck_store::SqliteGateway;

async fn fake_pipeline() -> (PredictionPipeline<SqliteGateway>, SqliteGateway) {
    std::env::set_var("APP_USE_FAKE_MODEL", "1");
    let store = SqliteGateway::open("sqlite::memory:").await.expect("open store");
    let classifier = get_default_classifier().expect("classifier");
    (PredictionPipeline::new(classifier, store.clone()), store)
}

#[tokio::test]
async fn unknown_url_is_an_error_and_writes_nothing() {
    let (pipeline, store) = fake_pipeline().await;
    let url = "https://news.example/missing";

    let result = pipeline.predict_and_store(url).await;
    assert!(result.is_err());
    assert!(result.expect_err("must fail").to_string().contains("Not found"));

    assert!(store
        .find_prediction_by_url(url)
        .await
        .expect("query")
        .is_none());
}

#[tokio::test]
async fn predict_and_store_persists_exactly_once() {
    let (pipeline, store) = fake_pipeline().await;
    let url = "https://news.example/shocking";
    let id = store
        .save_article(url, "Shocking discovery!!", "filler text of the article body")
        .await
        .expect("article");

    let first = pipeline.predict_and_store(url).await.expect("predict");
    assert!(
        (first.real_news_probability + first.fake_news_probability - 1.0).abs() <= 1e-6
    );

    let stored = store
        .find_prediction(id)
        .await
        .expect("query")
        .expect("row written");

    // Second invocation is an idempotent no-op reporting the stored values
    let second = pipeline.predict_and_store(url).await.expect("re-predict");
    assert_eq!(second.real_news_probability, stored.real_probability);
    assert_eq!(second.fake_news_probability, stored.fake_probability);

    let after = store
        .find_prediction(id)
        .await
        .expect("query")
        .expect("row still there");
    assert_eq!(after.created_at, stored.created_at);
    assert_eq!(after.real_probability, stored.real_probability);
    assert_eq!(after.fake_probability, stored.fake_probability);
}

#[tokio::test]
async fn empty_title_and_content_still_predict() {
    let (pipeline, store) = fake_pipeline().await;
    let url = "https://news.example/empty";
    store.save_article(url, "", "").await.expect("article");

    let report = pipeline.predict_and_store(url).await.expect("predict");
    assert!(
        (report.real_news_probability + report.fake_news_probability - 1.0).abs() <= 1e-6
    );
}
