use crate::types::{Article, ArticleId, InsertOutcome, Prediction, PredictionResult, TokenWindow};

/// Produces one classification-position vector per token window.
pub trait WindowEncoder: Send + Sync {
    fn hidden_size(&self) -> usize;
    fn max_len(&self) -> usize;
    fn encode_windows(&self, windows: &[TokenWindow]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Joint title/content classifier producing a two-class probability pair.
pub trait ArticleClassifier: Send + Sync {
    fn classify(&self, title: &str, content: &str) -> anyhow::Result<Prediction>;
}

#[async_trait::async_trait]
pub trait ArticleStore: Send + Sync {
    async fn find_article_by_url(&self, url: &str) -> anyhow::Result<Option<Article>>;
    async fn save_article(&self, url: &str, title: &str, content: &str)
        -> anyhow::Result<ArticleId>;
}

#[async_trait::async_trait]
pub trait PredictionStore: Send + Sync {
    async fn find_prediction(&self, article_id: ArticleId)
        -> anyhow::Result<Option<PredictionResult>>;
    async fn insert_prediction(
        &self,
        article_id: ArticleId,
        real_probability: f64,
        fake_probability: f64,
    ) -> anyhow::Result<InsertOutcome>;
}
