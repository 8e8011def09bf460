//! The prediction orchestrator: resolve the article, short-circuit on an
//! existing result, classify, persist exactly once, report.

use anyhow::Result;

use baitcheck_core::error::Error;
use baitcheck_core::traits::{ArticleClassifier, ArticleStore, PredictionStore};
use baitcheck_core::types::{ArticleId, InsertOutcome, PredictionResult};
use serde::{Deserialize, Serialize};

/// The single JSON object emitted on stdout for a successful prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub real_news_probability: f64,
    pub fake_news_probability: f64,
}

impl From<&PredictionResult> for Report {
    fn from(result: &PredictionResult) -> Self {
        Report {
            real_news_probability: result.real_probability,
            fake_news_probability: result.fake_probability,
        }
    }
}

/// The error-path JSON object. Errors are reported in-band; the process
/// still exits cleanly.
pub fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Stateless orchestrator over an injected classifier and store. All state
/// lives in the store; the same pipeline value can serve many predictions.
pub struct PredictionPipeline<S>
where
    S: ArticleStore + PredictionStore,
{
    classifier: Box<dyn ArticleClassifier>,
    store: S,
}

impl<S> PredictionPipeline<S>
where
    S: ArticleStore + PredictionStore,
{
    pub fn new(classifier: Box<dyn ArticleClassifier>, store: S) -> Self {
        Self { classifier, store }
    }

    /// One result per article, persisted exactly once.
    ///
    /// An existing prediction is final: it is reported as-is and never
    /// recomputed or overwritten. Losing an insert race to a concurrent
    /// writer is the same situation, so the winner's row is re-read and
    /// reported instead of the local computation.
    pub async fn predict_and_store(&self, url: &str) -> Result<Report> {
        let article = self
            .store
            .find_article_by_url(url)
            .await?
            .ok_or_else(|| Error::NotFound(format!("no article for url {url}")))?;

        if let Some(existing) = self.store.find_prediction(article.id).await? {
            eprintln!("Debug: prediction already exists for article {}", article.id);
            return Ok(Report::from(&existing));
        }

        let prediction = self.classifier.classify(&article.title, &article.content)?;
        let real_probability = f64::from(prediction.real_probability);
        let fake_probability = f64::from(prediction.fake_probability);

        match self
            .store
            .insert_prediction(article.id, real_probability, fake_probability)
            .await?
        {
            InsertOutcome::Inserted => Ok(Report {
                real_news_probability: real_probability,
                fake_news_probability: fake_probability,
            }),
            InsertOutcome::AlreadyExists => {
                eprintln!("Debug: lost insert race for article {}, reporting stored row", article.id);
                let stored = self.read_stored(article.id).await?;
                Ok(Report::from(&stored))
            }
        }
    }

    async fn read_stored(&self, article_id: ArticleId) -> Result<PredictionResult> {
        self.store
            .find_prediction(article_id)
            .await?
            .ok_or_else(|| {
                Error::Storage(format!("prediction for article {article_id} vanished")).into()
            })
    }
}
