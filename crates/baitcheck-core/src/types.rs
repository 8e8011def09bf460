//! Domain types shared by the tokenizer, classifier, and store gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ArticleId = i64;

/// A scraped news article as persisted by the collaborator pipeline.
///
/// - `id`: storage identity, referenced by predictions
/// - `url`: unique external key used to look the article up
/// - `title`/`content`: raw text fed to the classifier
///
/// Articles are read-only to the classification core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub url: String,
    pub title: String,
    pub content: String,
}

/// A fixed-length window of token ids with its attention mask.
///
/// `ids.len() == attention_mask.len() == max_len` always holds; padding
/// positions carry the tokenizer's pad id and a zero mask entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenWindow {
    pub ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
}

/// Class labels of the fusion head. Index order matches the checkpoint:
/// class 0 is clickbait/fake, class 1 is genuine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassLabel {
    Fake,
    Genuine,
}

impl ClassLabel {
    pub fn from_index(index: usize) -> Self {
        if index == 1 {
            ClassLabel::Genuine
        } else {
            ClassLabel::Fake
        }
    }
}

/// A classified article: the argmax label and the softmax pair behind it.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: ClassLabel,
    pub fake_probability: f32,
    pub real_probability: f32,
}

/// One persisted prediction row. At most one exists per article; the
/// `predictions.article_id` primary key enforces this at the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub article_id: ArticleId,
    pub real_probability: f64,
    pub fake_probability: f64,
    pub created_at: DateTime<Utc>,
}

/// Outcome of an idempotent prediction insert. `AlreadyExists` is a normal
/// branch, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}
