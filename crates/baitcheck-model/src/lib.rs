use anyhow::{anyhow, ensure, Result};
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

pub mod device;
pub mod head;
pub mod pool;
pub mod tokenize;

pub use device::select_device;
pub use head::{argmax, FusionHead, NUM_CLASSES};
pub use pool::{cls_pool, mean_chunks};
pub use tokenize::{window_spans, WindowTokenizer, DEFAULT_MAX_LEN, DEFAULT_STRIDE};

use baitcheck_core::config::expand_path;
use baitcheck_core::error::Error;
use baitcheck_core::traits::{ArticleClassifier, WindowEncoder};
use baitcheck_core::types::{ClassLabel, Prediction, TokenWindow};

/// Pretrained encoder producing one classification-position vector per
/// token window, batching all windows into a single forward pass.
pub struct BertWindowEncoder {
    model: BertModel,
    device: Device,
    hidden_size: usize,
    max_len: usize,
}

impl WindowEncoder for BertWindowEncoder {
    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn max_len(&self) -> usize {
        self.max_len
    }

    fn encode_windows(&self, windows: &[TokenWindow]) -> Result<Vec<Vec<f32>>> {
        if windows.is_empty() {
            return Ok(vec![]);
        }
        let batch = windows.len();
        let mut ids = Vec::with_capacity(batch * self.max_len);
        let mut mask = Vec::with_capacity(batch * self.max_len);
        for window in windows {
            ensure!(
                window.ids.len() == self.max_len && window.attention_mask.len() == self.max_len,
                "window length {} does not match encoder max_len {}",
                window.ids.len(),
                self.max_len
            );
            ids.extend_from_slice(&window.ids);
            mask.extend_from_slice(&window.attention_mask);
        }
        let input_ids = Tensor::from_vec(ids, (batch, self.max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(mask, (batch, self.max_len), &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let cls = cls_pool(&hidden)?;
        Ok(cls.to_device(&Device::Cpu)?.to_vec2()?)
    }
}

/// Joint title/content classifier: one window for the title, overlapping
/// chunks for the body, chunk-mean fusion, then the two-class head.
pub struct FusionClassifier<E: WindowEncoder> {
    tokenizer: WindowTokenizer,
    encoder: E,
    head: FusionHead,
    device: Device,
}

impl<E: WindowEncoder> FusionClassifier<E> {
    pub fn new(tokenizer: WindowTokenizer, encoder: E, head: FusionHead, device: Device) -> Self {
        Self { tokenizer, encoder, head, device }
    }

    fn vectors_to_tensor(&self, vectors: &[Vec<f32>]) -> Result<Tensor> {
        let hidden = self.encoder.hidden_size();
        let rows = vectors.len();
        ensure!(rows > 0, "encoder returned no window vectors");
        let mut flat = Vec::with_capacity(rows * hidden);
        for v in vectors {
            ensure!(v.len() == hidden, "window vector dim {} != {}", v.len(), hidden);
            flat.extend_from_slice(v);
        }
        Ok(Tensor::from_vec(flat, (rows, hidden), &self.device)?)
    }
}

impl<E: WindowEncoder> ArticleClassifier for FusionClassifier<E> {
    fn classify(&self, title: &str, content: &str) -> Result<Prediction> {
        let title_window = self.tokenizer.encode_single(title)?;
        let content_windows = self.tokenizer.encode_chunks(content)?;

        let title_vecs = self.encoder.encode_windows(std::slice::from_ref(&title_window))?;
        let chunk_vecs = self.encoder.encode_windows(&content_windows)?;

        let title_vec = self.vectors_to_tensor(&title_vecs)?;
        let chunk_matrix = self.vectors_to_tensor(&chunk_vecs)?;
        let content_vec = mean_chunks(&chunk_matrix)?.unsqueeze(0)?;

        let logits = self.head.forward(&title_vec, &content_vec)?;
        let probabilities: Vec<f32> =
            candle_nn::ops::softmax(&logits, 1)?.squeeze(0)?.to_vec1()?;
        ensure!(probabilities.len() == NUM_CLASSES, "expected {} logits", NUM_CLASSES);

        let class_index = argmax(&probabilities);
        Ok(Prediction {
            label: ClassLabel::from_index(class_index),
            fake_probability: probabilities[0],
            real_probability: probabilities[1],
        })
    }
}

/// The production classifier: BERT windows plus the fine-tuned fusion head.
pub type BertArticleClassifier = FusionClassifier<BertWindowEncoder>;

impl BertArticleClassifier {
    /// Load tokenizer, encoder, and head from one model directory holding
    /// `tokenizer.json`, `config.json`, and `fine_tuned_model.pth`. A missing
    /// checkpoint is fatal; no inference runs without it.
    pub fn load(model_dir: &Path, device: Device) -> Result<Self> {
        eprintln!("🔄 Loading classifier from {}", model_dir.display());

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e)
        })?;
        let tokenizer = WindowTokenizer::new(tokenizer, DEFAULT_MAX_LEN, DEFAULT_STRIDE)?;

        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        let weights_path = model_dir.join("fine_tuned_model.pth");
        if !weights_path.exists() {
            return Err(Error::Model(format!(
                "Model weights not found at {}",
                weights_path.display()
            ))
            .into());
        }
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: std::collections::HashMap<String, Tensor> =
            weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);

        let model = BertModel::load(vb.pp("bert"), &config)?;
        let head = FusionHead::load(vb.pp("classifier"), config.hidden_size)?;
        let encoder = BertWindowEncoder {
            model,
            device: device.clone(),
            hidden_size: config.hidden_size,
            max_len: DEFAULT_MAX_LEN,
        };
        eprintln!("✅ Classifier loaded");
        Ok(FusionClassifier::new(tokenizer, encoder, head, device))
    }
}

/// Deterministic stand-in classifier for tests and development: the
/// probability pair is a pure function of the input text.
struct FakeClassifier;

impl ArticleClassifier for FakeClassifier {
    fn classify(&self, title: &str, content: &str) -> Result<Prediction> {
        use std::hash::Hasher;
        use twox_hash::XxHash64;
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(title.as_bytes());
        hasher.write(content.as_bytes());
        let h = hasher.finish();
        let unit = ((h >> 11) & 0xFFFF) as f32 / 65536.0;
        let fake_probability = 0.05 + 0.9 * unit;
        let real_probability = 1.0 - fake_probability;
        let index = argmax(&[fake_probability, real_probability]);
        Ok(Prediction {
            label: ClassLabel::from_index(index),
            fake_probability,
            real_probability,
        })
    }
}

pub fn get_default_classifier() -> Result<Box<dyn ArticleClassifier>> {
    let use_fake = std::env::var("APP_USE_FAKE_MODEL")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        eprintln!("🧪 Using FakeClassifier");
        return Ok(Box::new(FakeClassifier));
    }
    let model_dir = resolve_model_dir()?;
    Ok(Box::new(BertArticleClassifier::load(&model_dir, select_device())?))
}

fn resolve_model_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") {
        let p = expand_path(&dir);
        if p.exists() {
            eprintln!("📦 Using APP_MODEL_DIR: {}", p.display());
            return Ok(p);
        }
    }
    if let Ok(dir) = std::env::var("MODEL_DIR") {
        let p = expand_path(&dir);
        if p.exists() {
            eprintln!("📦 Using MODEL_DIR: {}", p.display());
            return Ok(p);
        }
    }
    let root = Path::new("models/kobert-clickbait");
    if root.exists() {
        eprintln!("📦 Using model dir: {}", root.display());
        return Ok(root.to_path_buf());
    }
    let parent = Path::new("../models/kobert-clickbait");
    if parent.exists() {
        eprintln!("📦 Using model dir: {}", parent.display());
        return Ok(parent.to_path_buf());
    }
    Err(anyhow!("Could not locate classifier model directory"))
}
