//! Token window construction: single-window truncation for titles and
//! overlapping sliding-window chunking for long article bodies.

use anyhow::{anyhow, Result};
use tokenizers::Tokenizer;

use baitcheck_core::error::Error;
use baitcheck_core::types::TokenWindow;

pub const DEFAULT_MAX_LEN: usize = 512;
pub const DEFAULT_STRIDE: usize = 256;

/// Wraps a pretrained tokenizer with fixed-length window semantics.
pub struct WindowTokenizer {
    tokenizer: Tokenizer,
    max_len: usize,
    stride: usize,
    pad_id: u32,
}

impl WindowTokenizer {
    pub fn new(tokenizer: Tokenizer, max_len: usize, stride: usize) -> Result<Self> {
        if stride >= max_len {
            return Err(Error::InvalidConfig(format!(
                "stride ({stride}) must be smaller than max_len ({max_len})"
            ))
            .into());
        }
        let pad_id = tokenizer
            .token_to_id("[PAD]")
            .or_else(|| tokenizer.token_to_id("<pad>"))
            .unwrap_or(0);
        Ok(Self { tokenizer, max_len, stride, pad_id })
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// One window for short text: truncate at `max_len`, pad to `max_len`.
    /// Empty text degrades to a single all-pad window instead of failing.
    pub fn encode_single(&self, text: &str) -> Result<TokenWindow> {
        let ids = self.encode_ids(text)?;
        let end = ids.len().min(self.max_len);
        Ok(pad_window(&ids[..end], self.pad_id, self.max_len))
    }

    /// The full chunk set for long text: a window of `max_len` tokens sliding
    /// by `max_len - stride`, so consecutive windows share exactly `stride`
    /// tokens. Always yields at least one window.
    pub fn encode_chunks(&self, text: &str) -> Result<Vec<TokenWindow>> {
        let ids = self.encode_ids(text)?;
        let windows = window_spans(ids.len(), self.max_len, self.stride)
            .into_iter()
            .map(|(start, end)| pad_window(&ids[start..end], self.pad_id, self.max_len))
            .collect();
        Ok(windows)
    }

    fn encode_ids(&self, text: &str) -> Result<Vec<u32>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let enc = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        Ok(enc.get_ids().to_vec())
    }
}

/// `(start, end)` spans of a sliding window over `token_count` tokens.
///
/// Window length is `max_len`, the step is `max_len - stride`, and the span
/// count is `max(1, ceil((token_count - stride) / (max_len - stride)))`. The
/// final span may be shorter than `max_len`; callers pad it.
pub fn window_spans(token_count: usize, max_len: usize, stride: usize) -> Vec<(usize, usize)> {
    if token_count <= max_len {
        return vec![(0, token_count)];
    }
    let step = max_len - stride;
    let count = (token_count - stride).div_ceil(step);
    (0..count)
        .map(|i| {
            let start = i * step;
            (start, (start + max_len).min(token_count))
        })
        .collect()
}

/// Pad a (possibly short) id slice to exactly `max_len`, with zero
/// attention-mask entries on the padding positions.
pub fn pad_window(ids: &[u32], pad_id: u32, max_len: usize) -> TokenWindow {
    let mut padded = ids.to_vec();
    let mut mask = vec![1u32; padded.len()];
    if padded.len() < max_len {
        let pad = max_len - padded.len();
        padded.extend(std::iter::repeat(pad_id).take(pad));
        mask.extend(std::iter::repeat(0).take(pad));
    }
    TokenWindow { ids: padded, attention_mask: mask }
}
