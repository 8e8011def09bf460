use anyhow::{ensure, Result};
use candle_core::Tensor;

/// Classification-position vectors: `[B,T,H]` hidden states -> `[B,H]`
/// by taking the vector at token position 0 of each window.
pub fn cls_pool(hidden: &Tensor) -> Result<Tensor> {
    let dims = hidden.dims();
    ensure!(dims.len() == 3, "hidden shape must be [B,T,H]");
    Ok(hidden.narrow(1, 0, 1)?.squeeze(1)?)
}

/// Arithmetic mean over the chunk dimension: `[N,H]` -> `[H]`.
///
/// Commutative over rows, so chunk processing order never changes the
/// result, and the output dimension is independent of the chunk count.
pub fn mean_chunks(chunk_vectors: &Tensor) -> Result<Tensor> {
    let dims = chunk_vectors.dims();
    ensure!(dims.len() == 2, "chunk matrix shape must be [N,H]");
    ensure!(dims[0] > 0, "chunk matrix must have at least one row");
    Ok(chunk_vectors.mean(0)?)
}
