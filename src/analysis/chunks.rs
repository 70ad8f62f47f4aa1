use std::ops::Range;

use crate::error::{Result, TrendlineError};

/// Split `0..len` into `num_chunks` contiguous ranges of `len / num_chunks`
/// elements; the last range also takes the remainder.
pub fn chunk_ranges(len: usize, num_chunks: usize) -> Result<Vec<Range<usize>>> {
    if num_chunks == 0 {
        return Err(TrendlineError::InvalidParameter(
            "num_chunks must be at least 1".to_string(),
        ));
    }
    if num_chunks > len {
        return Err(TrendlineError::InsufficientData(format!(
            "num_chunks ({num_chunks}) exceeds the number of bars ({len})"
        )));
    }

    let per_chunk = len / num_chunks;
    Ok((0..num_chunks)
        .map(|chunk| {
            let start = chunk * per_chunk;
            let end = if chunk + 1 < num_chunks {
                start + per_chunk
            } else {
                len
            };
            start..end
        })
        .collect())
}
