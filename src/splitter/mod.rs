#[cfg(test)]
mod tests;

use tracing::debug;

/// Chunking parameters, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitConfig {
    /// Maximum chunk length.
    pub chunk_size: usize,
    /// Exact overlap between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for SplitConfig {
    #[inline]
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 150,
        }
    }
}

/// Boundary preference order when choosing a cut point: paragraph, then
/// line, then word, then a hard character cut.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Split `text` into chunks of at most `chunk_size` characters with exactly
/// `chunk_overlap` characters shared between consecutive chunks. The final
/// chunk may be shorter. Cut points prefer natural boundaries within the
/// window before falling back to a hard cut at the size limit.
#[inline]
pub fn split_text(text: &str, config: &SplitConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    if chars.len() <= config.chunk_size {
        return vec![text.to_string()];
    }

    // The overlap must leave room for the next chunk to make progress.
    let overlap = config.chunk_overlap.min(config.chunk_size.saturating_sub(1));

    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let hard_end = (start + config.chunk_size).min(chars.len());
        let end = if hard_end == chars.len() {
            hard_end
        } else {
            natural_cut(&chars, start, hard_end, overlap)
        };

        chunks.push(chars[start..end].iter().collect());

        if end == chars.len() {
            break;
        }
        start = end - overlap;
    }

    debug!(
        "Split {} characters into {} chunks",
        chars.len(),
        chunks.len()
    );
    chunks
}

/// Choose the cut point for a chunk starting at `start` whose hard limit is
/// `hard_end`. Separators are tried in preference order; a boundary is only
/// usable if it lies past the overlap region, so the following chunk starts
/// after the current one.
fn natural_cut(chars: &[char], start: usize, hard_end: usize, overlap: usize) -> usize {
    let floor = start + overlap + 1;
    for sep in SEPARATORS {
        if let Some(cut) = last_boundary(chars, start, hard_end, sep) {
            if cut >= floor {
                return cut;
            }
        }
    }
    hard_end
}

/// Position just after the last occurrence of `sep` in `chars[start..hard_end]`,
/// keeping the separator with the left-hand chunk.
fn last_boundary(chars: &[char], start: usize, hard_end: usize, sep: &str) -> Option<usize> {
    let sep_chars: Vec<char> = sep.chars().collect();
    let window = &chars[start..hard_end];
    if window.len() < sep_chars.len() {
        return None;
    }
    (0..=window.len() - sep_chars.len())
        .rev()
        .find(|&i| window[i..i + sep_chars.len()] == sep_chars[..])
        .map(|i| start + i + sep_chars.len())
}
