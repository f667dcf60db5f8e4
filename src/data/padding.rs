// ============================================================
// Layer 4 — Padding
// ============================================================
// Every sequence fed to the model has exactly `max_len` ids:
// shorter ones are right-padded with PAD, longer ones are cut
// at `max_len`. Cutting is silent at this level; callers that
// care count the truncated sequences via `exceeds`.
//
// Target sequences are framed as [BOS] ids [EOS] before
// padding, so a cut target loses its EOS.

use crate::domain::tokens::{is_framing, BOS_ID, EOS_ID, PAD_ID};

/// Right-pad (or truncate) one sequence to `max_len`.
pub fn pad_sequence(ids: &[u32], max_len: usize) -> Vec<u32> {
    let mut out: Vec<u32> = ids.iter().copied().take(max_len).collect();
    out.resize(max_len, PAD_ID);
    out
}

/// Pad (or truncate) every sequence to `max_len`.
pub fn pad_sequences(seqs: &[Vec<u32>], max_len: usize) -> Vec<Vec<u32>> {
    seqs.iter().map(|s| pad_sequence(s, max_len)).collect()
}

/// True when padding `ids` to `max_len` would drop tokens.
pub fn exceeds(ids: &[u32], max_len: usize) -> bool {
    ids.len() > max_len
}

/// `[BOS] ids [EOS]`
pub fn wrap_target(ids: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(ids.len() + 2);
    out.push(BOS_ID);
    out.extend_from_slice(ids);
    out.push(EOS_ID);
    out
}

/// Drop BOS, stop at the first EOS, remove PAD.
pub fn strip_framing(ids: &[u32]) -> Vec<u32> {
    ids.iter()
        .copied()
        .skip_while(|&id| id == BOS_ID)
        .take_while(|&id| id != EOS_ID)
        .filter(|&id| !is_framing(id))
        .collect()
}
