//! Paragraph-boundary text chunker.

use tracing::warn;

/// Default maximum chunk length, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Separator pieces are split on and re-joined with.
const SEPARATOR: &str = "\n\n";

/// Splits text on blank lines and merges the pieces into chunks of at most
/// `chunk_size` characters.
///
/// Consecutive chunks share trailing pieces totalling at most `overlap`
/// characters. A single piece longer than `chunk_size` becomes its own chunk.
#[must_use]
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let pieces = text
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for piece in pieces {
        let piece_len = piece.chars().count();
        let joined_len = if current.is_empty() {
            piece_len
        } else {
            current_len + SEPARATOR.len() + piece_len
        };

        if joined_len > chunk_size && !current.is_empty() {
            chunks.push(current.join(SEPARATOR));
            while !current.is_empty()
                && (current_len > overlap
                    || current_len + SEPARATOR.len() + piece_len > chunk_size)
            {
                let dropped = current.remove(0);
                current_len = joined(&current, current_len, dropped);
            }
        }

        if piece_len > chunk_size {
            warn!(length = piece_len, chunk_size, "Piece exceeds chunk size");
        }

        current_len = if current.is_empty() {
            piece_len
        } else {
            current_len + SEPARATOR.len() + piece_len
        };
        current.push(piece);
    }

    if !current.is_empty() {
        chunks.push(current.join(SEPARATOR));
    }

    chunks
}

/// Length of the joined pieces after `dropped` was removed from the front.
fn joined(remaining: &[&str], len_before: usize, dropped: &str) -> usize {
    if remaining.is_empty() {
        0
    } else {
        len_before - dropped.chars().count() - SEPARATOR.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = chunk_text("Revenue grew.\n\nMargins held.", 1000, 0);
        assert_eq!(chunks, vec!["Revenue grew.\n\nMargins held."]);
    }

    #[test]
    fn test_splits_at_paragraphs() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        let chunks = chunk_text(text, 10, 0);
        assert_eq!(chunks, vec!["aaaa\n\nbbbb", "cccc"]);
    }

    #[test]
    fn test_overlap_carries_trailing_piece() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        let chunks = chunk_text(text, 10, 4);
        assert_eq!(chunks, vec!["aaaa\n\nbbbb", "bbbb\n\ncccc"]);
    }

    #[test]
    fn test_oversized_piece_stands_alone() {
        let long = "x".repeat(30);
        let text = format!("intro\n\n{long}\n\noutro");
        let chunks = chunk_text(&text, 10, 0);
        assert_eq!(chunks, vec!["intro".to_string(), long, "outro".to_string()]);
    }

    #[test]
    fn test_blank_text() {
        assert!(chunk_text("  \n\n \n\n", 1000, 0).is_empty());
    }
}
