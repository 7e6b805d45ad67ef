// SiteLog - core/chunk.rs
//
// Splits messages that exceed the sink's per-call limit into consecutive
// windows. Lengths are counted in characters and windows always end on a
// char boundary.

/// Split `message` into windows of at most `max_chars` characters.
///
/// A message within the limit (including the empty message) yields one
/// window. Longer messages yield full windows in order followed by the
/// remainder; when the length is an exact multiple of the limit there is
/// no trailing empty window. Concatenating the windows gives back
/// `message`.
pub fn split_chunks(message: &str, max_chars: usize) -> Vec<&str> {
    if max_chars == 0 {
        return vec![message];
    }

    let mut chunks = Vec::new();
    let mut rest = message;
    loop {
        match rest.char_indices().nth(max_chars) {
            Some((idx, _)) => {
                let (head, tail) = rest.split_at(idx);
                chunks.push(head);
                rest = tail;
            }
            None => {
                if !rest.is_empty() || chunks.is_empty() {
                    chunks.push(rest);
                }
                return chunks;
            }
        }
    }
}

/// Forward `message` to `write` one window at a time, in order.
pub fn write_chunked<F>(message: &str, max_chars: usize, mut write: F)
where
    F: FnMut(&str),
{
    for chunk in split_chunks(message, max_chars) {
        write(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::MAX_CHUNK_CHARS;

    #[test]
    fn test_short_message_single_call() {
        assert_eq!(split_chunks("hello", MAX_CHUNK_CHARS), vec!["hello"]);
        assert_eq!(split_chunks("", MAX_CHUNK_CHARS), vec![""]);
    }

    #[test]
    fn test_exact_limit_single_call() {
        let msg = "x".repeat(MAX_CHUNK_CHARS);
        assert_eq!(split_chunks(&msg, MAX_CHUNK_CHARS).len(), 1);
    }

    #[test]
    fn test_chunk_counts_and_reassembly() {
        for len in [4001usize, 7999, 8000, 8001, 12_000, 12_345] {
            let msg: String = (0..len).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
            let chunks = split_chunks(&msg, MAX_CHUNK_CHARS);
            assert_eq!(chunks.len(), len.div_ceil(MAX_CHUNK_CHARS), "len {len}");
            assert!(chunks.iter().all(|c| c.chars().count() <= MAX_CHUNK_CHARS));
            assert_eq!(chunks.concat(), msg);
        }
    }

    #[test]
    fn test_multibyte_chars_split_on_boundaries() {
        let msg = "é".repeat(5);
        let chunks = split_chunks(&msg, 2);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn test_write_chunked_preserves_order() {
        let mut seen = Vec::new();
        write_chunked("abcdefg", 3, |c| seen.push(c.to_string()));
        assert_eq!(seen, vec!["abc", "def", "g"]);
    }
}
