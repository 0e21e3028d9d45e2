use std::io;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

/// Loads `tokenizer.json` with truncation at `max_len` tokens and padding disabled.
///
/// Single-text encoding never needs padding; some published tokenizer files
/// ship a fixed-length padding config that would only add masked tokens.
pub fn load_sentence_tokenizer(tokenizer_path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    if !tokenizer_path.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("tokenizer not found at {}", tokenizer_path.display()),
        ));
    }

    let mut tokenizer = Tokenizer::from_file(tokenizer_path).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}
