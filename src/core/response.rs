//! Discord size limits and text fitting helpers
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Add clamp_display_name for webhook usernames
//! - 1.0.0: Message/embed truncation and line-aware chunking

/// Discord embed description limit
pub const EMBED_LIMIT: usize = 4096;
/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;
/// Webhook username limit, counted in characters
pub const DISPLAY_NAME_LIMIT: usize = 80;

/// Chunk text into pieces no larger than `max_size` bytes (UTF-8 safe, prefers line breaks)
pub fn chunk_text(text: &str, max_size: usize) -> Vec<String> {
    if text.len() <= max_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if !current.is_empty() && current.len() + line.len() + 1 > max_size {
            chunks.push(std::mem::take(&mut current));
        }
        if line.len() > max_size {
            let mut pieces = split_at_boundaries(line, max_size);
            if let Some(last) = pieces.pop() {
                chunks.extend(pieces);
                current = last;
            }
            continue;
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_at_boundaries(line: &str, max_size: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for ch in line.chars() {
        if current.len() + ch.len_utf8() > max_size && !current.is_empty() {
            result.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        result.push(current);
    }
    result
}

pub fn chunk_for_message(text: &str) -> Vec<String> {
    chunk_text(text, MESSAGE_LIMIT)
}

fn truncate_bytes(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    // Room for "..."
    let mut end = limit - 3;
    while !text.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Truncate text to fit the message limit, adding an ellipsis if needed
pub fn truncate_for_message(text: &str) -> String {
    truncate_bytes(text, MESSAGE_LIMIT)
}

/// Truncate text to fit an embed description, adding an ellipsis if needed
pub fn truncate_for_embed(text: &str) -> String {
    truncate_bytes(text, EMBED_LIMIT)
}

/// Clamp a persona name to what Discord accepts as a webhook username
pub fn clamp_display_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.chars().count() <= DISPLAY_NAME_LIMIT {
        trimmed.to_string()
    } else {
        trimmed.chars().take(DISPLAY_NAME_LIMIT).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_no_chunk() {
        assert_eq!(chunk_text("hello", 100), vec!["hello"]);
    }

    #[test]
    fn test_chunk_respects_lines() {
        let result = chunk_text("line1\nline2\nline3", 12);
        assert_eq!(result, vec!["line1\nline2", "line3"]);
    }

    #[test]
    fn test_chunk_handles_long_lines() {
        let result = chunk_text(&"a".repeat(100), 30);
        assert_eq!(result.len(), 4);
        for chunk in &result {
            assert!(chunk.len() <= 30);
        }
    }

    #[test]
    fn test_message_limit() {
        let text = "persona line\n".repeat(400);
        let result = chunk_for_message(&text);
        assert!(result.len() >= 2);
        for chunk in &result {
            assert!(chunk.len() <= MESSAGE_LIMIT);
        }
    }

    #[test]
    fn test_truncate_for_message() {
        assert_eq!(truncate_for_message("short"), "short");
        let long = truncate_for_message(&"a".repeat(2500));
        assert_eq!(long.len(), MESSAGE_LIMIT);
        assert!(long.ends_with("..."));
    }

    #[test]
    fn test_truncate_utf8_safety() {
        let text = "世界".repeat(1000);
        let result = truncate_for_message(&text);
        assert!(result.len() <= MESSAGE_LIMIT);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_clamp_display_name() {
        assert_eq!(clamp_display_name("  Nyx "), "Nyx");
        let long = "é".repeat(100);
        assert_eq!(clamp_display_name(&long).chars().count(), DISPLAY_NAME_LIMIT);
    }
}
