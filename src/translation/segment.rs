/*!
 * Character-budget segmentation of source texts.
 *
 * Long files are split into segments before being sent to a provider so a
 * single request never exceeds the caller-supplied character budget. Splits
 * happen at line boundaries; a single line longer than the budget is
 * hard-split on character boundaries as a last resort. Concatenating the
 * returned segments always reproduces the input exactly.
 */

/// Split `text` into segments of at most `max_chars` characters.
///
/// Without a budget (or with a zero budget) the whole text is one segment.
pub fn split_into_segments(text: &str, max_chars: Option<usize>) -> Vec<String> {
    let Some(max_chars) = max_chars.filter(|limit| *limit > 0) else {
        return vec![text.to_string()];
    };

    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len > 0 && current_len + line_len > max_chars {
            segments.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_chars {
            // A single oversized line; split it on character boundaries
            let chars: Vec<char> = line.chars().collect();
            for chunk in chars.chunks(max_chars) {
                segments.push(chunk.iter().collect());
            }
            continue;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}
