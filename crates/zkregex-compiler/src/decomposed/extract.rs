//! Byte ranges of public parts inside a concrete input.

use super::ComposedRegex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("the max length is {max} but the input length is {len}")]
    InputTooLong { max: usize, len: usize },
    #[error("no match for the entire regex `{regex}`")]
    NoMatch { regex: String },
}

/// `[start, end)` of every public part within the leftmost-longest match of
/// the composite pattern, in part order.
///
/// A part's range spans from the first to the last byte consumed by one of
/// its transitions.
pub fn extract_substr_idxes(
    composed: &ComposedRegex,
    input: &str,
) -> Result<Vec<(usize, usize)>, ExtractError> {
    let _span = tracing::debug_span!("extract", len = input.len()).entered();

    if let Some(max) = composed.max_byte_size {
        if input.len() > max {
            return Err(ExtractError::InputTooLong {
                max,
                len: input.len(),
            });
        }
    }

    let found = composed
        .graph
        .find(input.as_bytes())
        .ok_or_else(|| ExtractError::NoMatch {
            regex: composed.regex.clone(),
        })?;
    tracing::debug!(start = found.start, end = found.end, "composite match");

    let idxes = composed
        .public_parts
        .iter()
        .map(|&part| {
            let mut offsets = found
                .tags
                .iter()
                .enumerate()
                .filter(|(_, tag)| **tag == Some(part))
                .map(|(i, _)| found.start + i);
            let first = offsets.next();
            let last = offsets.last().or(first);
            match (first, last) {
                (Some(first), Some(last)) => (first, last + 1),
                _ => (found.end, found.end),
            }
        })
        .collect();
    Ok(idxes)
}

/// The substrings at [`extract_substr_idxes`].
pub fn extract_substrs(composed: &ComposedRegex, input: &str) -> Result<Vec<String>, ExtractError> {
    let bytes = input.as_bytes();
    Ok(extract_substr_idxes(composed, input)?
        .into_iter()
        .map(|(start, end)| String::from_utf8_lossy(&bytes[start..end]).into_owned())
        .collect())
}
