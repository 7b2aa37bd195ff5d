/// Bijective base-26 label for a zero-based counter: `0 → A`, `25 → Z`, `26 → AA`.
///
/// Automaton dumps label states with these so that state names never collide
/// with byte values in edge labels.
///
/// # Examples
/// ```
/// use zkregex_core::utils::to_alpha;
/// assert_eq!(to_alpha(0), "A");
/// assert_eq!(to_alpha(27), "AB");
/// ```
pub fn to_alpha(mut n: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Rank of an alphabetic label, the inverse of [`to_alpha`] offset by one.
///
/// Returns `None` for anything other than uppercase ASCII letters.
///
/// # Examples
/// ```
/// use zkregex_core::utils::to_nature;
/// assert_eq!(to_nature("A"), Some(1));
/// assert_eq!(to_nature("AA"), Some(27));
/// ```
pub fn to_nature(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    label.bytes().try_fold(0usize, |acc, b| {
        b.is_ascii_uppercase()
            .then(|| acc * 26 + (b - b'A' + 1) as usize)
    })
}

/// Right-pad `input` with zero bytes up to `size`.
///
/// Inputs already at least `size` long are returned unchanged.
pub fn pad_bytes(input: &[u8], size: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(size.max(input.len()));
    out.extend_from_slice(input);
    if size > input.len() {
        out.resize(size, 0);
    }
    out
}

/// Sanitize free text for a single-line `//` comment.
pub fn comment_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' => "\\n".to_string(),
            '\r' => "\\r".to_string(),
            c if c.is_control() => format!("\\u{{{:x}}}", c as u32),
            c => c.to_string(),
        })
        .collect()
}
