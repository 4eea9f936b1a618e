//! Text scanning shared by iterator discovery and substitution.
//!
//! Discovery and substitution must agree exactly on how identifier and
//! string text decomposes into `:mode` suffixes and `<...>` runs; an
//! iterator found by one splitter but not the other would either leave a
//! reference unsubstituted or index an iterator that was never activated.
//! Keeping the splitters in one place makes that agreement structural.

/// Splits identifier text on the last `:` that is not inside `<...>`.
///
/// Returns the prefix and, when a colon was found, the suffix after it.
/// Colons inside angle runs belong to attribute references like
/// `<MODE:size>` and never act as mode separators.
///
/// # Example
///
/// ```
/// use mdel_elab::scan::split_mode_suffix;
///
/// assert_eq!(split_mode_suffix("op:SI"), ("op", Some("SI")));
/// assert_eq!(split_mode_suffix("mov<M:w>"), ("mov<M:w>", None));
/// assert_eq!(split_mode_suffix("plus"), ("plus", None));
/// ```
pub fn split_mode_suffix(text: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    let mut colon = None;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => colon = Some(i),
            _ => {}
        }
    }
    match colon {
        Some(i) => (&text[..i], Some(&text[i + 1..])),
        None => (text, None),
    }
}

/// Partitions text into plain chunks and top-level `<...>` runs.
///
/// `<` raises the nesting depth and `>` lowers it; a run is one balanced
/// top-level group, brackets included. Text with unbalanced brackets
/// degenerates gracefully: the unmatched remainder stays in a plain
/// chunk, which later resolution leaves untouched.
///
/// # Example
///
/// ```
/// use mdel_elab::scan::split_angle_runs;
///
/// assert_eq!(split_angle_runs("mov<sfx>_x"), vec!["mov", "<sfx>", "_x"]);
/// assert_eq!(split_angle_runs("plain"), vec!["plain"]);
/// ```
pub fn split_angle_runs(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0usize;
    let mut depth = 0i32;
    for (i, c) in text.char_indices() {
        match c {
            '<' => {
                depth += 1;
                if depth == 1 && start != i {
                    segments.push(&text[start..i]);
                    start = i;
                }
            }
            '>' => {
                depth -= 1;
                if depth == 0 {
                    segments.push(&text[start..i + 1]);
                    start = i + 1;
                }
            }
            _ => {}
        }
    }
    if start != text.len() {
        segments.push(&text[start..]);
    }
    segments
}

/// A validated `<...>` reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AngleRef<'a> {
    /// The qualifying iterator name in `<ITOR:ATTR>`, if present.
    pub iterator: Option<&'a str>,
    /// The attribute (or builtin) name.
    pub attribute: &'a str,
}

/// Parses a `<...>` run into an [`AngleRef`].
///
/// Accepts `<IDENT>` and `<IDENT:IDENT>` where identifier characters are
/// letters, digits, and `_`. Anything else - a second colon, embedded
/// markers, arbitrary code - returns `None` and the run passes through
/// substitution unchanged. That keeps generic parameters in embedded C
/// blocks (`vec<int>`) from being mangled.
pub fn parse_angle_ref(run: &str) -> Option<AngleRef<'_>> {
    if run.len() <= 2 || !run.starts_with('<') || !run.ends_with('>') {
        return None;
    }
    let inner = &run[1..run.len() - 1];

    let mut colon = None;
    for (i, c) in inner.char_indices() {
        if c == ':' {
            if colon.is_some() {
                return None;
            }
            colon = Some(i);
        } else if !(c.is_alphanumeric() || c == '_') {
            return None;
        }
    }

    Some(match colon {
        Some(i) => AngleRef {
            iterator: Some(&inner[..i]),
            attribute: &inner[i + 1..],
        },
        None => AngleRef {
            iterator: None,
            attribute: inner,
        },
    })
}
