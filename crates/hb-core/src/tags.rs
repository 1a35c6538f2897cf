//! Selection labels and inscription tags
//!
//! Entries of a catalog view are labelled `a`..`z` and then `0`..`9` by
//! position. Items may also carry `@` tags in their inscription: `@q1`
//! binds the key `1` to that item for the quaff command, and a bare `@1`
//! binds it for every command.

use crate::catalog::PowerDescriptor;

/// Number of distinct positional labels
pub const MAX_LABELS: usize = 36;

/// Positional label of an index
pub fn index_to_label(index: usize) -> Option<char> {
    match index {
        0..=25 => Some((b'a' + index as u8) as char),
        26..=35 => Some((b'0' + (index - 26) as u8) as char),
        _ => None,
    }
}

/// Index of a positional label
pub fn label_to_index(label: char) -> Option<usize> {
    match label {
        'a'..='z' => Some(label as usize - 'a' as usize),
        '0'..='9' => Some(label as usize - '0' as usize + 26),
        _ => None,
    }
}

/// A key resolved to an entry of the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMatch {
    pub index: usize,
    /// Matched through an inscription rather than a positional label
    pub by_tag: bool,
}

/// Whether an inscription carries `@<prefix><tag>`
fn has_tag(inscription: &str, prefix: Option<char>, tag: char) -> bool {
    let chars: Vec<char> = inscription.chars().collect();
    chars.iter().enumerate().any(|(i, &c)| {
        if c != '@' {
            return false;
        }
        match prefix {
            Some(cmd) => chars.get(i + 1) == Some(&cmd) && chars.get(i + 2) == Some(&tag),
            None => chars.get(i + 1) == Some(&tag),
        }
    })
}

/// Find the entry tagged `tag` for `command`.
///
/// A command-specific tag anywhere in the view wins over a bare digit tag.
pub fn find_tag(entries: &[PowerDescriptor], command: Option<char>, tag: char) -> Option<usize> {
    let inscribed = || {
        entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.inscription.as_deref().map(|s| (i, s)))
    };

    if let Some(cmd) = command {
        if let Some((i, _)) = inscribed().find(|(_, s)| has_tag(s, Some(cmd), tag)) {
            return Some(i);
        }
    }

    if tag.is_ascii_digit() {
        return inscribed()
            .find(|(_, s)| has_tag(s, None, tag))
            .map(|(i, _)| i);
    }

    None
}

/// Resolve one key against a view: inscription tags first, then labels
pub fn resolve_key(ch: char, entries: &[PowerDescriptor], command: Option<char>) -> Option<KeyMatch> {
    if let Some(index) = find_tag(entries, command, ch) {
        return Some(KeyMatch {
            index,
            by_tag: true,
        });
    }
    label_to_index(ch)
        .filter(|&index| index < entries.len())
        .map(|index| KeyMatch {
            index,
            by_tag: false,
        })
}
