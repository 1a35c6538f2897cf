//! Repeat-last-choice shortcut
//!
//! Remembers, per selection context, the catalog index of the last
//! successfully confirmed choice. Lives for the whole session, is never
//! saved, and is owned by the dispatcher (no global state).

use std::collections::VecDeque;
use std::fmt;

use crate::catalog::Realm;

/// Maximum number of contexts remembered at once
pub const REPEAT_MAX: usize = 20;

/// Which selection menu a remembered index belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatContext {
    Spell { realm: Realm, book: u8 },
    Racial,
    BlueMagic,
    MagicEater,
    Smith,
    /// Item prompts are keyed by the command that asked
    Item(char),
}

impl fmt::Display for RepeatContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatContext::Spell { realm, book } => write!(f, "spell ({} book {})", realm, book),
            RepeatContext::Racial => write!(f, "racial power"),
            RepeatContext::BlueMagic => write!(f, "blue magic"),
            RepeatContext::MagicEater => write!(f, "magic eater"),
            RepeatContext::Smith => write!(f, "smithing"),
            RepeatContext::Item(cmd) => write!(f, "item ('{}')", cmd),
        }
    }
}

/// Bounded store of last choices, newest last
#[derive(Debug, Clone)]
pub struct RepeatShortcut {
    slots: VecDeque<(RepeatContext, usize)>,
    capacity: usize,
}

impl Default for RepeatShortcut {
    fn default() -> Self {
        Self::new()
    }
}

impl RepeatShortcut {
    pub fn new() -> Self {
        Self::with_capacity(REPEAT_MAX)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Remember `index` as the last confirmed choice for `context`
    pub fn record_choice(&mut self, context: RepeatContext, index: usize) {
        self.slots.retain(|(ctx, _)| *ctx != context);
        if self.slots.len() == self.capacity {
            self.slots.pop_front();
        }
        self.slots.push_back((context, index));
        tracing::debug!(%context, index, "recorded repeat choice");
    }

    /// Last confirmed choice for `context`, if any
    pub fn try_repeat(&self, context: RepeatContext) -> Option<usize> {
        self.slots
            .iter()
            .rev()
            .find(|(ctx, _)| *ctx == context)
            .map(|(_, index)| *index)
    }

    /// Drop the remembered choice for one context
    pub fn forget(&mut self, context: RepeatContext) {
        self.slots.retain(|(ctx, _)| *ctx != context);
    }

    /// Drop everything (the explicit cancel-repeat action)
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_record_then_repeat() {
        let mut repeats = RepeatShortcut::new();
        assert_eq!(repeats.try_repeat(RepeatContext::Racial), None);
        repeats.record_choice(RepeatContext::Racial, 2);
        assert_eq!(repeats.try_repeat(RepeatContext::Racial), Some(2));
        assert_eq!(repeats.try_repeat(RepeatContext::Smith), None);
    }

    #[test]
    fn test_newer_choice_replaces_older() {
        let mut repeats = RepeatShortcut::new();
        repeats.record_choice(RepeatContext::Item('q'), 1);
        repeats.record_choice(RepeatContext::Item('r'), 4);
        repeats.record_choice(RepeatContext::Item('q'), 3);
        assert_eq!(repeats.len(), 2);
        assert_eq!(repeats.try_repeat(RepeatContext::Item('q')), Some(3));
        assert_eq!(repeats.try_repeat(RepeatContext::Item('r')), Some(4));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut repeats = RepeatShortcut::with_capacity(2);
        repeats.record_choice(RepeatContext::Racial, 0);
        repeats.record_choice(RepeatContext::Smith, 1);
        repeats.record_choice(RepeatContext::BlueMagic, 2);
        assert_eq!(repeats.try_repeat(RepeatContext::Racial), None);
        assert_eq!(repeats.try_repeat(RepeatContext::Smith), Some(1));
        assert_eq!(repeats.try_repeat(RepeatContext::BlueMagic), Some(2));
    }

    #[test]
    fn test_forget_and_clear() {
        let mut repeats = RepeatShortcut::new();
        repeats.record_choice(RepeatContext::Racial, 0);
        repeats.record_choice(RepeatContext::Smith, 1);
        repeats.forget(RepeatContext::Racial);
        assert_eq!(repeats.try_repeat(RepeatContext::Racial), None);
        repeats.clear();
        assert!(repeats.is_empty());
    }

    #[test]
    fn test_context_names() {
        let ctx = RepeatContext::Spell {
            realm: Realm::Life,
            book: 0,
        };
        assert_eq!(ctx.to_string(), "spell (Life book 0)");
        assert_eq!(RepeatContext::Item('q').to_string(), "item ('q')");
    }

    proptest! {
        #[test]
        fn prop_record_then_repeat_is_idempotent(index in 0usize..64, book in 0u8..4) {
            let mut repeats = RepeatShortcut::new();
            let ctx = RepeatContext::Spell { realm: Realm::Sorcery, book };
            repeats.record_choice(ctx, index);
            prop_assert_eq!(repeats.try_repeat(ctx), Some(index));
            prop_assert_eq!(repeats.try_repeat(ctx), Some(index));
        }
    }
}
