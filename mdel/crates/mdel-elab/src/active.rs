//! The active iterator tuple and its odometer.
//!
//! During one form's expansion the discovered iterators form three rings
//! (mode, code, int), each an insertion-ordered map from iterator name to
//! the current choice index. The rings advance like an odometer: within a
//! ring the first iterator that can still advance does, resetting every
//! iterator before it; a ring that wraps hands the carry to the next
//! ring. Ring order is mode, then code, then int.

use mdel_util::IndexMap;

use crate::registry::{IterKind, Registry};

/// The set of iterators activated for the current form, with their
/// current choice indices.
///
/// Local to a single expansion; nothing here survives from one top-level
/// form to the next.
#[derive(Debug, Default)]
pub struct ActiveSet {
    mode: IndexMap<String, usize>,
    code: IndexMap<String, usize>,
    int: IndexMap<String, usize>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an iterator active at index 0.
    ///
    /// Idempotent: re-activating never resets an index, so discovery may
    /// visit the same reference any number of times.
    pub fn activate(&mut self, kind: IterKind, name: &str) {
        if !self.ring(kind).contains_key(name) {
            self.ring_mut(kind).insert(name.to_string(), 0);
        }
    }

    /// Current choice index of an active iterator.
    pub fn index_of(&self, kind: IterKind, name: &str) -> Option<usize> {
        self.ring(kind).get(name).copied()
    }

    /// The ring for one kind, in activation order.
    pub fn ring(&self, kind: IterKind) -> &IndexMap<String, usize> {
        match kind {
            IterKind::Mode => &self.mode,
            IterKind::Code => &self.code,
            IterKind::Int => &self.int,
        }
    }

    fn ring_mut(&mut self, kind: IterKind) -> &mut IndexMap<String, usize> {
        match kind {
            IterKind::Mode => &mut self.mode,
            IterKind::Code => &mut self.code,
            IterKind::Int => &mut self.int,
        }
    }

    /// True when no iterator is active and expansion is a single copy.
    pub fn is_empty(&self) -> bool {
        self.mode.is_empty() && self.code.is_empty() && self.int.is_empty()
    }

    /// Advances the odometer by one position.
    ///
    /// Returns false once every iterator sits at its last choice; all
    /// indices are back at 0 at that point.
    pub fn bump(&mut self, registry: &Registry) -> bool {
        IterKind::ALL
            .iter()
            .any(|&kind| self.bump_ring(kind, registry))
    }

    fn bump_ring(&mut self, kind: IterKind, registry: &Registry) -> bool {
        for (name, index) in self.ring_mut(kind).iter_mut() {
            // Activation implies the name resolved to an iterator; an
            // unknown name is treated as a single choice and never holds
            // the odometer.
            let count = registry
                .iterator(kind, name)
                .map(|def| def.choices.len())
                .unwrap_or(1);
            if *index + 1 < count {
                *index += 1;
                return true;
            }
            *index = 0;
        }
        false
    }
}
