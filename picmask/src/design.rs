//! A design session: the top cell of one mask plus its naming counter.

use crate::deps::arcstr::ArcStr;
use crate::layout::cell::Cell;
use crate::tech::Tech;

/// One mask design in progress.
///
/// Owns the top-level [`Cell`] that parts and routing accumulate into, the
/// [`Tech`] the design is generated against, and the counter that makes
/// generated part names unique. The counter is owned here rather than being
/// process-wide, so independent designs never interfere and names are
/// reproducible from a fresh [`Design`].
#[derive(Debug, Clone)]
pub struct Design {
    name: ArcStr,
    tech: Tech,
    top: Cell,
    counter: u64,
}

impl Design {
    /// Creates an empty design named `name` against technology `tech`.
    pub fn new(name: impl Into<ArcStr>, tech: Tech) -> Self {
        let name = name.into();
        Self {
            top: Cell::new(name.clone()),
            name,
            tech,
            counter: 0,
        }
    }

    /// The name of the design.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The technology this design is generated against.
    #[inline]
    pub fn tech(&self) -> &Tech {
        &self.tech
    }

    /// The top-level cell of the design.
    #[inline]
    pub fn top(&self) -> &Cell {
        &self.top
    }

    /// A mutable reference to the top-level cell.
    #[inline]
    pub fn top_mut(&mut self) -> &mut Cell {
        &mut self.top
    }

    /// Allocates the next unique numeric identifier.
    ///
    /// Identifiers start at zero, increase monotonically in allocation
    /// order, and are never reused within a design.
    pub fn alloc_id(&mut self) -> u64 {
        let id = self.counter;
        self.counter += 1;
        id
    }

    /// Allocates a unique name by suffixing `base` with the next identifier.
    pub fn alloc_name(&mut self, base: impl std::fmt::Display) -> ArcStr {
        let id = self.alloc_id();
        crate::deps::arcstr::format!("{base}_{id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut design = Design::new("test", Tech::default());
        assert_eq!(design.alloc_id(), 0);
        assert_eq!(design.alloc_id(), 1);
        assert_eq!(design.alloc_name("GC"), "GC_2");
        assert_eq!(design.alloc_id(), 3);
    }

    #[test]
    fn fresh_designs_have_independent_counters() {
        let mut a = Design::new("a", Tech::default());
        let mut b = Design::new("b", Tech::default());
        a.alloc_id();
        a.alloc_id();
        assert_eq!(b.alloc_id(), 0);
    }
}
