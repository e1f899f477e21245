//! Dependency table for derived character state
//!
//! Each node lists the nodes derived from it. Replacing or clearing a node
//! clears everything reachable from it, and nothing else.

/// A piece of character-creation state that other pieces may derive from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedState {
    Abilities,
    Draft,
    Name,
    Backstory,
    Portrait,
    Progression,
}

impl DerivedState {
    /// Direct dependents of this node
    pub fn dependents(&self) -> &'static [DerivedState] {
        match self {
            Self::Abilities => &[Self::Draft],
            Self::Draft => &[
                Self::Name,
                Self::Backstory,
                Self::Portrait,
                Self::Progression,
            ],
            Self::Name | Self::Backstory | Self::Portrait | Self::Progression => &[],
        }
    }
}

/// Every node invalidated when `changed` is replaced, in breadth-first order.
///
/// `changed` itself is not included.
pub fn invalidated_by(changed: DerivedState) -> Vec<DerivedState> {
    let mut out: Vec<DerivedState> = Vec::new();
    let mut frontier = vec![changed];
    while let Some(node) = frontier.pop() {
        for dependent in node.dependents() {
            if !out.contains(dependent) && *dependent != changed {
                out.push(*dependent);
                frontier.insert(0, *dependent);
            }
        }
    }
    out
}
