//! Halo classification

/// Where the values held in one side of a local halo come from
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum HaloKind {
    /// The side lies on the global domain edge and holds a fixed Dirichlet value
    Boundary,
    /// The side faces another process. The value is the rank of that process
    Exchanged(usize),
}

impl HaloKind {
    /// Rank of the neighbouring process, if any
    pub fn neighbour(&self) -> Option<usize> {
        match self {
            HaloKind::Boundary => None,
            HaloKind::Exchanged(rank) => Some(*rank),
        }
    }
}
