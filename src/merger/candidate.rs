use crate::compression::Position;

/// An id reported by a merge, with the number of lists it occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MergeCandidate {
    position: Position,
    overlap: u32,
}

impl MergeCandidate {
    pub fn new(position: Position, overlap: u32) -> Self {
        MergeCandidate { position, overlap }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn overlap(&self) -> u32 {
        self.overlap
    }

    /// Count one more list containing the id.
    pub fn increment(&mut self) {
        self.overlap += 1;
    }
}
