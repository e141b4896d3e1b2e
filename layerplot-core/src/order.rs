use serde::{Deserialize, Serialize};

/// Sequence of layer indices in draw order. Later entries are drawn on top.
///
/// Indices are not checked on construction; an index outside the layer list
/// is reported when the compositor reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderOrder(Vec<usize>);

impl RenderOrder {
    /// `[0, 1, ..., len - 1]`.
    pub fn identity(len: usize) -> Self {
        Self((0..len).collect())
    }

    pub fn explicit(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The explicit order when given, otherwise identity over `len` layers.
    pub fn resolve(explicit: Option<&[usize]>, len: usize) -> Self {
        match explicit {
            Some(indices) => Self(indices.to_vec()),
            None => Self::identity(len),
        }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<usize>> for RenderOrder {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}
