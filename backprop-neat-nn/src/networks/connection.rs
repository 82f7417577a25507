use std::fmt;

/// A compiled connection between two node indices.
/// Its weight is refined in place by backpropagation.
#[derive(Clone, Copy, PartialEq)]
pub struct FastConnection {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

impl FastConnection {
    /// Creates a new connection between the specified
    /// node indices with the specified weight.
    pub fn new(source: usize, target: usize, weight: f64) -> FastConnection {
        FastConnection {
            source,
            target,
            weight,
        }
    }
}

impl fmt::Debug for FastConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{} {:.9}", self.source, self.target, self.weight)
    }
}
