//! Fixed pool of reusable DP columns for the streaming matcher.

/// One timestep of matcher state: accumulated cost and path start per
/// prototype index `0..=M`.
#[derive(Debug, Clone)]
pub(crate) struct Column {
    pub(crate) dist: Vec<f64>,
    pub(crate) start: Vec<u64>,
}

impl Column {
    fn new(len: usize) -> Self {
        Self {
            dist: vec![f64::INFINITY; len],
            start: vec![0; len],
        }
    }
}

/// Two indexed columns: the previous timestep and the working one.
///
/// [`ColumnPool::rotate`] retires the previous column and hands it out as the
/// next working column, so no allocation happens after construction.
#[derive(Debug, Clone)]
pub(crate) struct ColumnPool {
    columns: [Column; 2],
    working: usize,
}

impl ColumnPool {
    /// Create a pool for a prototype of length `m`.
    ///
    /// The previous column starts as `dist = [0, ∞, ...]`, `start = [0, ...]`.
    pub(crate) fn new(m: usize) -> Self {
        let mut previous = Column::new(m + 1);
        previous.dist[0] = 0.0;
        Self {
            columns: [Column::new(m + 1), previous],
            working: 0,
        }
    }

    /// Borrow the previous column and the working column at once.
    pub(crate) fn split(&mut self) -> (&Column, &mut Column) {
        let [first, second] = &mut self.columns;
        if self.working == 0 {
            (&*second, first)
        } else {
            (&*first, second)
        }
    }

    /// The working column becomes the previous one.
    pub(crate) fn rotate(&mut self) {
        self.working ^= 1;
    }
}
