/// Tracks the current line number while parsing.
///
/// Header lines and ASCII vertex lines share one counter, so errors can point
/// at the exact line of the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationTracker {
    /// Current 1-based line index in the input stream.
    pub line_index: usize,
}

impl LocationTracker {
    /// Creates a new tracker at the start of a stream.
    pub fn new() -> Self {
        LocationTracker { line_index: 0 }
    }

    /// Advances the tracker to the next line.
    pub fn next_line(&mut self) {
        self.line_index += 1;
    }
}
