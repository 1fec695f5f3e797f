/// Pair of similar resources where one is "current" and the other holds the
/// previous frame's state.
///
/// Which physical resource is current is decided by the caller (via the
/// `alternate` flag), so swapping designations never moves any data.
#[derive(Debug)]
pub struct DoubleBuffered<T> {
    a: T,
    b: T,
}

impl<T> DoubleBuffered<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    pub fn curr(&self, alternate: bool) -> &T {
        if alternate {
            &self.b
        } else {
            &self.a
        }
    }

    pub fn past(&self, alternate: bool) -> &T {
        self.curr(!alternate)
    }
}
