/// A monotonic counter providing fresh propositional variable identifiers.
///
/// The counter is shared between the instance reader, the Tseitin encoder and
/// the solver so identifiers allocated by the different components never
/// collide. Identifiers are never reused.
///
/// # Example
///
/// ```
/// # use skolibri::utils::IdCounter;
/// let mut counter = IdCounter::default();
/// assert_eq!(1, counter.next_id());
/// assert_eq!(2, counter.next_id());
/// assert_eq!(2, counter.value());
/// ```
#[derive(Debug, Default)]
pub struct IdCounter(usize);

impl IdCounter {
    /// Builds a counter whose next allocation is `highest + 1`.
    pub fn new(highest: usize) -> Self {
        IdCounter(highest)
    }

    /// Allocates and returns a fresh identifier (one greater than the previous maximum).
    pub fn next_id(&mut self) -> usize {
        self.0 += 1;
        self.0
    }

    /// Returns the highest identifier allocated so far.
    pub fn value(&self) -> usize {
        self.0
    }

    /// Raises the counter so that already-used identifiers up to `highest` cannot be allocated.
    ///
    /// Lower values are ignored; the counter never decreases.
    pub fn bump_to(&mut self, highest: usize) {
        if highest > self.0 {
            self.0 = highest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_is_monotonic() {
        let mut counter = IdCounter::new(41);
        assert_eq!(42, counter.next_id());
        assert_eq!(43, counter.next_id());
    }

    #[test]
    fn test_value_does_not_allocate() {
        let counter = IdCounter::new(3);
        assert_eq!(3, counter.value());
        assert_eq!(3, counter.value());
    }

    #[test]
    fn test_bump_to() {
        let mut counter = IdCounter::default();
        counter.bump_to(10);
        assert_eq!(11, counter.next_id());
        counter.bump_to(5);
        assert_eq!(12, counter.next_id());
    }
}
