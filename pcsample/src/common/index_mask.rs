//! Tracks which indices of a point set have been selected, so that samplers drawing with
//! replacement can produce a duplicate-free result.

#[derive(Clone, Debug)]
pub struct IndexMask {
    mask: Vec<bool>,
    count: usize,
}

impl IndexMask {
    /// Create a mask over `len` indices with nothing selected.
    pub fn new(len: usize) -> Self {
        IndexMask {
            mask: vec![false; len],
            count: 0,
        }
    }

    /// Mark `index` as selected. Returns true if it was not already selected, false if it was
    /// selected before or lies outside the mask.
    pub fn insert(&mut self, index: usize) -> bool {
        match self.mask.get_mut(index) {
            Some(v) if !*v => {
                *v = true;
                self.count += 1;
                true
            }
            _ => false,
        }
    }

    /// The number of selected indices.
    pub fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut mask = IndexMask::new(4);
        assert!(mask.insert(2));
        assert!(!mask.insert(2));
        assert_eq!(mask.count(), 1);
        assert!(mask.insert(1));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut mask = IndexMask::new(2);
        assert!(!mask.insert(5));
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn counts_every_index_once() {
        let mut mask = IndexMask::new(3);
        for i in [2, 0, 2, 1, 0] {
            mask.insert(i);
        }
        assert_eq!(mask.count(), 3);
    }
}
