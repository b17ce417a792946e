use crate::error::DeckError;

// Selected catalog position. The length is fixed at construction, so every
// resolved index stays in bounds for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    len: usize,
}

impl Cursor {
    pub fn new(len: usize) -> Result<Self, DeckError> {
        if len == 0 {
            return Err(DeckError::CatalogEmpty);
        }
        Ok(Self { index: 0, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn track_count(&self) -> usize {
        self.len
    }

    // rem_euclid keeps any integer in range, so -1 lands on the last track.
    pub fn set(&mut self, index: i64) {
        self.index = index.rem_euclid(self.len as i64) as usize;
    }

    pub fn advance(&mut self) {
        self.set(self.index as i64 + 1);
    }

    pub fn retreat(&mut self) {
        self.set(self.index as i64 - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_is_rejected_up_front() {
        assert!(matches!(Cursor::new(0), Err(DeckError::CatalogEmpty)));
    }

    #[test]
    fn minus_one_wraps_to_last() {
        let mut cursor = Cursor::new(5).expect("cursor");
        cursor.set(-1);
        assert_eq!(cursor.index(), 4);
    }

    #[test]
    fn retreat_from_zero_wraps_to_last() {
        let mut cursor = Cursor::new(3).expect("cursor");
        cursor.retreat();
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn advance_past_end_wraps_to_zero() {
        let mut cursor = Cursor::new(3).expect("cursor");
        cursor.set(2);
        cursor.advance();
        assert_eq!(cursor.index(), 0);
    }

    proptest::proptest! {
        #[test]
        fn advancing_len_times_is_identity(len in 1usize..64, start in 0usize..64) {
            let mut cursor = Cursor::new(len).expect("cursor");
            cursor.set(start.min(len - 1) as i64);
            let origin = cursor.index();
            for _ in 0..len {
                cursor.advance();
            }
            proptest::prop_assert_eq!(cursor.index(), origin);
        }

        #[test]
        fn set_resolves_any_integer_in_bounds(len in 1usize..64, index in i64::MIN / 2..i64::MAX / 2) {
            let mut cursor = Cursor::new(len).expect("cursor");
            cursor.set(index);
            proptest::prop_assert!(cursor.index() < len);
            proptest::prop_assert_eq!(cursor.index() as i64, index.rem_euclid(len as i64));
        }

        #[test]
        fn minus_one_always_resolves_to_last(len in 1usize..64) {
            let mut cursor = Cursor::new(len).expect("cursor");
            cursor.set(-1);
            proptest::prop_assert_eq!(cursor.index(), len - 1);
        }
    }
}
