use serde::Serialize;

/// Page size for the post feed, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize)]
pub struct PageLimit(u8);

impl PageLimit {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn new(value: i64) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Some(PageLimit(value as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_one_through_five() {
        assert!(PageLimit::new(0).is_none());
        assert!(PageLimit::new(-3).is_none());
        assert!(PageLimit::new(6).is_none());
        assert_eq!(PageLimit::new(1).map(PageLimit::get), Some(1));
        assert_eq!(PageLimit::new(5).map(PageLimit::get), Some(5));
    }
}
