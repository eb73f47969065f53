use std::{fmt::Debug, iter::Map, mem::transmute_copy, ops::RangeInclusive};

/// Trait for types that can be represented by a contiguous range of primitive integers.
///
/// # Safety
///
/// Must only be implemented for types that can be safely transmuted to and from [`Integer::Repr`].
pub unsafe trait Integer: Copy {
    /// The equivalent primitive integer type.
    type Repr: Copy + Debug + PartialOrd;

    /// The minimum repr.
    const MIN: Self::Repr;

    /// The maximum repr.
    const MAX: Self::Repr;

    /// Casts from [`Integer::Repr`].
    #[inline(always)]
    fn new(i: Self::Repr) -> Self {
        assert!(Self::in_range(i), "{i:?} is out of range");
        unsafe { transmute_copy(&i) }
    }

    /// Casts from [`Integer::Repr`] if in range.
    #[inline(always)]
    fn try_new(i: Self::Repr) -> Option<Self> {
        if Self::in_range(i) {
            Some(unsafe { transmute_copy(&i) })
        } else {
            None
        }
    }

    /// Casts to [`Integer::Repr`].
    #[inline(always)]
    fn get(self) -> Self::Repr {
        unsafe { transmute_copy(&self) }
    }

    /// Whether a value is in the range `(Self::MIN..=Self::MAX)`.
    #[inline(always)]
    fn in_range(i: Self::Repr) -> bool {
        Self::MIN <= i && i <= Self::MAX
    }

    /// An iterator over all values in the range [`Integer::MIN`]..=[`Integer::MAX`].
    #[inline(always)]
    #[allow(clippy::type_complexity)]
    fn iter() -> Map<RangeInclusive<Self::Repr>, fn(Self::Repr) -> Self>
    where
        RangeInclusive<Self::Repr>: Iterator<Item = Self::Repr>,
    {
        (Self::MIN..=Self::MAX).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    #[repr(u8)]
    enum Digit {
        Zero,
        One,
        Two,
    }

    unsafe impl Integer for Digit {
        type Repr = u8;
        const MIN: Self::Repr = Digit::Zero as _;
        const MAX: Self::Repr = Digit::Two as _;
    }

    #[test]
    fn iter_visits_every_value_in_order() {
        assert_eq!(
            Vec::from_iter(Digit::iter()),
            vec![Digit::Zero, Digit::One, Digit::Two]
        );
    }

    #[proptest]
    fn new_is_the_inverse_of_get(#[strategy(0u8..3)] i: u8) {
        assert_eq!(Digit::new(i).get(), i);
    }

    #[proptest]
    fn try_new_fails_outside_of_range(#[strategy(3u8..)] i: u8) {
        assert_eq!(Digit::try_new(i), None);
    }

    #[proptest]
    #[should_panic]
    fn new_panics_outside_of_range(#[strategy(3u8..)] i: u8) {
        Digit::new(i);
    }
}
