/// Macro to help with defining bitset types.
///
/// The type must be a struct with a single integer field called `bits`, and
/// must provide `fn bit(item) -> <integer>` mapping an element to its flag.
macro_rules! bitset_type {
    ($name:ident, $item:ty) => {
        impl $name {
            /// Creates a new, empty set.
            pub const fn new() -> Self {
                Self { bits: 0 }
            }

            pub fn len(self) -> u32 {
                self.bits.count_ones()
            }

            pub fn is_empty(self) -> bool {
                self.bits == 0
            }

            pub fn contains(self, item: $item) -> bool {
                (self.bits & Self::bit(item)) != 0
            }

            #[must_use] // Because users might expect this to be a mutating method
            pub fn insert(self, item: $item) -> Self {
                Self {
                    bits: self.bits | Self::bit(item),
                }
            }

            #[must_use] // Because users might expect this to be a mutating method
            pub fn remove(self, item: $item) -> Self {
                Self {
                    bits: self.bits & !Self::bit(item),
                }
            }
        }

        impl FromIterator<$item> for $name {
            fn from_iter<T: IntoIterator<Item = $item>>(iter: T) -> Self {
                let mut set = Self::new();
                for item in iter {
                    set = set.insert(item);
                }
                set
            }
        }

        impl std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self::Output {
                Self {
                    bits: self.bits & rhs.bits,
                }
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self::Output {
                Self {
                    bits: self.bits | rhs.bits,
                }
            }
        }

        impl std::ops::BitXor for $name {
            type Output = Self;

            fn bitxor(self, rhs: Self) -> Self::Output {
                Self {
                    bits: self.bits ^ rhs.bits,
                }
            }
        }

        impl std::ops::BitAndAssign for $name {
            fn bitand_assign(&mut self, rhs: Self) {
                self.bits &= rhs.bits;
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.bits |= rhs.bits;
            }
        }

        impl std::ops::BitXorAssign for $name {
            fn bitxor_assign(&mut self, rhs: Self) {
                self.bits ^= rhs.bits;
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}
pub(crate) use bitset_type;
