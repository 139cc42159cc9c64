//! Utility macros used accross multiple files.

/// Reverse multiplication for a generic type
macro_rules! reverse_mul {
    ($T:ident, { $($field:ident),+ }, $U:ty) => {
        impl Mul<$T<$U>> for $U {
            type Output = $T<$U>;
            fn mul(self, rhs: $T<$U>) -> Self::Output {
                $T::new($(rhs.$field * self),+)
            }
        }
    };
}

/// Component wise binary operator between two values of the same type.
macro_rules! componentwise_op {
    ($T:ident, { $($field:ident),+ }, $Trait:ident, $method:ident, $op:tt) => {
        impl<T> $Trait<$T<T>> for $T<T>
        where
        T: $Trait<T, Output = T>
        {
            type Output = $T<T>;
            #[inline]
            fn $method(self, rhs: $T<T>) -> $T<T> {
                $T::new($(self.$field $op rhs.$field),+)
            }
        }
    };
}
