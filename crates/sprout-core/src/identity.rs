use std::rc::Rc;

/// Identity comparison used by state setters and effect dependencies.
///
/// Plain values (numbers, strings, bools) compare by value; shared values behind an
/// `Rc` compare by pointer, so a rebuilt collection counts as a change even when its
/// contents are equal. Floats follow `Object.is`: `NaN` is identical to itself and
/// `0.0` differs from `-0.0`.
pub trait StrictEq {
    fn strict_eq(&self, other: &Self) -> bool;
}

macro_rules! by_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl StrictEq for $t {
                fn strict_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

by_value!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    String,
    &'static str,
);

impl StrictEq for f64 {
    fn strict_eq(&self, other: &Self) -> bool {
        (self.is_nan() && other.is_nan()) || self.to_bits() == other.to_bits()
    }
}

impl StrictEq for f32 {
    fn strict_eq(&self, other: &Self) -> bool {
        (self.is_nan() && other.is_nan()) || self.to_bits() == other.to_bits()
    }
}

impl<T: ?Sized> StrictEq for Rc<T> {
    fn strict_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: StrictEq> StrictEq for Option<T> {
    fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.strict_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}
