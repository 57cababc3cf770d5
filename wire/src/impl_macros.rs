//! Contains convenience macros for enum definitions

/// Implements safe (e.g. no panic) conversion of a field-less enum to the integer types used on
/// the wire and back
#[macro_export]
macro_rules! impl_enum_to_int {
    ($type:ty, $($variant:ident => $number:literal),+ $(,)?) => {
        $crate::impl_enum_to_int!(INT_VARIANT $type => u8, $($variant => $number),+);
        $crate::impl_enum_to_int!(INT_VARIANT $type => u32, $($variant => $number),+);
        $crate::impl_enum_to_int!(INT_VARIANT $type => u64, $($variant => $number),+);
    };

    (INT_VARIANT $type:ty => $int_type:ty, $($variant:ident => $number:literal),+) => {
        impl TryFrom<$int_type> for $type {
            type Error = ::anyhow::Error;
            fn try_from(value: $int_type) -> ::std::result::Result<Self, Self::Error> {
                match value {
                    $(
                        $number => Ok(Self::$variant),
                    )+
                    t => Err(::anyhow::anyhow!(
                        "Invalid {} value {t} for conversion",
                        stringify!($type)
                    )),
                }
            }
        }

        impl From<$type> for $int_type {
            fn from(value: $type) -> $int_type {
                match value {
                    $(
                        <$type>::$variant => $number,
                    )+
                }
            }
        }
    };
}
