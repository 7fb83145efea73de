//! `define_port_error!`: error enums for driven ports.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum StoreError {
//!         Connection { message: String } => "store connection failed: {message}",
//!         Locked => "store is locked",
//!     }
//! }
//! // StoreError::connection("refused"), StoreError::locked()
//! ```
//!
//! Variants render their message through `thiserror`. Every variant also
//! gets a snake_case constructor; struct-variant fields are taken as
//! `impl Into<FieldType>`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$enum_attr:meta])*
        pub enum $name:ident {
            $(
                $(#[$attr:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$enum_attr])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$attr])*
                #[error($message)]
                $variant $( { $($field: $ty),* } )?,
            )*
        }

        impl $name {
            $( define_port_error!(@ctor $variant $( { $($field: $ty),* } )?); )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum VoucherStoreError {
            Connection { message: String } => "voucher store connection failed: {message}",
            Exhausted { code: String, remaining: u32 } => "voucher {code} exhausted ({remaining} left)",
            Locked => "voucher store is locked",
        }
    }

    #[test]
    fn string_fields_take_str() {
        let err = VoucherStoreError::connection("refused");
        assert_eq!(err.to_string(), "voucher store connection failed: refused");
    }

    #[test]
    fn mixed_fields_convert_independently() {
        let err = VoucherStoreError::exhausted("WELCOME10", 3_u32);
        assert_eq!(err.to_string(), "voucher WELCOME10 exhausted (3 left)");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(VoucherStoreError::locked(), VoucherStoreError::Locked);
    }
}
