//! Helper macro for generating domain port error enums.

/// Generate a `thiserror` enum with snake_case constructor helpers.
///
/// Every variant carries a `message: String` payload; constructors accept
/// anything `Into<String>` so adapters can pass `&str` or formatted strings.
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $format:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($format)]
                $variant { message: String },
            )*
        }

        impl $name {
            ::paste::paste! {
                $(
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;
