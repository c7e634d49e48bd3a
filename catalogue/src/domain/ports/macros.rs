//! Declarative builder for port error enums.
//!
//! Every variant carries named, documented fields and gets a snake-case
//! constructor whose parameters accept anything convertible into the field
//! types, so adapters can write `CatalogueSourceError::status(503_u16, body)`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident {
                    $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),+ $(,)?
                } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant {
                    $( $(#[$field_meta])* $field: $ty, )+
                },
            )+
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = concat!("Build a `", stringify!($variant), "` error.")]
                    pub fn [<$variant:snake>]($( $field: impl Into<$ty> ),+) -> Self {
                        Self::$variant {
                            $( $field: $field.into(), )+
                        }
                    }
                )+
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Coverage for generated constructors and messages.

    define_port_error! {
        /// Errors raised by a listing lookup.
        pub enum LookupError {
            /// The listing was withdrawn.
            Withdrawn {
                /// Withdrawn listing id.
                car_id: u64,
            } => "listing {car_id} was withdrawn",
            /// The lookup was refused.
            Refused {
                /// HTTP status code.
                status: u16,
                /// Response detail.
                message: String,
            } => "lookup refused with {status}: {message}",
        }
    }

    #[test]
    fn constructors_convert_their_arguments() {
        let error = LookupError::refused(429_u16, "slow down");

        assert_eq!(
            error,
            LookupError::Refused {
                status: 429,
                message: "slow down".to_owned(),
            }
        );
        assert_eq!(error.to_string(), "lookup refused with 429: slow down");
    }

    #[test]
    fn single_field_variants_get_constructors() {
        let error = LookupError::withdrawn(9001_u64);

        assert_eq!(error.to_string(), "listing 9001 was withdrawn");
    }
}
