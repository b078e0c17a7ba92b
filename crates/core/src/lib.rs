//! Editorial scheduling domain logic.
//!
//! Everything in this crate is pure: no database, no network, no clock.
//! Callers pass "today" / "now" explicitly so that scoring and calendar
//! generation stay deterministic.
//!
//! - [`scoring`] ranks one media asset against one slot.
//! - [`selection`] filters and ranks a media pool for a slot.
//! - [`calendar`] fills a date range from the weekly posting rules.
//! - [`lifecycle`] is the status state machine for calendar entries.
//! - [`ports`] declares the collaborator contracts implemented by the
//!   persistence layer and the external bridges.

/// Define a closed string-backed enum with `as_str`, `ALL`, `Display`,
/// and `FromStr` (unknown values are a validation error).
macro_rules! define_str_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val $(, alias = $alias)*)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The canonical stored string for this variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $( $val $(| $alias)* => Ok($name::$variant), )+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {}",
                        $label,
                        [$($val),+].join(", ")
                    ))),
                }
            }
        }
    };
}

pub mod calendar;
pub mod config;
pub mod content;
pub mod error;
pub mod lifecycle;
pub mod media;
pub mod ports;
pub mod publishing;
pub mod rules;
pub mod scoring;
pub mod season;
pub mod selection;
pub mod themes;
pub mod types;
