// ABOUTME: This module provides macros to reduce boilerplate in gateway code tables
// ABOUTME: Generates string-coded enums together with their lookup and description methods

/// Macro for declaring an enum whose variants are identified by string codes
///
/// The gateway reports codes as text (`"001"`), so lookups compare strings and
/// never parse the code as a number.
///
/// # Arguments
/// * `$name` - The enum name
/// * `$variant => $code, $description` - One row per documented code
///
/// # Generated code
/// - The enum itself, `Copy` and comparable
/// - `from_code(&str) -> Option<Self>`
/// - `code(self) -> &'static str`
/// - `description(self) -> &'static str`
/// - `ALL`, every variant in declaration order
macro_rules! string_coded_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $variant:ident => $code:literal, $description:literal;
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                #[doc = $description]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Look up a documented code. Unknown codes return `None`.
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// The code exactly as the gateway reports it
            pub fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            pub fn description(self) -> &'static str {
                match self {
                    $($name::$variant => $description,)+
                }
            }
        }
    };
}
