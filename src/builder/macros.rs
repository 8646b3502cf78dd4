//! Macros for ergonomic behaviour tree construction.

/// Generate a tag enum and its `StateKind` implementation.
///
/// The enum derives everything `StateKind` requires, so callers only list
/// variants. The crate using the macro must depend on `serde`.
///
/// # Example
///
/// ```
/// use substate::state_kind;
/// use substate::core::StateKind;
///
/// state_kind! {
///     pub enum MonsterActivity {
///         Rest,
///         Eat,
///         Attack,
///         Panic,
///     }
/// }
///
/// assert_eq!(MonsterActivity::Panic.name(), "Panic");
/// ```
#[macro_export]
macro_rules! state_kind {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateKind for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
