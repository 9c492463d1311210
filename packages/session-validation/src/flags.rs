//! Named two-valued flags
//!
//! Each flag is a two-variant enum generated by [`two_valued_flag!`], so call
//! sites read `Sort::Sort` / `AllowRanges::Disallow` instead of bare `true`
//! and `false`. Every flag converts to and from `bool` and displays with its
//! variant's name.

/// Declare a two-valued flag enum.
///
/// The first variant is the `true` state.
#[macro_export]
macro_rules! two_valued_flag {
    (
        $(#[$meta:meta])*
        $name:ident { $yes:ident => $yes_name:literal, $no:ident => $no_name:literal }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $yes,
            $no,
        }

        impl $name {
            /// `true` for the first variant
            pub const fn get(self) -> bool {
                matches!(self, Self::$yes)
            }

            pub const fn from_bool(value: bool) -> Self {
                if value {
                    Self::$yes
                } else {
                    Self::$no
                }
            }

            pub const fn as_str(self) -> &'static str {
                match self {
                    Self::$yes => $yes_name,
                    Self::$no => $no_name,
                }
            }
        }

        impl From<bool> for $name {
            fn from(value: bool) -> Self {
                Self::from_bool(value)
            }
        }

        impl From<$name> for bool {
            fn from(flag: $name) -> bool {
                flag.get()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

two_valued_flag!(
    /// Whether `start..stop` tokens are expanded in a list of longs
    AllowRanges { Allow => "ALLOW_RANGES", Disallow => "DISALLOW_RANGES" }
);

two_valued_flag!(
    /// Whether the UNKNOWN sentinel of an enum is an acceptable choice
    AllowUnknown { Allow => "ALLOW_UNKNOWN", Disallow => "DISALLOW_UNKNOWN" }
);

two_valued_flag!(
    /// Sort a list of longs ascending
    Sort { Sort => "SORT", NoSort => "NO_SORT" }
);

two_valued_flag!(
    /// Remove duplicates from a list of longs, first occurrence wins
    Deduplicate { Deduplicate => "DEDUPLICATE", KeepDuplicates => "KEEP_DUPLICATES" }
);

two_valued_flag!(
    /// Upper-case a string before checking it
    Uppercase { Uppercase => "UPPERCASE", AsIs => "AS_IS" }
);

two_valued_flag!(
    /// Whether an existing path must be a directory or a regular file
    IsDirectory { Directory => "DIRECTORY", File => "FILE" }
);

two_valued_flag!(
    /// Positional parameter at the end of the command line
    Trailing { Trailing => "TRAILING", Option => "OPTION" }
);

two_valued_flag!(
    /// Whether a parameter takes an argument
    NeedsArgument { NeedsArgument => "NEEDS_ARGUMENT", NoArgument => "NEEDS_NO_ARGUMENT" }
);

two_valued_flag!(
    EnableUplink { Enabled => "UPLINK_ENABLED", Disabled => "UPLINK_DISABLED" }
);

two_valued_flag!(
    EnableSse { Enabled => "SSE_ENABLED", Disabled => "SSE_DISABLED" }
);

two_valued_flag!(
    /// Session driven from the GUI rather than the command line
    Gui { Gui => "GUI", NoGui => "NO_GUI" }
);

two_valued_flag!(
    Autorun { Autorun => "AUTORUN", NoAutorun => "NO_AUTORUN" }
);
