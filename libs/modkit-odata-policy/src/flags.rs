//! Closed sets of `OData` capabilities an operation may allow.
//!
//! Each set is a bit-set. Policy code only ever ORs values into a set and
//! tests membership; there is no API that clears a bit once granted.
//!
//! With the `serde` derive the sets use the `bitflags` text form in
//! human-readable formats, e.g. `"FILTER | ORDER_BY"`.

use bitflags::{Flags, bitflags};
use serde::{Deserialize, Serialize};

bitflags! {
    /// Query options (`$filter`, `$orderby`, `$top`, ...) an operation accepts at all.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AllowedQueryOptions: u32 {
        const FILTER = 1 << 0;
        const EXPAND = 1 << 1;
        const SELECT = 1 << 2;
        const ORDER_BY = 1 << 3;
        const TOP = 1 << 4;
        const SKIP = 1 << 5;
        const COUNT = 1 << 6;
        const FORMAT = 1 << 7;
        const SKIP_TOKEN = 1 << 8;
        const DELTA_TOKEN = 1 << 9;
        const APPLY = 1 << 10;
        const COMPUTE = 1 << 11;
        const SEARCH = 1 << 12;

        const SUPPORTED = Self::FILTER.bits()
            | Self::EXPAND.bits()
            | Self::SELECT.bits()
            | Self::ORDER_BY.bits()
            | Self::TOP.bits()
            | Self::SKIP.bits()
            | Self::COUNT.bits()
            | Self::FORMAT.bits()
            | Self::SKIP_TOKEN.bits()
            | Self::DELTA_TOKEN.bits()
            | Self::APPLY.bits()
            | Self::COMPUTE.bits()
            | Self::SEARCH.bits();
    }
}

bitflags! {
    /// Functions callable inside `$filter` and `$orderby` expressions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AllowedFunctions: u32 {
        const STARTS_WITH = 1 << 0;
        const ENDS_WITH = 1 << 1;
        const CONTAINS = 1 << 2;
        const LENGTH = 1 << 3;
        const INDEX_OF = 1 << 4;
        const CONCAT = 1 << 5;
        const SUBSTRING = 1 << 6;
        const TO_LOWER = 1 << 7;
        const TO_UPPER = 1 << 8;
        const TRIM = 1 << 9;
        const CAST = 1 << 10;
        const YEAR = 1 << 11;
        const MONTH = 1 << 12;
        const DAY = 1 << 13;
        const HOUR = 1 << 14;
        const MINUTE = 1 << 15;
        const SECOND = 1 << 16;
        const FRACTIONAL_SECONDS = 1 << 17;
        const DATE = 1 << 18;
        const TIME = 1 << 19;
        const TOTAL_OFFSET_MINUTES = 1 << 20;
        const NOW = 1 << 21;
        const MAX_DATE_TIME = 1 << 22;
        const MIN_DATE_TIME = 1 << 23;
        const TOTAL_SECONDS = 1 << 24;
        const ROUND = 1 << 25;
        const FLOOR = 1 << 26;
        const CEILING = 1 << 27;
        const IS_OF = 1 << 28;
        /// Lambda `any(...)` over a collection
        const ANY = 1 << 29;
        /// Lambda `all(...)` over a collection. This is the single lambda
        /// bit; use [`Self::ALL_FUNCTIONS`] to allow every function.
        const ALL = 1 << 30;

        const ALL_STRING_FUNCTIONS = Self::STARTS_WITH.bits()
            | Self::ENDS_WITH.bits()
            | Self::CONTAINS.bits()
            | Self::LENGTH.bits()
            | Self::INDEX_OF.bits()
            | Self::CONCAT.bits()
            | Self::SUBSTRING.bits()
            | Self::TO_LOWER.bits()
            | Self::TO_UPPER.bits()
            | Self::TRIM.bits();

        const ALL_DATE_TIME_FUNCTIONS = Self::YEAR.bits()
            | Self::MONTH.bits()
            | Self::DAY.bits()
            | Self::HOUR.bits()
            | Self::MINUTE.bits()
            | Self::SECOND.bits()
            | Self::FRACTIONAL_SECONDS.bits()
            | Self::DATE.bits()
            | Self::TIME.bits()
            | Self::TOTAL_OFFSET_MINUTES.bits()
            | Self::NOW.bits()
            | Self::MAX_DATE_TIME.bits()
            | Self::MIN_DATE_TIME.bits()
            | Self::TOTAL_SECONDS.bits();

        const ALL_MATH_FUNCTIONS = Self::ROUND.bits() | Self::FLOOR.bits() | Self::CEILING.bits();

        const ALL_FUNCTIONS = Self::ALL_STRING_FUNCTIONS.bits()
            | Self::ALL_DATE_TIME_FUNCTIONS.bits()
            | Self::ALL_MATH_FUNCTIONS.bits()
            | Self::CAST.bits()
            | Self::IS_OF.bits()
            | Self::ANY.bits()
            | Self::ALL.bits();
    }
}

bitflags! {
    /// Arithmetic operators usable inside `$filter`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AllowedArithmeticOperators: u32 {
        const ADD = 1 << 0;
        const SUBTRACT = 1 << 1;
        const MULTIPLY = 1 << 2;
        const DIVIDE = 1 << 3;
        const MODULO = 1 << 4;

        const ALL = Self::ADD.bits()
            | Self::SUBTRACT.bits()
            | Self::MULTIPLY.bits()
            | Self::DIVIDE.bits()
            | Self::MODULO.bits();
    }
}

bitflags! {
    /// Logical and comparison operators usable inside `$filter`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AllowedLogicalOperators: u32 {
        const OR = 1 << 0;
        const AND = 1 << 1;
        const NOT = 1 << 2;
        const EQUAL = 1 << 3;
        const NOT_EQUAL = 1 << 4;
        const GREATER_THAN = 1 << 5;
        const GREATER_THAN_OR_EQUAL = 1 << 6;
        const LESS_THAN = 1 << 7;
        const LESS_THAN_OR_EQUAL = 1 << 8;
        const HAS = 1 << 9;

        const ALL = Self::OR.bits()
            | Self::AND.bits()
            | Self::NOT.bits()
            | Self::EQUAL.bits()
            | Self::NOT_EQUAL.bits()
            | Self::GREATER_THAN.bits()
            | Self::GREATER_THAN_OR_EQUAL.bits()
            | Self::LESS_THAN.bits()
            | Self::LESS_THAN_OR_EQUAL.bits()
            | Self::HAS.bits();
    }
}

macro_rules! impl_empty_default {
    ($($flags:ty),+) => {
        $(
            impl Default for $flags {
                fn default() -> Self {
                    Self::empty()
                }
            }
        )+
    };
}

impl_empty_default!(
    AllowedQueryOptions,
    AllowedFunctions,
    AllowedArithmeticOperators,
    AllowedLogicalOperators
);

/// Render the named members of a flag set as `"A | B"`.
///
/// Single-bit names are declared before composites, so the output lists
/// individual capabilities rather than an aggregate that happens to match.
pub(crate) fn flag_names<F: Flags>(flags: &F) -> String {
    flags
        .iter_names()
        .map(|(name, _)| name)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(AllowedQueryOptions::default().is_empty());
        assert!(AllowedFunctions::default().is_empty());
        assert!(AllowedArithmeticOperators::default().is_empty());
        assert!(AllowedLogicalOperators::default().is_empty());
    }

    #[test]
    fn test_composites_cover_members() {
        assert!(AllowedFunctions::ALL_FUNCTIONS.contains(AllowedFunctions::ANY));
        assert!(AllowedFunctions::ALL_FUNCTIONS.contains(AllowedFunctions::ALL_STRING_FUNCTIONS));
        assert!(AllowedFunctions::ALL_DATE_TIME_FUNCTIONS.contains(AllowedFunctions::NOW));
        assert!(!AllowedFunctions::ALL_STRING_FUNCTIONS.contains(AllowedFunctions::ROUND));
        assert!(AllowedQueryOptions::SUPPORTED.contains(AllowedQueryOptions::SEARCH));
        assert_eq!(AllowedArithmeticOperators::ALL, AllowedArithmeticOperators::all());
        assert_eq!(AllowedLogicalOperators::ALL, AllowedLogicalOperators::all());
    }

    #[test]
    fn test_functions_all_is_the_lambda_bit_only() {
        let parsed: AllowedFunctions = serde_json::from_str("\"ALL\"").unwrap();
        assert_eq!(parsed, AllowedFunctions::ALL);
        assert!(!parsed.contains(AllowedFunctions::CONTAINS));

        let every: AllowedFunctions = serde_json::from_str("\"ALL_FUNCTIONS\"").unwrap();
        assert_eq!(every, AllowedFunctions::ALL_FUNCTIONS);
    }

    #[test]
    fn test_flag_names_lists_members() {
        let flags = AllowedQueryOptions::FILTER | AllowedQueryOptions::TOP;
        assert_eq!(flag_names(&flags), "FILTER | TOP");
        assert_eq!(flag_names(&AllowedQueryOptions::empty()), "");
    }

    #[test]
    fn test_text_form_roundtrips_through_serde() {
        let flags = AllowedQueryOptions::FILTER | AllowedQueryOptions::ORDER_BY;
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, "\"FILTER | ORDER_BY\"");

        let parsed: AllowedFunctions = serde_json::from_str("\"ANY | ALL | CONTAINS\"").unwrap();
        assert_eq!(
            parsed,
            AllowedFunctions::ANY | AllowedFunctions::ALL | AllowedFunctions::CONTAINS
        );
    }

    #[test]
    fn test_unknown_flag_name_is_rejected() {
        let parsed = serde_json::from_str::<AllowedQueryOptions>("\"FILTER | BOGUS\"");
        assert!(parsed.is_err());
    }
}
