//! CLI value enums and their conversions to library types.

use clap::ValueEnum;

use crate::inference::DirectionRule;

/// Direction rule for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    /// Never cite later work; fall back to id order when a year is missing
    YearThenId,
    /// Higher ids cite lower ids
    IdOrder,
    /// Any record may cite any other
    Unrestricted,
}

impl From<DirectionArg> for DirectionRule {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::YearThenId => Self::YearThenId,
            DirectionArg::IdOrder => Self::IdOrder,
            DirectionArg::Unrestricted => Self::Unrestricted,
        }
    }
}

impl std::fmt::Display for DirectionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", DirectionRule::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_names_match_config_names() {
        for arg in DirectionArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(name, DirectionRule::from(*arg).as_str());
            assert_eq!(name, arg.to_string());
        }
    }
}
