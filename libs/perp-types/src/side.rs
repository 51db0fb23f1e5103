/// Raw side codes used at the contract boundary
pub const SIDE_R: u32 = 0x00;
pub const SIDE_A: u32 = 0x10;
pub const SIDE_B: u32 = 0x20;
pub const SIDE_C: u32 = 0x30;

/// One of the four claims on the pool reserve
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    /// The collateral token itself
    Reserve,
    /// Long (A)
    Long,
    /// Short (B)
    Short,
    /// Liquidity / neutral (C)
    Neutral,
}

impl Side {
    pub fn from_code(code: u32) -> Option<Side> {
        match code {
            SIDE_R => Some(Side::Reserve),
            SIDE_A => Some(Side::Long),
            SIDE_B => Some(Side::Short),
            SIDE_C => Some(Side::Neutral),
            _ => None,
        }
    }

    pub const fn code(self) -> u32 {
        match self {
            Side::Reserve => SIDE_R,
            Side::Long => SIDE_A,
            Side::Short => SIDE_B,
            Side::Neutral => SIDE_C,
        }
    }

    /// True for sides backed by position tokens
    pub const fn is_position(self) -> bool {
        !matches!(self, Side::Reserve)
    }

    /// True for the leveraged sides (Long/Short)
    pub const fn is_leveraged(self) -> bool {
        matches!(self, Side::Long | Side::Short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_codes_round_trip() {
        for side in [Side::Reserve, Side::Long, Side::Short, Side::Neutral] {
            assert_eq!(Side::from_code(side.code()), Some(side));
        }
    }

    #[test]
    fn test_unknown_codes_rejected() {
        assert_eq!(Side::from_code(0x01), None);
        assert_eq!(Side::from_code(0x40), None);
        assert_eq!(Side::from_code(u32::MAX), None);
    }

    #[test]
    fn test_side_classes() {
        assert!(!Side::Reserve.is_position());
        assert!(Side::Neutral.is_position());
        assert!(Side::Long.is_leveraged());
        assert!(Side::Short.is_leveraged());
        assert!(!Side::Neutral.is_leveraged());
    }
}
