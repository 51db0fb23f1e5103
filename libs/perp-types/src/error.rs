use soroban_sdk::contracterror;

/// Every failure aborts the whole call; nothing is committed.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// A required init parameter is zero
    ZeroParam = 1,
    /// An init parameter is out of range
    InvalidParam = 2,
    AlreadyInitialized = 3,
    NotInitialized = 4,
    SameSide = 5,
    InvalidSideIn = 6,
    InvalidSideOut = 7,
    /// A burn would leave a side below MINIMUM_SUPPLY
    MinimumSupply = 8,
    MinimumReserveA = 9,
    MinimumReserveB = 10,
    MinimumReserveC = 11,
    /// Long coefficient does not fit in 256 bits
    State1OverflowA = 12,
    /// Short coefficient does not fit in 256 bits
    State1OverflowB = 13,
    /// Helper-proposed transition disagrees with the re-derived one
    StateIntegrity = 14,
    /// Long/Short balance still inside its maturity lock
    InsufficientExpirationD = 15,
    /// Neutral balance still inside its maturity lock
    InsufficientExpirationC = 16,
    /// Re-opening onto a balance that has not matured yet
    LocktimeOrder = 17,
    InsufficientPayment = 18,
    /// Amount does not fit the token representation
    Overflow = 19,
}
