//! Error types for the mechanics engine.

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A bonus or penalty die count was negative.
    #[error("invalid modifier: bonus {bonus}, penalty {penalty} (counts must be non-negative)")]
    InvalidModifier {
        /// Requested bonus dice.
        bonus: i64,
        /// Requested penalty dice.
        penalty: i64,
    },

    /// A skill value outside 0..=100 was used to build a roll request.
    #[error("invalid skill value: {0} (expected 0-100)")]
    InvalidSkillValue(i64),

    /// A key or path does not exist on the character sheet.
    #[error("missing attribute: {0}")]
    MissingAttribute(String),

    /// A key exists but does not hold an integer.
    #[error("attribute '{0}' is not a number")]
    NotANumber(String),

    /// A push was requested where the rules forbid it.
    #[error("push not allowed: {0}")]
    PushNotAllowed(String),

    /// The character document could not be read or is malformed.
    #[error("could not load character: {0}")]
    CharacterLoad(String),

    /// A damage expression could not be parsed.
    #[error("invalid damage expression: {0}")]
    InvalidDamage(String),

    /// The rules configuration is unreadable or out of range.
    #[error("invalid rules config: {0}")]
    InvalidConfig(String),

    /// A command, name or delta could not be understood.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Writing the character sheet failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
