//! Error codes for the Sheepshead backend.
//!
//! Every rejected HTTP request and every websocket `error` frame carries one
//! of these codes. Add new codes here; never pass ad-hoc strings as codes.

use core::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    Unauthorized,
    UnauthorizedMissingBearer,
    UnauthorizedInvalidJwt,
    UnauthorizedExpiredJwt,
    /// Only the host may do this
    NotHost,

    // Request Validation
    BadRequest,
    MalformedPayload,
    PhaseMismatch,
    OutOfTurn,
    CardNotInHand,
    IllegalCard,
    WrongCardCount,
    DuplicateCard,
    ParseCard,
    NotCallable,
    UnsupportedVariant,
    InvalidConfig,
    NotSeated,
    ValidationError,

    // Resource Not Found
    HouseNotFound,
    HandNotFound,
    NotFound,

    // Business Logic Conflicts
    HouseFull,
    AlreadySeated,
    HandInProgress,
    HouseNotReady,
    OptimisticLock,
    Conflict,

    // System Errors
    StoreError,
    StoreUnavailable,
    TransportError,
    DbError,
    DataCorruption,
    ConfigError,
    Internal,
}

impl ErrorCode {
    /// Canonical SCREAMING_SNAKE_CASE string, as it appears on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::NotHost => "NOT_HOST",

            Self::BadRequest => "BAD_REQUEST",
            Self::MalformedPayload => "MALFORMED_PAYLOAD",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::IllegalCard => "ILLEGAL_CARD",
            Self::WrongCardCount => "WRONG_CARD_COUNT",
            Self::DuplicateCard => "DUPLICATE_CARD",
            Self::ParseCard => "PARSE_CARD",
            Self::NotCallable => "NOT_CALLABLE",
            Self::UnsupportedVariant => "UNSUPPORTED_VARIANT",
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::NotSeated => "NOT_SEATED",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::HouseNotFound => "HOUSE_NOT_FOUND",
            Self::HandNotFound => "HAND_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::HouseFull => "HOUSE_FULL",
            Self::AlreadySeated => "ALREADY_SEATED",
            Self::HandInProgress => "HAND_IN_PROGRESS",
            Self::HouseNotReady => "HOUSE_NOT_READY",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::StoreError => "STORE_ERROR",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::TransportError => "TRANSPORT_ERROR",
            Self::DbError => "DB_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
