use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;

/// RFC 7807 body for rejected HTTP requests.
#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: ErrorCode,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
        status: StatusCode,
    },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Unauthorized: {code}")]
    Unauthorized { code: ErrorCode },
    #[error("Forbidden: {detail}")]
    Forbidden { code: ErrorCode, detail: String },
    #[error("Store error: {detail}")]
    Store {
        code: ErrorCode,
        detail: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Unauthorized { code }
            | AppError::Forbidden { code, .. }
            | AppError::Store { code, .. }
            | AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Message safe to show the client. Store and internal failures stay generic.
    pub fn public_detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Forbidden { detail, .. } => detail.clone(),
            AppError::Unauthorized { code } => match code {
                ErrorCode::UnauthorizedMissingBearer => "Missing or malformed Bearer token",
                ErrorCode::UnauthorizedExpiredJwt => "Token expired",
                ErrorCode::UnauthorizedInvalidJwt => "Invalid JWT",
                _ => "Authentication required",
            }
            .to_string(),
            AppError::Store { .. } => "Storage temporarily unavailable".to_string(),
            AppError::Internal { .. } | AppError::Config { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { status, .. } => *status,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Store { code, .. } if *code == ErrorCode::StoreUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn unprocessable(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
            status: StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedMissingBearer,
        }
    }

    pub fn unauthorized_invalid_jwt() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedInvalidJwt,
        }
    }

    pub fn unauthorized_expired_jwt() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedExpiredJwt,
        }
    }

    pub fn forbidden(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            code,
            detail: detail.into(),
        }
    }

    pub fn store(
        detail: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            code: ErrorCode::StoreError,
            detail: detail.into(),
            source: Box::new(source),
        }
    }

    pub fn store_unavailable(
        detail: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            code: ErrorCode::StoreUnavailable,
            detail: detail.into(),
            source: Box::new(source),
        }
    }

    /// Realtime transport failure (publish or subscribe).
    pub fn transport(
        detail: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            code: ErrorCode::TransportError,
            detail: detail.into(),
            source: Box::new(source),
        }
    }

    pub fn internal(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Internal {
            code,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                    ValidationKind::OutOfTurn => ErrorCode::OutOfTurn,
                    ValidationKind::CardNotInHand => ErrorCode::CardNotInHand,
                    ValidationKind::IllegalCard => ErrorCode::IllegalCard,
                    ValidationKind::WrongCardCount => ErrorCode::WrongCardCount,
                    ValidationKind::DuplicateCard => ErrorCode::DuplicateCard,
                    ValidationKind::ParseCard => ErrorCode::ParseCard,
                    ValidationKind::NotCallable => ErrorCode::NotCallable,
                    ValidationKind::UnsupportedVariant => ErrorCode::UnsupportedVariant,
                    ValidationKind::InvalidConfig => ErrorCode::InvalidConfig,
                    ValidationKind::NotSeated => ErrorCode::NotSeated,
                    ValidationKind::MalformedPayload => ErrorCode::MalformedPayload,
                    ValidationKind::NotHost => {
                        return AppError::forbidden(ErrorCode::NotHost, detail);
                    }
                    ValidationKind::Other(_) => ErrorCode::ValidationError,
                };
                match code {
                    ErrorCode::ParseCard
                    | ErrorCode::MalformedPayload
                    | ErrorCode::InvalidConfig
                    | ErrorCode::UnsupportedVariant => AppError::invalid(code, detail),
                    _ => AppError::unprocessable(code, detail),
                }
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::House => ErrorCode::HouseNotFound,
                    NotFoundKind::Hand => ErrorCode::HandNotFound,
                    NotFoundKind::Other(_) => ErrorCode::NotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::HouseFull => ErrorCode::HouseFull,
                    ConflictKind::AlreadySeated => ErrorCode::AlreadySeated,
                    ConflictKind::HandInProgress => ErrorCode::HandInProgress,
                    ConflictKind::HouseNotReady => ErrorCode::HouseNotReady,
                    ConflictKind::OptimisticLock => ErrorCode::OptimisticLock,
                    ConflictKind::Other(_) => ErrorCode::Conflict,
                };
                AppError::conflict(code, detail)
            }
            DomainError::Invariant(detail) => {
                error!(detail = %detail, "hand invariant violated");
                AppError::internal(ErrorCode::DataCorruption, detail)
            }
            DomainError::Infra(kind, detail) => {
                let code = match kind {
                    InfraErrorKind::Store => ErrorCode::StoreError,
                    InfraErrorKind::Transport => ErrorCode::TransportError,
                    InfraErrorKind::Timeout => ErrorCode::StoreUnavailable,
                    InfraErrorKind::Other(_) => ErrorCode::Internal,
                };
                AppError::internal(code, detail)
            }
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::Store {
            code: ErrorCode::DbError,
            detail: "relational store failure".to_string(),
            source: Box::new(e),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();

        let problem_details = ProblemDetails {
            type_: format!("https://sheepshead.house/errors/{}", code.as_str()),
            title: Self::humanize_code(code.as_str()),
            status: status.as_u16(),
            detail: self.public_detail(),
            code,
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .json(problem_details)
    }
}
