use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use alloy::primitives::Address;
use alloy::primitives::ruint::ParseError;
/// HTTP method type, re-exported for use with error inspection.
pub use reqwest::Method;
/// HTTP status code type, re-exported for use with error inspection.
pub use reqwest::StatusCode;
use reqwest::header;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Required configuration is missing or malformed
    Configuration,
    /// The quote provider returned a non-success status or an unreadable body
    Provider,
    /// The allowance approval transaction failed to simulate, send or confirm
    Approval,
    /// A required permit signature or the transaction data was absent
    SignatureIntegrity,
    /// Signing or broadcasting the swap transaction failed
    Submission,
    /// Error related to invalid input or state within permit2-swap
    Validation,
    /// Internal error from dependencies
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }

    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        Status {
            status_code,
            method,
            path,
            message: message.into(),
        }
        .into()
    }

    /// Wraps any failure talking to the quote provider.
    pub fn provider<S: StdError + Send + Sync + 'static>(source: S) -> Self {
        Error::with_source(Kind::Provider, source)
    }

    #[must_use]
    pub fn missing_configuration(name: &'static str) -> Self {
        MissingConfiguration { name }.into()
    }

    pub fn configuration<S: StdError + Send + Sync + 'static>(source: S) -> Self {
        Error::with_source(Kind::Configuration, source)
    }

    pub fn approval<S: Into<String>>(spender: Address, step: ApprovalStep, message: S) -> Self {
        Approval {
            spender,
            step,
            message: message.into(),
        }
        .into()
    }

    #[must_use]
    pub fn signature_integrity(cause: Option<String>) -> Self {
        SignatureIntegrity { cause }.into()
    }

    pub fn submission<S: Into<String>>(step: SubmissionStep, message: S) -> Self {
        Submission {
            step,
            message: message.into(),
        }
        .into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, self.message
        )
    }
}

impl StdError for Status {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

/// A required configuration value was not provided.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct MissingConfiguration {
    /// Name of the missing value, e.g. the environment variable
    pub name: &'static str,
}

impl fmt::Display for MissingConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing {}", self.name)
    }
}

impl StdError for MissingConfiguration {}

/// The part of the approval flow that failed.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ApprovalStep {
    Simulate,
    Send,
    Confirm,
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Approval {
    pub spender: Address,
    pub step: ApprovalStep,
    pub message: String,
}

impl fmt::Display for Approval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "approval of {} failed to {}: {}",
            self.spender, self.step, self.message
        )
    }
}

impl StdError for Approval {}

/// The permit signature or the transaction data needed to carry it was absent.
#[non_exhaustive]
#[derive(Debug)]
pub struct SignatureIntegrity {
    /// Underlying reason the signature could not be produced, if any
    pub cause: Option<String>,
}

impl fmt::Display for SignatureIntegrity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "signature or transaction data missing: {cause}"),
            None => write!(f, "signature or transaction data missing"),
        }
    }
}

impl StdError for SignatureIntegrity {}

/// The part of the submission flow that failed.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SubmissionStep {
    Nonce,
    Sign,
    Broadcast,
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Submission {
    pub step: SubmissionStep,
    pub message: String,
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "swap transaction failed to {}: {}",
            self.step, self.message
        )
    }
}

impl StdError for Submission {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<header::InvalidHeaderValue> for Error {
    fn from(e: header::InvalidHeaderValue) -> Self {
        Error::with_source(Kind::Configuration, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<alloy::signers::Error> for Error {
    fn from(e: alloy::signers::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<alloy::signers::local::LocalSignerError> for Error {
    fn from(e: alloy::signers::local::LocalSignerError) -> Self {
        Error::with_source(Kind::Configuration, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Configuration, e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<Status> for Error {
    fn from(err: Status) -> Self {
        Error::with_source(Kind::Provider, err)
    }
}

impl From<MissingConfiguration> for Error {
    fn from(err: MissingConfiguration) -> Self {
        Error::with_source(Kind::Configuration, err)
    }
}

impl From<Approval> for Error {
    fn from(err: Approval) -> Self {
        Error::with_source(Kind::Approval, err)
    }
}

impl From<SignatureIntegrity> for Error {
    fn from(err: SignatureIntegrity) -> Self {
        Error::with_source(Kind::SignatureIntegrity, err)
    }
}

impl From<Submission> for Error {
    fn from(err: Submission) -> Self {
        Error::with_source(Kind::Submission, err)
    }
}
