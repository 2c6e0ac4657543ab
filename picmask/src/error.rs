use std::fmt::{Debug, Display};
use std::path::PathBuf;

use thiserror::Error;

use crate::deps::arcstr::ArcStr;

pub type Result<T> = std::result::Result<T, PicmaskError>;

/// The crate-wide error type: an [`ErrorSource`] plus the stack of
/// operations that were in progress when it occurred.
pub struct PicmaskError {
    pub(crate) source: ErrorSource,
    pub(crate) context: Vec<ErrorContext>,
}

impl PicmaskError {
    pub fn source(&self) -> &ErrorSource {
        &self.source
    }
}

impl std::error::Error for PicmaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl Display for PicmaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Error:\n{}", self.source)?;
        if !self.context.is_empty() {
            writeln!(f, "\nError occurred:")?;
            for item in self.context.iter() {
                writeln!(f, "\twhile {}", item)?;
            }
        }
        Ok(())
    }
}

impl Debug for PicmaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.source)?;
        if !self.context.is_empty() {
            writeln!(f, "\nError occurred:")?;
            for (i, item) in self.context.iter().enumerate() {
                writeln!(f, "\t{}: {:?}", i, item)?;
            }
        }
        Ok(())
    }
}

impl<T> From<T> for PicmaskError
where
    T: Into<ErrorSource>,
{
    fn from(value: T) -> Self {
        Self {
            source: value.into(),
            context: Vec::new(),
        }
    }
}

impl PicmaskError {
    pub fn new(source: impl Into<ErrorSource>) -> Self {
        Self {
            source: source.into(),
            context: Vec::new(),
        }
    }

    pub fn from_context(source: impl Into<ErrorSource>, ctx: impl Into<ErrorContext>) -> Self {
        Self {
            source: source.into(),
            context: vec![ctx.into()],
        }
    }

    pub fn with_context(mut self, ctx: impl Into<ErrorContext>) -> Self {
        self.context.push(ctx.into());
        self
    }

    #[inline]
    pub fn into_inner(self) -> ErrorSource {
        self.source
    }
}

#[inline]
pub fn with_err_context<T, E, C>(result: std::result::Result<T, E>, ctx: C) -> Result<T>
where
    C: FnOnce() -> ErrorContext,
    E: Into<PicmaskError>,
{
    result.map_err(|err| err.into().with_context(ctx()))
}

/// An operation that was in progress when an error occurred.
#[derive(Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorContext {
    /// Generating the geometry of a named part.
    GenPart {
        name: ArcStr,
        kind: &'static str,
    },
    /// Routing a waveguide path.
    Routing,
    ReadFile(PathBuf),
    Task(ArcStr),
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ErrorContext::*;
        match self {
            GenPart { name, kind } => write!(f, "generating {kind} part {name}"),
            Routing => write!(f, "routing a waveguide path"),
            ReadFile(path) => write!(f, "reading file {path:?}"),
            Task(task) => write!(f, "{task}"),
        }
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorSource {
    /// A geometric parameter outside its valid domain, raised at
    /// construction time.
    #[error("invalid parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// An attempt to extend a path already consumed as a downstream anchor.
    #[error("path is sealed and can no longer be extended")]
    PathSealed,

    /// A naming collision in a cell registry.
    #[error("duplicate cell name: {0}")]
    DuplicateName(ArcStr),

    #[error("no such layer: {0}")]
    LayerNotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error parsing TOML: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("error writing TOML: {0}")]
    TomlWriting(#[from] toml::ser::Error),

    #[error("unexpected error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl ErrorSource {
    /// Checks that a parameter is finite and strictly positive.
    pub(crate) fn expect_positive(name: &'static str, value: f64) -> Result<f64> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(ErrorSource::InvalidParameter { name, value }.into())
        }
    }

    /// Checks that a parameter is finite and non-negative.
    pub(crate) fn expect_non_negative(name: &'static str, value: f64) -> Result<f64> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(ErrorSource::InvalidParameter { name, value }.into())
        }
    }
}
