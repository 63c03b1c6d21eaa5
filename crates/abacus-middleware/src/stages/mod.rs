//! The fixed global stages.
//!
//! Every routed request passes through these in order, outermost first:
//!
//! 1. [`panic_recovery`] - contain panics and answer with a 500
//! 2. [`logging`] - log request start and finish
//! 3. [`error_translation`] - render errors as the JSON envelope

pub mod error_translation;
pub mod logging;
pub mod panic_recovery;

pub use error_translation::ErrorTranslationMiddleware;
pub use logging::LoggingMiddleware;
pub use panic_recovery::PanicRecoveryMiddleware;
