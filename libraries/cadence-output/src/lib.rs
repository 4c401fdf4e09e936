//! Cadence Output
//!
//! A [`StreamingTransport`](cadence_core::StreamingTransport) that streams each
//! track through an external ffmpeg-style process. The process is invoked as
//!
//! ```text
//! <executable> <before_options...> -i <address> <options...> <channel>
//! ```
//!
//! and one process runs per track. The completion callback fires once the
//! process exits or is stopped.

mod error;
mod process;
mod settings;

pub use error::{OutputError, Result};
pub use process::ProcessTransport;
pub use settings::OutputSettings;
