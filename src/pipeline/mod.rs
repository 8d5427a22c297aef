//! Pipeline stages for upload-to-Markdown conversion.
//!
//! Each submodule implements exactly one step, so each can be tested alone
//! and swapped (e.g. a different converter) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! transient ──▶ normalize ──▶ markdown ──▶ postprocess ──▶ reorganize
//! (temp files)   (lopdf)      (pdf-extract)  (cleanup)      (LLM, optional)
//! ```
//!
//! 1. [`transient`]   — uniquely named temp files released on every exit path
//! 2. [`normalize`]   — decrypt password-protected uploads and rebuild them
//! 3. [`markdown`]    — extract the text layer; runs in `spawn_blocking`
//! 4. [`postprocess`] — deterministic cleanup of extracted text
//! 5. [`reorganize`]  — the only stage with network I/O; never fatal

pub mod markdown;
pub mod normalize;
pub mod postprocess;
pub mod reorganize;
pub mod transient;
