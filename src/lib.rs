//! optext extracts translatable strings from libretro core option
//! definitions.
//!
//! Given a header containing a `struct retro_core_option_definition` array,
//! it derives `MSG_HASH_*` keys for every description, info text and option
//! value, emits a `msg_hash.h` lookup header plus per-language string tables,
//! and rewrites the array into runtime assignments that resolve each string
//! through `msg_hash_to_str`.
//!
//! The pipeline: [`locate`] finds each option literal, [`extract`] parses its
//! fields and records their spans, [`convert`] derives keys and drives
//! [`rewrite`], and [`output`] writes the artifacts.

pub mod convert;
pub mod extract;
pub mod locate;
pub mod names;
pub mod output;
pub mod regions;
pub mod rewrite;
pub mod scan;
