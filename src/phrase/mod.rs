//! Keyphrase text and string similarity
//!
//! This module materializes keyphrase spans as strings and provides the
//! prefix/suffix/word-overlap predicates the aligner and the alignment
//! summary are built on.

pub mod similarity;
pub mod text;
