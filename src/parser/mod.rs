//! Input parsers.
//!
//! Only one input type exists: raw tab-indented notes.

pub mod tab_note;
