//! # Deterministic Scorers
//!
//! Pure functions scoring one closed-form question against its rubric entry.
//! Both are binary, all-or-nothing: the answer either matches and earns the
//! full question points, or it doesn't and earns zero. Partial credit is the
//! oracle's territory, reserved for essay questions.
//!
//! The available scorers are:
//! - [`mark_sheet`]: exact equality against the single correct choice.
//! - [`fill_in_blank`]: normalized equality against any accepted answer.

pub mod fill_in_blank;
pub mod mark_sheet;
