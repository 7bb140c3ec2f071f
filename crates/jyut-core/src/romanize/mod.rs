//! Re-rendering Jyutping in other romanizations.
//!
//! All converters are pure string functions over space-separated syllables.

mod lau;
mod rules;
mod superscript;
mod yale;

pub use lau::{from_lau_incomplete, to_lau};
pub use rules::SubstitutionTable;
pub use superscript::{superscript_html, superscript_tex, superscript_unicode};
pub use yale::{lau_to_yale_incomplete, to_yale, to_yale_tex};
