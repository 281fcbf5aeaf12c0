//! The four-way classification verdict.

use std::fmt;

/// Module syntax detected in one source buffer.
///
/// `Mixed` means the buffer carries unambiguous markers of both module
/// systems, which real hand-written files rarely do; it usually points at
/// generated or concatenated code. `Unknown` means no unambiguous marker
/// was found — it is a verdict, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleSyntax {
    /// ECMAScript module syntax (`import`/`export`)
    Esm,
    /// CommonJS syntax (`require`, `module.exports`, `exports.*`)
    Cjs,
    /// Both kinds of markers present
    Mixed,
    /// No marker found
    Unknown,
}

impl ModuleSyntax {
    /// Reduces the two marker flags to a verdict.
    pub(crate) fn from_flags(saw_esm: bool, saw_cjs: bool) -> Self {
        match (saw_esm, saw_cjs) {
            (true, true) => ModuleSyntax::Mixed,
            (true, false) => ModuleSyntax::Esm,
            (false, true) => ModuleSyntax::Cjs,
            (false, false) => ModuleSyntax::Unknown,
        }
    }

    /// Lower-case name of the verdict, as rendered in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleSyntax::Esm => "esm",
            ModuleSyntax::Cjs => "cjs",
            ModuleSyntax::Mixed => "mixed",
            ModuleSyntax::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ModuleSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
