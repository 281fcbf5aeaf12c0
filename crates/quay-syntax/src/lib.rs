// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # quay-syntax
//!
//! Lexical classification of JavaScript-family source text into one of four
//! module-format verdicts: ESM, CJS, mixed, or unknown.
//!
//! ## Overview
//!
//! The classifier never executes or parses the input into a tree. A
//! single-pass tokenizer separates real code from comments, strings,
//! template text, and regex literals, so the marker matcher only ever sees
//! spans where `import`, `export`, `require`, `module`, `exports`, and
//! `global` can actually mean something. A minimal scope stack suppresses
//! CommonJS markers whose identifier is locally rebound (a parameter named
//! `exports`, a `const require = …`).
//!
//! Classification is total: any byte salad produces a verdict, never an
//! error. Unterminated constructs are treated as closed at end of input.
//! Each call builds its own scan state, so calls are independent and can
//! run concurrently on separate inputs.
//!
//! ## Quick Start
//!
//! ```rust
//! use quay_syntax::{detect_module_syntax, ModuleSyntax};
//!
//! assert_eq!(detect_module_syntax("export const x = 1"), ModuleSyntax::Esm);
//! assert_eq!(detect_module_syntax("exports.x = 1"), ModuleSyntax::Cjs);
//! assert_eq!(detect_module_syntax("// require('x')"), ModuleSyntax::Unknown);
//! ```

#![warn(missing_docs)]

pub mod lexer;

mod detect;
mod scope;
mod syntax;

pub use syntax::ModuleSyntax;

/// Classifies one source buffer by its module-syntax markers.
///
/// Returns [`ModuleSyntax::Mixed`] when unambiguous markers of both systems
/// are present, and [`ModuleSyntax::Unknown`] when none are — including for
/// the empty buffer.
pub fn detect_module_syntax(source: &str) -> ModuleSyntax {
    detect::detect(source)
}
