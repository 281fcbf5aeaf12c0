//! The token walk that turns one source buffer into a verdict.
//!
//! The detector tokenizes the buffer, then walks the tokens once with a few
//! tokens of lookahead. ESM and CJS markers set two monotone flags; the walk
//! stops as soon as both are set. CommonJS identifiers are resolved through
//! the shadow stack first, so `function (module, exports) { … }` bodies stay
//! silent.

use crate::lexer::{Keyword, Scanner, Token, TokenKind};
use crate::scope::{CjsGlobal, ShadowStack};
use crate::syntax::ModuleSyntax;

/// Classifies one source buffer.
pub(crate) fn detect(source: &str) -> ModuleSyntax {
    Detector::new(source).run()
}

/// What a `{` opened, so the matching `}` can undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Brace {
    FunctionBody,
    Other,
}

/// Parameter rebindings collected for a function whose body brace is
/// expected at a known token index. If that exact brace never shows up
/// (concise arrow bodies, malformed input), the entry goes stale and is
/// dropped without opening a scope.
struct PendingScope {
    bindings: Vec<CjsGlobal>,
    body_at: usize,
}

struct Detector<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    scopes: ShadowStack,
    braces: Vec<Brace>,
    saw_esm: bool,
    saw_cjs: bool,
}

impl<'a> Detector<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Scanner::new(source).collect(),
            scopes: ShadowStack::new(),
            braces: Vec::new(),
            saw_esm: false,
            saw_cjs: false,
        }
    }

    fn run(mut self) -> ModuleSyntax {
        let mut pending: Vec<PendingScope> = Vec::new();
        let mut i = 0;

        while i < self.tokens.len() && !(self.saw_esm && self.saw_cjs) {
            match self.tokens[i].kind {
                TokenKind::Kw(Keyword::Import) => self.match_import(i),
                TokenKind::Kw(Keyword::Export) => self.match_export(i),
                TokenKind::Kw(Keyword::Function) => {
                    i = self.function_header(i, &mut pending);
                    continue;
                }
                TokenKind::Arrow => {
                    let bindings = self.arrow_params(i);
                    pending.push(PendingScope {
                        bindings,
                        body_at: i + 1,
                    });
                }
                TokenKind::LeftBrace => {
                    while pending.last().is_some_and(|p| p.body_at < i) {
                        pending.pop();
                    }
                    let frame = if pending.last().map(|p| p.body_at) == Some(i) {
                        if let Some(scope) = pending.pop() {
                            self.scopes.enter();
                            for name in scope.bindings {
                                self.scopes.bind(name);
                            }
                        }
                        Brace::FunctionBody
                    } else {
                        Brace::Other
                    };
                    self.braces.push(frame);
                }
                TokenKind::RightBrace => {
                    if self.braces.pop() == Some(Brace::FunctionBody) {
                        self.scopes.exit();
                    }
                }
                TokenKind::Ident => self.match_ident(i),
                _ => {}
            }
            i += 1;
        }

        ModuleSyntax::from_flags(self.saw_esm, self.saw_cjs)
    }

    /// `import` as a statement, dynamic `import(`, or `import.meta`.
    fn match_import(&mut self, i: usize) {
        if self.is_member_access(i) {
            return;
        }
        match self.kind(i + 1) {
            TokenKind::LeftBrace | TokenKind::Star | TokenKind::Str | TokenKind::LeftParen => {
                self.saw_esm = true;
            }
            TokenKind::Dot => {
                if self.ident_text(i + 2) == Some("meta") {
                    self.saw_esm = true;
                }
            }
            TokenKind::Ident => {
                // `import foo from '…'`
                if self.ident_text(i + 2) == Some("from") {
                    self.saw_esm = true;
                }
            }
            _ => {}
        }
    }

    /// `export` followed by a declaration, `default`, `{`, or `*`.
    fn match_export(&mut self, i: usize) {
        if self.is_member_access(i) {
            return;
        }
        match self.kind(i + 1) {
            TokenKind::LeftBrace | TokenKind::Star => self.saw_esm = true,
            TokenKind::Kw(
                Keyword::Default
                | Keyword::Function
                | Keyword::Class
                | Keyword::Const
                | Keyword::Let
                | Keyword::Var,
            ) => self.saw_esm = true,
            TokenKind::Kw(Keyword::Async) => {
                if self.kind(i + 2) == TokenKind::Kw(Keyword::Function) {
                    self.saw_esm = true;
                }
            }
            _ => {}
        }
    }

    /// CommonJS markers and declarator rebinds, all hanging off identifiers.
    fn match_ident(&mut self, i: usize) {
        if self.is_member_access(i) {
            return;
        }
        let text = self.tokens[i].span.text(self.source);

        if text == "Object" {
            self.match_object_exports(i);
            return;
        }

        let Some(name) = CjsGlobal::from_ident(text) else {
            return;
        };

        // `var require = …` rebinds instead of referencing
        if let Some(TokenKind::Kw(kw)) = self.prev_kind(i) {
            if kw.is_declarator() {
                self.scopes.bind(name);
                return;
            }
        }

        if self.scopes.is_shadowed(name) {
            return;
        }

        let hit = match name {
            CjsGlobal::Require => self.kind(i + 1) == TokenKind::LeftParen,
            CjsGlobal::Module => {
                self.kind(i + 1) == TokenKind::Dot && self.ident_text(i + 2) == Some("exports")
            }
            // property access only; a bare `exports = …` says nothing
            CjsGlobal::Exports | CjsGlobal::Global => {
                self.kind(i + 1) == TokenKind::Dot && self.is_property_name(i + 2)
            }
        };
        if hit {
            self.saw_cjs = true;
        }
    }

    /// `Object.defineProperty(exports, …)` and friends.
    fn match_object_exports(&mut self, i: usize) {
        if self.kind(i + 1) != TokenKind::Dot {
            return;
        }
        let is_definer = matches!(
            self.ident_text(i + 2),
            Some("defineProperty" | "defineProperties" | "assign")
        );
        if !is_definer || self.kind(i + 3) != TokenKind::LeftParen {
            return;
        }
        if self.ident_text(i + 4) == Some("exports") && !self.scopes.is_shadowed(CjsGlobal::Exports)
        {
            self.saw_cjs = true;
        }
    }

    /// Consumes a `function` keyword's name (if any) and pre-scans its
    /// parameter list for rebindings. Returns the index the walk resumes
    /// from; the parameter tokens are re-walked so markers inside default
    /// values are still matched.
    fn function_header(&mut self, i: usize, pending: &mut Vec<PendingScope>) -> usize {
        let mut j = i + 1;
        if self.kind(j) == TokenKind::Star {
            j += 1; // generator
        }
        if self.kind(j) == TokenKind::Ident {
            // a declaration's name lands in the scope the function appears in
            if let Some(name) = self.global_at(j) {
                self.scopes.bind(name);
            }
            j += 1;
        }
        if self.kind(j) != TokenKind::LeftParen {
            return j;
        }
        let Some(close) = self.matching_close_paren(j) else {
            return j + 1;
        };
        let mut bindings = Vec::new();
        self.collect_param_bindings(j, close, &mut bindings);
        pending.push(PendingScope {
            bindings,
            body_at: close + 1,
        });
        j
    }

    /// Rebindings introduced by an arrow's parameter list, resolved once the
    /// `=>` itself is seen.
    fn arrow_params(&self, i: usize) -> Vec<CjsGlobal> {
        let mut params = Vec::new();
        match self.prev_kind(i) {
            Some(TokenKind::Ident) => {
                if let Some(name) = self.global_at(i - 1) {
                    params.push(name);
                }
            }
            Some(TokenKind::RightParen) => {
                if let Some(open) = self.matching_open_paren(i - 1) {
                    self.collect_param_bindings(open, i - 1, &mut params);
                }
            }
            _ => {}
        }
        params
    }

    /// Collects tracked globals in binding position between a `(` at `open`
    /// and its `)` at `close`: directly inside the list, bounded by the
    /// list's own delimiters or a default-value `=`. Identifiers inside
    /// nested structure (defaults calling functions, destructuring) are
    /// left to the ordinary walk.
    fn collect_param_bindings(&self, open: usize, close: usize, out: &mut Vec<CjsGlobal>) {
        let mut depth = 1usize;
        for k in (open + 1)..close {
            match self.tokens[k].kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Ident if depth == 1 => {
                    let bounded_left =
                        matches!(self.prev_kind(k), Some(TokenKind::LeftParen | TokenKind::Comma));
                    let bounded_right = matches!(
                        self.kind(k + 1),
                        TokenKind::Comma | TokenKind::RightParen | TokenKind::Equal
                    );
                    if bounded_left && bounded_right {
                        if let Some(name) = self.global_at(k) {
                            out.push(name);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn matching_close_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for j in open..self.tokens.len() {
            match self.tokens[j].kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(j);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn matching_open_paren(&self, close: usize) -> Option<usize> {
        let mut depth = 0usize;
        for j in (0..=close).rev() {
            match self.tokens[j].kind {
                TokenKind::RightParen => depth += 1,
                TokenKind::LeftParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(j);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// A name right after `.` or `?.` is a property, not a reference.
    fn is_member_access(&self, i: usize) -> bool {
        matches!(
            self.prev_kind(i),
            Some(TokenKind::Dot | TokenKind::QuestionDot)
        )
    }

    /// Property position admits reserved words too (`exports.default`).
    fn is_property_name(&self, i: usize) -> bool {
        matches!(self.kind(i), TokenKind::Ident | TokenKind::Kw(_))
    }

    fn kind(&self, i: usize) -> TokenKind {
        self.tokens.get(i).map_or(TokenKind::Eof, |t| t.kind)
    }

    fn prev_kind(&self, i: usize) -> Option<TokenKind> {
        i.checked_sub(1).map(|j| self.tokens[j].kind)
    }

    fn ident_text(&self, i: usize) -> Option<&str> {
        match self.tokens.get(i) {
            Some(t) if t.kind == TokenKind::Ident => Some(t.span.text(self.source)),
            _ => None,
        }
    }

    fn global_at(&self, i: usize) -> Option<CjsGlobal> {
        self.ident_text(i).and_then(CjsGlobal::from_ident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(detect(""), ModuleSyntax::Unknown);
        assert_eq!(detect("   \n\t  "), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_export_const() {
        assert_eq!(detect("export const x = 1"), ModuleSyntax::Esm);
    }

    #[test]
    fn test_export_variants() {
        assert_eq!(detect("export default {}"), ModuleSyntax::Esm);
        assert_eq!(detect("export function f() {}"), ModuleSyntax::Esm);
        assert_eq!(detect("export async function f() {}"), ModuleSyntax::Esm);
        assert_eq!(detect("export class A {}"), ModuleSyntax::Esm);
        assert_eq!(detect("export let y = 2"), ModuleSyntax::Esm);
        assert_eq!(detect("export var z = 3"), ModuleSyntax::Esm);
        assert_eq!(detect("const foo = 1\nexport { foo }"), ModuleSyntax::Esm);
        assert_eq!(detect("export * from 'mod'"), ModuleSyntax::Esm);
    }

    #[test]
    fn test_export_requires_a_declaration_shape() {
        // an identifier named export-ish things is not a marker
        assert_eq!(detect("exporter(1)"), ModuleSyntax::Unknown);
        assert_eq!(detect("a.export = 1"), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_import_variants() {
        assert_eq!(detect("import foo from 'bar'"), ModuleSyntax::Esm);
        assert_eq!(detect("import { a, b } from 'bar'"), ModuleSyntax::Esm);
        assert_eq!(detect("import * as ns from 'bar'"), ModuleSyntax::Esm);
        assert_eq!(detect("import 'side-effect'"), ModuleSyntax::Esm);
        assert_eq!(detect("const u = import.meta.url"), ModuleSyntax::Esm);
        assert_eq!(detect("const m = await import('m')"), ModuleSyntax::Esm);
    }

    #[test]
    fn test_import_as_property_is_no_marker() {
        assert_eq!(detect("loader.import('x')"), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_require_call() {
        assert_eq!(detect("const foo = require('foo')"), ModuleSyntax::Cjs);
        assert_eq!(
            detect("const {createRequire} = require('module'); require('foo')"),
            ModuleSyntax::Cjs
        );
    }

    #[test]
    fn test_bare_require_is_no_marker() {
        assert_eq!(detect("typeof require === 'function'"), ModuleSyntax::Unknown);
        assert_eq!(detect("require.resolve"), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_module_exports() {
        assert_eq!(detect("module.exports = {}"), ModuleSyntax::Cjs);
        assert_eq!(detect("module.exports.foo = 1"), ModuleSyntax::Cjs);
        // `module` alone, or with another property, is not a marker
        assert_eq!(detect("module.hot.accept()"), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_exports_property() {
        assert_eq!(detect("exports.foo = 1"), ModuleSyntax::Cjs);
        assert_eq!(detect("exports.default = f"), ModuleSyntax::Cjs);
        // bare reassignment is deliberately not a marker
        assert_eq!(detect("exports = {}"), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_global_property() {
        assert_eq!(detect("global.setImmediate = f"), ModuleSyntax::Cjs);
        assert_eq!(detect("global = {}"), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_object_define_property_exports() {
        assert_eq!(
            detect("Object.defineProperty(exports, '__esModule', { value: true })"),
            ModuleSyntax::Cjs
        );
        assert_eq!(
            detect("Object.defineProperties(exports, descriptors)"),
            ModuleSyntax::Cjs
        );
        assert_eq!(detect("Object.assign(exports, api)"), ModuleSyntax::Cjs);
        assert_eq!(detect("Object.assign(target, api)"), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_member_access_suppression() {
        assert_eq!(detect("ctx.require('x')"), ModuleSyntax::Unknown);
        assert_eq!(detect("app.module.exports"), ModuleSyntax::Unknown);
        assert_eq!(detect("a?.exports.b"), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_mixed_both_orders() {
        assert_eq!(
            detect("import foo from 'bar'; module.exports = {}"),
            ModuleSyntax::Mixed
        );
        assert_eq!(
            detect("module.exports = {}; import foo from 'bar'"),
            ModuleSyntax::Mixed
        );
    }

    #[test]
    fn test_markers_in_comments_do_not_count() {
        assert_eq!(
            detect("// require('x')\n/* module.exports */\nconst y = 1"),
            ModuleSyntax::Unknown
        );
    }

    #[test]
    fn test_markers_in_strings_do_not_count() {
        assert_eq!(detect("const a = 'require(\"b\")'"), ModuleSyntax::Unknown);
        assert_eq!(detect("const a = \"import x from 'y'\""), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_markers_in_template_text_do_not_count() {
        assert_eq!(detect("const a = `require(\"bar\")`"), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_markers_in_template_interpolation_do_count() {
        assert_eq!(detect("const a = `mod: ${require('bar')}`"), ModuleSyntax::Cjs);
        assert_eq!(
            detect("const a = `meta: ${import.meta.url}`"),
            ModuleSyntax::Esm
        );
    }

    #[test]
    fn test_markers_in_regex_do_not_count() {
        assert_eq!(detect("const re = /require\\('x'\\)/g"), ModuleSyntax::Unknown);
        assert_eq!(detect("const re = /module\\.exports/"), ModuleSyntax::Unknown);
    }

    #[test]
    fn test_shadowed_function_params() {
        assert_eq!(
            detect("function f(module, exports) { module.exports = {}; exports.x = 1 }"),
            ModuleSyntax::Unknown
        );
    }

    #[test]
    fn test_shadowing_ends_with_the_function() {
        assert_eq!(
            detect("function f(module) { module.exports = {} }\nmodule.exports = {}"),
            ModuleSyntax::Cjs
        );
    }

    #[test]
    fn test_shadowed_var_declaration() {
        assert_eq!(
            detect("function f() { const require = createRequire(u); require('x') }"),
            ModuleSyntax::Unknown
        );
    }

    #[test]
    fn test_top_level_var_shadow() {
        assert_eq!(
            detect("const require = stub; require('x')"),
            ModuleSyntax::Unknown
        );
    }

    #[test]
    fn test_function_name_shadow() {
        assert_eq!(
            detect("function require(id) { return cache[id] }\nrequire('x')"),
            ModuleSyntax::Unknown
        );
    }

    #[test]
    fn test_arrow_param_shadow() {
        assert_eq!(
            detect("const f = (module, exports) => { module.exports = {} }"),
            ModuleSyntax::Unknown
        );
        assert_eq!(
            detect("const f = module => { module.exports = {} }"),
            ModuleSyntax::Unknown
        );
    }

    #[test]
    fn test_unshadowed_sibling_scope() {
        assert_eq!(
            detect("const f = (module) => { module.exports = {} }; module.exports = real"),
            ModuleSyntax::Cjs
        );
    }

    #[test]
    fn test_nested_function_shadow_restores() {
        let source = "function outer(require) {\n  function inner() { require('a') }\n}\nrequire('b')";
        assert_eq!(detect(source), ModuleSyntax::Cjs);
    }

    #[test]
    fn test_marker_in_param_default_counts() {
        assert_eq!(
            detect("function f(a = require('x')) {}"),
            ModuleSyntax::Cjs
        );
    }

    #[test]
    fn test_regex_ambiguity_does_not_leak_code() {
        // the division must not start a phantom regex that swallows markers
        assert_eq!(
            detect("const half = total / 2\nmodule.exports = half"),
            ModuleSyntax::Cjs
        );
        // two divisions on one line, then a real marker
        assert_eq!(
            detect("let r = a / b / c\nexport default r"),
            ModuleSyntax::Esm
        );
    }

    #[test]
    fn test_unterminated_string_swallows_tail() {
        // the open quote runs to end of input, hiding the would-be marker
        assert_eq!(detect("const s = 'oops require(\"x\")"), ModuleSyntax::Unknown);
        // a closed string right before a marker changes nothing
        assert_eq!(detect("const s = 'ok'; require(\"x\")"), ModuleSyntax::Cjs);
    }

    #[test]
    fn test_determinism() {
        let source = "import a from 'b'\nexports.c = 1";
        let first = detect(source);
        assert_eq!(first, detect(source));
        assert_eq!(first, ModuleSyntax::Mixed);
    }
}
