use monkey_diagnostic::termcolor::{ColorChoice, StandardStream};

use crate::sourcemap::SourceMap;

pub use monkey_diagnostic::*;

pub mod prelude {
    pub use super::{Diagnostic, IntoDiagnostic, Snippet};
    pub use crate::sourcemap::SourceId;
    pub use monkey_diagnostic::span::Span;
    pub use monkey_diagnostic::{Severity, SnippetKind};
}

pub type Diagnostic = monkey_diagnostic::Diagnostic<SourceMap>;
pub type Snippet = monkey_diagnostic::Snippet<SourceMap>;

pub trait DiagnosticEmitter {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic, sources: &SourceMap);
}

impl DiagnosticEmitter for Vec<Diagnostic> {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic, _sources: &SourceMap) {
        self.push(diagnostic);
    }
}

/// Renders diagnostics to stderr as they are reported.
pub struct PrettyDiagnosticEmitter {
    pub stream: StandardStream,
    pub config: Config,
}

impl PrettyDiagnosticEmitter {
    pub fn new(color: ColorChoice) -> Self {
        Self {
            stream: StandardStream::stderr(color),
            config: Config::default(),
        }
    }
}

impl Default for PrettyDiagnosticEmitter {
    fn default() -> Self {
        Self::new(ColorChoice::Auto)
    }
}

impl DiagnosticEmitter for PrettyDiagnosticEmitter {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic, sources: &SourceMap) {
        // nowhere left to report a failure to write to stderr
        let _ = diagnostic.write_to_stream(sources, &self.config, &mut self.stream);
    }
}

pub trait IntoDiagnostic<Context: ?Sized> {
    fn into_diagnostic(self, cx: &Context) -> Diagnostic;
}

impl IntoDiagnostic<()> for Diagnostic {
    fn into_diagnostic(self, _cx: &()) -> Diagnostic {
        self
    }
}
