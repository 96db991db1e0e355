use monkey_eval::Value;
use monkey_frontend::ast::Program;
use monkey_session::diagnostics::DiagnosticEmitter;
use monkey_session::sourcemap::Source;
use monkey_session::Session;

use crate::{InterpreterError, InterpreterResult};

/// Parses and evaluates sources, reporting syntax errors through the
/// session's diagnostic emitter.
pub struct Interpreter<D: DiagnosticEmitter> {
    pub session: Session<D>,
}

impl<D: DiagnosticEmitter> Interpreter<D> {
    pub fn new(diagnostics: D) -> Self {
        Self {
            session: Session::new(diagnostics),
        }
    }

    /// Parse a source, failing if any syntax error was reported.
    pub fn parse(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> InterpreterResult<Program> {
        let source = Source::new(name, source);
        let (program, errors) = monkey_frontend::parse_source(&source.source);

        let source_id = self.session.sources.insert(source);
        self.session
            .report_all(errors, &source_id)
            .map_err(|_| InterpreterError::HadErrors)?;

        Ok(program)
    }

    /// Parse and evaluate a source. `Ok(None)` means the program produced
    /// nothing to show.
    pub fn run(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> InterpreterResult<Option<Value>> {
        let program = self.parse(name, source)?;
        Ok(monkey_eval::eval(&program))
    }
}
