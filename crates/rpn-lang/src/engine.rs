use std::io::BufRead;

use crate::{
    compile,
    error::Error,
    eval::Evaluator,
    optimizer::Optimizer,
};

#[derive(Debug, Clone)]
pub struct Options {
    pub optimize: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { optimize: true }
    }
}

/// Convenience façade tying the compiler, optimizer and evaluator together.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: Options,
}

impl Engine {
    pub fn set_optimize(&mut self, optimize: bool) {
        self.options.optimize = optimize;
    }

    /// Compiles and runs `code` against `stack`, reading `input` values
    /// from `input`. Errors carry the source span of the failing operator.
    pub fn eval<R: BufRead>(
        &self,
        code: &str,
        stack: Vec<i32>,
        input: R,
    ) -> Result<Vec<i32>, Error> {
        let program = compile(code);
        let program = if self.options.optimize {
            Optimizer::new().optimize(&program)
        } else {
            program
        };

        Evaluator::new(input)
            .eval(&program, stack)
            .map_err(|e| Error::from_eval(code, e))
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
