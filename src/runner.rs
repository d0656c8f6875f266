//! Generator invocation seam
//!
//! Running a generator executable is the job of an external runner. The
//! engine only prepares [`GeneratorCall`]s and records the exit status the
//! runner reports back.

use crate::context::ContextId;
use crate::error::GenError;
use crate::platform;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// Everything a runner needs to invoke one generator for one output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeneratorCall {
    pub generator_id: String,
    pub gen_dir: String,
    /// Rendered run command
    pub command: String,
    /// Contexts importing from `gen_dir`
    pub contexts: Vec<ContextId>,
    /// Permission bits the runner should give `gen_dir` when creating it
    pub dir_mode: u32,
}

impl GeneratorCall {
    /// Leading token of the command, i.e. the executable.
    pub fn program(&self) -> Option<&str> {
        self.command.split_whitespace().next()
    }

    /// Warn when the command names an explicit path the current user cannot execute.
    ///
    /// Bare program names are left to the runner's `PATH` lookup.
    pub fn preflight(&self) -> bool {
        match self.program() {
            Some(program) if program.contains('/') || program.contains('\\') => {
                let ok = platform::can_execute(Path::new(program));
                if !ok {
                    warn!(
                        generator = %self.generator_id,
                        program,
                        "Generator executable is missing or not executable"
                    );
                }
                ok
            }
            Some(_) => true,
            None => false,
        }
    }
}

/// External collaborator that executes generators
pub trait GeneratorRunner {
    /// Run one call and report the process exit code.
    fn run(&mut self, call: &GeneratorCall) -> Result<i32, GenError>;
}

/// Exit status reported for one call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunOutcome {
    pub call: GeneratorCall,
    pub exit_code: i32,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Records calls without executing anything
#[derive(Debug, Default)]
pub struct DryRunRunner {
    pub calls: Vec<GeneratorCall>,
}

impl GeneratorRunner for DryRunRunner {
    fn run(&mut self, call: &GeneratorCall) -> Result<i32, GenError> {
        self.calls.push(call.clone());
        Ok(0)
    }
}
