// Execution engine for step sequences

use crate::error::Error;
use crate::interpreter::constants::{DEFAULT_MAX_DEPTH, DEFAULT_SNAPSHOT_LIMIT};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::invoke::{FunctionDefinition, FunctionInvoker};
use crate::memory::{Environment, Value};
use crate::parser;
use crate::snapshot::{Event, Snapshot, Terminal, ValueTrace};
use crate::trace::{ExtractorConfig, Step, StepKind, TraceExtractor};
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

/// Limits and switches for one interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Nesting bound for evaluation, also used for extraction by `from_source`
    pub max_depth: usize,
    /// Byte budget of the value trace
    pub snapshot_memory_limit: usize,
    pub record_snapshots: bool,
    /// Mirror `print` output to stdout as well as capturing it
    pub echo_output: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            snapshot_memory_limit: DEFAULT_SNAPSHOT_LIMIT,
            record_snapshots: true,
            echo_output: false,
        }
    }
}

/// Executes a step sequence against a flat environment
pub struct StepInterpreter {
    /// Steps being executed
    steps: Vec<Step>,

    config: InterpreterConfig,

    /// Identifier bindings
    pub(super) env: Environment,

    /// Functions registered by `FunctionDef` steps (name -> definition)
    pub(super) functions: FxHashMap<String, FunctionDefinition>,

    /// How calls to defined functions are carried out
    pub(super) invoker: Option<Box<dyn FunctionInvoker>>,

    /// Mock terminal for print output
    pub(super) terminal: Terminal,

    /// Snapshot after every state-changing step
    value_trace: ValueTrace,

    /// Index of the next step to execute
    position: usize,

    /// Value of the last top-level `return`
    return_value: Option<Value>,

    /// Current evaluation nesting
    pub(super) depth: usize,

    /// Whether every step has run
    finished: bool,
}

impl StepInterpreter {
    /// Create an interpreter for a pre-built step sequence
    pub fn new(steps: Vec<Step>) -> Self {
        Self::with_config(steps, InterpreterConfig::default())
    }

    pub fn with_config(steps: Vec<Step>, config: InterpreterConfig) -> Self {
        StepInterpreter {
            steps,
            config,
            env: Environment::new(),
            functions: FxHashMap::default(),
            invoker: None,
            terminal: Terminal::new(),
            value_trace: ValueTrace::new(config.snapshot_memory_limit),
            position: 0,
            return_value: None,
            depth: 0,
            finished: false,
        }
    }

    /// Parse and extract `source`, then build an interpreter for the steps
    pub fn from_source(source: &str) -> Result<Self, Error> {
        Self::from_source_with(source, InterpreterConfig::default())
    }

    pub fn from_source_with(source: &str, config: InterpreterConfig) -> Result<Self, Error> {
        let tree = parser::parse_with_max_nesting(source, config.max_depth)?;
        let steps = TraceExtractor::new(ExtractorConfig {
            max_depth: config.max_depth,
            ..ExtractorConfig::default()
        })
        .extract(&tree)?;

        Ok(Self::with_config(steps, config))
    }

    /// Seed the environment before execution
    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Install the strategy used for calls to defined functions
    pub fn with_invoker(mut self, invoker: Box<dyn FunctionInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    /// Run the remaining steps in order
    ///
    /// Stops at the first failing step. Everything recorded up to that step
    /// stays available, and `position()` points at the step that failed.
    /// A step whose snapshot does not fit the budget commits nothing: no
    /// bindings, no output lines, no registration. Effects of an installed
    /// [`FunctionInvoker`] are its own to undo.
    #[tracing::instrument(level = "debug", skip_all, fields(steps = self.steps.len()))]
    pub fn execute(&mut self) -> Result<(), RuntimeError> {
        let steps = std::mem::take(&mut self.steps);
        let result = self.run_steps(&steps);
        self.steps = steps;

        match &result {
            Ok(()) => {
                self.finished = true;
                debug!(
                    snapshots = self.value_trace.len(),
                    bindings = self.env.len(),
                    "execution finished"
                );
            }
            Err(err) => warn!(position = self.position, error = %err, "execution stopped"),
        }
        result
    }

    fn run_steps(&mut self, steps: &[Step]) -> Result<(), RuntimeError> {
        while let Some(step) = steps.get(self.position) {
            self.execute_step(self.position, step)?;
            self.position += 1;
        }
        Ok(())
    }

    /// Execute one top-level step
    fn execute_step(&mut self, index: usize, step: &Step) -> Result<(), RuntimeError> {
        trace!(index, kind = %step.kind(), "executing step");

        match step {
            Step::Assign { targets, value } => {
                let value = self.evaluate(value)?;
                let mut env = self.env.clone();
                for target in targets {
                    env.set(target.as_str(), value.clone());
                }
                self.take_snapshot(
                    index,
                    StepKind::Assign,
                    Event::Assigned {
                        targets: targets.clone(),
                        value,
                    },
                    Some(&env),
                )?;
                self.env = env;
                Ok(())
            }

            Step::Call { function, args } => {
                let args = self.evaluate_args(args)?;
                let output_mark = self.terminal.len();
                let result = self.call_function(function, args.clone())?;
                let recorded = self.take_snapshot(
                    index,
                    StepKind::Call,
                    Event::Called {
                        function: function.clone(),
                        args,
                        result,
                    },
                    None,
                );
                if recorded.is_err() {
                    self.terminal.truncate(output_mark);
                }
                recorded
            }

            Step::FunctionDef { name, params, body } => {
                self.take_snapshot(
                    index,
                    StepKind::FunctionDef,
                    Event::Defined {
                        name: name.clone(),
                        params: params.clone(),
                    },
                    None,
                )?;
                debug!(function = %name, params = params.len(), "registering function");
                self.functions.insert(
                    name.clone(),
                    FunctionDefinition::new(name.as_str(), params.clone(), body.clone()),
                );
                Ok(())
            }

            // Top level has no frame to return to; the value is only recorded
            Step::Return { value } => {
                let value = self.evaluate(value)?;
                self.take_snapshot(
                    index,
                    StepKind::Return,
                    Event::Returned {
                        value: value.clone(),
                    },
                    None,
                )?;
                self.return_value = Some(value);
                Ok(())
            }

            Step::BinaryOp { .. } | Step::UnaryOp { .. } | Step::Constant { .. } | Step::Name { .. } => {
                self.evaluate_step(step).map(|_| ())
            }
        }
    }

    /// Record the environment after a state-changing step
    ///
    /// `pending` is the environment the step is about to commit; `None`
    /// records the current one.
    fn take_snapshot(
        &mut self,
        step_index: usize,
        kind: StepKind,
        event: Event,
        pending: Option<&Environment>,
    ) -> Result<(), RuntimeError> {
        if !self.config.record_snapshots {
            return Ok(());
        }

        let snapshot = Snapshot {
            step_index,
            kind,
            event,
            environment: pending.unwrap_or(&self.env).clone(),
            output_lines: self.terminal.len(),
        };
        self.value_trace.push(snapshot)
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn value_trace(&self) -> &ValueTrace {
        &self.value_trace
    }

    /// Captured `print` lines
    pub fn output(&self) -> &[String] {
        self.terminal.lines()
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn return_value(&self) -> Option<&Value> {
        self.return_value.as_ref()
    }

    pub fn functions(&self) -> &FxHashMap<String, FunctionDefinition> {
        &self.functions
    }

    /// Index of the next step to execute
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
