/// Quantum BASIC executor.
///
/// Walks a sorted line table with an explicit program counter. Each step
/// decodes the current line into a `Statement`, dispatches it, and moves the
/// counter according to the returned `Flow`:
///
///   - `Next`  advance by one line
///   - `Jump`  continue at a line-table index (`GOTO`, `IF ... THEN GOTO`)
///   - `Halt`  stop (`END`)
///
/// All mutable run state lives in one `ExecutionContext`, built fresh for
/// every run, so an `Interpreter` can be shared and reused freely.
///
/// Infinite-loop guard:
///   Execution is capped at `max_steps` top-level statements and, when
///   configured, a wall-clock budget. Either limit aborts the run with
///   `ResourceExhausted`.
use super::config::{GotoPolicy, RunConfig};
use crate::core::{CircuitTrace, QuantumEngine};
use crate::error::{Result, RunError, RunFailure};
use crate::language::{Evaluator, Program, Statement, Value, Variables, MEASUREMENT_VARIABLE};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

// ── Result types ──────────────────────────────────────────────────────────

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    pub output: Vec<String>,
    /// Probability of each basis state, if a register was initialized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantum_state: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_trace: Option<CircuitTrace>,
    /// Top-level statements executed.
    #[serde(skip)]
    pub steps_executed: usize,
}

/// How the counter moves after a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,
    Jump(usize),
    Halt,
}

// ── Execution context ─────────────────────────────────────────────────────

/// Mutable state of one run.
pub struct ExecutionContext {
    pub variables: Variables,
    pub output: Vec<String>,
    /// Index into the line table, not a line number.
    pub pc: usize,
    pub steps: usize,
    pub engine: Option<QuantumEngine>,
    started: Instant,
}

impl ExecutionContext {
    pub fn new(engine: Option<QuantumEngine>) -> Self {
        Self {
            variables: Variables::new(),
            output: Vec::new(),
            pc: 0,
            steps: 0,
            engine,
            started: Instant::now(),
        }
    }

    fn evaluate(&self, expr: &str) -> Value {
        Evaluator::new(&self.variables).evaluate(expr)
    }

    /// Evaluate an operand that must be a whole number.
    fn integer(&self, expr: &str, statement: &str) -> Result<i64> {
        let value = self.evaluate(expr);
        value.as_integer().ok_or_else(|| {
            RunError::malformed(statement, format!("'{expr}' is not an integer (got {value})"))
        })
    }

    fn quantum<T>(
        &mut self,
        statement: &str,
        op: impl FnOnce(&mut QuantumEngine) -> crate::core::error::Result<T>,
    ) -> Result<T> {
        let engine = self
            .engine
            .as_mut()
            .ok_or_else(|| RunError::QuantumEngineNotAttached {
                statement: statement.to_string(),
            })?;
        Ok(op(engine)?)
    }

    fn finish(self) -> RunOutput {
        let (quantum_state, circuit_trace) = match self.engine.filter(QuantumEngine::is_initialized) {
            Some(engine) => (
                Some(engine.snapshot_probabilities()),
                Some(engine.circuit_trace()),
            ),
            None => (None, None),
        };
        RunOutput {
            output: self.output,
            quantum_state,
            circuit_trace,
            steps_executed: self.steps,
        }
    }
}

// ── Interpreter ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: RunConfig,
}

impl Interpreter {
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run `source` with an engine built from the configuration (or none,
    /// when `quantum` is off).
    pub fn run(&self, source: &str) -> std::result::Result<RunOutput, RunFailure> {
        let engine = self.config.quantum.then(|| self.build_engine());
        self.run_with_engine(source, engine)
    }

    /// Run `source` against a caller-supplied engine.
    pub fn run_with_engine(
        &self,
        source: &str,
        engine: Option<QuantumEngine>,
    ) -> std::result::Result<RunOutput, RunFailure> {
        let program = Program::parse_with(source, self.config.duplicate_lines)?;
        info!(lines = program.len(), quantum = engine.is_some(), "run started");

        let mut ctx = ExecutionContext::new(engine);
        if let Err(error) = self.execute_program(&program, &mut ctx) {
            warn!(kind = error.kind(), %error, steps = ctx.steps, "run failed");
            return Err(RunFailure::new(error, ctx.output));
        }

        info!(steps = ctx.steps, output_lines = ctx.output.len(), "run finished");
        Ok(ctx.finish())
    }

    fn build_engine(&self) -> QuantumEngine {
        let engine = match self.config.seed {
            Some(seed) => QuantumEngine::with_seed(seed),
            None => QuantumEngine::new(),
        };
        engine.with_max_qubits(self.config.max_qubits)
    }

    fn execute_program(&self, program: &Program, ctx: &mut ExecutionContext) -> Result<()> {
        while let Some(line) = program.get(ctx.pc) {
            self.check_budget(ctx)?;
            ctx.steps += 1;

            let statement = Statement::parse(&line.statement)?;
            debug!(line = line.line_number, %statement, "dispatch");

            match self.execute(&statement, &line.statement, program, ctx)? {
                Flow::Next => ctx.pc += 1,
                Flow::Jump(index) => ctx.pc = index,
                Flow::Halt => break,
            }
        }
        Ok(())
    }

    fn check_budget(&self, ctx: &ExecutionContext) -> Result<()> {
        if ctx.steps >= self.config.max_steps {
            return Err(RunError::ResourceExhausted(format!(
                "execution exceeded {} steps; possible infinite loop in program",
                self.config.max_steps
            )));
        }
        if let Some(budget) = self.config.time_budget() {
            if ctx.started.elapsed() > budget {
                return Err(RunError::ResourceExhausted(format!(
                    "execution exceeded the time budget of {} ms",
                    budget.as_millis()
                )));
            }
        }
        Ok(())
    }

    /// Execute one statement. `source` is the line's text, used to name the
    /// statement in errors.
    fn execute(
        &self,
        statement: &Statement,
        source: &str,
        program: &Program,
        ctx: &mut ExecutionContext,
    ) -> Result<Flow> {
        if statement.is_quantum() && ctx.engine.is_none() {
            return Err(RunError::QuantumEngineNotAttached {
                statement: source.to_string(),
            });
        }

        match statement {
            Statement::Print(items) => {
                let line: String = items.iter().map(|item| ctx.evaluate(item).to_string()).collect();
                ctx.output.push(line);
            }
            Statement::Let { name, expr } => {
                let value = ctx.evaluate(expr);
                ctx.variables.insert(name.clone(), value);
            }

            // ── Quantum ─────────────────────────────────────────────────
            Statement::QInit(expr) => {
                let n = ctx.integer(expr, source)?;
                ctx.quantum(source, |engine| engine.initialize(n))?;
                ctx.output.push(format!("Initialized {n} qubit(s)"));
            }
            Statement::Hadamard(expr) => {
                let q = ctx.integer(expr, source)?;
                ctx.quantum(source, |engine| engine.hadamard(q))?;
                ctx.output.push(format!("Applied Hadamard to qubit {q}"));
            }
            Statement::QNot(expr) => {
                let q = ctx.integer(expr, source)?;
                ctx.quantum(source, |engine| engine.pauli_x(q))?;
                ctx.output.push(format!("Applied X gate to qubit {q}"));
            }
            Statement::Cnot { control, target } => {
                let c = ctx.integer(control, source)?;
                let t = ctx.integer(target, source)?;
                ctx.quantum(source, |engine| engine.cnot(c, t))?;
                ctx.output.push(format!("Applied CNOT: control={c}, target={t}"));
            }
            Statement::Measure(expr) => {
                let q = ctx.integer(expr, source)?;
                let outcome = ctx.quantum(source, |engine| engine.measure(q))?;
                ctx.variables
                    .insert(MEASUREMENT_VARIABLE.to_string(), Value::Number(f64::from(outcome)));
                ctx.output.push(format!("Measured qubit {q}: {outcome}"));
            }

            // ── Control flow ────────────────────────────────────────────
            Statement::If { condition, then } => {
                let taken = Evaluator::new(&ctx.variables).evaluate_condition(condition);
                debug!(condition = condition.as_str(), taken, "IF");
                if taken {
                    return self.execute(then, source, program, ctx);
                }
            }
            Statement::Goto(expr) => {
                let target = ctx.integer(expr, source)?;
                return self.jump(target, program);
            }
            Statement::End => return Ok(Flow::Halt),
            Statement::Rem(_) => {}
        }

        Ok(Flow::Next)
    }

    fn jump(&self, target: i64, program: &Program) -> Result<Flow> {
        let index = u64::try_from(target)
            .ok()
            .and_then(|line_number| program.index_of(line_number));
        match (index, self.config.goto_policy) {
            (Some(index), _) => Ok(Flow::Jump(index)),
            (None, GotoPolicy::Strict) => Err(RunError::UnknownLineTarget { target }),
            (None, GotoPolicy::FallThrough) => {
                warn!(target, "GOTO target not found; continuing with next line");
                Ok(Flow::Next)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
