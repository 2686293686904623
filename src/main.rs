use qbasic::core::{CircuitTrace, StateVector};
use qbasic::{Interpreter, RunConfig, RunFailure, RunOutput};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Logs go to stderr; stdout carries program output only.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("demo") => {
            print_banner();
            run_all_demos();
        }
        Some("run") => cli_run(&args[2..]),
        Some("help") | Some("--help") => {
            print_banner();
            print_help();
        }
        Some(unknown) => {
            eprintln!("Unknown command '{unknown}'. Run 'qbasic help' for usage.");
            std::process::exit(1);
        }
    }
}

// ── CLI ───────────────────────────────────────────────────────────────────

struct RunArgs {
    path: String,
    json: bool,
    seed: Option<u64>,
    config: Option<String>,
}

fn parse_run_args(args: &[String]) -> Result<RunArgs, String> {
    let mut path = None;
    let mut json = false;
    let mut seed = None;
    let mut config = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                seed = Some(value.parse::<u64>().map_err(|e| format!("bad --seed '{value}': {e}"))?);
            }
            "--config" => {
                config = Some(iter.next().ok_or("--config needs a path")?.clone());
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option '{flag}'")),
            file if path.is_none() => path = Some(file.to_string()),
            extra => return Err(format!("unexpected argument '{extra}'")),
        }
    }

    let path = path.ok_or("Usage: qbasic run <file.bas> [--json] [--seed N] [--config FILE]")?;
    Ok(RunArgs { path, json, seed, config })
}

fn load_config(args: &RunArgs) -> Result<RunConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config '{path}': {e}"))?;
            RunConfig::from_json(&text).map_err(|e| e.to_string())?
        }
        None => RunConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

fn cli_run(args: &[String]) {
    let args = match parse_run_args(args) {
        Ok(a) => a,
        Err(e) => { eprintln!("{e}"); std::process::exit(1); }
    };
    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => { eprintln!("{e}"); std::process::exit(1); }
    };
    let source = match std::fs::read_to_string(&args.path) {
        Ok(s) => s,
        Err(e) => { eprintln!("Cannot read '{}': {}", args.path, e); std::process::exit(1); }
    };
    let interpreter = match Interpreter::new(config) {
        Ok(i) => i,
        Err(e) => { eprintln!("{e}"); std::process::exit(1); }
    };

    let result = interpreter.run(&source);

    if args.json {
        let value = match &result {
            Ok(output) => success_json(output),
            Err(failure) => failure_json(failure),
        };
        match serde_json::to_string_pretty(&value) {
            Ok(text) => println!("{text}"),
            Err(e) => { eprintln!("Cannot encode result: {e}"); std::process::exit(1); }
        }
        if result.is_err() {
            std::process::exit(1);
        }
        return;
    }

    print_banner();
    println!("━━━ Quantum BASIC Runner ━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("File: {}\n", args.path);

    match result {
        Ok(output) => print_run_output(&output),
        Err(failure) => {
            for line in &failure.output {
                println!("{line}");
            }
            eprintln!("\n{} error: {}", failure.kind(), failure.error);
            std::process::exit(1);
        }
    }
}

fn success_json(output: &RunOutput) -> serde_json::Value {
    let mut value = serde_json::to_value(output).unwrap_or_default();
    if let Some(obj) = value.as_object_mut() {
        obj.insert("success".into(), serde_json::Value::Bool(true));
    }
    value
}

fn failure_json(failure: &RunFailure) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "kind": failure.kind(),
        "error": failure.error.to_string(),
        "output": failure.output,
    })
}

fn print_run_output(result: &RunOutput) {
    println!("Output:");
    for line in &result.output {
        println!("  {line}");
    }
    println!();

    if let (Some(probs), Some(trace)) = (&result.quantum_state, &result.circuit_trace) {
        print_circuit(trace);
        print_probabilities(probs, trace.num_qubits);
    }
}

fn print_circuit(trace: &CircuitTrace) {
    println!(
        "Circuit: {} gate(s) | {} measurement(s) | {} qubit(s)",
        trace.gate_count(),
        trace.measure_count(),
        trace.num_qubits
    );
    for gate in &trace.gates {
        println!("  {gate}");
    }
    println!();
}

fn print_probabilities(probs: &[f64], num_qubits: usize) {
    println!("Final state:");
    for (i, p) in probs.iter().enumerate().filter(|(_, &p)| p > 1e-6) {
        println!("  |{}⟩  {p:.6}", StateVector::basis_label(i, num_qubits));
    }
    println!();
}

fn print_banner() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║          Quantum BASIC v0.1.0                ║");
    println!("║  Line-numbered BASIC on a qubit simulator    ║");
    println!("╚══════════════════════════════════════════════╝");
    println!();
}

fn print_help() {
    println!("Usage: qbasic [COMMAND] [ARGS]\n");
    println!("Commands:");
    println!("  demo                 Run built-in demonstration programs");
    println!("  run <file.bas>       Execute a Quantum BASIC program");
    println!("      --json           Print the result as JSON");
    println!("      --seed <n>       Seed the measurement RNG");
    println!("      --config <file>  Read a JSON run configuration");
    println!("  help                 Show this message\n");
    println!("Statements (one per numbered line):");
    println!("  PRINT <expr>[; <expr>...]   Print values");
    println!("  LET <name> = <expr>         Assign a variable");
    println!("  IF <cond> THEN <stmt>       Conditional (=, <>, <, >, <=, >=)");
    println!("  GOTO <line>                 Jump");
    println!("  END                         Stop");
    println!("  REM <text>                  Comment");
    println!("  QINIT <n>                   Create n qubits in |0...0⟩");
    println!("  HADAMARD <q>                Hadamard gate");
    println!("  QNOT <q>                    Pauli-X gate");
    println!("  CNOT <c>,<t>                Controlled NOT");
    println!("  MEASURE <q>                 Measure; result in QRESULT\n");
    println!("Logging: set RUST_LOG=debug for per-statement traces (stderr).");
}

// ── Demos ─────────────────────────────────────────────────────────────────

const DEMOS: &[(&str, &str)] = &[
    (
        "Quantum Coin Flip",
        "\
10 REM Superposition gives a fair coin
20 QINIT 1
30 HADAMARD 0
40 MEASURE 0
50 IF QRESULT = 0 THEN PRINT \"Heads!\"
60 IF QRESULT = 1 THEN PRINT \"Tails!\"
70 END",
    ),
    (
        "Bell State",
        "\
10 REM Entangled pair: both qubits always agree
20 QINIT 2
30 HADAMARD 0
40 CNOT 0,1
50 MEASURE 0
60 LET A = QRESULT
70 MEASURE 1
80 PRINT \"Qubit 0: \"; A; \", Qubit 1: \"; QRESULT
90 END",
    ),
    (
        "Quantum Random Number (0-7)",
        "\
10 QINIT 3
20 HADAMARD 0
30 HADAMARD 1
40 HADAMARD 2
50 MEASURE 0
60 LET B0 = QRESULT
70 MEASURE 1
80 LET B1 = QRESULT
90 MEASURE 2
100 LET B2 = QRESULT
110 PRINT \"Random number: \"; B2 * 4 + B1 * 2 + B0
120 END",
    ),
    (
        "Deutsch Algorithm (balanced oracle)",
        "\
10 REM One query decides constant vs balanced
20 QINIT 2
30 QNOT 1
40 HADAMARD 0
50 HADAMARD 1
60 REM Oracle f(x) = x
70 CNOT 0,1
80 HADAMARD 0
90 MEASURE 0
100 IF QRESULT = 1 THEN GOTO 130
110 PRINT \"f is constant\"
120 END
130 PRINT \"f is balanced\"
140 END",
    ),
];

fn run_all_demos() {
    let interpreter = Interpreter::default();
    for (i, (name, source)) in DEMOS.iter().enumerate() {
        println!("━━━ Demo {}: {name} ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━", i + 1);
        println!("Source:");
        for line in source.lines() {
            println!("  {line}");
        }
        println!();

        match interpreter.run(source) {
            Ok(result) => print_run_output(&result),
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    bell_statistics(&interpreter);
}

fn bell_statistics(interpreter: &Interpreter) {
    println!("━━━ Bell correlation over 1000 runs ━━━━━━━━━━━━━━━");
    let source = "10 QINIT 2\n20 HADAMARD 0\n30 CNOT 0,1\n40 MEASURE 0\n50 MEASURE 1";
    let (mut c00, mut c11, mut other) = (0u32, 0u32, 0u32);
    for _ in 0..1000 {
        let Ok(result) = interpreter.run(source) else { continue };
        match (result.output[3].as_str(), result.output[4].as_str()) {
            ("Measured qubit 0: 0", "Measured qubit 1: 0") => c00 += 1,
            ("Measured qubit 0: 1", "Measured qubit 1: 1") => c11 += 1,
            _ => other += 1,
        }
    }
    println!("  |00⟩={c00}  |11⟩={c11}  other={other}");
    println!();
}
