use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use color_eyre::{eyre::Context, Result};
use friston::{
    driver::{self, Outcome},
    interpreter::{BufferedContext, Interpreter, Value},
    lexer, parser,
    report::BufferedReporter,
};

#[test]
fn test_assignment() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/assignment");
    test_engine(input_dir)
}

#[test]
fn test_block() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/block");
    test_engine(input_dir)
}

#[test]
fn test_call() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/call");
    test_engine(input_dir)
}

#[test]
fn test_closure() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/closure");
    test_engine(input_dir)
}

#[test]
fn test_comments() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/comments");
    test_engine(input_dir)
}

#[test]
fn test_for() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/for");
    test_engine(input_dir)
}

#[test]
fn test_function() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/function");
    test_engine(input_dir)
}

#[test]
fn test_if() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/if");
    test_engine(input_dir)
}

#[test]
fn test_lexical() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/lexical");
    test_engine(input_dir)
}

#[test]
fn test_logical_operator() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/logical_operator");
    test_engine(input_dir)
}

#[test]
fn test_miscellaneous() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/miscellaneous");
    test_engine(input_dir)
}

#[test]
fn test_number() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/number");
    test_engine(input_dir)
}

#[test]
fn test_operator() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/operator");
    test_engine(input_dir)
}

#[test]
fn test_print() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/print");
    test_engine(input_dir)
}

#[test]
fn test_return() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/return");
    test_engine(input_dir)
}

#[test]
fn test_string() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/string");
    test_engine(input_dir)
}

#[test]
fn test_syntax() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/syntax");
    test_engine(input_dir)
}

#[test]
fn test_variable() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/variable");
    test_engine(input_dir)
}

#[test]
fn test_while() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/while");
    test_engine(input_dir)
}

// Inline scenarios

fn run(source: &str) -> (String, Vec<String>, Outcome) {
    let mut interpreter = Interpreter::new(BufferedContext::new());
    let mut reporter = BufferedReporter::new();
    let outcome = driver::run(source, &mut interpreter, &mut reporter);
    (
        interpreter.into_context().into_data(),
        reporter.rendered(),
        outcome,
    )
}

fn evaluate(source: &str) -> Value {
    let lexed = lexer::scan(source);
    assert!(!lexed.had_error());
    let expression = parser::Parser::new(lexed.tokens)
        .parse_expression()
        .expect("Source is a valid expression.");
    Interpreter::new(BufferedContext::new())
        .evaluate_expression(&expression)
        .expect("Expression evaluates without error.")
}

#[test]
fn print_sum_of_variables() {
    let (output, errors, outcome) = run("let a = 1\nlet b = 2\nprint(a + b)\n");
    assert_eq!(output, "3");
    assert!(errors.is_empty());
    assert!(outcome.is_success());
}

#[test]
fn for_loop_prints_in_order() {
    let (output, errors, _) = run("for (let i = 0; i < 3; i++) then print(i)");
    assert_eq!(output, "012");
    assert!(errors.is_empty());
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert!(matches!(evaluate("1 + 2 * 3"), Value::Number(v) if v == 7.0));
}

#[test]
fn and_skips_right_operand() {
    assert!(matches!(evaluate("false and (1/0)"), Value::Bool(false)));
}

#[test]
fn arity_mismatch_skips_body() {
    let source = "\
func pair: a, b =
    print(\"ran\")
pair(1)
pair(1, 2, 3)
";
    let (output, errors, outcome) = run(source);
    assert_eq!(output, "");
    assert_eq!(
        errors,
        vec![
            "[Line 3] Error: Expected 2 arguments but got 1.",
            "[Line 4] Error: Expected 2 arguments but got 3.",
        ]
    );
    assert_eq!(outcome, Outcome::Completed { runtime_errors: 2 });
    assert_eq!(outcome.exit_code(), 70);
}

#[test]
fn runtime_error_abandons_only_its_statement() {
    let (output, errors, _) = run("println(1)\nprintln(-nil)\nprintln(2)\n");
    assert_eq!(output, "1\n2\n");
    assert_eq!(errors, vec!["[Line 2] Error: Operand must be a number."]);
}

#[test]
fn syntax_errors_prevent_execution() {
    let (output, errors, outcome) = run("println(1)\nlet = 2\n");
    assert_eq!(output, "");
    assert_eq!(errors.len(), 1);
    assert_eq!(outcome, Outcome::SyntaxErrors(1));
    assert_eq!(outcome.exit_code(), 65);
}

#[test]
fn repl_session_keeps_globals() {
    let mut interpreter = Interpreter::new(BufferedContext::new()).with_repl(true);
    let mut reporter = BufferedReporter::new();
    for entry in [
        "let x = 41\n",
        "func bump: n =\n    return n + 1\n",
        "bump(x)\n",
        "println(\"side effect\")\n",
        "nil\n",
    ] {
        let _ = driver::run(entry, &mut interpreter, &mut reporter);
    }
    assert!(reporter.is_empty());
    assert_eq!(
        interpreter.into_context().into_data(),
        "42\nside effect\nnil\nnil\n"
    );
}

#[test]
fn repl_echoes_nested_expression_statements() {
    let mut interpreter = Interpreter::new(BufferedContext::new()).with_repl(true);
    let mut reporter = BufferedReporter::new();
    for entry in [
        "if true then\n    1 + 1\n",
        "func twice: n =\n    n * 2\n",
        "let y = twice(3)\n",
        "while false then 1\n",
    ] {
        let _ = driver::run(entry, &mut interpreter, &mut reporter);
    }
    assert!(reporter.is_empty());
    assert_eq!(interpreter.into_context().into_data(), "2\n6\n");
}

#[test]
fn repl_lines_that_open_blocks_continue() {
    assert!(driver::needs_continuation("if x then"));
    assert!(driver::needs_continuation("func f: a ="));
    assert!(driver::needs_continuation("let total = 1 + ~"));
    assert!(!driver::needs_continuation("println(athen)"));
    assert!(!driver::needs_continuation("x == y"));
}

#[test]
fn registered_natives_are_callable() {
    use friston::interpreter::{NativeFunction, RuntimeErrorKind, SystemContext};
    use std::rc::Rc;

    #[derive(Debug)]
    struct Double;

    impl NativeFunction for Double {
        fn get_name(&self) -> &'static str {
            "double"
        }

        fn arity(&self) -> usize {
            1
        }

        fn call(
            &self,
            arguments: &[Value],
            _context: &mut dyn SystemContext,
        ) -> Result<Value, RuntimeErrorKind> {
            match &arguments[0] {
                Value::Number(v) => Ok(Value::Number(v * 2.0)),
                v => Err(RuntimeErrorKind::NonNumeric(v.clone())),
            }
        }
    }

    let mut interpreter = Interpreter::new(BufferedContext::new());
    interpreter.register_native(Rc::new(Double));
    let mut reporter = BufferedReporter::new();
    let _ = driver::run(
        "println(double(21))\ndouble(\"x\")\n",
        &mut interpreter,
        &mut reporter,
    );
    assert_eq!(interpreter.context().data(), "42\n");
    assert_eq!(
        reporter.rendered(),
        vec!["[Line 2] Error: Operand must be a number."]
    );
}

#[test]
fn value_display_and_operators() {
    assert_eq!(Value::Number(3.0).to_string(), "3");
    assert_eq!(Value::Number(-0.5).to_string(), "-0.5");

    let lhs = Value::String("n = ".into());
    assert_eq!(lhs.add(&Value::Number(4.0)).unwrap().to_string(), "n = 4");
    assert_eq!(lhs.add(&Value::Nil).unwrap().to_string(), "n = nil");

    let err = Value::Bool(true).subtract(&Value::Bool(false)).unwrap_err();
    assert_eq!(err.to_string(), "Operands must be a number.");
    let err = Value::Number(1.0)
        .add(&Value::String("a".into()))
        .unwrap_err();
    assert_eq!(err.to_string(), "Operand types must match.");
    let err = Value::Number(1.0).divide(&Value::Number(0.0)).unwrap_err();
    assert_eq!(err.to_string(), "Division by zero.");

    assert!(Value::Nil.is_equal(&Value::Nil));
    assert!(!Value::Nil.is_equal(&Value::Bool(false)));
}

// Fixture engine

struct TestCase {
    name: String,
    source: String,
    output: String,
    errors: Vec<String>,
}

impl TestCase {
    pub fn check(&self) {
        let (output, errors, _) = run(&self.source);
        assert_eq!(
            self.errors, errors,
            "Failed test {} at error reporting.",
            self.name
        );
        assert_eq!(self.output, output, "Failed test {} at print.", self.name);
    }
}

fn test_engine(input_dir: &Path) -> Result<()> {
    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "fr" {
            continue;
        }

        println!("Parsing {path:?}");
        let test_case = parse_test_case(&path)?;
        println!("Checking {}", test_case.name);

        let res = std::panic::catch_unwind(|| {
            test_case.check();
        });
        if res.is_err() {
            println!("\tFails test case {}", test_case.name);
            succeeded = false;
        }
    }

    assert!(succeeded, "Some test cases in {input_dir:?} failed.");

    Ok(())
}

fn parse_test_case(input_path: &Path) -> Result<TestCase> {
    let test_name = AsRef::<Path>::as_ref(
        input_path
            .file_name()
            .expect("File name can't be none as the path is to a real file."),
    )
    .to_string_lossy();

    let input = read_to_string(input_path).context("Failed to open input test data file")?;

    let mut source_lines = Vec::new();
    let mut expected_outputs = Vec::new();
    let mut expected_errors = Vec::new();

    for line in input.lines() {
        if let Some((_, expected)) = line.split_once("// expect:") {
            expected_outputs.push(expected.trim().to_string());
        } else if let Some((_, expected)) = line.split_once("// error:") {
            expected_errors.push(expected.trim().to_string());
        }
        source_lines.push(line);
    }

    let mut output = expected_outputs.join("\n");
    if !output.is_empty() {
        output.push('\n');
    }
    Ok(TestCase {
        name: test_name.into_owned(),
        source: source_lines.join("\n"),
        output,
        errors: expected_errors,
    })
}
