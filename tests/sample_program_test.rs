use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use steptrace::interpreter::{FunctionDefinition, RuntimeError, StepInterpreter};
use steptrace::memory::{Environment, Value};
use steptrace::trace::StepKind;

fn sample_source() -> String {
    let path = Path::new("demos/sample.py");
    fs::read_to_string(path).expect("Failed to read demo file")
}

#[test]
fn test_sample_trace_shape() {
    let steps = steptrace::trace_source(&sample_source()).expect("Extraction failed");

    let kinds: Vec<StepKind> = steps.iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            StepKind::Assign,
            StepKind::Assign,
            StepKind::Call,
            StepKind::FunctionDef,
            StepKind::Assign,
            StepKind::Call,
        ]
    );

    let lines: Vec<String> = steps.iter().map(|s| s.to_string()).collect();
    assert_eq!(
        lines[0],
        r#"Assign {"kind":"Assign","targets":["a"],"value":{"literal":2}}"#
    );
}

#[test]
fn test_sample_without_invoker_stops_at_call() {
    let mut interpreter = StepInterpreter::from_source(&sample_source()).expect("Extraction failed");
    let result = interpreter.execute();

    assert_eq!(
        result,
        Err(RuntimeError::UnknownCallable {
            name: "my_function".to_string()
        })
    );
    assert_eq!(interpreter.output(), ["5".to_string()]);
    assert_eq!(interpreter.position(), 4);
    assert!(!interpreter.environment().contains("result"));
}

#[test]
fn test_sample_with_invoker() {
    let invoker = |function: &FunctionDefinition, args: Vec<Value>| -> Result<Value, RuntimeError> {
        let locals: Environment = function.params.iter().cloned().zip(args).collect();
        let mut frame =
            StepInterpreter::new(function.body_steps().cloned().collect()).with_environment(locals);
        frame.execute()?;
        Ok(frame.return_value().cloned().unwrap_or_default())
    };

    let mut interpreter = StepInterpreter::from_source(&sample_source())
        .expect("Extraction failed")
        .with_invoker(Box::new(invoker));
    interpreter.execute().expect("Execution failed");

    assert_eq!(interpreter.output(), ["5".to_string(), "10".to_string()]);
    assert_eq!(interpreter.value_trace().len(), 6);

    let json = serde_json::to_value(interpreter.environment()).unwrap();
    assert_eq!(json, serde_json::json!({"a": 2, "b": 5, "result": 10}));
}
