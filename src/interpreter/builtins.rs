// Built-in functions: print, len, abs, str, int, float, max, min

use crate::interpreter::engine::StepInterpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use std::cmp::Ordering;
use tracing::trace;

impl StepInterpreter {
    /// Dispatch a call to a built-in. Returns `None` for names that are not built-ins.
    pub(crate) fn call_builtin(
        &mut self,
        name: &str,
        args: &[Value],
    ) -> Option<Result<Value, RuntimeError>> {
        let result = match name {
            "print" => self.builtin_print(args),
            "len" => builtin_len(args),
            "abs" => builtin_abs(args),
            "str" => builtin_str(args),
            "int" => builtin_int(args),
            "float" => builtin_float(args),
            "max" => builtin_extremum("max", args, Ordering::Greater),
            "min" => builtin_extremum("min", args, Ordering::Less),
            _ => return None,
        };
        Some(result)
    }

    fn builtin_print(&mut self, args: &[Value]) -> Result<Value, RuntimeError> {
        let line = args
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        trace!(line = %line, "print");
        if self.config().echo_output {
            println!("{}", line);
        }
        self.terminal.print_line(line);
        Ok(Value::None)
    }
}

fn expect_args(function: &str, args: &[Value], expected: usize) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(RuntimeError::ArgumentCountMismatch {
            function: function.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn builtin_len(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_args("len", args, 1)?;
    match &args[0] {
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        other => Err(RuntimeError::TypeError {
            operation: "len()".to_string(),
            got: format!("'{}'", other.type_name()),
        }),
    }
}

fn builtin_abs(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_args("abs", args, 1)?;
    match &args[0] {
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => match other.as_int() {
            Some(n) => n
                .checked_abs()
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::IntegerOverflow {
                    operation: format!("abs({})", n),
                }),
            None => Err(RuntimeError::TypeError {
                operation: "abs()".to_string(),
                got: format!("'{}'", other.type_name()),
            }),
        },
    }
}

fn builtin_str(args: &[Value]) -> Result<Value, RuntimeError> {
    match args {
        [] => Ok(Value::Str(String::new())),
        [value] => Ok(Value::Str(value.to_string())),
        _ => expect_args("str", args, 1).map(|_| Value::None),
    }
}

fn builtin_int(args: &[Value]) -> Result<Value, RuntimeError> {
    let value = match args {
        [] => return Ok(Value::Int(0)),
        [value] => value,
        _ => return expect_args("int", args, 1).map(|_| Value::None),
    };

    let invalid = |message: String| RuntimeError::InvalidArgument {
        function: "int".to_string(),
        message,
    };

    match value {
        Value::Float(x) => {
            if !x.is_finite() {
                return Err(invalid(format!("cannot convert float {} to integer", value)));
            }
            let truncated = x.trunc();
            if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                return Err(RuntimeError::IntegerOverflow {
                    operation: format!("int({})", value),
                });
            }
            Ok(Value::Int(truncated as i64))
        }
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| invalid(format!("invalid literal with base 10: '{}'", s))),
        other => other.as_int().map(Value::Int).ok_or_else(|| RuntimeError::TypeError {
            operation: "int()".to_string(),
            got: format!("'{}'", other.type_name()),
        }),
    }
}

fn builtin_float(args: &[Value]) -> Result<Value, RuntimeError> {
    let value = match args {
        [] => return Ok(Value::Float(0.0)),
        [value] => value,
        _ => return expect_args("float", args, 1).map(|_| Value::None),
    };

    match value {
        Value::Str(s) => parse_float(s.trim()).map(Value::Float).ok_or_else(|| {
            RuntimeError::InvalidArgument {
                function: "float".to_string(),
                message: format!("could not convert string to float: '{}'", s),
            }
        }),
        other => other.as_float().map(Value::Float).ok_or_else(|| RuntimeError::TypeError {
            operation: "float()".to_string(),
            got: format!("'{}'", other.type_name()),
        }),
    }
}

/// Accepts Python's spellings of the special values
fn parse_float(text: &str) -> Option<f64> {
    match text.to_ascii_lowercase().as_str() {
        "inf" | "+inf" | "infinity" | "+infinity" => Some(f64::INFINITY),
        "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
        "nan" | "+nan" | "-nan" => Some(f64::NAN),
        _ => text.parse::<f64>().ok(),
    }
}

/// `max` / `min` over two or more numbers, or two or more strings.
/// Ties keep the first argument, as Python does.
fn builtin_extremum(function: &str, args: &[Value], wanted: Ordering) -> Result<Value, RuntimeError> {
    if args.len() < 2 {
        return Err(RuntimeError::InvalidArgument {
            function: function.to_string(),
            message: format!("expected at least 2 arguments, got {}", args.len()),
        });
    }

    let mut best = &args[0];
    for candidate in &args[1..] {
        if compare_values(function, candidate, best)? == wanted {
            best = candidate;
        }
    }
    Ok(best.clone())
}

fn compare_values(function: &str, a: &Value, b: &Value) -> Result<Ordering, RuntimeError> {
    let ordering = match (a, b) {
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        _ => match (a.as_int(), b.as_int()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ if a.is_numeric() && b.is_numeric() => a
                .as_float()
                .zip(b.as_float())
                .and_then(|(x, y)| x.partial_cmp(&y))
                .or(Some(Ordering::Equal)),
            _ => None,
        },
    };

    ordering.ok_or_else(|| RuntimeError::TypeError {
        operation: format!("{}()", function),
        got: format!("'{}' and '{}'", a.type_name(), b.type_name()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::engine::InterpreterConfig;

    fn call(name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let mut interpreter = StepInterpreter::new(Vec::new());
        interpreter
            .call_builtin(name, &args)
            .unwrap_or_else(|| panic!("{} is not a builtin", name))
    }

    #[test]
    fn test_print_captures_python_formatting() {
        let mut interpreter = StepInterpreter::with_config(
            Vec::new(),
            InterpreterConfig {
                echo_output: false,
                ..InterpreterConfig::default()
            },
        );
        let result = interpreter.call_builtin(
            "print",
            &[
                Value::Int(3),
                Value::Float(5.0),
                Value::Bool(true),
                Value::None,
                Value::from("hi"),
            ],
        );

        assert_eq!(result, Some(Ok(Value::None)));
        assert_eq!(interpreter.output(), ["3 5.0 True None hi".to_string()]);
    }

    #[test]
    fn test_print_without_args_prints_empty_line() {
        let mut interpreter = StepInterpreter::new(Vec::new());
        interpreter.call_builtin("print", &[]);
        assert_eq!(interpreter.output(), [String::new()]);
    }

    #[test]
    fn test_unknown_name_is_not_dispatched() {
        let mut interpreter = StepInterpreter::new(Vec::new());
        assert!(interpreter.call_builtin("my_function", &[]).is_none());
        assert!(interpreter.call_builtin("Print", &[]).is_none());
        assert!(interpreter.output().is_empty());
    }

    #[test]
    fn test_len_and_abs() {
        assert_eq!(call("len", vec![Value::from("héllo")]), Ok(Value::Int(5)));
        assert!(matches!(
            call("len", vec![Value::Int(1)]),
            Err(RuntimeError::TypeError { .. })
        ));
        assert_eq!(call("abs", vec![Value::Int(-4)]), Ok(Value::Int(4)));
        assert_eq!(call("abs", vec![Value::Float(-0.5)]), Ok(Value::Float(0.5)));

        let err = call("len", vec![Value::from("a"), Value::from("b")]).unwrap_err();
        assert_eq!(err.to_string(), "len() takes 1 argument, got 2");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(call("str", vec![Value::Float(2.0)]), Ok(Value::from("2.0")));
        assert_eq!(call("int", vec![Value::Float(-2.7)]), Ok(Value::Int(-2)));
        assert_eq!(call("int", vec![Value::from(" 42 ")]), Ok(Value::Int(42)));
        assert_eq!(call("int", vec![Value::Bool(true)]), Ok(Value::Int(1)));
        assert_eq!(call("float", vec![Value::from("2.5")]), Ok(Value::Float(2.5)));
        assert_eq!(call("float", vec![Value::Int(3)]), Ok(Value::Float(3.0)));

        assert!(matches!(
            call("int", vec![Value::from("4.5")]),
            Err(RuntimeError::InvalidArgument { .. })
        ));
        assert!(matches!(
            call("int", vec![Value::Float(f64::NAN)]),
            Err(RuntimeError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_max_min() {
        assert_eq!(
            call("max", vec![Value::Int(1), Value::Float(2.5), Value::Int(2)]),
            Ok(Value::Float(2.5))
        );
        assert_eq!(call("min", vec![Value::Int(1), Value::Bool(true)]), Ok(Value::Int(1)));
        assert_eq!(
            call("min", vec![Value::from("b"), Value::from("a")]),
            Ok(Value::from("a"))
        );
        assert!(matches!(
            call("max", vec![Value::Int(1), Value::from("a")]),
            Err(RuntimeError::TypeError { .. })
        ));
        assert!(matches!(
            call("max", vec![Value::Int(1)]),
            Err(RuntimeError::InvalidArgument { .. })
        ));
    }
}
