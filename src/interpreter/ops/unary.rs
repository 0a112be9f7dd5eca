//! Unary operator evaluation

use crate::interpreter::engine::StepInterpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::UnOp;

impl StepInterpreter {
    pub(crate) fn evaluate_unary_op(&self, op: UnOp, operand: &Value) -> Result<Value, RuntimeError> {
        match op {
            UnOp::Not => Ok(Value::Bool(!operand.is_truthy())),
            UnOp::USub => match operand {
                Value::Float(x) => Ok(Value::Float(-x)),
                other => match other.as_int() {
                    Some(n) => n.checked_neg().map(Value::Int).ok_or_else(|| {
                        RuntimeError::IntegerOverflow {
                            operation: format!("-({})", n),
                        }
                    }),
                    None => Err(Self::bad_operand("-", other)),
                },
            },
            UnOp::UAdd => match operand {
                Value::Float(x) => Ok(Value::Float(*x)),
                other => other
                    .as_int()
                    .map(Value::Int)
                    .ok_or_else(|| Self::bad_operand("+", other)),
            },
        }
    }

    fn bad_operand(symbol: &str, operand: &Value) -> RuntimeError {
        RuntimeError::TypeError {
            operation: format!("unary {}", symbol),
            got: format!("'{}'", operand.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: UnOp, operand: Value) -> Result<Value, RuntimeError> {
        StepInterpreter::new(Vec::new()).evaluate_unary_op(op, &operand)
    }

    #[test]
    fn test_negation() {
        assert_eq!(eval(UnOp::USub, Value::Int(3)), Ok(Value::Int(-3)));
        assert_eq!(eval(UnOp::USub, Value::Float(0.5)), Ok(Value::Float(-0.5)));
        assert_eq!(eval(UnOp::USub, Value::Bool(true)), Ok(Value::Int(-1)));
        assert!(matches!(
            eval(UnOp::USub, Value::Int(i64::MIN)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_plus_normalizes_bool() {
        assert_eq!(eval(UnOp::UAdd, Value::Bool(false)), Ok(Value::Int(0)));
        assert_eq!(eval(UnOp::UAdd, Value::Int(7)), Ok(Value::Int(7)));
    }

    #[test]
    fn test_not_uses_truthiness() {
        assert_eq!(eval(UnOp::Not, Value::from("")), Ok(Value::Bool(true)));
        assert_eq!(eval(UnOp::Not, Value::Int(2)), Ok(Value::Bool(false)));
        assert_eq!(eval(UnOp::Not, Value::None), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_bad_operand() {
        let err = eval(UnOp::USub, Value::from("a")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type error: unsupported operand type(s) for unary -: 'str'"
        );
    }
}
