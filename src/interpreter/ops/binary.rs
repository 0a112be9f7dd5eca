//! Binary operator evaluation
//!
//! Arithmetic follows Python: `/` always produces a float, `//` and `%` round
//! toward negative infinity, and bools take part in arithmetic as 0 / 1.
//! Integer results are checked; overflow is a runtime error rather than a
//! wrap-around. String results may not outgrow the snapshot memory budget.

use crate::interpreter::engine::StepInterpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::BinOp;

/// Operands after numeric coercion
enum Numeric {
    Ints(i64, i64),
    Floats(f64, f64),
}

impl StepInterpreter {
    pub(crate) fn evaluate_binary_op(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
    ) -> Result<Value, RuntimeError> {
        match Self::coerce_numeric(left, right) {
            Some(Numeric::Ints(a, b)) => Self::int_binary_op(op, a, b),
            Some(Numeric::Floats(a, b)) => Self::float_binary_op(op, a, b),
            None => Self::sequence_binary_op(op, left, right, self.config().snapshot_memory_limit),
        }
    }

    /// Helper to bring two numeric operands to a common type
    #[inline]
    fn coerce_numeric(left: &Value, right: &Value) -> Option<Numeric> {
        if let (Some(a), Some(b)) = (left.as_int(), right.as_int()) {
            return Some(Numeric::Ints(a, b));
        }
        if left.is_numeric() && right.is_numeric() {
            return Some(Numeric::Floats(left.as_float()?, right.as_float()?));
        }
        None
    }

    fn int_binary_op(op: BinOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
        let overflow = || RuntimeError::IntegerOverflow {
            operation: format!("{} {} {}", a, op.symbol(), b),
        };

        match op {
            BinOp::Add => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
            BinOp::Sub => a.checked_sub(b).map(Value::Int).ok_or_else(overflow),
            BinOp::Mult => a.checked_mul(b).map(Value::Int).ok_or_else(overflow),
            BinOp::Div => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero {
                        operation: "division".to_string(),
                    });
                }
                Ok(Value::Float(a as f64 / b as f64))
            }
            BinOp::FloorDiv => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero {
                        operation: "integer division or modulo".to_string(),
                    });
                }
                let quotient = a.checked_div(b).ok_or_else(overflow)?;
                // Truncating division rounds toward zero; step down when the
                // exact quotient was negative and inexact.
                if a % b != 0 && ((a < 0) != (b < 0)) {
                    Ok(Value::Int(quotient - 1))
                } else {
                    Ok(Value::Int(quotient))
                }
            }
            BinOp::Mod => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero {
                        operation: "integer division or modulo".to_string(),
                    });
                }
                let remainder = a.checked_rem(b).ok_or_else(overflow)?;
                // The result takes the sign of the divisor
                if remainder != 0 && ((remainder < 0) != (b < 0)) {
                    Ok(Value::Int(remainder + b))
                } else {
                    Ok(Value::Int(remainder))
                }
            }
            BinOp::Pow => {
                if b < 0 {
                    if a == 0 {
                        return Err(RuntimeError::DivisionByZero {
                            operation: "division".to_string(),
                        });
                    }
                    return Ok(Value::Float((a as f64).powf(b as f64)));
                }
                let exponent = u32::try_from(b).map_err(|_| overflow())?;
                a.checked_pow(exponent).map(Value::Int).ok_or_else(overflow)
            }
        }
    }

    fn float_binary_op(op: BinOp, a: f64, b: f64) -> Result<Value, RuntimeError> {
        let zero_divisor = |operation: &str| RuntimeError::DivisionByZero {
            operation: operation.to_string(),
        };

        let result = match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mult => a * b,
            BinOp::Div => {
                if b == 0.0 {
                    return Err(zero_divisor("float division"));
                }
                a / b
            }
            BinOp::FloorDiv => {
                if b == 0.0 {
                    return Err(zero_divisor("float floor division"));
                }
                (a / b).floor()
            }
            BinOp::Mod => {
                if b == 0.0 {
                    return Err(zero_divisor("float modulo"));
                }
                a - b * (a / b).floor()
            }
            BinOp::Pow => {
                if a == 0.0 && b < 0.0 {
                    return Err(zero_divisor("float division"));
                }
                let result = a.powf(b);
                if result.is_infinite() && a.is_finite() && b.is_finite() {
                    return Err(RuntimeError::FloatOverflow {
                        operation: format!("{} ** {}", Value::Float(a), Value::Float(b)),
                    });
                }
                result
            }
        };

        Ok(Value::Float(result))
    }

    /// String concatenation and repetition, bounded by `limit` bytes
    fn sequence_binary_op(
        op: BinOp,
        left: &Value,
        right: &Value,
        limit: usize,
    ) -> Result<Value, RuntimeError> {
        let check_size = |size: usize| {
            if size > limit {
                Err(RuntimeError::ValueTooLarge { size, limit })
            } else {
                Ok(())
            }
        };

        match (op, left, right) {
            (BinOp::Add, Value::Str(a), Value::Str(b)) => {
                check_size(a.len().saturating_add(b.len()))?;
                Ok(Value::Str(format!("{}{}", a, b)))
            }
            (BinOp::Mult, Value::Str(s), count) | (BinOp::Mult, count, Value::Str(s))
                if count.as_int().is_some() =>
            {
                let count = count.as_int().unwrap_or(0);
                let times = usize::try_from(count.max(0)).unwrap_or(usize::MAX);
                let size = s.len().checked_mul(times).ok_or_else(|| RuntimeError::IntegerOverflow {
                    operation: format!("len {} * {}", s.len(), count),
                })?;
                check_size(size)?;
                Ok(Value::Str(s.repeat(times)))
            }
            _ => Err(RuntimeError::TypeError {
                operation: op.symbol().to_string(),
                got: format!("'{}' and '{}'", left.type_name(), right.type_name()),
            }),
        }
    }
}
