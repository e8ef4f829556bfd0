// Arithmetic over two operands

use super::{json_schema_enum, json_schema_number, json_schema_object, named_enum};
use super::{required_number, required_str};
use crate::error::HandlerError;
use crate::types::{Arguments, ToolDefinition};
use serde_json::{json, Number, Value};

named_enum! {
    /// Supported arithmetic operations
    Operation {
        Add => "add",
        Subtract => "subtract",
        Multiply => "multiply",
        Divide => "divide",
    }
}

pub(super) fn definition() -> ToolDefinition {
    let operations: Vec<&str> = Operation::ALL.iter().map(Operation::as_str).collect();

    ToolDefinition::new(
        "calculator",
        "Basic calculator for arithmetic operations",
        json_schema_object(
            json!({
                "operation": json_schema_enum(&operations, "Arithmetic operation to perform"),
                "a": json_schema_number("First operand"),
                "b": json_schema_number("Second operand")
            }),
            vec!["operation", "a", "b"],
        ),
    )
    .with_capabilities(["math", "arithmetic", "calculation"])
    .with_metadata("category", "math")
    .with_metadata("version", "1.0")
}

pub(super) fn execute(args: &Arguments) -> Result<Value, HandlerError> {
    let op_name = required_str(args, "operation")?;
    let a = required_number(args, "a")?;
    let b = required_number(args, "b")?;

    let operation: Operation = op_name
        .parse()
        .map_err(|_| HandlerError::InvalidOperation(op_name.to_string()))?;

    let result = match integer_result(operation, a, b)? {
        Some(n) => Value::from(n),
        None => float_result(operation, a, b)?,
    };

    Ok(json!({
        "result": result,
        "operation": operation.as_str(),
        "operands": [a, b]
    }))
}

/// Exact result when both operands are integers and nothing overflows or truncates
fn integer_result(operation: Operation, a: &Number, b: &Number) -> Result<Option<i64>, HandlerError> {
    let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) else {
        return Ok(None);
    };

    Ok(match operation {
        Operation::Add => a.checked_add(b),
        Operation::Subtract => a.checked_sub(b),
        Operation::Multiply => a.checked_mul(b),
        Operation::Divide => {
            if b == 0 {
                return Err(HandlerError::DivisionByZero);
            }
            if a.checked_rem(b) == Some(0) {
                a.checked_div(b)
            } else {
                None
            }
        }
    })
}

fn float_result(operation: Operation, a: &Number, b: &Number) -> Result<Value, HandlerError> {
    // as_f64 only fails for arbitrary-precision numbers, which are not enabled
    let a = a.as_f64().unwrap_or(f64::NAN);
    let b = b.as_f64().unwrap_or(f64::NAN);

    let result = match operation {
        Operation::Add => a + b,
        Operation::Subtract => a - b,
        Operation::Multiply => a * b,
        Operation::Divide => {
            if b == 0.0 {
                return Err(HandlerError::DivisionByZero);
            }
            a / b
        }
    };

    Number::from_f64(result)
        .map(Value::Number)
        .ok_or(HandlerError::NonFiniteResult(operation.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(value: Value) -> Result<Value, HandlerError> {
        execute(value.as_object().unwrap())
    }

    #[test]
    fn test_add_integers() {
        let result = run(json!({"operation": "add", "a": 2, "b": 3})).unwrap();
        assert_eq!(
            result,
            json!({"result": 5, "operation": "add", "operands": [2, 3]})
        );
    }

    #[test]
    fn test_subtract_and_multiply() {
        assert_eq!(
            run(json!({"operation": "subtract", "a": 2, "b": 5})).unwrap()["result"],
            json!(-3)
        );
        assert_eq!(
            run(json!({"operation": "multiply", "a": 1.5, "b": 4})).unwrap()["result"],
            json!(6.0)
        );
    }

    #[test]
    fn test_divide() {
        assert_eq!(
            run(json!({"operation": "divide", "a": 10, "b": 4})).unwrap()["result"],
            json!(2.5)
        );
        assert_eq!(
            run(json!({"operation": "divide", "a": 10, "b": 5})).unwrap()["result"],
            json!(2)
        );
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            run(json!({"operation": "divide", "a": 1, "b": 0})),
            Err(HandlerError::DivisionByZero)
        );
        assert_eq!(
            run(json!({"operation": "divide", "a": 1.0, "b": 0.0})),
            Err(HandlerError::DivisionByZero)
        );
    }

    #[test]
    fn test_overflow_falls_back_to_float() {
        let result = run(json!({"operation": "add", "a": i64::MAX, "b": 1})).unwrap();
        assert!(result["result"].is_f64());
    }

    #[test]
    fn test_non_finite_result() {
        assert_eq!(
            run(json!({"operation": "multiply", "a": 1e308, "b": 1e308})),
            Err(HandlerError::NonFiniteResult("multiply"))
        );
    }

    #[test]
    fn test_invalid_operation() {
        assert_eq!(
            run(json!({"operation": "modulo", "a": 1, "b": 2})),
            Err(HandlerError::InvalidOperation("modulo".to_string()))
        );
    }

    #[test]
    fn test_malformed_operands() {
        assert_eq!(
            run(json!({"operation": "add", "a": 1})),
            Err(HandlerError::MissingArgument("b"))
        );
        assert!(matches!(
            run(json!({"operation": "add", "a": "1", "b": 2})),
            Err(HandlerError::InvalidArgument { name: "a", .. })
        ));
    }
}
