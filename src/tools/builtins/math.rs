//! Built-in arithmetic and equation tools.
//!
//! All functions are pure and total except where the domain genuinely
//! excludes an input (`divide` by zero, `sqrt` of a negative,
//! `solve_linear` with a zero coefficient).

use serde_json::{json, Value};

use crate::tools::{register_tool, require_f64, ToolError, ToolMeta};

/// Add two numbers.
pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

/// Subtract `b` from `a`.
pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

/// Multiply two numbers.
pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Divide `a` by `b`.
pub fn divide(a: f64, b: f64) -> Result<f64, ToolError> {
    if b == 0.0 {
        return Err(ToolError::DivisionByZero);
    }
    Ok(a / b)
}

/// Raise `base` to the power of `exponent`.
pub fn power(base: f64, exponent: f64) -> f64 {
    base.powf(exponent)
}

/// Square root.
pub fn sqrt(x: f64) -> Result<f64, ToolError> {
    if x < 0.0 {
        return Err(ToolError::InvalidDomain(format!(
            "square root of negative number {x}"
        )));
    }
    Ok(x.sqrt())
}

/// Solve the linear equation `a·x + b = c` for x.
pub fn solve_linear(a: f64, b: f64, c: f64) -> Result<f64, ToolError> {
    if a == 0.0 {
        return Err(ToolError::DegenerateEquation);
    }
    Ok((c - b) / a)
}

// ── JSON dispatch wrappers ───────────────────────────────────

fn binary_args(args: &Value) -> Result<(f64, f64), ToolError> {
    Ok((require_f64(args, "a")?, require_f64(args, "b")?))
}

fn add_json(args: &Value) -> Result<Value, ToolError> {
    let (a, b) = binary_args(args)?;
    Ok(json!({ "result": add(a, b) }))
}

fn subtract_json(args: &Value) -> Result<Value, ToolError> {
    let (a, b) = binary_args(args)?;
    Ok(json!({ "result": subtract(a, b) }))
}

fn multiply_json(args: &Value) -> Result<Value, ToolError> {
    let (a, b) = binary_args(args)?;
    Ok(json!({ "result": multiply(a, b) }))
}

fn divide_json(args: &Value) -> Result<Value, ToolError> {
    let (a, b) = binary_args(args)?;
    Ok(json!({ "result": divide(a, b)? }))
}

fn power_json(args: &Value) -> Result<Value, ToolError> {
    let base = require_f64(args, "base")?;
    let exponent = require_f64(args, "exponent")?;
    Ok(json!({ "result": power(base, exponent) }))
}

fn sqrt_json(args: &Value) -> Result<Value, ToolError> {
    let x = require_f64(args, "x")?;
    Ok(json!({ "result": sqrt(x)? }))
}

fn solve_linear_json(args: &Value) -> Result<Value, ToolError> {
    let a = require_f64(args, "a")?;
    let b = require_f64(args, "b")?;
    let c = require_f64(args, "c")?;
    Ok(json!({ "x": solve_linear(a, b, c)? }))
}

fn pair_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "a": { "type": "number", "description": "First operand." },
            "b": { "type": "number", "description": "Second operand." }
        },
        "required": ["a", "b"],
        "additionalProperties": false
    })
}

/// Register all arithmetic tools in the global registry.
pub fn register() {
    register_tool(
        ToolMeta {
            name: "add".into(),
            description: "Add two numbers.".into(),
            args_schema: pair_schema(),
        },
        add_json,
    );
    register_tool(
        ToolMeta {
            name: "subtract".into(),
            description: "Subtract b from a.".into(),
            args_schema: pair_schema(),
        },
        subtract_json,
    );
    register_tool(
        ToolMeta {
            name: "multiply".into(),
            description: "Multiply two numbers.".into(),
            args_schema: pair_schema(),
        },
        multiply_json,
    );
    register_tool(
        ToolMeta {
            name: "divide".into(),
            description: "Divide a by b. Fails on a zero divisor.".into(),
            args_schema: pair_schema(),
        },
        divide_json,
    );
    register_tool(
        ToolMeta {
            name: "power".into(),
            description: "Raise base to the power of exponent.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "base": { "type": "number", "description": "Base." },
                    "exponent": { "type": "number", "description": "Exponent." }
                },
                "required": ["base", "exponent"],
                "additionalProperties": false
            }),
        },
        power_json,
    );
    register_tool(
        ToolMeta {
            name: "sqrt".into(),
            description: "Square root. Fails on negative input.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "x": { "type": "number", "description": "Radicand, must be >= 0." }
                },
                "required": ["x"],
                "additionalProperties": false
            }),
        },
        sqrt_json,
    );
    register_tool(
        ToolMeta {
            name: "solve_linear".into(),
            description: "Solve the linear equation a*x + b = c for x. Fails when a is zero.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "a": { "type": "number", "description": "Coefficient of x, must be non-zero." },
                    "b": { "type": "number", "description": "Constant on the left-hand side." },
                    "c": { "type": "number", "description": "Right-hand side." }
                },
                "required": ["a", "b", "c"],
                "additionalProperties": false
            }),
        },
        solve_linear_json,
    );
}
