//! Parameter classification predicates.
//!
//! Numeric parameters split into exactly one of bool/int/float. The
//! precedence is bool over int over float, which keeps the mapping total and
//! non-overlapping regardless of how the descriptor combines `steps`,
//! `enumValues` and `isEnum`.

use crate::descriptor::ParameterDesc;

/// A parameter is boolean iff it has exactly two steps and its enumerated
/// values are exactly {0.0, 1.0}.
pub fn is_bool_param(p: &ParameterDesc) -> bool {
    if p.steps != 2 {
        return false;
    }
    match &p.enum_values {
        Some(values) if values.len() == 2 => {
            let a = values[0].as_f64();
            let b = values[1].as_f64();
            a == Some(0.0) && b == Some(1.0)
        }
        _ => false,
    }
}

/// A parameter is an integer iff it is enum-shaped and not boolean.
pub fn is_int_param(p: &ParameterDesc) -> bool {
    !is_bool_param(p) && p.is_enum
}

/// Everything numeric that is neither boolean nor integer is a float.
pub fn is_float_param(p: &ParameterDesc) -> bool {
    !(is_bool_param(p) || is_int_param(p))
}

/// Explicit `meta.in` wins; parameters are inputs by default.
pub fn is_input_param(p: &ParameterDesc) -> bool {
    p.meta
        .as_ref()
        .and_then(|m| m.input)
        .unwrap_or(true)
}

/// Explicit `meta.out` wins; parameters are not outputs by default.
pub fn is_output_param(p: &ParameterDesc) -> bool {
    p.meta
        .as_ref()
        .and_then(|m| m.output)
        .unwrap_or(false)
}
