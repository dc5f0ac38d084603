//! Grounded capability operations.
//!
//! This module enumerates every capability the forwarding wrapper knows about
//! and provides the concrete semantics of the forwardable ones. When a
//! forwarded expression such as `n * factorial.defer(n - 1)` is finally
//! resolved, the trampoline invokes `apply` with the resolved left-hand value
//! and the recorded operands.
//!
//! # Key Concepts
//!
//! - **Closed set**: there is no open-ended interception; anything outside
//!   `Capability` cannot be expressed on an unresolved value
//! - **Natural order**: the intercepted value is always the first argument.
//!   Reflected variants (`RAdd`, `RSub`, ...) record `other ⊕ value` as
//!   `(value, other)` and swap back when applied
//! - **Lifecycle hooks**: construction, destruction, attribute storage,
//!   descriptor and subclass hooks, and rendering are listed so they can be
//!   named and rejected, but they are never forwarded
//!
//! # Example
//!
//! ```ignore
//! // 5 * <unresolved factorial(4)>
//! // is recorded as (rmul <factorial(4)> 5) and, once factorial(4) = 24,
//! // applied as 5 * 24 = 120
//! ```

mod arithmetic;
mod comparison;
mod container;
mod conversion;
mod logical;

use std::fmt;

use super::errors::{ExecError, TailError};
use super::forwarding::Metadata;
use super::models::{Args, Value};

pub(crate) use comparison::values_equal;

/// A capability that can be invoked on a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Rem,
    Pow,
    Neg,
    Pos,
    Abs,

    // Reflected arithmetic: `other op value`
    RAdd,
    RSub,
    RMul,
    RDiv,
    RFloorDiv,
    RRem,
    RPow,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Invert,
    RBitAnd,
    RBitOr,
    RBitXor,
    RShl,
    RShr,

    // Logical
    Not,

    // Comparison
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,

    // Containers
    GetItem,
    Len,
    Contains,
    Iterate,
    Reversed,

    // Attributes
    GetAttr,

    // Conversions
    ToBool,
    ToLong,
    ToFloat,

    // Lifecycle and identity hooks (never forwarded)
    Construct,
    Initialize,
    Destroy,
    AttributeLookup,
    AttributeStore,
    AttributeDelete,
    DescriptorGet,
    DescriptorSet,
    DescriptorDelete,
    SubclassInit,
    SetName,
    Prepare,
    Render,
}

impl Capability {
    pub fn name(self) -> &'static str {
        use Capability::*;
        match self {
            Add => "add",
            Sub => "sub",
            Mul => "mul",
            Div => "div",
            FloorDiv => "floordiv",
            Rem => "rem",
            Pow => "pow",
            Neg => "neg",
            Pos => "pos",
            Abs => "abs",
            RAdd => "radd",
            RSub => "rsub",
            RMul => "rmul",
            RDiv => "rdiv",
            RFloorDiv => "rfloordiv",
            RRem => "rrem",
            RPow => "rpow",
            BitAnd => "and",
            BitOr => "or",
            BitXor => "xor",
            Shl => "shl",
            Shr => "shr",
            Invert => "invert",
            RBitAnd => "rand",
            RBitOr => "ror",
            RBitXor => "rxor",
            RShl => "rshl",
            RShr => "rshr",
            Not => "not",
            Lt => "lt",
            Le => "le",
            Gt => "gt",
            Ge => "ge",
            Eq => "eq",
            Ne => "ne",
            GetItem => "getitem",
            Len => "len",
            Contains => "contains",
            Iterate => "iter",
            Reversed => "reversed",
            GetAttr => "getattr",
            ToBool => "bool",
            ToLong => "long",
            ToFloat => "float",
            Construct => "construct",
            Initialize => "initialize",
            Destroy => "destroy",
            AttributeLookup => "attribute_lookup",
            AttributeStore => "attribute_store",
            AttributeDelete => "attribute_delete",
            DescriptorGet => "descriptor_get",
            DescriptorSet => "descriptor_set",
            DescriptorDelete => "descriptor_delete",
            SubclassInit => "subclass_init",
            SetName => "set_name",
            Prepare => "prepare",
            Render => "render",
        }
    }

    /// Whether an unresolved value may forward this capability.
    ///
    /// Lifecycle and identity hooks would need the concrete object to exist
    /// (or would recurse through the wrapper itself), so they are refused.
    pub fn is_forwardable(self) -> bool {
        use Capability::*;
        !matches!(
            self,
            Construct
                | Initialize
                | Destroy
                | AttributeLookup
                | AttributeStore
                | AttributeDelete
                | DescriptorGet
                | DescriptorSet
                | DescriptorDelete
                | SubclassInit
                | SetName
                | Prepare
                | Render
        )
    }

    /// Number of arguments, including the intercepted value.
    /// `None` for capabilities with no concrete semantics here.
    pub fn arity(self) -> Option<usize> {
        use Capability::*;
        if !self.is_forwardable() {
            return None;
        }
        Some(match self {
            Neg | Pos | Abs | Invert | Not | Len | Iterate | Reversed | ToBool | ToLong
            | ToFloat => 1,
            _ => 2,
        })
    }

    /// The forward capability a reflected one mirrors.
    pub fn reflected_of(self) -> Option<Capability> {
        use Capability::*;
        Some(match self {
            RAdd => Add,
            RSub => Sub,
            RMul => Mul,
            RDiv => Div,
            RFloorDiv => FloorDiv,
            RRem => Rem,
            RPow => Pow,
            RBitAnd => BitAnd,
            RBitOr => BitOr,
            RBitXor => BitXor,
            RShl => Shl,
            RShr => Shr,
            _ => return None,
        })
    }

    /// One-line description used as the capability's doc metadata
    pub fn description(self) -> &'static str {
        use Capability::*;
        match self {
            Add | RAdd => "Addition, string and list concatenation",
            Sub | RSub => "Subtraction",
            Mul | RMul => "Multiplication, string and list repetition",
            Div | RDiv => "True division (always a float)",
            FloorDiv | RFloorDiv => "Division rounded toward negative infinity",
            Rem | RRem => "Remainder with the sign of the divisor",
            Pow | RPow => "Exponentiation",
            Neg => "Arithmetic negation",
            Pos => "Unary plus",
            Abs => "Absolute value",
            BitAnd | RBitAnd => "Bitwise and (logical and on booleans)",
            BitOr | RBitOr => "Bitwise or (logical or on booleans)",
            BitXor | RBitXor => "Bitwise xor (logical xor on booleans)",
            Shl | RShl => "Left shift",
            Shr | RShr => "Arithmetic right shift",
            Invert => "Bitwise complement (logical negation on booleans)",
            Not => "Logical negation of truthiness",
            Lt => "Less than",
            Le => "Less than or equal",
            Gt => "Greater than",
            Ge => "Greater than or equal",
            Eq => "Structural equality",
            Ne => "Structural inequality",
            GetItem => "Index a list or string, or look up a record field by key",
            Len => "Length of a list, string or record",
            Contains => "Membership test",
            Iterate => "Materialise the elements of an iterable as a list",
            Reversed => "Reverse a list or string",
            GetAttr => "Read a record field",
            ToBool => "Truthiness as a boolean",
            ToLong => "Convert to an integer",
            ToFloat => "Convert to a float",
            _ => "Lifecycle hook; not forwardable",
        }
    }

    /// Static metadata served by wrappers around this capability
    pub fn metadata(self) -> Metadata {
        let params = match self.arity() {
            Some(1) => vec!["value".to_string()],
            _ => vec!["value".to_string(), "other".to_string()],
        };
        Metadata::new(self.name())
            .with_qualified_name(format!("Capability::{:?}", self))
            .with_module(module_path!())
            .with_doc(self.description())
            .with_params(params)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply a capability to concrete, positional arguments.
pub fn apply(capability: Capability, args: &Args) -> Result<Value, TailError> {
    let Some(arity) = capability.arity() else {
        return Err(TailError::UnsupportedCapability { capability });
    };
    if !args.keywords().is_empty() {
        return Err(ExecError::IncorrectArgument(format!(
            "{} takes no keyword arguments",
            capability
        ))
        .into());
    }
    let values = args.positional();
    if values.len() != arity {
        return Err(ExecError::IncorrectArgument(format!(
            "{} requires {} argument{}, got {}",
            capability,
            arity,
            if arity == 1 { "" } else { "s" },
            values.len()
        ))
        .into());
    }

    if let Some(forward) = capability.reflected_of() {
        return Ok(apply_binary(forward, &values[1], &values[0])?);
    }
    if arity == 1 {
        Ok(apply_unary(capability, &values[0])?)
    } else {
        Ok(apply_binary(capability, &values[0], &values[1])?)
    }
}

fn apply_unary(capability: Capability, value: &Value) -> Result<Value, ExecError> {
    use Capability::*;
    match capability {
        Neg => arithmetic::neg(value),
        Pos => arithmetic::pos(value),
        Abs => arithmetic::abs(value),
        Invert => logical::invert(value),
        Not => logical::not(value),
        Len => container::len(value),
        Iterate => container::iterate(value),
        Reversed => container::reversed(value),
        ToBool => conversion::to_bool(value),
        ToLong => conversion::to_long(value),
        ToFloat => conversion::to_float(value),
        other => Err(ExecError::IncorrectArgument(format!(
            "{} is not a unary capability",
            other
        ))),
    }
}

fn apply_binary(capability: Capability, left: &Value, right: &Value) -> Result<Value, ExecError> {
    use Capability::*;
    match capability {
        Add => arithmetic::add(left, right),
        Sub => arithmetic::sub(left, right),
        Mul => arithmetic::mul(left, right),
        Div => arithmetic::div(left, right),
        FloorDiv => arithmetic::floor_div(left, right),
        Rem => arithmetic::rem(left, right),
        Pow => arithmetic::pow(left, right),
        BitAnd => logical::bit_and(left, right),
        BitOr => logical::bit_or(left, right),
        BitXor => logical::bit_xor(left, right),
        Shl => logical::shl(left, right),
        Shr => logical::shr(left, right),
        Lt | Le | Gt | Ge => comparison::compare(capability, left, right),
        Eq => Ok(Value::Bool(values_equal(left, right))),
        Ne => Ok(Value::Bool(!values_equal(left, right))),
        GetItem => container::get_item(left, right),
        Contains => container::contains(left, right),
        GetAttr => container::get_attr(left, right),
        other => Err(ExecError::IncorrectArgument(format!(
            "{} is not a binary capability",
            other
        ))),
    }
}

/// Error for operand pairs an operator does not support
fn type_mismatch(op: &'static str, left: &Value, right: &Value) -> ExecError {
    ExecError::TypeMismatch {
        op,
        left: left.type_name(),
        right: right.type_name(),
    }
}

/// Error for a unary operator applied to an unsupported operand
fn bad_operand(op: &str, value: &Value) -> ExecError {
    ExecError::IncorrectArgument(format!(
        "bad operand type for {}: {}",
        op,
        value.type_name()
    ))
}
