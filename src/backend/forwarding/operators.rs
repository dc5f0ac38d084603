//! `std::ops` sugar for the forwarding wrapper.
//!
//! `deferred ⊕ x` records the forward capability; `x ⊕ deferred` (for
//! `Value`, `i64` and `f64` on the left) records the reflected one. Both keep
//! the pending call as the first argument.
//!
//! `/` is true division and `%` takes the sign of the divisor, matching the
//! `Div` and `Rem` capabilities; use `Deferred::floor_div` for integer
//! division.

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};

use super::Deferred;
use crate::backend::grounded::Capability;
use crate::backend::models::Value;

macro_rules! forward_binary {
    ($trait:ident, $method:ident, $forward:ident, $reflected:ident, [$($lhs:ty),*]) => {
        impl<R: Into<Value>> $trait<R> for Deferred {
            type Output = Deferred;

            fn $method(self, rhs: R) -> Deferred {
                self.forward_with(Capability::$forward, vec![rhs.into()])
            }
        }

        impl $trait<Deferred> for Value {
            type Output = Deferred;

            fn $method(self, rhs: Deferred) -> Deferred {
                rhs.forward_with(Capability::$reflected, vec![self])
            }
        }

        $(
            impl $trait<Deferred> for $lhs {
                type Output = Deferred;

                fn $method(self, rhs: Deferred) -> Deferred {
                    rhs.forward_with(Capability::$reflected, vec![Value::from(self)])
                }
            }
        )*
    };
}

forward_binary!(Add, add, Add, RAdd, [i64, f64]);
forward_binary!(Sub, sub, Sub, RSub, [i64, f64]);
forward_binary!(Mul, mul, Mul, RMul, [i64, f64]);
forward_binary!(Div, div, Div, RDiv, [i64, f64]);
forward_binary!(Rem, rem, Rem, RRem, [i64, f64]);
forward_binary!(BitAnd, bitand, BitAnd, RBitAnd, [i64, bool]);
forward_binary!(BitOr, bitor, BitOr, RBitOr, [i64, bool]);
forward_binary!(BitXor, bitxor, BitXor, RBitXor, [i64, bool]);
forward_binary!(Shl, shl, Shl, RShl, [i64]);
forward_binary!(Shr, shr, Shr, RShr, [i64]);

impl Neg for Deferred {
    type Output = Deferred;

    fn neg(self) -> Deferred {
        self.forward_with(Capability::Neg, vec![])
    }
}

/// `!deferred` is the bitwise complement on integers and logical negation
/// on booleans, like `!` on the concrete types
impl Not for Deferred {
    type Output = Deferred;

    fn not(self) -> Deferred {
        self.forward_with(Capability::Invert, vec![])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::models::{Args, DeferredCall, Operation};

    fn pending() -> Deferred {
        let call = DeferredCall::new(
            Operation::Capability(Capability::Abs),
            Args::from_positional(vec![Value::Long(-4)]),
        );
        Deferred::new(call, Arc::new(Capability::Abs.metadata()))
    }

    fn target_of(deferred: &Deferred) -> &Operation {
        deferred.call().target()
    }

    #[test]
    fn test_forward_and_reflected_targets() {
        assert_eq!(target_of(&(pending() + 1)), &Operation::Capability(Capability::Add));
        assert_eq!(target_of(&(1i64 + pending())), &Operation::Capability(Capability::RAdd));
        assert_eq!(target_of(&(2.0f64 * pending())), &Operation::Capability(Capability::RMul));
        assert_eq!(
            target_of(&(Value::from(vec![1]) + pending())),
            &Operation::Capability(Capability::RAdd)
        );
        assert_eq!(target_of(&(1i64 << pending())), &Operation::Capability(Capability::RShl));
        assert_eq!(target_of(&-pending()), &Operation::Capability(Capability::Neg));
        assert_eq!(target_of(&!pending()), &Operation::Capability(Capability::Invert));
    }

    #[test]
    fn test_reflected_keeps_pending_value_first() {
        let forwarded = 10i64 - pending();
        let args = forwarded.call().args().positional();
        assert!(args[0].is_deferred());
        assert_eq!(args[1], Value::Long(10));
    }

    #[test]
    fn test_two_pending_operands() {
        let forwarded = pending() + pending();
        let args = forwarded.call().args().positional();
        assert!(args[0].is_deferred());
        assert!(args[1].is_deferred());
    }
}
