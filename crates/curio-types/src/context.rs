//! Explicit call context.
//!
//! Every state-changing operation receives a [`CallContext`] naming the
//! caller, the native-currency value attached to the call, and the current
//! time. Nothing in the engine reads ambient global state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Address;

/// Who is calling, with how much attached value, at what time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Address,
    /// Native currency attached to this call (listing/execution tip).
    pub value: Decimal,
    pub now: DateTime<Utc>,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: Address, value: Decimal, now: DateTime<Utc>) -> Self {
        Self { caller, value, now }
    }

    /// A zero-value call at the current wall-clock time.
    #[must_use]
    pub fn from_caller(caller: Address) -> Self {
        Self {
            caller,
            value: Decimal::ZERO,
            now: Utc::now(),
        }
    }

    /// Same caller and time, different attached value.
    #[must_use]
    pub fn with_value(self, value: Decimal) -> Self {
        Self { value, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_caller_has_zero_value() {
        let ctx = CallContext::from_caller(Address::dummy(1));
        assert_eq!(ctx.value, Decimal::ZERO);
        assert_eq!(ctx.caller, Address::dummy(1));
    }

    #[test]
    fn with_value_replaces_only_value() {
        let ctx = CallContext::from_caller(Address::dummy(1)).with_value(Decimal::TEN);
        assert_eq!(ctx.value, Decimal::TEN);
        assert_eq!(ctx.caller, Address::dummy(1));
    }
}
