//! Pure business rules
//!
//! Every derived figure (working hours, salary totals, leave balances) is
//! computed in exactly one place here, so each handler that needs it gets
//! the same answer.

pub mod attendance;
pub mod leave;
pub mod money;
pub mod salary;
