//! Pure calculations over loaded models
//!
//! Nothing here touches storage; the engine loads inputs, calls in, and
//! persists what comes back.

pub mod budget_ops;
pub mod leave_ops;
pub mod payroll_ops;
pub mod performance_ops;
pub mod stay_ops;
pub mod tax_ops;

pub use budget_ops::BudgetVariance;
pub use leave_ops::LeaveBalance;
pub use payroll_ops::{AttendanceSummary, PayComputation};
pub use performance_ops::PerformanceSummary;
pub use tax_ops::{TaxBreakdown, TaxLine};
