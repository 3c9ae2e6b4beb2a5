//! Salary derivation
//!
//! Salary is not stored as its own record. It is derived on demand from
//! the compensation fields on the employee profile:
//! `net = basic + sum(allowances) - sum(deductions)`.

use serde::{Deserialize, Serialize};

use super::money::{to_decimal, to_f64};
use crate::utils::time::month_name;

/// Currency for all monetary figures
pub const CURRENCY: &str = "INR";

/// Monthly allowance components of an employee's compensation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Allowances {
    pub hra: f64,
    pub transport: f64,
    pub medical: f64,
    pub other: f64,
}

/// Monthly deduction components of an employee's compensation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Deductions {
    pub tax: f64,
    pub provident_fund: f64,
    pub insurance: f64,
    pub other: f64,
}

/// Partial update for [`Allowances`]. Absent components keep their stored
/// value; unknown keys are rejected at deserialization.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AllowancesPatch {
    pub hra: Option<f64>,
    pub transport: Option<f64>,
    pub medical: Option<f64>,
    pub other: Option<f64>,
}

impl AllowancesPatch {
    pub fn apply(&self, target: &mut Allowances) {
        if let Some(hra) = self.hra {
            target.hra = hra;
        }
        if let Some(transport) = self.transport {
            target.transport = transport;
        }
        if let Some(medical) = self.medical {
            target.medical = medical;
        }
        if let Some(other) = self.other {
            target.other = other;
        }
    }
}

/// Partial update for [`Deductions`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeductionsPatch {
    pub tax: Option<f64>,
    pub provident_fund: Option<f64>,
    pub insurance: Option<f64>,
    pub other: Option<f64>,
}

impl DeductionsPatch {
    pub fn apply(&self, target: &mut Deductions) {
        if let Some(tax) = self.tax {
            target.tax = tax;
        }
        if let Some(provident_fund) = self.provident_fund {
            target.provident_fund = provident_fund;
        }
        if let Some(insurance) = self.insurance {
            target.insurance = insurance;
        }
        if let Some(other) = self.other {
            target.other = other;
        }
    }
}

/// Totals derived from one employee's compensation fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryTotals {
    pub total_allowances: f64,
    pub total_deductions: f64,
    pub gross_salary: f64,
    pub net_salary: f64,
}

/// One synthesized month of salary history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySalary {
    pub month: String,
    pub year: i32,
    pub basic_salary: f64,
    pub total_allowances: f64,
    pub total_deductions: f64,
    pub gross_salary: f64,
    pub net_salary: f64,
    pub currency: String,
}

/// Derive the salary totals for one employee
pub fn derive(basic_salary: f64, allowances: &Allowances, deductions: &Deductions) -> SalaryTotals {
    let basic = to_decimal(basic_salary);
    let total_allowances = to_decimal(allowances.hra)
        + to_decimal(allowances.transport)
        + to_decimal(allowances.medical)
        + to_decimal(allowances.other);
    let total_deductions = to_decimal(deductions.tax)
        + to_decimal(deductions.provident_fund)
        + to_decimal(deductions.insurance)
        + to_decimal(deductions.other);
    let gross = basic + total_allowances;
    let net = gross - total_deductions;

    SalaryTotals {
        total_allowances: to_f64(total_allowances),
        total_deductions: to_f64(total_deductions),
        gross_salary: to_f64(gross),
        net_salary: to_f64(net),
    }
}

/// Synthesize a twelve month history for a year from the current
/// compensation. There is no per-month salary store, so every month
/// carries the same figures.
pub fn monthly_history(
    year: i32,
    basic_salary: f64,
    allowances: &Allowances,
    deductions: &Deductions,
) -> Vec<MonthlySalary> {
    let totals = derive(basic_salary, allowances, deductions);
    (1..=12)
        .map(|month| MonthlySalary {
            month: month_name(month).to_string(),
            year,
            basic_salary,
            total_allowances: totals.total_allowances,
            total_deductions: totals.total_deductions,
            gross_salary: totals.gross_salary,
            net_salary: totals.net_salary,
            currency: CURRENCY.to_string(),
        })
        .collect()
}
