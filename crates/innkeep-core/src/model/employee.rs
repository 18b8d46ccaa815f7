use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{InnkeepError, Result};
use crate::rules::validation::{require_positive, require_status, require_text, validate_email};

string_enum! {
    pub enum Department {
        FrontOffice => "front_office",
        Housekeeping => "housekeeping",
        FoodBeverage => "food_beverage",
        Maintenance => "maintenance",
        Accounting => "accounting",
        Management => "management",
        Other => "other",
    }
}

string_enum! {
    pub enum PayType {
        Salaried => "salaried",
        Hourly => "hourly",
    }
}

string_enum! {
    pub enum EmployeeStatus {
        Active => "active",
        OnLeave => "on_leave",
        Terminated => "terminated",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Department,
    pub position: String,
    pub hire_date: NaiveDate,
    pub pay_type: PayType,
    /// Annual salary for salaried staff
    pub base_salary_cents: i64,
    pub hourly_rate_cents: i64,
    pub annual_leave_days: i64,
    pub status: EmployeeStatus,
    pub terminated_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Department,
    pub position: String,
    pub hire_date: NaiveDate,
    pub pay_type: PayType,
    #[serde(default)]
    pub base_salary_cents: i64,
    #[serde(default)]
    pub hourly_rate_cents: i64,
    #[serde(default = "default_leave_days")]
    pub annual_leave_days: i64,
}

fn default_leave_days() -> i64 {
    20
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<Department>,
    pub position: Option<String>,
    pub pay_type: Option<PayType>,
    pub base_salary_cents: Option<i64>,
    pub hourly_rate_cents: Option<i64>,
    pub annual_leave_days: Option<i64>,
    /// Only `active` and `on_leave`; termination has its own operation
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeFilter {
    pub department: Option<Department>,
    pub status: Option<EmployeeStatus>,
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_ascii_lowercase())
        .filter(|e| !e.is_empty())
}

impl Employee {
    pub fn create(id: String, employee_number: String, input: NewEmployee) -> Result<Self> {
        let now = Utc::now();
        let employee = Self {
            id,
            employee_number,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: normalize_email(input.email),
            phone: input.phone,
            department: input.department,
            position: input.position.trim().to_string(),
            hire_date: input.hire_date,
            pay_type: input.pay_type,
            base_salary_cents: input.base_salary_cents,
            hourly_rate_cents: input.hourly_rate_cents,
            annual_leave_days: input.annual_leave_days,
            status: EmployeeStatus::Active,
            terminated_on: None,
            created_at: now,
            updated_at: now,
        };
        employee.validate()?;
        Ok(employee)
    }

    pub fn validate(&self) -> Result<()> {
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)?;
        require_text("position", &self.position)?;
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        match self.pay_type {
            PayType::Salaried => require_positive("base_salary_cents", self.base_salary_cents)?,
            PayType::Hourly => require_positive("hourly_rate_cents", self.hourly_rate_cents)?,
        }
        if self.annual_leave_days < 0 {
            return Err(InnkeepError::invalid("annual_leave_days", "must not be negative"));
        }
        Ok(())
    }

    pub fn apply(&mut self, patch: EmployeePatch) -> Result<()> {
        if let Some(first) = patch.first_name {
            self.first_name = first.trim().to_string();
        }
        if let Some(last) = patch.last_name {
            self.last_name = last.trim().to_string();
        }
        if patch.email.is_some() {
            self.email = normalize_email(patch.email);
        }
        if patch.phone.is_some() {
            self.phone = patch.phone;
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(position) = patch.position {
            self.position = position.trim().to_string();
        }
        if let Some(pay_type) = patch.pay_type {
            self.pay_type = pay_type;
        }
        if let Some(salary) = patch.base_salary_cents {
            self.base_salary_cents = salary;
        }
        if let Some(rate) = patch.hourly_rate_cents {
            self.hourly_rate_cents = rate;
        }
        if let Some(days) = patch.annual_leave_days {
            self.annual_leave_days = days;
        }
        if let Some(status) = patch.status {
            if status == EmployeeStatus::Terminated {
                return Err(InnkeepError::invalid(
                    "status",
                    "use the terminate operation",
                ));
            }
            self.ensure_not_terminated("change status of")?;
            self.status = status;
        }
        self.updated_at = Utc::now();
        self.validate()
    }

    pub fn terminate(&mut self, on: NaiveDate) -> Result<()> {
        self.ensure_not_terminated("terminate")?;
        if on < self.hire_date {
            return Err(InnkeepError::invalid(
                "terminated_on",
                format!("{} is before hire date {}", on, self.hire_date),
            ));
        }
        self.status = EmployeeStatus::Terminated;
        self.terminated_on = Some(on);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn ensure_not_terminated(&self, action: &'static str) -> Result<()> {
        require_status(
            "employee",
            &self.id,
            self.status,
            &[EmployeeStatus::Active, EmployeeStatus::OnLeave],
            action,
        )
    }

    pub fn ensure_active(&self, action: &'static str) -> Result<()> {
        require_status(
            "employee",
            &self.id,
            self.status,
            &[EmployeeStatus::Active],
            action,
        )
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Days on the books inside `[from, to]`, both inclusive
    pub fn days_employed(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        let start = from.max(self.hire_date);
        let end = match self.terminated_on {
            Some(t) => to.min(t),
            None => to,
        };
        if end < start {
            0
        } else {
            (end - start).num_days() + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn input(pay_type: PayType) -> NewEmployee {
        NewEmployee {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: None,
            phone: None,
            department: Department::FrontOffice,
            position: "Receptionist".to_string(),
            hire_date: date(1, 15),
            pay_type,
            base_salary_cents: 3_650_000,
            hourly_rate_cents: 0,
            annual_leave_days: 20,
        }
    }

    #[test]
    fn test_hourly_needs_rate() {
        let result = Employee::create("e-1".to_string(), "EMP-000001".to_string(), input(PayType::Hourly));
        assert!(result.is_err());
        assert!(Employee::create("e-1".to_string(), "EMP-000001".to_string(), input(PayType::Salaried)).is_ok());
    }

    #[test]
    fn test_days_employed_clamps_to_hire_and_termination() {
        let mut e = Employee::create("e-1".to_string(), "EMP-000001".to_string(), input(PayType::Salaried)).unwrap();
        assert_eq!(e.days_employed(date(1, 1), date(1, 31)), 17);
        e.terminate(date(1, 20)).unwrap();
        assert_eq!(e.days_employed(date(1, 1), date(1, 31)), 6);
        assert_eq!(e.days_employed(date(2, 1), date(2, 28)), 0);
    }

    #[test]
    fn test_terminated_is_final() {
        let mut e = Employee::create("e-1".to_string(), "EMP-000001".to_string(), input(PayType::Salaried)).unwrap();
        e.terminate(date(2, 1)).unwrap();
        assert!(e.terminate(date(2, 2)).is_err());
        assert!(e.ensure_active("clock in").is_err());
        let patch = EmployeePatch {
            status: Some(EmployeeStatus::Active),
            ..Default::default()
        };
        assert!(e.apply(patch).is_err());
    }
}
