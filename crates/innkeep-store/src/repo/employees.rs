//! Employees

use innkeep_core::model::{Employee, EmployeeFilter, EmployeeStatus};
use rusqlite::{params, Connection, Row};

use super::rows::{count, enum_col, execute_one, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const EMPLOYEE_COLUMNS: &str = "id, employee_number, first_name, last_name, email, phone, \
     department, position, hire_date, pay_type, base_salary_cents, hourly_rate_cents, \
     annual_leave_days, status, terminated_on, created_at, updated_at";

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        employee_number: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        department: enum_col(row, 6)?,
        position: row.get(7)?,
        hire_date: row.get(8)?,
        pay_type: enum_col(row, 9)?,
        base_salary_cents: row.get(10)?,
        hourly_rate_cents: row.get(11)?,
        annual_leave_days: row.get(12)?,
        status: enum_col(row, 13)?,
        terminated_on: row.get(14)?,
        created_at: ts(row.get(15)?),
        updated_at: ts(row.get(16)?),
    })
}

impl SqliteRepo {
    pub fn insert_employee(conn: &Connection, e: &Employee) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO employees ({}) VALUES
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                EMPLOYEE_COLUMNS
            ),
            params![
                e.id,
                e.employee_number,
                e.first_name,
                e.last_name,
                e.email,
                e.phone,
                e.department.as_str(),
                e.position,
                e.hire_date,
                e.pay_type.as_str(),
                e.base_salary_cents,
                e.hourly_rate_cents,
                e.annual_leave_days,
                e.status.as_str(),
                e.terminated_on,
                e.created_at.timestamp(),
                e.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_employee(conn: &Connection, e: &Employee) -> Result<()> {
        execute_one(
            conn,
            "UPDATE employees SET first_name = ?2, last_name = ?3, email = ?4, phone = ?5,
                department = ?6, position = ?7, pay_type = ?8, base_salary_cents = ?9,
                hourly_rate_cents = ?10, annual_leave_days = ?11, status = ?12,
                terminated_on = ?13, updated_at = ?14
             WHERE id = ?1",
            params![
                e.id,
                e.first_name,
                e.last_name,
                e.email,
                e.phone,
                e.department.as_str(),
                e.position,
                e.pay_type.as_str(),
                e.base_salary_cents,
                e.hourly_rate_cents,
                e.annual_leave_days,
                e.status.as_str(),
                e.terminated_on,
                e.updated_at.timestamp(),
            ],
            "employee",
            &e.id,
        )
    }

    pub fn get_employee(conn: &Connection, id: &str) -> Result<Option<Employee>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM employees WHERE id = ?1", EMPLOYEE_COLUMNS),
            [id],
            employee_from_row,
        )
    }

    pub fn require_employee(conn: &Connection, id: &str) -> Result<Employee> {
        Self::get_employee(conn, id)?.ok_or_else(|| not_found("employee", id))
    }

    pub fn list_employees(conn: &Connection, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM employees
                 WHERE (?1 IS NULL OR department = ?1) AND (?2 IS NULL OR status = ?2)
                 ORDER BY employee_number",
                EMPLOYEE_COLUMNS
            ),
            params![
                filter.department.map(|d| d.as_str()),
                filter.status.map(|s| s.as_str()),
            ],
            employee_from_row,
        )
    }

    pub fn count_employees_with_status(conn: &Connection, status: EmployeeStatus) -> Result<i64> {
        count(
            conn,
            "SELECT COUNT(*) FROM employees WHERE status = ?1",
            [status.as_str()],
        )
    }
}
