use chrono::NaiveDate;
use innkeep_core::model::{
    employee_number, new_id, Employee, EmployeeFilter, EmployeePatch, NewEmployee,
};
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use super::insert_with_fresh_reference;
use crate::Result;

pub fn employee_create(conn: &Connection, input: NewEmployee) -> Result<Employee> {
    logged!("employee_create", {
        let mut employee = Employee::create(new_id(), employee_number(), input)?;
        insert_with_fresh_reference(
            &mut employee,
            |e| e.employee_number = employee_number(),
            |e| SqliteRepo::insert_employee(conn, e),
        )?;
        Ok(employee)
    })
}

pub fn employee_update(conn: &Connection, id: &str, patch: EmployeePatch) -> Result<Employee> {
    logged!("employee_update", employee_id = id; {
        let mut employee = SqliteRepo::require_employee(conn, id)?;
        employee.apply(patch)?;
        SqliteRepo::update_employee(conn, &employee)?;
        Ok(employee)
    })
}

pub fn employee_get(conn: &Connection, id: &str) -> Result<Employee> {
    logged!("employee_get", { SqliteRepo::require_employee(conn, id) })
}

pub fn employee_list(conn: &Connection, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
    logged!("employee_list", { SqliteRepo::list_employees(conn, filter) })
}

/// Records are kept; a terminated employee stops clocking in, requesting
/// leave and taking tasks, and is paid up to `on` inclusive.
pub fn employee_terminate(conn: &Connection, id: &str, on: NaiveDate) -> Result<Employee> {
    logged!("employee_terminate", employee_id = id; {
        let mut employee = SqliteRepo::require_employee(conn, id)?;
        employee.terminate(on)?;
        SqliteRepo::update_employee(conn, &employee)?;
        Ok(employee)
    })
}
