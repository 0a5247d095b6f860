//! Employee rows.

use sqlx::SqlitePool;
use tracing::info;

use super::unix_now;
use crate::error::DbResult;
use shopfront_core::{Employee, EmployeeShop, EmployeeType, Money};

const EMPLOYEE_COLUMNS: &str = "id, name, employee_type, shop, base_salary, daily_rate,
    qualifications, start_date, is_active";

/// Input for [`EmployeeRepository::create`]. Pay fields are already
/// validated against the employee type.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub employee_type: EmployeeType,
    pub shop: EmployeeShop,
    pub base_salary: Option<Money>,
    pub daily_rate: Option<Money>,
    pub qualifications: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Inserts an active employee starting today.
    pub async fn create(&self, new: &NewEmployee) -> DbResult<Employee> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "INSERT INTO employees
                (name, employee_type, shop, base_salary, daily_rate, qualifications, start_date, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1)
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(new.employee_type)
        .bind(new.shop)
        .bind(new.base_salary)
        .bind(new.daily_rate)
        .bind(&new.qualifications)
        .bind(unix_now())
        .fetch_one(&self.pool)
        .await?;

        info!(employee_id = employee.id, name = %employee.name, "Employee created");
        Ok(employee)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Active employees sorted by name.
    pub async fn list_active(&self) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE is_active = 1 ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::memory_db;

    #[tokio::test]
    async fn test_create_and_list() {
        let db = memory_db().await;
        let created = db
            .employees()
            .create(&NewEmployee {
                name: "Tendai".to_string(),
                employee_type: EmployeeType::Runner,
                shop: EmployeeShop::Both,
                base_salary: None,
                daily_rate: Some(Money::from_cents(1500)),
                qualifications: None,
            })
            .await
            .unwrap();

        assert!(created.is_active);
        assert_eq!(created.daily_rate, Some(Money::from_cents(1500)));
        assert_eq!(created.base_salary, None);

        let active = db.employees().list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].employee_type, EmployeeType::Runner);

        sqlx::query("UPDATE employees SET is_active = 0 WHERE id = ?1")
            .bind(created.id)
            .execute(db.pool())
            .await
            .unwrap();
        assert!(db.employees().list_active().await.unwrap().is_empty());
        assert!(db.employees().get(created.id).await.unwrap().is_some());
    }
}
