//! Staff registry.
//!
//! Full-time staff are paid a monthly base salary within fixed bounds,
//! runners a daily rate.

use serde::{Deserialize, Serialize};

use shopfront_core::validation::{optional, parse_money, required, validate_base_salary, ValidationResult};
use shopfront_core::{Employee, EmployeeShop, EmployeeType, Money, ValidationError};
use shopfront_db::{Database, NewEmployee};

use super::rejected;
use crate::error::{ActionResult, ApiError};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    pub name: Option<String>,
    /// `full-time` or `runner`
    pub employee_type: Option<String>,
    /// `grocery`, `hardware` or `both`
    pub shop: Option<String>,
    /// Whole units, full-time only
    pub base_salary: Option<String>,
    /// Runners only
    pub daily_rate: Option<String>,
    pub qualifications: Option<String>,
}

/// Presence and enum checks.
fn basics(form: &EmployeeForm) -> ValidationResult<(String, EmployeeType, EmployeeShop)> {
    let name = required("name", form.name.as_deref())?;
    let employee_type = required("employeeType", form.employee_type.as_deref())?.parse()?;
    let shop = required("shop", form.shop.as_deref())?.parse()?;
    Ok((name, employee_type, shop))
}

fn base_salary(form: &EmployeeForm) -> ValidationResult<Money> {
    let salary = parse_money("baseSalary", &required("baseSalary", form.base_salary.as_deref())?)?;
    if salary.cents_part() != 0 {
        return Err(ValidationError::InvalidFormat {
            field: "baseSalary".to_string(),
            reason: "must be a whole amount".to_string(),
        });
    }
    validate_base_salary(salary)?;
    Ok(salary)
}

fn daily_rate(form: &EmployeeForm) -> ValidationResult<Money> {
    let rate = parse_money("dailyRate", &required("dailyRate", form.daily_rate.as_deref())?)?;
    if !rate.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "dailyRate".to_string(),
        });
    }
    Ok(rate)
}

/// Active staff split by pay scheme.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub full_time: Vec<Employee>,
    pub runners: Vec<Employee>,
}

#[derive(Debug, Clone)]
pub struct EmployeeService {
    db: Database,
}

impl EmployeeService {
    pub fn new(db: Database) -> Self {
        EmployeeService { db }
    }

    pub async fn create(&self, form: &EmployeeForm) -> Result<Employee, ApiError> {
        let (name, employee_type, shop) =
            basics(form).map_err(rejected("All required fields must be filled"))?;

        let (base_salary, daily_rate) = match employee_type {
            EmployeeType::FullTime => (Some(base_salary(form)?), None),
            EmployeeType::Runner => (
                None,
                Some(daily_rate(form).map_err(rejected("Valid daily rate required"))?),
            ),
        };

        let employee = self
            .db
            .employees()
            .create(&NewEmployee {
                name,
                employee_type,
                shop,
                base_salary,
                daily_rate,
                qualifications: optional(form.qualifications.as_deref()),
            })
            .await?;
        Ok(employee)
    }

    pub async fn submit(&self, form: &EmployeeForm) -> ActionResult {
        ActionResult::from_result(self.create(form).await, |_| {
            "Employee added successfully!".to_string()
        })
    }

    pub async fn roster(&self) -> Result<Roster, ApiError> {
        let (full_time, runners) = self
            .db
            .employees()
            .list_active()
            .await?
            .into_iter()
            .partition(|e| e.employee_type == EmployeeType::FullTime);
        Ok(Roster { full_time, runners })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_time(salary: &str) -> EmployeeForm {
        EmployeeForm {
            name: Some("Tariro".into()),
            employee_type: Some("full-time".into()),
            shop: Some("both".into()),
            base_salary: Some(salary.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_salary_bounds_inclusive() {
        assert!(base_salary(&full_time("200")).is_ok());
        assert!(base_salary(&full_time("900")).is_ok());
        assert!(base_salary(&full_time("199")).is_err());
        assert!(base_salary(&full_time("901")).is_err());
        assert!(base_salary(&full_time("450.50")).is_err());
    }

    #[test]
    fn test_salary_message() {
        let err = base_salary(&full_time("1000")).unwrap_err();
        assert_eq!(err.to_string(), "Base salary (USD) must be between 200 and 900");
    }

    #[test]
    fn test_daily_rate() {
        let runner = EmployeeForm {
            daily_rate: Some("12.50".into()),
            ..Default::default()
        };
        assert_eq!(daily_rate(&runner).unwrap().cents(), 1250);

        let runner = EmployeeForm {
            daily_rate: Some("0".into()),
            ..Default::default()
        };
        assert!(daily_rate(&runner).is_err());
    }

    #[test]
    fn test_basics_require_known_values() {
        let mut form = full_time("300");
        assert!(basics(&form).is_ok());
        form.shop = Some("pharmacy".into());
        assert!(basics(&form).is_err());
    }
}
