//! `hr.employee` records
//!
//! Maps Odoo's loosely typed read results (`[id, label]` pairs for many2one
//! fields, `false` for empty values) onto [`Employee`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use super::client::{OdooClient, OdooError};

pub const EMPLOYEE_MODEL: &str = "hr.employee";

/// Fields requested on every read
pub const EMPLOYEE_FIELDS: &[&str] = &[
    "id",
    "identification_id",
    "name",
    "country_id",
    "work_email",
    "private_email",
    "work_phone",
    "private_phone",
    "private_street",
    "private_city",
    "private_state_id",
    "hr_commune",
    "image_1920",
    "birthday",
    "gender",
];

/// Country reference resolved from `country_id`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Country {
    pub id: i64,
    /// `read` only returns the display name, so this stays empty.
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commune {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
}

/// An `hr.employee` record with parsed convenience fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Employee {
    pub id: i64,
    pub identification_id: String,
    pub name: String,
    pub first_name: String,
    pub surname: String,
    pub second_surname: String,
    pub country_id: Option<(i64, String)>,
    pub nationality: Option<Country>,
    pub work_email: String,
    pub private_email: String,
    pub work_phone: String,
    pub private_phone: String,
    pub private_street: String,
    pub private_city: String,
    pub private_state_id: Option<(i64, String)>,
    pub private_address: Option<Address>,
    pub hr_commune: Option<(i64, String)>,
    pub commune: Option<Commune>,
    pub image_1920: Option<String>,
    pub photo_url: String,
    pub birthday: Option<String>,
    pub birthday_parsed: Option<DateTime<Utc>>,
    pub gender: String,
}

impl Employee {
    /// Build an employee from one record of a `read`/`search_read` result.
    pub fn from_record(data: &Map<String, Value>) -> Self {
        let id = data.get("id").and_then(Value::as_i64).unwrap_or(0);
        let name = string_field(data, "name");

        let mut parts = name.split(' ');
        let first_name = parts.next().unwrap_or_default().to_string();
        let surname = parts.next().unwrap_or_default().to_string();
        let second_surname = parts.next().unwrap_or_default().to_string();

        let country_id = many2one(data, "country_id");
        let nationality = country_id.as_ref().map(|(id, name)| Country {
            id: *id,
            code: String::new(),
            name: name.clone(),
        });

        let private_street = string_field(data, "private_street");
        let private_city = string_field(data, "private_city");
        let private_state_id = many2one(data, "private_state_id");
        let private_address = (!private_street.is_empty()).then(|| Address {
            street: private_street.clone(),
            city: private_city.clone(),
            state: private_state_id
                .as_ref()
                .map(|(_, label)| label.clone())
                .unwrap_or_default(),
        });

        let hr_commune = many2one(data, "hr_commune");
        let commune = hr_commune.as_ref().map(|(id, name)| Commune {
            id: *id,
            name: name.clone(),
        });

        let image_1920 = optional_string(data, "image_1920");
        let photo_url = if image_1920.is_some() {
            photo_url(id)
        } else {
            String::new()
        };

        let birthday = optional_string(data, "birthday");
        let birthday_parsed = birthday.as_deref().and_then(parse_date);

        Self {
            id,
            identification_id: string_field(data, "identification_id"),
            name,
            first_name,
            surname,
            second_surname,
            country_id,
            nationality,
            work_email: string_field(data, "work_email"),
            private_email: string_field(data, "private_email"),
            work_phone: string_field(data, "work_phone"),
            private_phone: string_field(data, "private_phone"),
            private_street,
            private_city,
            private_state_id,
            private_address,
            hr_commune,
            commune,
            image_1920,
            photo_url,
            birthday,
            birthday_parsed,
            gender: string_field(data, "gender"),
        }
    }
}

/// Relative Odoo URL serving the employee's image
pub fn photo_url(id: i64) -> String {
    format!("/web/image?model={}&id={}&field=image_1920", EMPLOYEE_MODEL, id)
}

/// String value, or empty for `false`/missing/non-string
fn string_field(data: &Map<String, Value>, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn optional_string(data: &Map<String, Value>, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Many2one values come back as `[id, display_name]` or `false`.
fn many2one(data: &Map<String, Value>, key: &str) -> Option<(i64, String)> {
    match data.get(key)?.as_array()?.as_slice() {
        [id, label] => Some((id.as_i64()?, label.as_str()?.to_string())),
        _ => None,
    }
}

/// Odoo dates are `YYYY-MM-DD`; interpreted as UTC midnight.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
}

/// Paging options for [`EmployeeService::list`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListQuery {
    fn to_kwargs(self) -> Value {
        let mut kwargs = Map::new();
        kwargs.insert("fields".to_string(), json!(EMPLOYEE_FIELDS));
        if let Some(limit) = self.limit {
            kwargs.insert("limit".to_string(), json!(limit));
        }
        if let Some(offset) = self.offset {
            kwargs.insert("offset".to_string(), json!(offset));
        }
        Value::Object(kwargs)
    }
}

/// Employee operations on top of an authenticated [`OdooClient`]
#[derive(Debug, Clone)]
pub struct EmployeeService {
    client: Arc<OdooClient>,
}

impl EmployeeService {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }

    /// Fetch all employees with `search_read` and an empty domain.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Employee>, OdooError> {
        tracing::info!("Fetching employees from Odoo");

        let result = self
            .client
            .execute_kw(EMPLOYEE_MODEL, "search_read", json!([[]]), query.to_kwargs())
            .await?;

        let Value::Array(records) = result else {
            return Err(OdooError::InvalidResponse(
                "search_read did not return a list".to_string(),
            ));
        };

        let employees: Vec<Employee> = records
            .iter()
            .filter_map(Value::as_object)
            .map(Employee::from_record)
            .collect();

        tracing::info!("Fetched {} employees", employees.len());
        Ok(employees)
    }

    /// Fetch one employee with `read`.
    pub async fn get(&self, id: i64) -> Result<Employee, OdooError> {
        tracing::info!("Fetching employee {}", id);

        let result = self
            .client
            .execute_kw(
                EMPLOYEE_MODEL,
                "read",
                json!([[id]]),
                json!({ "fields": EMPLOYEE_FIELDS }),
            )
            .await?;

        let record = match result.as_array().and_then(|records| records.first()) {
            Some(record) => record,
            None => return Err(OdooError::NotFound(id)),
        };
        let data = record
            .as_object()
            .ok_or_else(|| OdooError::InvalidResponse("read returned a non-object record".to_string()))?;

        let employee = Employee::from_record(data);
        tracing::info!("Found employee {}", employee.name);
        Ok(employee)
    }
}
