use serde::{Deserialize, Serialize};

/// An account holder that owns meters and receives invoices.
///
/// `default_meter_id`, when set, points at the meter uploads are attributed
/// to if the upload does not name one. It must reference a meter owned by
/// this customer (enforced at resolution time, inside the batch transaction).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub email: String,
    pub default_meter_id: Option<i64>,
}

/// Input for registering a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub address: String,
    pub email: String,
}
