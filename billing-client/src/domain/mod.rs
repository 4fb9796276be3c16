pub mod customer;
pub mod invoice;
pub mod meter;
pub mod reading;

pub use customer::{Customer, NewCustomer};
pub use invoice::{Invoice, NewInvoice};
pub use meter::Meter;
pub use reading::{NewReading, Reading};
