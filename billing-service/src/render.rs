use billing_client::domain::Invoice;

use crate::{error::BillingError, invoice::InvoiceSummary, numeric};

/// Renders a computed invoice into document bytes.
///
/// Implementations must be pure: identical input yields identical bytes.
/// Failures surface as `RenderFailure`; the invoice row has already been
/// persisted by the time rendering runs, so the caller can retry later.
pub trait InvoiceRenderer: Send + Sync {
    fn render(&self, invoice: &Invoice, summary: &InvoiceSummary) -> Result<Vec<u8>, BillingError>;

    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &'static str;
}

/// The built-in renderer: a self-contained HTML document with one row per
/// meter and the grand totals. Amounts use the `,` decimal separator that
/// the upstream datasets use.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl InvoiceRenderer for HtmlRenderer {
    fn render(&self, invoice: &Invoice, summary: &InvoiceSummary) -> Result<Vec<u8>, BillingError> {
        let mut rows = String::new();
        for m in &summary.meters {
            let label = m.serial_number.clone().unwrap_or_else(|| format!("#{}", m.meter_id));
            rows.push_str(&format!(
                "      <tr><td>{}</td><td>{}</td><td>{} EUR</td></tr>\n",
                escape(&label),
                numeric::format_decimal(m.usage),
                numeric::format_decimal(m.cost),
            ));
        }

        let html = format!(
            r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>Invoice {id}</title></head>
  <body>
    <h1>Invoice {id}</h1>
    <p>{name}<br>{address}</p>
    <p>Billing period: {start} to {end}</p>
    <table>
      <tr><th>Meter</th><th>Usage</th><th>Cost</th></tr>
{rows}    </table>
    <p>Total usage: {total_usage}</p>
    <p>Total cost: {total_cost} EUR</p>
  </body>
</html>
"#,
            id = invoice.id,
            name = escape(&summary.customer.name),
            address = escape(&summary.customer.address),
            start = summary.period_start,
            end = summary.period_end,
            rows = rows,
            total_usage = numeric::format_decimal(summary.total_usage),
            total_cost = numeric::format_decimal(summary.total_cost),
        );

        Ok(html.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_client::db::MeterRollup;
    use billing_client::domain::Customer;
    use time::macros::{date, datetime};

    fn fixture() -> (Invoice, InvoiceSummary) {
        let customer = Customer {
            id: 7,
            name: "Janez Novak".to_string(),
            address: "Celovška cesta 123, Ljubljana".to_string(),
            email: "janez@example.com".to_string(),
            default_meter_id: Some(3),
        };
        let summary = InvoiceSummary {
            customer,
            period_start: date!(2024 - 01 - 01),
            period_end: date!(2024 - 01 - 31),
            meters: vec![MeterRollup {
                meter_id: 3,
                serial_number: Some("MTR-0042".to_string()),
                usage: "150.00000".parse().unwrap(),
                cost: "32.50000".parse().unwrap(),
            }],
            total_usage: "150.00000".parse().unwrap(),
            total_cost: "32.50000".parse().unwrap(),
        };
        let invoice = Invoice {
            id: 11,
            customer_id: 7,
            created_at: datetime!(2024-02-01 08:00:00 UTC),
            period_start: summary.period_start,
            period_end: summary.period_end,
            total_usage: summary.total_usage,
            total_cost: summary.total_cost,
            document_path: None,
        };
        (invoice, summary)
    }

    #[test]
    fn renders_totals_with_locale_separator() {
        let (invoice, summary) = fixture();
        let bytes = HtmlRenderer.render(&invoice, &summary).unwrap();
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("Invoice 11"));
        assert!(html.contains("MTR-0042"));
        assert!(html.contains("150,00000"));
        assert!(html.contains("32,50000 EUR"));
        assert!(html.contains("2024-01-01 to 2024-01-31"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let (invoice, summary) = fixture();
        let first = HtmlRenderer.render(&invoice, &summary).unwrap();
        let second = HtmlRenderer.render(&invoice, &summary).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn meters_without_serial_fall_back_to_their_id() {
        let (invoice, mut summary) = fixture();
        summary.meters[0].serial_number = None;
        let html = String::from_utf8(HtmlRenderer.render(&invoice, &summary).unwrap()).unwrap();
        assert!(html.contains("#3"));
    }
}
