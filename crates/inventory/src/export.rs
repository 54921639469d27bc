//! CSV export of alerts and shopping lists.

use csv::{QuoteStyle, WriterBuilder};

use crate::alerts::Alert;

const BASE_HEADER: [&str; 8] = [
    "Product",
    "Category",
    "Current Stock",
    "Threshold",
    "Priority",
    "Status",
    "Message",
    "Days Until Empty",
];

/// Encode one field with `style`. Delimiter and terminator are added by the
/// caller so the product column can use a stricter style than the rest.
fn encode(value: &str, style: QuoteStyle) -> csv::Result<String> {
    let mut writer = WriterBuilder::new().quote_style(style).from_writer(Vec::new());
    writer.write_field(value)?;
    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn render(alerts: &[Alert], with_suggested: bool) -> csv::Result<String> {
    let mut out = String::new();

    let mut header: Vec<&str> = BASE_HEADER.to_vec();
    if with_suggested {
        header.push("Suggested Quantity");
    }
    out.push_str(&header.join(","));
    out.push('\n');

    for alert in alerts {
        // Product names are always quoted; spreadsheet imports mangle bare
        // names with apostrophes.
        let mut row = vec![
            encode(&alert.item.name, QuoteStyle::Always)?,
            encode(&alert.item.category, QuoteStyle::Necessary)?,
            alert.item.stock.to_string(),
            alert.threshold.to_string(),
            alert.priority.as_str().to_string(),
            alert.status.as_str().to_string(),
            encode(&alert.message, QuoteStyle::Necessary)?,
            alert.days_until_empty.to_string(),
        ];
        if with_suggested {
            row.push(alert.suggested_quantity.to_string());
        }
        out.push_str(&row.join(","));
        out.push('\n');
    }
    Ok(out)
}

pub fn alerts_csv(alerts: &[Alert]) -> csv::Result<String> {
    render(alerts, false)
}

/// Alert export plus the `Suggested Quantity` column.
pub fn shopping_list_csv(alerts: &[Alert]) -> csv::Result<String> {
    render(alerts, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::generate_alerts;
    use crate::alerts::test_support::item;
    use crate::priority::Priority;

    #[test]
    fn apostrophe_names_are_quoted_verbatim() {
        let alerts = generate_alerts(&[item("Jack Daniel's", 1, Priority::High, 3)]);
        let csv = alerts_csv(&alerts).unwrap();
        assert!(csv.contains("\"Jack Daniel's\""));
        assert!(csv.starts_with("Product,Category,Current Stock,Threshold,Priority,Status,Message,Days Until Empty\n"));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let alerts = generate_alerts(&[item("The \"Good\" Rum", 0, Priority::High, 3)]);
        let csv = alerts_csv(&alerts).unwrap();
        assert!(csv.contains("\"The \"\"Good\"\" Rum\""));
    }

    #[test]
    fn categories_with_commas_are_quoted() {
        let mut vodka = item("Vodka", 1, Priority::High, 3);
        vodka.category = "spirits, premium".to_string();
        let csv = alerts_csv(&generate_alerts(&[vodka])).unwrap();
        assert!(csv.contains("\"Vodka\",\"spirits, premium\",1,"));
    }

    #[test]
    fn shopping_list_adds_suggested_column() {
        let alerts = generate_alerts(&[item("Vodka", 1, Priority::High, 3)]);
        let csv = shopping_list_csv(&alerts).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().ends_with(",Suggested Quantity"));
        assert_eq!(
            lines.next().unwrap(),
            "\"Vodka\",spirits,1,3,high,URGENT,Critically low stock - reorder immediately,1,10"
        );
    }
}
