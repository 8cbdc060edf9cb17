use crate::escape_html;
use crate::lang::Language;

/// Input for the trip booking summary template.
#[derive(Debug, Clone)]
pub struct SummaryData {
    pub booking_number: String,
    pub date: String,
    pub customer_name: String,
    pub destination: Option<String>,
    pub trip_date: Option<String>,
    pub seats: Option<i32>,
    pub provider_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: String,
}

/// Render the booking summary as a standalone HTML document.
pub fn summary_html(data: &SummaryData, lang: Language) -> String {
    let l = lang.labels();
    let align = if lang.is_rtl() { "right" } else { "left" };
    let seats = data
        .seats
        .map(|s| s.to_string())
        .unwrap_or_else(|| "—".to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="{tag}" dir="{dir}">
<head>
<meta charset="utf-8">
<style>
  body {{ font-family: 'Noto Sans', 'Noto Sans Hebrew', 'Noto Sans Arabic', sans-serif;
         margin: 48px; color: #1a1a1a; text-align: {align}; }}
  h1 {{ font-size: 22px; border-bottom: 2px solid #1a1a1a; padding-bottom: 8px; }}
  table {{ width: 100%; border-collapse: collapse; margin-top: 24px; }}
  td {{ padding: 8px 4px; border-bottom: 1px solid #ddd; }}
  td.label {{ width: 35%; font-weight: 600; }}
  .status {{ display: inline-block; padding: 2px 10px; border: 1px solid #1a1a1a;
             border-radius: 10px; font-size: 12px; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{booking_label} {booking_number} &middot; {date_label}: {date}</p>
<table>
  <tr><td class="label">{customer_label}</td><td>{customer_name}</td></tr>
  <tr><td class="label">{destination_label}</td><td>{destination}</td></tr>
  <tr><td class="label">{trip_date_label}</td><td>{trip_date}</td></tr>
  <tr><td class="label">{seats_label}</td><td>{seats}</td></tr>
  <tr><td class="label">{provider_label}</td><td>{provider_name}</td></tr>
  <tr><td class="label">{amount_label}</td><td>{amount:.2} {currency}</td></tr>
  <tr><td class="label">{status_label}</td><td><span class="status">{status}</span></td></tr>
</table>
</body>
</html>"#,
        tag = lang.tag(),
        dir = lang.dir(),
        align = align,
        title = l.summary_title,
        booking_label = l.booking,
        booking_number = escape_html(&data.booking_number),
        date_label = l.date,
        date = escape_html(&data.date),
        customer_label = l.customer,
        customer_name = escape_html(&data.customer_name),
        destination_label = l.destination,
        destination = escape_html(data.destination.as_deref().unwrap_or("—")),
        trip_date_label = l.trip_date,
        trip_date = escape_html(data.trip_date.as_deref().unwrap_or("—")),
        seats_label = l.seats,
        seats = seats,
        provider_label = l.provider,
        provider_name = escape_html(data.provider_name.as_deref().unwrap_or("—")),
        amount_label = l.amount,
        amount = data.amount,
        currency = escape_html(&data.currency),
        status_label = l.status,
        status = escape_html(&data.status),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> SummaryData {
        SummaryData {
            booking_number: "deal_tr1p000001".to_string(),
            date: "2024-03-15".to_string(),
            customer_name: "Noa Mizrahi".to_string(),
            destination: Some("Eilat".to_string()),
            trip_date: Some("2024-04-20".to_string()),
            seats: Some(45),
            provider_name: Some("North Guides".to_string()),
            amount: 5400.0,
            currency: "ILS".to_string(),
            status: "pending".to_string(),
        }
    }

    #[test]
    fn renders_all_booking_fields() {
        let html = summary_html(&data(), Language::En);
        assert!(html.contains("Trip Booking Summary"));
        assert!(html.contains("Noa Mizrahi"));
        assert!(html.contains("Eilat"));
        assert!(html.contains("45"));
        assert!(html.contains("5400.00 ILS"));
    }

    #[test]
    fn arabic_summary_is_rtl_with_arabic_title() {
        let html = summary_html(&data(), Language::Ar);
        assert!(html.contains(r#"dir="rtl""#));
        assert!(html.contains("ملخص حجز الرحلة"));
    }

    #[test]
    fn optional_fields_fall_back_to_placeholder() {
        let mut d = data();
        d.destination = None;
        d.provider_name = None;
        d.seats = None;
        let html = summary_html(&d, Language::En);
        // Three placeholders: destination, seats, provider.
        assert!(html.matches("—").count() >= 3);
    }
}
