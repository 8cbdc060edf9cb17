use crate::escape_html;
use crate::lang::Language;

/// Everything the sale-contract template interpolates. Built by the caller
/// from the deal, car, customer and shop rows.
#[derive(Debug, Clone)]
pub struct ContractData {
    pub contract_number: String,
    pub date: String,
    pub buyer_name: String,
    pub buyer_phone: Option<String>,
    pub shop_name: String,
    pub shop_address: Option<String>,
    pub car_make: String,
    pub car_model: String,
    pub car_year: i32,
    pub price: f64,
    pub currency: String,
}

/// Render the vehicle sale contract as a standalone HTML document.
///
/// One template serves all three languages; the language only selects the
/// label table and the document direction.
pub fn contract_html(data: &ContractData, lang: Language) -> String {
    let l = lang.labels();
    let align = if lang.is_rtl() { "right" } else { "left" };

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
  td {{ padding: 8px 4px; border-bottom: 1px solid #ddd; vertical-align: top; }}
  td.label {{ width: 35%; font-weight: 600; }}
  .signatures {{ display: flex; justify-content: space-between; margin-top: 96px; }}
  .signature {{ width: 40%; border-top: 1px solid #1a1a1a; padding-top: 8px; text-align: center; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{contract_number_label} {contract_number} &middot; {date_label}: {date}</p>
<table>
  <tr><td class="label">{buyer_label}</td><td>{buyer_name}</td></tr>
  <tr><td class="label">{phone_label}</td><td>{buyer_phone}</td></tr>
  <tr><td class="label">{seller_label}</td><td>{shop_name}</td></tr>
  <tr><td class="label">{address_label}</td><td>{shop_address}</td></tr>
  <tr><td class="label">{vehicle_label}</td><td>{car_make} {car_model}</td></tr>
  <tr><td class="label">{year_label}</td><td>{car_year}</td></tr>
  <tr><td class="label">{price_label}</td><td>{price:.2} {currency}</td></tr>
</table>
<div class="signatures">
  <div class="signature">{buyer_signature}</div>
  <div class="signature">{seller_signature}</div>
</div>
</body>
</html>"#,
        tag = lang.tag(),
        dir = lang.dir(),
        align = align,
        title = l.contract_title,
        contract_number_label = l.contract_number,
        contract_number = escape_html(&data.contract_number),
        date_label = l.date,
        date = escape_html(&data.date),
        buyer_label = l.buyer,
        buyer_name = escape_html(&data.buyer_name),
        phone_label = l.phone,
        buyer_phone = escape_html(data.buyer_phone.as_deref().unwrap_or("—")),
        seller_label = l.seller,
        shop_name = escape_html(&data.shop_name),
        address_label = l.address,
        shop_address = escape_html(data.shop_address.as_deref().unwrap_or("—")),
        vehicle_label = l.vehicle,
        car_make = escape_html(&data.car_make),
        car_model = escape_html(&data.car_model),
        year_label = l.year,
        car_year = data.car_year,
        price_label = l.price,
        price = data.price,
        currency = escape_html(&data.currency),
        buyer_signature = l.buyer_signature,
        seller_signature = l.seller_signature,
    )
}
