use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Document language. Hebrew and Arabic render right-to-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
    Ar,
}

impl Language {
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some("en") => Ok(Self::En),
            Some("he") => Ok(Self::He),
            Some("ar") => Ok(Self::Ar),
            Some(_) => Err(anyhow!("lang must be one of: en, he, ar")),
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::He | Self::Ar)
    }

    /// Value for the HTML `dir` attribute.
    pub fn dir(&self) -> &'static str {
        if self.is_rtl() {
            "rtl"
        } else {
            "ltr"
        }
    }

    /// BCP 47 tag for the HTML `lang` attribute.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::He => "he",
            Self::Ar => "ar",
        }
    }

    pub fn labels(&self) -> &'static Labels {
        match self {
            Self::En => &EN,
            Self::He => &HE,
            Self::Ar => &AR,
        }
    }
}

/// Static strings for one language variant. One parameterized template per
/// document reads from this table; there are no per-language templates.
pub struct Labels {
    pub contract_title: &'static str,
    pub contract_number: &'static str,
    pub date: &'static str,
    pub buyer: &'static str,
    pub phone: &'static str,
    pub seller: &'static str,
    pub address: &'static str,
    pub vehicle: &'static str,
    pub year: &'static str,
    pub price: &'static str,
    pub buyer_signature: &'static str,
    pub seller_signature: &'static str,
    pub summary_title: &'static str,
    pub booking: &'static str,
    pub customer: &'static str,
    pub destination: &'static str,
    pub trip_date: &'static str,
    pub seats: &'static str,
    pub provider: &'static str,
    pub amount: &'static str,
    pub status: &'static str,
}

static EN: Labels = Labels {
    contract_title: "Vehicle Sale Contract",
    contract_number: "Contract no.",
    date: "Date",
    buyer: "Buyer",
    phone: "Phone",
    seller: "Seller",
    address: "Address",
    vehicle: "Vehicle",
    year: "Year",
    price: "Sale price",
    buyer_signature: "Buyer signature",
    seller_signature: "Seller signature",
    summary_title: "Trip Booking Summary",
    booking: "Booking",
    customer: "Customer",
    destination: "Destination",
    trip_date: "Trip date",
    seats: "Seats",
    provider: "Service provider",
    amount: "Amount",
    status: "Status",
};

static HE: Labels = Labels {
    contract_title: "חוזה מכירת רכב",
    contract_number: "חוזה מס'",
    date: "תאריך",
    buyer: "קונה",
    phone: "טלפון",
    seller: "מוכר",
    address: "כתובת",
    vehicle: "רכב",
    year: "שנה",
    price: "מחיר מכירה",
    buyer_signature: "חתימת הקונה",
    seller_signature: "חתימת המוכר",
    summary_title: "סיכום הזמנת טיול",
    booking: "הזמנה",
    customer: "לקוח",
    destination: "יעד",
    trip_date: "תאריך הטיול",
    seats: "מקומות",
    provider: "ספק שירות",
    amount: "סכום",
    status: "סטטוס",
};

static AR: Labels = Labels {
    contract_title: "عقد بيع مركبة",
    contract_number: "عقد رقم",
    date: "التاريخ",
    buyer: "المشتري",
    phone: "هاتف",
    seller: "البائع",
    address: "العنوان",
    vehicle: "المركبة",
    year: "السنة",
    price: "سعر البيع",
    buyer_signature: "توقيع المشتري",
    seller_signature: "توقيع البائع",
    summary_title: "ملخص حجز الرحلة",
    booking: "الحجز",
    customer: "العميل",
    destination: "الوجهة",
    trip_date: "تاريخ الرحلة",
    seats: "المقاعد",
    provider: "مزوّد الخدمة",
    amount: "المبلغ",
    status: "الحالة",
};
