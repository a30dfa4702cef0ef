use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::common::transport::{lenient_i64, lenient_opt_i64};

lazy_static! {
    static ref AMOUNT: Regex =
        Regex::new(r"(?P<sign>-)?\s*\p{Sc}?\s*(?P<inner>-)?(?P<digits>\d[\d.,]*)").unwrap();
}

/// Remote cart, as returned by the cart route. Never cached by the client.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Cart {
    #[serde(default)]
    pub products: Vec<CartLine>,
    #[serde(default)]
    pub vouchers: Vec<Value>,
    #[serde(default)]
    pub totals: Vec<CartTotal>,
    #[serde(default)]
    pub shipping_required: bool,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn total_quantity(&self) -> i64 {
        self.products.iter().map(|p| p.quantity).sum()
    }

    /// Lines holding `product_id`; the server decides whether repeated adds
    /// merge into one line or produce several.
    pub fn lines_for_product(&self, product_id: i64) -> Vec<&CartLine> {
        self.products
            .iter()
            .filter(|p| p.product_id == product_id)
            .collect()
    }

    pub fn subtotal(&self) -> Option<f64> {
        self.find_total(|t| t.eq_ignore_ascii_case("sub-total"))
    }

    pub fn total(&self) -> Option<f64> {
        self.find_total(|t| t.eq_ignore_ascii_case("total"))
    }

    fn find_total(&self, predicate: impl Fn(&str) -> bool) -> Option<f64> {
        self.totals
            .iter()
            .find(|t| predicate(t.title.trim()))
            .and_then(CartTotal::amount)
    }
}

/// One entry of the cart. `cart_id` identifies the line, not the product;
/// older cart routes name it `key`, and a line may come without one.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct CartLine {
    #[serde(default, alias = "key", deserialize_with = "lenient_opt_i64")]
    pub cart_id: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub product_id: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub quantity: i64,
    pub name: Option<String>,
    pub model: Option<String>,
    pub price: Option<String>,
    pub total: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct CartTotal {
    pub title: String,
    #[serde(default)]
    pub text: String,
}

impl CartTotal {
    /// Numeric value of the formatted amount (`"$1,202.00"` -> `1202.0`,
    /// `"-$5.00"` -> `-5.0`, `"1.204,00 €"` -> `1204.0`).
    pub fn amount(&self) -> Option<f64> {
        let caps = AMOUNT.captures(&self.text)?;
        let negative = caps.name("sign").is_some() || caps.name("inner").is_some();
        let value = normalize_decimal(caps.name("digits")?.as_str())
            .parse::<f64>()
            .ok()?;

        Some(if negative { -value } else { value })
    }
}

/// Drops grouping separators. The last separator is the decimal mark when
/// both kinds appear; a lone comma is decimal only before exactly two digits.
fn normalize_decimal(digits: &str) -> String {
    let digits = digits.trim_end_matches(|c: char| c == '.' || c == ',');
    let decimal = match (digits.rfind('.'), digits.rfind(',')) {
        (Some(dot), Some(comma)) => Some(dot.max(comma)),
        (None, Some(comma)) if digits.len() - comma == 3 => Some(comma),
        (Some(dot), None) => Some(dot),
        _ => None,
    };

    digits
        .char_indices()
        .filter_map(|(i, c)| match c {
            '.' | ',' if Some(i) == decimal => Some('.'),
            '.' | ',' => None,
            c => Some(c),
        })
        .collect()
}

/// Body of a successful mutation (`{"success": "..."}`).
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Acknowledgement {
    pub success: Option<String>,
}

impl Acknowledgement {
    pub fn message(&self) -> &str {
        self.success.as_deref().unwrap_or_default()
    }
}

#[derive(Serialize, Debug)]
pub struct CartAddPayload {
    pub product_id: i64,
    pub quantity: i64,
}

/// Line removal. The line id is sent under both names the cart route has
/// used across releases.
#[derive(Serialize, Debug)]
pub struct CartRemovePayload {
    pub cart_id: i64,
    pub key: i64,
}

#[derive(Serialize, Debug)]
pub struct OrderLoadPayload {
    pub order_id: i64,
}

#[derive(Serialize, Clone, Debug, Default)]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_group_id: Option<i64>,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}

/// Orders are passed through as the server sends them.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct Order(pub serde_json::Map<String, Value>);

impl Order {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}
