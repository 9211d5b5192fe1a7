use serde::Deserialize;

use super::TransportError;
use super::money::TransportMoney;
use crate::domain::{CountryPricing, NumberPrice};

#[derive(Debug, Clone, Deserialize)]
struct CountryPricingJson {
    #[serde(default)]
    country: Option<String>,
    iso_country: String,
    #[serde(default)]
    price_unit: Option<String>,
    #[serde(default)]
    phone_number_prices: Vec<NumberPriceJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct NumberPriceJson {
    number_type: String,
    #[serde(default)]
    base_price: Option<TransportMoney>,
    #[serde(default)]
    current_price: Option<TransportMoney>,
}

pub fn decode_country_pricing(json: &str) -> Result<CountryPricing, TransportError> {
    let parsed: CountryPricingJson = serde_json::from_str(json)?;
    let prices = parsed
        .phone_number_prices
        .into_iter()
        .map(|price| {
            let current = price.current_price.map(TransportMoney::into_string);
            let base = price.base_price.map(TransportMoney::into_string);
            NumberPrice {
                number_type: price.number_type,
                base_price: base.clone().or_else(|| current.clone()).unwrap_or_default(),
                current_price: current.or(base).unwrap_or_default(),
            }
        })
        .collect();

    Ok(CountryPricing {
        country: parsed.country.unwrap_or_else(|| parsed.iso_country.clone()),
        iso_country: parsed.iso_country,
        price_unit: parsed.price_unit.unwrap_or_else(|| "USD".to_owned()),
        prices,
    })
}
