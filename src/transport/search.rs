use serde::Deserialize;

use super::money::TransportMoney;
use super::{TransportCapabilities, TransportError, param};
use crate::domain::{AvailableNumber, SearchQuery};

const DEFAULT_MONTHLY_PRICE: &str = "0.00";

#[derive(Debug, Clone, Deserialize)]
struct AvailableNumbersJsonResponse {
    #[serde(default)]
    available_phone_numbers: Vec<AvailableNumberJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct AvailableNumberJson {
    phone_number: String,
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    locality: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    capabilities: Option<TransportCapabilities>,
    #[serde(default)]
    monthly_fee: Option<TransportMoney>,
}

pub fn encode_search_query(query: &SearchQuery) -> Vec<(String, String)> {
    let filters = query.filters();
    let mut params = vec![
        param("PageSize", query.page_len().to_string()),
        param("Page", query.page_number().to_string()),
    ];
    if let Some(region) = filters.in_region {
        params.push(param("InRegion", region));
    }
    if let Some(area_code) = filters.area_code {
        params.push(param("AreaCode", area_code));
    }
    if let Some(contains) = filters.contains {
        params.push(param("Contains", contains));
    }
    params
}

pub fn decode_available_numbers(
    query: &SearchQuery,
    json: &str,
) -> Result<Vec<AvailableNumber>, TransportError> {
    let parsed: AvailableNumbersJsonResponse = serde_json::from_str(json)?;
    let country = query.country_data().filter(|c| c.area_code_aware);
    let number_type = query.kind().label();

    Ok(parsed
        .available_phone_numbers
        .into_iter()
        .map(|num| {
            let api_region = num.region.unwrap_or_default();
            let region = match country.and_then(|c| c.region_by_code(&api_region)) {
                Some(found) => found.name.to_owned(),
                None => api_region,
            };
            AvailableNumber {
                phone_number: num.phone_number,
                friendly_name: num.friendly_name.unwrap_or_default(),
                city: num.locality.unwrap_or_default(),
                region,
                number_type: number_type.to_owned(),
                capabilities: num.capabilities.into(),
                monthly_price: num
                    .monthly_fee
                    .map(TransportMoney::into_string)
                    .unwrap_or_else(|| DEFAULT_MONTHLY_PRICE.to_owned()),
            }
        })
        .collect())
}
