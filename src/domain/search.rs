//! Available-number search: query model and filter resolution.
//!
//! [`SearchQuery`] carries loose user input. [`SearchQuery::filters`] turns it into the
//! exact `InRegion` / `AreaCode` / `Contains` values the provider expects, using the
//! static country table.

use crate::domain::country::{self, Country, RegionPolicy};
use crate::domain::value::CountryCode;

/// Default page size for available-number searches.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Longest numeric pattern that is still wrapped in wildcards.
pub const MAX_WRAPPED_PATTERN_DIGITS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumberType {
    #[default]
    Local,
    Mobile,
    TollFree,
}

impl NumberType {
    /// Parse `local`, `mobile`, `tollfree` (also `toll-free`); anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "mobile" => Some(Self::Mobile),
            "tollfree" | "toll-free" | "toll_free" => Some(Self::TollFree),
            _ => None,
        }
    }

    /// Path segment of the `AvailablePhoneNumbers` resource.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Mobile => "Mobile",
            Self::TollFree => "TollFree",
        }
    }

    /// Lower-cased label used in normalized records (`local`, `mobile`, `tollfree`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Mobile => "mobile",
            Self::TollFree => "tollfree",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    country: CountryCode,
    number_type: NumberType,
    region: Option<String>,
    area_code: Option<String>,
    pattern: Option<String>,
    page: u32,
    page_size: u32,
}

/// Provider filters resolved from a [`SearchQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub in_region: Option<String>,
    pub area_code: Option<String>,
    pub contains: Option<String>,
}

impl SearchQuery {
    pub fn new(country: CountryCode) -> Self {
        Self {
            country,
            number_type: NumberType::default(),
            region: None,
            area_code: None,
            pattern: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn number_type(mut self, number_type: NumberType) -> Self {
        self.number_type = number_type;
        self
    }

    /// Region name as typed by the user. Blank input clears the filter.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = non_blank(region.into());
        self
    }

    /// Explicit area code. Blank input clears the filter.
    pub fn area_code(mut self, area_code: impl Into<String>) -> Self {
        self.area_code = non_blank(area_code.into());
        self
    }

    /// Digit (or vanity) pattern. Blank input clears the filter.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = non_blank(pattern.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn country(&self) -> &CountryCode {
        &self.country
    }

    pub fn kind(&self) -> NumberType {
        self.number_type
    }

    pub fn page_number(&self) -> u32 {
        self.page
    }

    pub fn page_len(&self) -> u32 {
        self.page_size
    }

    /// Reference data for the query's country, if the table knows it.
    pub fn country_data(&self) -> Option<&'static Country> {
        country::country(self.country.as_str())
    }

    /// Resolve region, area code and pattern into provider filters.
    pub fn filters(&self) -> SearchFilters {
        let country = self.country_data();
        let area_code_aware = country.is_some_and(|c| c.area_code_aware);

        let mut filters = SearchFilters {
            in_region: self
                .region
                .as_deref()
                .and_then(|region| resolve_region(country, region)),
            area_code: None,
            contains: None,
        };

        if area_code_aware {
            filters.area_code = self.area_code.clone();
        }

        if let Some(pattern) = self.pattern.as_deref() {
            match known_area_code(country, pattern) {
                Some(true) if filters.area_code.is_none() => {
                    filters.area_code = Some(pattern.to_owned());
                }
                Some(_) => filters.contains = Some(wildcard(pattern)),
                None => filters.contains = Some(contains_pattern(pattern)),
            }
        }

        filters
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn resolve_region(country: Option<&'static Country>, region: &str) -> Option<String> {
    let country = country?;
    match country.region_policy {
        RegionPolicy::ExactName => country
            .region_ignore_case(region)
            .map(|found| found.name.to_owned()),
        RegionPolicy::CodedWithFallback => country
            .region(region)
            .or_else(|| country.region_ignore_case(region))
            .map(|found| found.code.to_owned()),
        RegionPolicy::Direct => country.region(region).map(|found| found.code.to_owned()),
    }
}

/// `Some(true|false)` when `pattern` is a 3-digit candidate area code in an
/// area-code-aware country, `None` when the area-code rule does not apply.
fn known_area_code(country: Option<&'static Country>, pattern: &str) -> Option<bool> {
    let country = country.filter(|c| c.area_code_aware)?;
    if pattern.len() != 3 || !is_numeric(pattern) {
        return None;
    }
    let value = pattern.parse::<u16>().ok()?;
    Some(country.has_area_code(value))
}

fn contains_pattern(pattern: &str) -> String {
    if is_numeric(pattern) && pattern.len() <= MAX_WRAPPED_PATTERN_DIGITS {
        wildcard(pattern)
    } else {
        pattern.to_owned()
    }
}

fn wildcard(pattern: &str) -> String {
    format!("*{pattern}*")
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
