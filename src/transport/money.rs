use serde::Deserialize;
use serde::de::Error as DeError;

/// Money-like or count-like value returned by Twilio as either JSON string or JSON number.
///
/// For numbers, the raw JSON token is preserved to avoid formatting drift
/// (`1.00` remains `"1.00"` instead of becoming `"1.0"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportMoney(String);

impl TransportMoney {
    pub fn into_string(self) -> String {
        self.0
    }

    /// Numeric value, `0.0` when the token is not a number.
    pub fn as_f64(&self) -> f64 {
        self.0.trim().parse::<f64>().unwrap_or(0.0)
    }
}

impl<'de> Deserialize<'de> for TransportMoney {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        match token.as_bytes().first().copied() {
            Some(b'"') => {
                let parsed = serde_json::from_str::<String>(token).map_err(D::Error::custom)?;
                Ok(Self(parsed))
            }
            Some(b'-' | b'0'..=b'9') => Ok(Self(token.to_owned())),
            _ => Err(D::Error::custom("expected money field to be JSON string or number")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TransportMoney;

    #[derive(Debug, serde::Deserialize)]
    struct Holder {
        #[serde(default)]
        price: Option<TransportMoney>,
    }

    #[test]
    fn numbers_keep_their_raw_token() {
        let parsed: Holder = serde_json::from_str(r#"{"price": 1.00}"#).unwrap();
        assert_eq!(parsed.price.unwrap().into_string(), "1.00");
    }

    #[test]
    fn strings_and_nulls_are_accepted() {
        let parsed: Holder = serde_json::from_str(r#"{"price": "-0.00750"}"#).unwrap();
        assert_eq!(parsed.price.clone().unwrap().into_string(), "-0.00750");
        assert!((parsed.price.unwrap().as_f64() + 0.0075).abs() < f64::EPSILON);

        let parsed: Holder = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert!(parsed.price.is_none());
    }

    #[test]
    fn booleans_are_rejected() {
        assert!(serde_json::from_str::<Holder>(r#"{"price": true}"#).is_err());
    }
}
