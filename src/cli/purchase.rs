use super::{CliError, Session, render};
use crate::domain::{CountryCode, NumberType, PhoneNumber, SearchQuery};

const DEFAULT_COUNTRY: &str = "US";

impl Session<'_> {
    /// Search available numbers and optionally buy one of the results.
    ///
    /// The advanced variant also asks for the result page and page size.
    pub(super) async fn search_numbers(&mut self, advanced: bool) -> Result<(), CliError> {
        let code = self.ask_or("Country code [US]: ", DEFAULT_COUNTRY).await?;
        let country = CountryCode::new(code)?;
        let kind_input = self
            .ask_or("Number type (local/mobile/tollfree) [local]: ", "local")
            .await?;
        let Some(kind) = NumberType::parse(&kind_input) else {
            self.say(&format!("Unknown number type: {kind_input}"))?;
            return Ok(());
        };

        let mut query = SearchQuery::new(country)
            .number_type(kind)
            .region(self.ask("Region or state (optional): ").await?)
            .area_code(self.ask("Area code (optional): ").await?)
            .pattern(self.ask("Number pattern, e.g. 555 (optional): ").await?);
        if advanced {
            let page = self.ask_or("Page [1]: ", "1").await?;
            let size = self.ask_or("Results per page [20]: ", "20").await?;
            match (page.parse::<u32>(), size.parse::<u32>()) {
                (Ok(page), Ok(size)) if page > 0 && size > 0 => {
                    query = query.page(page).page_size(size);
                }
                _ => {
                    self.say("Page and page size must be positive numbers.")?;
                    return Ok(());
                }
            }
        }

        let numbers = self.gateway.search_available_numbers(&query).await?;
        if numbers.is_empty() {
            self.say("No numbers found matching your criteria.")?;
            return Ok(());
        }

        let rows: Vec<Vec<String>> = numbers
            .iter()
            .enumerate()
            .map(|(i, number)| {
                vec![
                    (i + 1).to_string(),
                    number.phone_number.clone(),
                    number.region.clone(),
                    number.city.clone(),
                    number.number_type.clone(),
                    number.capabilities.to_string(),
                    number.monthly_price.clone(),
                ]
            })
            .collect();
        render::table(
            self.console,
            &["#", "Number", "Region", "City", "Type", "Capabilities", "Monthly"],
            &rows,
        )?;

        let Some(index) = self
            .ask_index("Enter # to purchase (0 to go back): ", numbers.len())
            .await?
        else {
            return Ok(());
        };
        let chosen = &numbers[index];
        let question = format!(
            "Purchase {} for {}/month?",
            chosen.phone_number, chosen.monthly_price
        );
        if !self.confirm(&question).await? {
            self.say("Purchase cancelled.")?;
            return Ok(());
        }

        let phone = PhoneNumber::international(chosen.phone_number.as_str())?;
        let purchased = self.gateway.purchase_number(&phone).await?;
        self.say(&format!(
            "Purchased {} (SID {}).",
            purchased.phone_number, purchased.sid
        ))
    }

    pub(super) async fn country_pricing(&mut self) -> Result<(), CliError> {
        let code = self.ask_or("Country code [US]: ", DEFAULT_COUNTRY).await?;
        let country = CountryCode::new(code)?;
        let pricing = self.gateway.get_country_pricing(&country).await?;

        let mut lines = vec![
            format!("{} ({})", pricing.country, pricing.iso_country),
            String::new(),
        ];
        if pricing.prices.is_empty() {
            lines.push("No number prices published.".to_owned());
        }
        for price in &pricing.prices {
            lines.push(format!(
                "{:<10} {} {} per month (base {})",
                price.number_type, price.current_price, pricing.price_unit, price.base_price
            ));
        }
        render::panel(self.console, "Country Pricing", &lines)
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::console::ScriptedConsole;
    use crate::cli::run;
    use crate::client::Method;
    use crate::client::testing::{FakeTransport, assert_param, gateway};

    const AVAILABLE: &str = r#"
    {
      "available_phone_numbers": [
        {
          "phone_number": "+14155552671",
          "friendly_name": "(415) 555-2671",
          "locality": "San Francisco",
          "region": "CA",
          "capabilities": {"voice": true, "SMS": true, "MMS": false}
        }
      ]
    }
    "#;

    #[tokio::test]
    async fn search_then_purchase() {
        let transport = FakeTransport::new()
            .route(
                Method::Get,
                "/AvailablePhoneNumbers/US/Local.json",
                200,
                AVAILABLE,
            )
            .route(
                Method::Post,
                "/IncomingPhoneNumbers.json",
                201,
                r#"{"sid": "PN1", "phone_number": "+14155552671"}"#,
            );
        let mut gateway = gateway(&transport);
        let mut console =
            ScriptedConsole::new(["1", "1", "", "", "", "415", "", "1", "y", "0", "0"]);

        run(&mut gateway, &mut console).await.unwrap();

        let output = console.output();
        assert!(output.contains("San Francisco"));
        assert!(output.contains("Purchased +14155552671 (SID PN1)."));

        let search = &transport.requests_to(Method::Get, "/AvailablePhoneNumbers")[0];
        assert_param(&search.params, "AreaCode", "415");
        let purchase = transport.last_request().unwrap();
        assert_param(&purchase.params, "PhoneNumber", "+14155552671");
    }

    #[tokio::test]
    async fn declined_purchase_sends_nothing() {
        let transport = FakeTransport::new().route(
            Method::Get,
            "/AvailablePhoneNumbers/US/Local.json",
            200,
            AVAILABLE,
        );
        let mut gateway = gateway(&transport);
        let mut console =
            ScriptedConsole::new(["1", "1", "us", "local", "", "", "", "1", "n", "0", "0"]);

        run(&mut gateway, &mut console).await.unwrap();

        assert!(console.output().contains("Purchase cancelled."));
        assert!(transport.requests_to(Method::Post, "").is_empty());
    }

    #[tokio::test]
    async fn advanced_search_sends_paging() {
        let transport = FakeTransport::new().route(
            Method::Get,
            "/AvailablePhoneNumbers/GB/Mobile.json",
            200,
            r#"{"available_phone_numbers": []}"#,
        );
        let mut gateway = gateway(&transport);
        let mut console =
            ScriptedConsole::new(["3", "6", "GB", "mobile", "", "", "", "2", "5", "0", "0"]);

        run(&mut gateway, &mut console).await.unwrap();

        assert!(
            console
                .output()
                .contains("No numbers found matching your criteria.")
        );
        let request = transport.last_request().unwrap();
        assert_param(&request.params, "Page", "2");
        assert_param(&request.params, "PageSize", "5");
    }

    #[tokio::test]
    async fn pricing_lists_number_types() {
        let transport = FakeTransport::new().route(
            Method::Get,
            "/v1/PhoneNumbers/Countries/US",
            200,
            r#"
            {
              "country": "United States",
              "iso_country": "US",
              "price_unit": "USD",
              "phone_number_prices": [
                {"number_type": "local", "base_price": "1.15", "current_price": "1.15"}
              ]
            }
            "#,
        );
        let mut gateway = gateway(&transport);
        let mut console = ScriptedConsole::new(["1", "2", "", "0", "0"]);

        run(&mut gateway, &mut console).await.unwrap();

        let output = console.output();
        assert!(output.contains("United States (US)"));
        assert!(output.contains("local      1.15 USD per month (base 1.15)"));
    }
}
