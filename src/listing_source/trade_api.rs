use std::time::SystemTime;

use async_trait::async_trait;
use log::debug;
use reqwest::{
    Client,
    Response,
    StatusCode,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};

use crate::{
    config::ApiConfig,
    error::{
        PricingError,
        Result,
    },
    listing_source::{
        Discovery,
        ListingSource,
        SourceResponse,
    },
};



/// Marketplace trade API client.
///
/// Discovery is a POST of an exchange query to `{base_url}/exchange/{league}`,
/// listing notes are fetched from `{base_url}/fetch/{ids}`.
pub struct TradeApiClient {
    client: Client,
    base_url: String,
    league: String,
    rate_limit_header: String,
}



impl TradeApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            league: config.league.clone(),
            rate_limit_header: config.rate_limit_header.to_ascii_lowercase(),
        })
    }



    // Extract rate limiting descriptor, if endpoint returned one.
    fn rate_limit_descriptor(&self, r: &Response) -> Option<String> {
        let val = r.headers().get(self.rate_limit_header.as_str())?;
        val.to_str().ok().map(str::to_string)
    }



    // Check status and read body of a response.
    async fn read_body(&self, url: &str, start: SystemTime, r: Response)
        -> Result<SourceResponse<String>>
    {
        status_check(r.status(), url)?;

        let rate_limit = self.rate_limit_descriptor(&r);
        let body = r.text().await?;

        if let Ok(took) = start.elapsed() {
            debug!("{} answered in {:?}, rate limit {:?}", url, took, rate_limit);
        }

        Ok(SourceResponse { body, rate_limit })
    }
}



#[async_trait]
impl ListingSource for TradeApiClient {
    async fn discover(&self, want: &str, base: &str)
        -> Result<SourceResponse<Discovery>>
    {
        let url = format!("{}/exchange/{}", self.base_url, self.league);
        let query = ExchangeQuery::new(want, base);

        let start = SystemTime::now();
        let r = self.client.post(&url).json(&query).send().await?;
        let raw = self.read_body(&url, start, r).await?;

        let decoded: DecodedDiscovery = decode(&url, &raw.body)?;

        Ok(SourceResponse {
            body: decoded.into(),
            rate_limit: raw.rate_limit,
        })
    }



    async fn fetch_page(&self, query_id: &str, listing_ids: &[String])
        -> Result<SourceResponse<Vec<String>>>
    {
        let url = format!("{}/fetch/{}?query={}&exchange", self.base_url,
            listing_ids.join(","), query_id
        );

        let start = SystemTime::now();
        let r = self.client.get(&url).send().await?;
        let raw = self.read_body(&url, start, r).await?;

        let decoded: DecodedPage = decode(&url, &raw.body)?;

        Ok(SourceResponse {
            body: decoded.notes(),
            rate_limit: raw.rate_limit,
        })
    }
}



/// Map HTTP status into fetch errors. Rate limited and not found requests are
/// worth retrying later, anything else is unexpected.
fn status_check(status: StatusCode, url: &str) -> Result<()> {
    if status.is_success() {
        return Ok(())
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::NOT_FOUND => {
            Err(PricingError::Request {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }

        _ => Err(PricingError::Unknown(
            format!("remote endpoint returned status {} for {}", status, url)
        )),
    }
}



fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| PricingError::Unknown(
        format!("could not decode response of {} as JSON, error: {}", url, e)
    ))
}



/// Exchange query body. We search as someone who has `want` and is after
/// `base`, only sellers currently online are listed.
#[derive(Serialize, Debug)]
struct ExchangeQuery<'a> {
    exchange: ExchangeFilter<'a>,
}



#[derive(Serialize, Debug)]
struct ExchangeFilter<'a> {
    status: StatusFilter,
    have: [&'a str; 1],
    want: [&'a str; 1],
}



#[derive(Serialize, Debug)]
struct StatusFilter {
    option: &'static str,
}



impl<'a> ExchangeQuery<'a> {
    fn new(want: &'a str, base: &'a str) -> Self {
        Self {
            exchange: ExchangeFilter {
                status: StatusFilter { option: "online" },
                have: [want],
                want: [base],
            },
        }
    }
}



#[derive(Deserialize, Debug)]
struct DecodedDiscovery {
    id: String,
    #[serde(default)]
    result: Vec<String>,
    #[serde(default)]
    total: u64,
}



impl From<DecodedDiscovery> for Discovery {
    fn from(d: DecodedDiscovery) -> Self {
        Discovery {
            query_id: d.id,
            listing_ids: d.result,
            total: d.total,
        }
    }
}



#[derive(Deserialize, Debug)]
struct DecodedPage {
    #[serde(default)]
    result: Vec<Option<DecodedListing>>,
}



#[derive(Deserialize, Debug)]
struct DecodedListing {
    item: Option<DecodedItem>,
}



#[derive(Deserialize, Debug)]
struct DecodedItem {
    note: Option<String>,
}



impl DecodedPage {
    // Listing that vanished or has no note still occupies its rank slot.
    fn notes(self) -> Vec<String> {
        self.result.into_iter()
            .map(|listing| listing
                .and_then(|l| l.item)
                .and_then(|i| i.note)
                .unwrap_or_default()
            )
            .collect()
    }
}
