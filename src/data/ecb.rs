//! ECB Statistical Data Warehouse client.
//!
//! Observation feeds are addressed by a dataflow + key expression; the
//! response is content-negotiated to CSV via the `Accept` header. The column
//! layout of those CSVs is not guaranteed, which is why normalization lives
//! in `ingest` rather than here.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::domain::Country;
use crate::error::{AppError, Result};

const BASE_URL: &str = "https://sdw-wsrest.ecb.europa.eu/service/data";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Government gross debt as % of GDP, quarterly (GFS dataflow).
const DEBT_KEY: &str = "GFS/Q.N.{CC}.W0.S13.S1.C.L.LE.GD.T._Z.XDC_R_B1GQ_CY._T.F.V.N._T";
/// HICP all-items annual rate of change, monthly (ICP dataflow).
const HICP_KEY: &str = "ICP/M.{CC}.N.000000.4.ANR";

pub struct EcbClient {
    client: Client,
    base_url: String,
}

impl EcbClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    /// Client pointed at an alternative endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn debt_gdp_url(&self, country: &Country) -> String {
        format!(
            "{}/{}?format=csv",
            self.base_url,
            DEBT_KEY.replace("{CC}", country.code)
        )
    }

    pub fn hicp_url(&self, country: &Country) -> String {
        format!(
            "{}/{}?format=csv",
            self.base_url,
            HICP_KEY.replace("{CC}", country.code)
        )
    }

    pub fn fetch_debt_gdp(&self, country: &Country) -> Result<String> {
        self.fetch_csv(&self.debt_gdp_url(country))
    }

    pub fn fetch_hicp(&self, country: &Country) -> Result<String> {
        self.fetch_csv(&self.hicp_url(country))
    }

    fn fetch_csv(&self, url: &str) -> Result<String> {
        debug!(%url, "requesting CSV");
        let resp = self.client.get(url).header(ACCEPT, "text/csv").send()?;
        if !resp.status().is_success() {
            return Err(AppError::Status {
                status: resp.status(),
                url: url.to_string(),
            });
        }
        Ok(resp.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn debt_url_embeds_country_code() {
        let client = EcbClient::new().unwrap();
        let url = client.debt_gdp_url(&Country::HUNGARY);
        assert!(url.contains("/GFS/Q.N.HU.W0.S13.S1.C.L.LE.GD.T._Z.XDC_R_B1GQ_CY._T.F.V.N._T"));
        assert!(url.ends_with("?format=csv"));
    }

    #[test]
    fn fetch_sends_csv_accept_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ICP/M.HU.N.000000.4.ANR")
                .header("accept", "text/csv");
            then.status(200).body("KEY,TIME_PERIOD,OBS_VALUE\n");
        });

        let client = EcbClient::with_base_url(server.base_url()).unwrap();
        let body = client.fetch_hicp(&Country::HUNGARY).unwrap();

        mock.assert();
        assert_eq!(body, "KEY,TIME_PERIOD,OBS_VALUE\n");
    }

    #[test]
    fn non_success_status_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(404);
        });

        let client = EcbClient::with_base_url(server.base_url()).unwrap();
        let err = client.fetch_debt_gdp(&Country::HUNGARY).unwrap_err();
        assert!(matches!(err, AppError::Status { .. }));
    }
}
