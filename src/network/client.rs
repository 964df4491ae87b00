//! HTTP client for the bill service

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::error::FetchError;
use crate::models::{BillPage, BillQuery, Category, NewBill};

/// Code the backend puts in the envelope of a successful call
const API_OK: i64 = 200;

/// Every response body is wrapped in `{ code, msg, data }`
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct CategoryList {
    list: Vec<Category>,
}

#[derive(Debug, Serialize)]
struct AddBillPayload {
    amount: String,
    type_id: u32,
    type_name: String,
    /// Epoch milliseconds
    date: i64,
    pay_type: u8,
    remark: String,
}

impl From<&NewBill> for AddBillPayload {
    fn from(bill: &NewBill) -> Self {
        let date = bill
            .date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        AddBillPayload {
            amount: format!("{:.2}", bill.amount),
            type_id: bill.category.id,
            type_name: bill.category.name.clone(),
            date,
            pay_type: bill.kind.into(),
            remark: bill.remark.clone(),
        }
    }
}

/// Query string of a bill-list request; `type_id` only when a category is active
pub fn list_params(query: &BillQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("page_size", query.page_size.to_string()),
        ("date", query.month.to_string()),
    ];
    if let Some(type_id) = query.category_id {
        params.push(("type_id", type_id.to_string()));
    }
    params
}

/// Unwrap the envelope, treating a non-OK code as a failure
fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<Option<T>, FetchError> {
    if envelope.code != API_OK {
        return Err(FetchError::Api {
            code: envelope.code,
            msg: envelope.msg,
        });
    }
    Ok(envelope.data)
}

/// Bill service client
#[derive(Debug, Clone)]
pub struct BillClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BillClient {
    pub fn new(config: &Config) -> Self {
        BillClient {
            http: create_client(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Option<T>, FetchError> {
        let resp = self.authorize(builder).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        unwrap_envelope(envelope)
    }

    pub async fn fetch_bills(&self, query: &BillQuery) -> Result<BillPage, FetchError> {
        let builder = self
            .http
            .get(self.url("/api/bill/list"))
            .query(&list_params(query));
        self.send(builder)
            .await?
            .ok_or_else(|| FetchError::Decode(String::from("bill list without data")))
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        let builder = self.http.get(self.url("/api/type/list"));
        Ok(self
            .send::<CategoryList>(builder)
            .await?
            .map(|data| data.list)
            .unwrap_or_default())
    }

    pub async fn add_bill(&self, bill: &NewBill) -> Result<(), FetchError> {
        let builder = self
            .http
            .post(self.url("/api/bill/add"))
            .json(&AddBillPayload::from(bill));
        self.send::<serde_json::Value>(builder).await.map(|_| ())
    }
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillKind, MonthKey};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn query(category_id: Option<u32>) -> BillQuery {
        BillQuery {
            page: 2,
            page_size: 5,
            month: MonthKey::new(2023, 1).unwrap(),
            category_id,
        }
    }

    #[test]
    fn test_list_params_without_category() {
        let params = list_params(&query(None));
        assert_eq!(
            params,
            vec![
                ("page", "2".to_string()),
                ("page_size", "5".to_string()),
                ("date", "2023-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_params_with_category() {
        let params = list_params(&query(Some(4)));
        assert_eq!(params.last(), Some(&("type_id", "4".to_string())));
    }

    #[test]
    fn test_envelope_error_code() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"code": 401, "msg": "token expired", "data": null}"#).unwrap();
        assert_eq!(
            unwrap_envelope(envelope),
            Err(FetchError::Api { code: 401, msg: "token expired".into() })
        );
    }

    #[test]
    fn test_envelope_category_list() {
        let envelope: ApiEnvelope<CategoryList> = serde_json::from_str(
            r#"{"code": 200, "msg": "ok", "data": {"list": [{"id": 1, "name": "dining", "type": 1}]}}"#,
        )
        .unwrap();
        let list = unwrap_envelope(envelope).unwrap().unwrap().list;
        assert_eq!(list[0].kind, BillKind::Expense);
    }

    #[test]
    fn test_add_bill_payload() {
        let bill = NewBill {
            kind: BillKind::Income,
            amount: Decimal::new(35, 1),
            category: Category { id: 11, name: "salary".into(), kind: BillKind::Income },
            date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            remark: "bonus".into(),
        };
        let payload = serde_json::to_value(AddBillPayload::from(&bill)).unwrap();
        assert_eq!(payload["amount"], "3.50");
        assert_eq!(payload["pay_type"], 2);
        assert_eq!(payload["type_id"], 11);
        assert_eq!(payload["date"], 1_672_876_800_000i64);
    }
}
