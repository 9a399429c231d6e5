use reqwest::Response;
use serde_json::Value;

use crate::error::ApiError;

/// Thin forwarder to the PostgREST instance. Every CRUD handler goes through
/// here; this is the only place upstream status codes are interpreted.
#[derive(Clone)]
pub struct PostgrestClient {
    http: reqwest::Client,
    base_url: String,
}

impl PostgrestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    /// List rows. `raw_query` is the caller's query string passed through
    /// verbatim, so PostgREST-style filters (`field=eq.value`,
    /// `field=ilike.*term*`, `order=...`) keep working.
    pub async fn list(&self, table: &str, raw_query: Option<&str>) -> Result<Value, ApiError> {
        let url = match raw_query {
            Some(q) if !q.is_empty() => format!("{}?{}", self.table_url(table), q),
            _ => self.table_url(table),
        };
        let resp = self.http.get(url).send().await?;
        expect_json(resp).await
    }

    /// Fetch rows matching the given filter pairs (already in PostgREST
    /// operator form, e.g. `("email", "eq.a@b.c")`).
    pub async fn find(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<Value>, ApiError> {
        let resp = self
            .http
            .get(self.table_url(table))
            .query(filters)
            .send()
            .await?;
        match expect_json(resp).await? {
            Value::Array(rows) => Ok(rows),
            other => Ok(vec![other]),
        }
    }

    pub async fn find_one(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Option<Value>, ApiError> {
        Ok(self.find(table, filters).await?.into_iter().next())
    }

    /// Insert a row and return the stored representation.
    pub async fn create(&self, table: &str, body: &Value) -> Result<Value, ApiError> {
        let resp = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        Ok(first_row(expect_json(resp).await?))
    }

    /// Patch rows matching the filters and return the updated
    /// representations.
    pub async fn update_where(
        &self,
        table: &str,
        filters: &[(&str, String)],
        body: &Value,
    ) -> Result<Value, ApiError> {
        let resp = self
            .http
            .patch(self.table_url(table))
            .query(filters)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        expect_json(resp).await
    }

    /// Patch a single row by primary key. Missing id maps to `NotFound`.
    pub async fn update(
        &self,
        table: &str,
        key_col: &str,
        id: i64,
        body: &Value,
    ) -> Result<Value, ApiError> {
        let rows = self
            .update_where(table, &[(key_col, format!("eq.{id}"))], body)
            .await?;
        match rows {
            Value::Array(mut rows) if !rows.is_empty() => Ok(rows.remove(0)),
            Value::Array(_) => Err(ApiError::NotFound),
            other => Ok(other),
        }
    }

    pub async fn delete_where(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.table_url(table))
            .query(filters)
            .send()
            .await?;
        expect_ok(resp)
    }

    pub async fn delete(&self, table: &str, key_col: &str, id: i64) -> Result<(), ApiError> {
        self.delete_where(table, &[(key_col, format!("eq.{id}"))])
            .await
    }
}

fn first_row(value: Value) -> Value {
    match value {
        Value::Array(mut rows) if !rows.is_empty() => rows.remove(0),
        other => other,
    }
}

fn expect_ok(resp: Response) -> Result<(), ApiError> {
    let status = resp.status();
    if status.as_u16() == 409 {
        return Err(ApiError::Duplicate("record".to_string()));
    }
    if !status.is_success() {
        log::error!("upstream returned {}", status);
        return Err(ApiError::Upstream(status.as_u16()));
    }
    Ok(())
}

async fn expect_json(resp: Response) -> Result<Value, ApiError> {
    let status = resp.status();
    if status.as_u16() == 409 {
        return Err(ApiError::Duplicate("record".to_string()));
    }
    if !status.is_success() {
        log::error!("upstream returned {}", status);
        return Err(ApiError::Upstream(status.as_u16()));
    }
    if resp.content_length() == Some(0) {
        return Ok(Value::Null);
    }
    Ok(resp.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = PostgrestClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.table_url("products"), "http://localhost:3000/products");
    }

    #[test]
    fn first_row_unwraps_representation_arrays() {
        let row = first_row(serde_json::json!([{"id": 1}]));
        assert_eq!(row["id"], 1);
    }
}
