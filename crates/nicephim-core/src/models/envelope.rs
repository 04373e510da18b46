use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_ERROR;
use crate::error::ClientError;

/// `{success, data, error}` wrapper returned by the admin and image endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub pagination: Option<Pagination>,
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Envelope<T> {
    fn failure(&self) -> ClientError {
        let message = self
            .error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        ClientError::Api(message)
    }

    /// Unwrap the payload. `success: false` becomes [`ClientError::Api`]; a
    /// successful envelope without `data` is a shape mismatch.
    pub fn into_data(self) -> Result<T, ClientError> {
        if !self.success {
            return Err(self.failure());
        }
        self.data
            .ok_or_else(|| ClientError::Decode("envelope is missing `data`".to_string()))
    }

    /// For endpoints whose payload is irrelevant (deletes, link/unlink).
    /// Returns the backend's confirmation message, if any.
    pub fn into_ack(self) -> Result<Option<String>, ClientError> {
        if !self.success {
            return Err(self.failure());
        }
        Ok(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_data_success() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2,3],"count":3}"#).unwrap();
        assert_eq!(env.count, Some(3));
        assert_eq!(env.into_data().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_into_data_failure_prefers_error_field() {
        let env: Envelope<u32> = serde_json::from_str(
            r#"{"success":false,"error":"Không tìm thấy phim","message":"ignored"}"#,
        )
        .unwrap();
        match env.into_data() {
            Err(ClientError::Api(msg)) => assert_eq!(msg, "Không tìm thấy phim"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_into_data_missing_data_is_decode_error() {
        let env: Envelope<u32> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(env.into_data(), Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_into_ack_returns_message() {
        let env: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true,"message":"Xóa phim thành công!"}"#).unwrap();
        assert_eq!(
            env.into_ack().unwrap().as_deref(),
            Some("Xóa phim thành công!")
        );
    }

    #[test]
    fn test_pagination_camel_case() {
        let p: Pagination =
            serde_json::from_str(r#"{"page":0,"size":10,"total":42,"totalPages":5}"#).unwrap();
        assert_eq!(p.total_pages, 5);
        assert_eq!(p.total, 42);
    }
}
