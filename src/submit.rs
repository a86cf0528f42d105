//! Submission payloads and the in-process echo backend

use crate::Result;
use serde::{Deserialize, Serialize};

/// Body sent to the processing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub customer_ids: Vec<String>,
}

/// Echo-style reply from the processing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
    pub selected_ids: Vec<String>,
}

/// Anything that can accept a batch of selected customer ids
pub trait Submitter {
    fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResponse>;
}

/// Stateless backend that acknowledges whatever it receives
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoBackend;

impl Submitter for EchoBackend {
    fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResponse> {
        let count = request.customer_ids.len();
        log::info!("Echo backend received {} customer ids", count);
        Ok(SubmissionResponse {
            success: true,
            message: format!("Successfully processed {count} customers"),
            count,
            selected_ids: request.customer_ids.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_backend_returns_ids() {
        let request = SubmissionRequest {
            customer_ids: vec!["CUST_003".to_string(), "CUST_010".to_string()],
        };
        let response = EchoBackend.submit(&request).unwrap();
        assert!(response.success);
        assert_eq!(response.count, 2);
        assert_eq!(response.selected_ids, request.customer_ids);
        assert_eq!(response.message, "Successfully processed 2 customers");
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let request = SubmissionRequest {
            customer_ids: vec!["CUST_001".to_string()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["customerIds"][0], "CUST_001");

        let response = EchoBackend.submit(&request).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["selectedIds"][0], "CUST_001");
        assert_eq!(json["count"], 1);
        assert_eq!(json["success"], true);
    }
}
