use serde::{Deserialize, Serialize};

pub const DEFAULT_FUNCTION_NAME: &str = "optimize-source";
pub const DEFAULT_REGION: &str = "ap-south-1";
pub const DEFAULT_SORT_BY: &str = "time";
pub const DEFAULT_SORT_ORDER: &str = "descending";
pub const DEFAULT_ITEMS_TO_GET: u32 = 10;
pub const DEFAULT_INVOKE_TIMEOUT_SECS: u64 = 30;

pub const RESULT_SUCCESS: &str = "success";
pub const RESULT_FAILURE: &str = "failure";

/// Client configuration. `Default` holds the standard deployment values;
/// a flagless run uses them unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub function_name: String,
    pub region: String,
    pub sort_by: String,
    pub sort_order: String,
    pub items_to_get: u32,
    pub invoke_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            region: DEFAULT_REGION.to_string(),
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_order: DEFAULT_SORT_ORDER.to_string(),
            items_to_get: DEFAULT_ITEMS_TO_GET,
            invoke_timeout_secs: DEFAULT_INVOKE_TIMEOUT_SECS,
        }
    }
}

impl FetchConfig {
    pub fn request(&self) -> GetItemsRequest {
        GetItemsRequest {
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
            items_to_get: self.items_to_get,
        }
    }
}

/// Invocation payload. Field declaration order is the wire field order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetItemsRequest {
    #[serde(rename = "SortBy")]
    pub sort_by: String,
    #[serde(rename = "SortOrder")]
    pub sort_order: String,
    #[serde(rename = "ItemsToGet")]
    pub items_to_get: u32,
}

/// Gateway-style response envelope. Decoding is lenient: the upstream
/// function omits fields on some paths, and absent fields take zero values
/// (status 0, empty result, empty data, no error detail).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetItemsResponse {
    #[serde(rename = "statusCode", default)]
    pub status_code: i64,
    #[serde(default)]
    pub headers: ResponseHeaders,
    #[serde(default)]
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseHeaders {
    #[serde(rename = "Content-Type", default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseBody {
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub data: Vec<ItemRecord>,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRecord {
    pub item: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}

pub fn encode_request(request: &GetItemsRequest) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(request)
}

pub fn decode_response(payload: &[u8]) -> serde_json::Result<GetItemsResponse> {
    serde_json::from_slice(payload)
}
