use crate::{GroceryItem, LoginRequest, LoginResponse};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use serde_json::json;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

pub const LOGIN_PATH: &str = "/api/login";
pub const GROCERIES_PATH: &str = "/api/groceries";

/// Matches the characters `encodeURIComponent` leaves alone, so path and
/// query values look identical to what the server already accepts.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// A trait that defines the request-response relationship and metadata for
/// an API endpoint. Paths may carry encoded segments or query strings, so
/// they are computed per request rather than declared as constants.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the outgoing request should carry the bearer token.
    /// Only the login endpoint opts out.
    const REQUIRES_AUTH: bool = true;

    /// The URL path (origin excluded), query string included.
    fn path(&self) -> String;

    /// The JSON body, if the operation carries one.
    fn body(&self) -> Option<serde_json::Value> {
        None
    }

    /// Decode a successful response body. The default expects JSON; plain
    /// text endpoints (the bulk update and delete messages) override this.
    fn decode(body: &str) -> Result<Self::Response, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Human-readable message used when the operation fails or the server
    /// returns an empty body.
    fn failure_message(&self) -> String;
}

// =========================================================
// Request Definitions
// =========================================================

/// List the whole grocery collection
#[derive(Debug, Clone, Copy)]
pub struct ListGroceries;

impl ApiRequest for ListGroceries {
    type Response = Vec<GroceryItem>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        GROCERIES_PATH.to_string()
    }

    fn failure_message(&self) -> String {
        "获取商品列表失败".to_string()
    }
}

/// Look up a single item by name (matching is case-insensitive server-side)
#[derive(Debug, Clone)]
pub struct GetGroceryByName {
    pub name: String,
}

impl ApiRequest for GetGroceryByName {
    type Response = GroceryItem;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("{}/name/{}", GROCERIES_PATH, encode_component(&self.name))
    }

    fn failure_message(&self) -> String {
        format!("获取商品 {} 失败", self.name)
    }
}

/// List the items belonging to one category
#[derive(Debug, Clone)]
pub struct ListByCategory {
    pub category: String,
}

impl ApiRequest for ListByCategory {
    type Response = Vec<GroceryItem>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!(
            "{}/category/{}",
            GROCERIES_PATH,
            encode_component(&self.category)
        )
    }

    fn failure_message(&self) -> String {
        format!("获取分类 {} 的商品失败", self.category)
    }
}

/// Create a new item; the server assigns the id
#[derive(Debug, Clone)]
pub struct CreateGrocery {
    pub name: String,
    pub quantity: u32,
    pub category: String,
}

impl ApiRequest for CreateGrocery {
    type Response = GroceryItem;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("{}/create", GROCERIES_PATH)
    }

    fn body(&self) -> Option<serde_json::Value> {
        Some(json!({
            "name": self.name,
            "quantity": self.quantity,
            "category": self.category,
        }))
    }

    fn failure_message(&self) -> String {
        "添加商品失败".to_string()
    }
}

/// Bulk-rename a category; the server answers with a plain-text summary
#[derive(Debug, Clone)]
pub struct UpdateCategory {
    pub current_category: String,
    pub new_category: String,
}

impl ApiRequest for UpdateCategory {
    type Response = String;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!(
            "{}/updateCategory?currentCategory={}&newCategory={}",
            GROCERIES_PATH,
            encode_component(&self.current_category),
            encode_component(&self.new_category)
        )
    }

    fn decode(body: &str) -> Result<String, serde_json::Error> {
        Ok(body.to_string())
    }

    fn failure_message(&self) -> String {
        format!("更新分类 {} 失败", self.current_category)
    }
}

/// Set an item's quantity, addressed by name; plain-text answer
#[derive(Debug, Clone)]
pub struct UpdateQuantity {
    pub name: String,
    pub new_quantity: u32,
}

impl ApiRequest for UpdateQuantity {
    type Response = String;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!(
            "{}/updateQuantity?name={}&newQuantity={}",
            GROCERIES_PATH,
            encode_component(&self.name),
            self.new_quantity
        )
    }

    fn decode(body: &str) -> Result<String, serde_json::Error> {
        Ok(body.to_string())
    }

    fn failure_message(&self) -> String {
        format!("更新商品 {} 的数量失败", self.name)
    }
}

/// Delete an item by id; plain-text answer
#[derive(Debug, Clone)]
pub struct DeleteGrocery {
    pub id: String,
}

impl ApiRequest for DeleteGrocery {
    type Response = String;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("{}/{}", GROCERIES_PATH, encode_component(&self.id))
    }

    fn decode(body: &str) -> Result<String, serde_json::Error> {
        Ok(body.to_string())
    }

    fn failure_message(&self) -> String {
        "删除商品失败".to_string()
    }
}

/// Total number of items in the remote store
#[derive(Debug, Clone, Copy)]
pub struct CountGroceries;

impl ApiRequest for CountGroceries {
    type Response = u64;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("{}/count", GROCERIES_PATH)
    }

    fn failure_message(&self) -> String {
        "获取商品总数失败".to_string()
    }
}

/// Credential exchange. The only unauthenticated request in the protocol.
impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = false;

    fn path(&self) -> String {
        LOGIN_PATH.to_string()
    }

    fn body(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }

    fn failure_message(&self) -> String {
        "登录失败".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_are_percent_encoded() {
        let req = GetGroceryByName {
            name: "Organic Apples".to_string(),
        };
        assert_eq!(req.path(), "/api/groceries/name/Organic%20Apples");

        let req = ListByCategory {
            category: "Baked Goods & Bread".to_string(),
        };
        assert_eq!(
            req.path(),
            "/api/groceries/category/Baked%20Goods%20%26%20Bread"
        );
    }

    #[test]
    fn update_quantity_builds_the_expected_query() {
        let req = UpdateQuantity {
            name: "Organic Apples".to_string(),
            new_quantity: 10,
        };
        assert_eq!(
            req.path(),
            "/api/groceries/updateQuantity?name=Organic%20Apples&newQuantity=10"
        );
        assert_eq!(<UpdateQuantity as ApiRequest>::METHOD, HttpMethod::Put);
    }

    #[test]
    fn plain_text_endpoints_pass_the_body_through() {
        let decoded =
            <DeleteGrocery as ApiRequest>::decode("Deleted grocery item with id: 42").unwrap();
        assert_eq!(decoded, "Deleted grocery item with id: 42");
    }

    #[test]
    fn count_decodes_a_bare_integer() {
        assert_eq!(<CountGroceries as ApiRequest>::decode("17").unwrap(), 17);
    }

    #[test]
    fn only_login_skips_auth() {
        assert!(!<LoginRequest as ApiRequest>::REQUIRES_AUTH);
        assert!(<ListGroceries as ApiRequest>::REQUIRES_AUTH);
        assert!(<DeleteGrocery as ApiRequest>::REQUIRES_AUTH);
    }

    #[test]
    fn create_body_carries_no_id() {
        let req = CreateGrocery {
            name: "Milk".to_string(),
            quantity: 2,
            category: "Dairy".to_string(),
        };
        let body = req.body().unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["quantity"], 2);
    }
}
