//! Domain DTOs carried inside the `data` field of the envelope.
//!
//! # Design
//! These mirror the mock-server's records but are defined independently.
//! Integration tests against the live server catch any drift between the two.

use serde::{Deserialize, Serialize};

use crate::envelope::Pagination;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: User,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub author: User,
    pub post_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The canned record served by `GET /example`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Query parameters for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u32,
    pub limit: u32,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl PaginationParams {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            sort: None,
            order: None,
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(sort) = &self.sort {
            query.push(("sort".to_string(), sort.clone()));
        }
        if let Some(order) = self.order {
            query.push(("order".to_string(), order.as_str().to_string()));
        }
        query
    }
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}
