use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use crate::domains::auth::models::UserResponse;
use crate::domains::admin::models::AdminResponse;
use crate::domains::wallet::models::WalletResponse;
use crate::domains::ledger::models::TransactionResponse;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// (wire name, column) 쌍의 정렬 허용 목록
pub type SortWhitelist = &'static [(&'static str, &'static str)];

pub const USER_SORT_FIELDS: SortWhitelist = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("username", "username"),
    ("email", "email"),
    ("id", "id"),
];

pub const ADMIN_SORT_FIELDS: SortWhitelist = &[
    ("createdAt", "created_at"),
    ("username", "username"),
    ("email", "email"),
    ("lastLogin", "last_login"),
    ("role", "role"),
    ("id", "id"),
];

pub const WALLET_SORT_FIELDS: SortWhitelist = &[
    ("createdAt", "created_at"),
    ("balance", "balance"),
    ("currency", "currency"),
    ("address", "address"),
    ("id", "id"),
];

pub const TRANSACTION_SORT_FIELDS: SortWhitelist = &[
    ("createdAt", "created_at"),
    ("amount", "amount"),
    ("status", "status"),
    ("type", "tx_type"),
    ("id", "id"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// 검증된 페이지 요청
/// Validated page request; `sort_column` is always a whitelisted column name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort_column: &'static str,
    pub direction: SortDirection,
}

impl PageRequest {
    /// page 0, size 10, created_at DESC
    pub fn first(size: u32) -> Self {
        Self {
            page: 0,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort_column: "created_at",
            direction: SortDirection::Desc,
        }
    }

    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// 페이지 쿼리 파라미터 (`?page=0&size=10&sortBy=createdAt&sortDir=desc`)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 0-based
    pub page: Option<u32>,
    /// default 10, max 100
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    /// asc | desc
    pub sort_dir: Option<String>,
}

impl PageParams {
    /// 허용 목록으로 정렬 필드 검증 후 PageRequest 생성
    pub fn to_request(&self, sortable: SortWhitelist) -> Result<PageRequest, String> {
        let sort_by = self.sort_by.as_deref().unwrap_or("createdAt");
        let sort_column = sortable
            .iter()
            .find(|(wire, _)| *wire == sort_by)
            .map(|(_, column)| *column)
            .ok_or_else(|| format!("Unsupported sort field: {}", sort_by))?;

        let direction = match self.sort_dir.as_deref() {
            None => SortDirection::Desc,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(other) => return Err(format!("Unsupported sort direction: {}", other)),
        };

        Ok(PageRequest {
            page: self.page.unwrap_or(0),
            size: self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            sort_column,
            direction,
        })
    }
}

/// 검색어 파라미터 (`?query=`), PageParams와 함께 사용
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    pub query: String,
}

/// 페이지 응답
/// One page of results plus totals
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(
    UserPage = Page<UserResponse>,
    AdminPage = Page<AdminResponse>,
    WalletPage = Page<WalletResponse>,
    TransactionPage = Page<TransactionResponse>
)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        let size = request.size.max(1) as u64;
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(size),
            page: request.page,
            size: request.size,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            page: self.page,
            size: self.size,
        }
    }
}
