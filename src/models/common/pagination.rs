use serde::{Deserialize, Serialize};

// 分页查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

impl PaginationQuery {
    /// 规范化页码与每页数量（页码从 1 开始，每页 1..=100）
    pub fn normalized(&self) -> (u64, u64) {
        (self.page.max(1) as u64, self.size.clamp(1, 100) as u64)
    }
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T> PaginatedResponse<T> {
    /// 对已排序的完整列表做内存分页
    pub fn from_sorted(all: Vec<T>, page: u64, size: u64) -> Self {
        let total = all.len() as u64;
        let skip = ((page.max(1) - 1) * size) as usize;
        let items = all.into_iter().skip(skip).take(size as usize).collect();
        Self {
            items,
            pagination: PaginationInfo::new(page, size, total),
        }
    }
}

// 自定义反序列化函数，支持字符串到i64的转换
pub(crate) fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

pub(crate) fn default_page() -> i64 {
    1
}

pub(crate) fn default_size() -> i64 {
    20
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 20 }
    }
}
