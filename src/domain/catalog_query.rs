//! Listing criteria for the catalog.
//!
//! Search, type filter, tag filter and seller filter are all optional and
//! combine with AND. The sort always applies.

use crate::config::ITEM_TYPE_ANY;
use crate::errors::{AppError, AppResult};

/// Column a listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Price,
    LikesCount,
    #[default]
    CreatedAt,
    /// Most liked first, regardless of the requested order
    Popularity,
}

impl SortKey {
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "price" => Ok(SortKey::Price),
            "likesCount" => Ok(SortKey::LikesCount),
            "createdAt" => Ok(SortKey::CreatedAt),
            "popularity" => Ok(SortKey::Popularity),
            other => Err(AppError::validation(format!(
                "sortBy must be one of price, likesCount, createdAt, popularity (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(AppError::validation("sortOrder must be asc or desc")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Sort {
    /// Order actually applied. Popularity is always descending.
    pub fn effective_order(&self) -> SortOrder {
        match self.key {
            SortKey::Popularity => SortOrder::Desc,
            _ => self.order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub item_type: Option<String>,
    pub tags: Vec<String>,
    pub seller_id: Option<i32>,
    pub sort: Sort,
}

impl CatalogQuery {
    /// Build a query from raw request parameters.
    ///
    /// Blank values are treated as absent and `type=all` means no type filter.
    pub fn from_params(
        search: Option<String>,
        item_type: Option<String>,
        tags: Option<String>,
        seller_id: Option<i32>,
        sort_by: Option<String>,
        sort_order: Option<String>,
    ) -> AppResult<Self> {
        let search = non_blank(search);
        let item_type = non_blank(item_type).filter(|t| !t.eq_ignore_ascii_case(ITEM_TYPE_ANY));
        let tags = match non_blank(tags) {
            Some(raw) => parse_tags(&raw)?,
            None => Vec::new(),
        };
        let sort = Sort {
            key: non_blank(sort_by)
                .map(|v| SortKey::parse(&v))
                .transpose()?
                .unwrap_or_default(),
            order: non_blank(sort_order)
                .map(|v| SortOrder::parse(&v))
                .transpose()?
                .unwrap_or_default(),
        };

        Ok(Self {
            search,
            item_type,
            tags,
            seller_id,
            sort,
        })
    }
}

/// Accept either a JSON array (`["anime","y2k"]`) or a comma separated list.
pub fn parse_tags(raw: &str) -> AppResult<Vec<String>> {
    let raw = raw.trim();
    let tags: Vec<String> = if raw.starts_with('[') {
        serde_json::from_str::<Vec<String>>(raw)
            .map_err(|_| AppError::validation("tags must be a JSON array of strings"))?
    } else {
        raw.split(',').map(str::to_string).collect()
    };

    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !cleaned.iter().any(|t| t == tag) {
            cleaned.push(tag.to_string());
        }
    }
    Ok(cleaned)
}

/// Escape LIKE metacharacters and wrap in `%` for a substring match.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_newest_first() {
        let query = CatalogQuery::from_params(None, None, None, None, None, None).unwrap();
        assert_eq!(query, CatalogQuery::default());
        assert_eq!(query.sort.key, SortKey::CreatedAt);
        assert_eq!(query.sort.effective_order(), SortOrder::Desc);
    }

    #[test]
    fn test_type_all_and_blanks_mean_no_filter() {
        let query = CatalogQuery::from_params(
            Some("   ".into()),
            Some("all".into()),
            Some("".into()),
            None,
            None,
            None,
        )
        .unwrap();

        assert_eq!(query.search, None);
        assert_eq!(query.item_type, None);
        assert!(query.tags.is_empty());
    }

    #[test]
    fn test_everything_composes() {
        let query = CatalogQuery::from_params(
            Some("anime".into()),
            Some("Goth".into()),
            Some(r#"["dark","y2k"]"#.into()),
            Some(4),
            Some("price".into()),
            Some("asc".into()),
        )
        .unwrap();

        assert_eq!(query.search.as_deref(), Some("anime"));
        assert_eq!(query.item_type.as_deref(), Some("Goth"));
        assert_eq!(query.tags, vec!["dark", "y2k"]);
        assert_eq!(query.seller_id, Some(4));
        assert_eq!(query.sort.key, SortKey::Price);
        assert_eq!(query.sort.effective_order(), SortOrder::Asc);
    }

    #[test]
    fn test_popularity_ignores_order() {
        let sort = Sort {
            key: SortKey::Popularity,
            order: SortOrder::Asc,
        };
        assert_eq!(sort.effective_order(), SortOrder::Desc);
    }

    #[test]
    fn test_unknown_sort_is_rejected() {
        let result = CatalogQuery::from_params(None, None, None, None, Some("rating".into()), None);
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = CatalogQuery::from_params(None, None, None, None, None, Some("up".into()));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_parse_tags_comma_list() {
        assert_eq!(parse_tags(" anime, y2k ,,anime").unwrap(), vec!["anime", "y2k"]);
    }

    #[test]
    fn test_parse_tags_bad_json() {
        assert!(parse_tags("[\"anime\"").is_err());
        assert!(parse_tags("[1, 2]").is_err());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("anime"), "%anime%");
        assert_eq!(like_pattern("100%_off\\"), "%100\\%\\_off\\\\%");
    }
}
