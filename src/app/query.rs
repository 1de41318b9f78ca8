//! Pagination, filter and search translation shared by recipe listing,
//! category browsing, featured recipes and search.

use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};

use crate::app::access::VisibilityFilter;
use crate::app::validation::Validator;
use crate::domain::recipe::{Category, Difficulty};

pub const DEFAULT_RECIPE_LIMIT: i64 = 12;
pub const DEFAULT_NOTIFICATION_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 50;
pub const FEATURED_LIMIT: i64 = 6;
pub const SEARCH_MAX_CHARS: usize = 200;

/// Columns of the list-view projection. `instructions` is never selected here.
pub const SUMMARY_COLUMNS: &str = "id, title, description, category, ingredients, prep_time, \
     cook_time, servings, difficulty, image_url, youtube_url, is_premium, is_active, tags, \
     nutrition, rating_average, rating_count, views, created_by, created_at, updated_at";

/// Text searched by relevance: title, description and tags.
pub const SEARCH_DOCUMENT: &str =
    "to_tsvector('english', title || ' ' || description || ' ' || array_to_string(tags, ' '))";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    pub fn first(limit: i64) -> Self {
        Self {
            page: 1,
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// `page` must be a positive integer; `limit` is clamped to `[1, MAX_LIMIT]`.
    pub fn from_numbers(
        page: Option<i64>,
        limit: Option<i64>,
        default_limit: i64,
        v: &mut Validator,
    ) -> Self {
        let page = match page {
            None => 1,
            Some(page) if page >= 1 => page,
            Some(_) => {
                v.error("page", "Page must be a positive integer");
                1
            }
        };
        let limit = limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// Same rules as [`PageRequest::from_numbers`] for raw query-string values.
    pub fn from_query(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: i64,
        v: &mut Validator,
    ) -> Self {
        let page = match blank_to_none(page).map(str::parse::<i64>) {
            None => None,
            Some(Ok(page)) => Some(page),
            Some(Err(_)) => {
                v.error("page", "Page must be a positive integer");
                None
            }
        };
        let limit = match blank_to_none(limit).map(str::parse::<i64>) {
            None => None,
            Some(Ok(limit)) => Some(limit),
            Some(Err(_)) => {
                v.error("limit", "Limit must be an integer");
                None
            }
        };
        Self::from_numbers(page, limit, default_limit, v)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilters {
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    /// Narrowing only: it is conjoined with the visibility filter.
    pub premium: Option<bool>,
    pub search: Option<String>,
}

impl RecipeFilters {
    pub fn from_query(
        category: Option<&str>,
        difficulty: Option<&str>,
        premium: Option<&str>,
        search: Option<&str>,
        v: &mut Validator,
    ) -> Self {
        let category = blank_to_none(category).and_then(|value| {
            let parsed = Category::parse(value);
            if parsed.is_none() {
                v.error("category", "Invalid category");
            }
            parsed
        });
        let difficulty = blank_to_none(difficulty).and_then(|value| {
            let parsed = Difficulty::parse(value);
            if parsed.is_none() {
                v.error("difficulty", "Invalid difficulty level");
            }
            parsed
        });
        let premium = blank_to_none(premium).and_then(|value| match value {
            "true" => Some(true),
            "false" => Some(false),
            _ => {
                v.error("isPremium", "isPremium must be a boolean");
                None
            }
        });
        let search = normalize_search(search, v);

        Self {
            category,
            difficulty,
            premium,
            search,
        }
    }
}

pub fn normalize_search(search: Option<&str>, v: &mut Validator) -> Option<String> {
    let search = blank_to_none(search)?;
    if search.chars().count() > SEARCH_MAX_CHARS {
        v.error(
            "search",
            format!("Search text cannot exceed {} characters", SEARCH_MAX_CHARS),
        );
        return None;
    }
    Some(search.to_string())
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeOrder {
    /// Creation time, newest first.
    Newest,
    /// Text relevance score, highest first. Only chosen when a search
    /// term is present.
    Relevance,
    /// Rating then views, highest first.
    Featured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub visibility: VisibilityFilter,
    pub filters: RecipeFilters,
    pub order: RecipeOrder,
    pub page: PageRequest,
}

pub fn build_listing_query(
    page: PageRequest,
    filters: RecipeFilters,
    visibility: VisibilityFilter,
) -> ListingQuery {
    let order = if filters.search.is_some() {
        RecipeOrder::Relevance
    } else {
        RecipeOrder::Newest
    };
    ListingQuery {
        visibility,
        filters,
        order,
        page,
    }
}

pub fn featured_query(visibility: VisibilityFilter) -> ListingQuery {
    ListingQuery {
        visibility,
        filters: RecipeFilters::default(),
        order: RecipeOrder::Featured,
        page: PageRequest::first(FEATURED_LIMIT),
    }
}

impl ListingQuery {
    pub fn select_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(SUMMARY_COLUMNS);
        if self.order == RecipeOrder::Relevance {
            qb.push(", ts_rank(");
            qb.push(SEARCH_DOCUMENT);
            qb.push(", websearch_to_tsquery('english', ");
            qb.push_bind(self.filters.search.clone().unwrap_or_default());
            qb.push(")) AS score");
        }
        qb.push(" FROM recipes");
        self.push_predicate(&mut qb);

        qb.push(match self.order {
            RecipeOrder::Newest => " ORDER BY created_at DESC, id DESC",
            RecipeOrder::Relevance => " ORDER BY score DESC, created_at DESC, id DESC",
            RecipeOrder::Featured => {
                " ORDER BY rating_average DESC, views DESC, created_at DESC, id DESC"
            }
        });

        qb.push(" LIMIT ");
        qb.push_bind(self.page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(self.page.skip());
        qb
    }

    pub fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM recipes");
        self.push_predicate(&mut qb);
        qb
    }

    fn push_predicate(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(" WHERE is_active = TRUE");
        if !self.visibility.include_premium() {
            qb.push(" AND is_premium = FALSE");
        }
        if let Some(category) = self.filters.category {
            qb.push(" AND category = ");
            qb.push_bind(category.as_db());
        }
        if let Some(difficulty) = self.filters.difficulty {
            qb.push(" AND difficulty = ");
            qb.push_bind(difficulty.as_db());
        }
        if let Some(premium) = self.filters.premium {
            qb.push(" AND is_premium = ");
            qb.push_bind(premium);
        }
        if let Some(search) = &self.filters.search {
            qb.push(" AND ");
            qb.push(SEARCH_DOCUMENT);
            qb.push(" @@ websearch_to_tsquery('english', ");
            qb.push_bind(search.clone());
            qb.push(")");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn new(page: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        let total_pages = (total + page.limit() - 1) / page.limit();
        Self {
            current_page: page.page(),
            total_pages,
            total_items: total,
            has_next: page.page() < total_pages,
            has_prev: page.page() > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::access::{visibility_filter, Caller};
    use crate::domain::user::Tier;
    use uuid::Uuid;

    fn free() -> VisibilityFilter {
        visibility_filter(&Caller::Anonymous)
    }

    fn standard() -> VisibilityFilter {
        visibility_filter(&Caller::Member {
            user_id: Uuid::new_v4(),
            tier: Tier::Standard,
        })
    }

    fn page(page: Option<&str>, limit: Option<&str>) -> (PageRequest, bool) {
        let mut v = Validator::new();
        let request = PageRequest::from_query(page, limit, DEFAULT_RECIPE_LIMIT, &mut v);
        (request, v.is_empty())
    }

    #[test]
    fn defaults_to_first_page_of_twelve() {
        let (request, ok) = page(None, None);
        assert!(ok);
        assert_eq!((request.page(), request.limit(), request.skip()), (1, 12, 0));
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(page(None, Some("100")).0.limit(), 50);
        assert_eq!(page(None, Some("0")).0.limit(), 1);
        assert_eq!(page(None, Some("-4")).0.limit(), 1);
    }

    #[test]
    fn page_zero_and_garbage_are_rejected() {
        assert!(!page(Some("0"), None).1);
        assert!(!page(Some("-1"), None).1);
        assert!(!page(Some("two"), None).1);
        assert!(!page(None, Some("many")).1);
    }

    #[test]
    fn skip_follows_page_and_limit() {
        let (request, ok) = page(Some("3"), Some("12"));
        assert!(ok);
        assert_eq!(request.skip(), 24);
    }

    #[test]
    fn page_info_for_twenty_five_items() {
        let mut v = Validator::new();
        let expectations = [(1, true, false), (2, true, true), (3, false, true)];
        for (number, has_next, has_prev) in expectations {
            let request = PageRequest::from_numbers(Some(number), Some(12), 12, &mut v);
            let info = PageInfo::new(request, 25);
            assert_eq!(info.total_pages, 3);
            assert_eq!(info.has_next, has_next, "page {}", number);
            assert_eq!(info.has_prev, has_prev, "page {}", number);
        }
        assert!(v.is_empty());
    }

    #[test]
    fn empty_result_has_no_pages() {
        let info = PageInfo::new(PageRequest::first(12), 0);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next && !info.has_prev);
    }

    #[test]
    fn free_callers_get_premium_excluded() {
        let query = build_listing_query(PageRequest::first(12), RecipeFilters::default(), free());
        let sql = query.select_query().sql().to_string();
        assert!(sql.contains("WHERE is_active = TRUE AND is_premium = FALSE"));
        assert!(query.count_query().sql().contains("is_premium = FALSE"));
    }

    #[test]
    fn paid_callers_only_get_active_constraint() {
        let query =
            build_listing_query(PageRequest::first(12), RecipeFilters::default(), standard());
        let sql = query.select_query().sql().to_string();
        assert!(sql.contains("WHERE is_active = TRUE ORDER BY created_at DESC"));
        let count = query.count_query().sql().to_string();
        assert!(!count.contains("is_premium"));
    }

    #[test]
    fn user_premium_filter_cannot_widen_visibility() {
        let filters = RecipeFilters {
            premium: Some(true),
            ..RecipeFilters::default()
        };
        let query = build_listing_query(PageRequest::first(12), filters, free());
        let sql = query.count_query().sql().to_string();
        assert!(sql.contains("is_premium = FALSE"));
        assert!(sql.contains("AND is_premium = $1"));
    }

    #[test]
    fn search_orders_by_relevance() {
        let filters = RecipeFilters {
            search: Some("paneer".into()),
            category: Some(Category::Indian),
            ..RecipeFilters::default()
        };
        let query = build_listing_query(PageRequest::first(12), filters, standard());
        assert_eq!(query.order, RecipeOrder::Relevance);
        let sql = query.select_query().sql().to_string();
        assert!(sql.contains("ts_rank("));
        assert!(sql.contains("@@ websearch_to_tsquery('english', "));
        assert!(sql.contains("ORDER BY score DESC"));
        assert!(sql.contains("AND category = "));
    }

    #[test]
    fn listing_without_search_is_not_ranked() {
        let query = build_listing_query(PageRequest::first(12), RecipeFilters::default(), free());
        assert_eq!(query.order, RecipeOrder::Newest);
        let sql = query.select_query().sql().to_string();
        assert!(!sql.contains("ts_rank("));
        assert!(!sql.contains("score"));
    }

    #[test]
    fn featured_orders_by_rating_then_views() {
        let query = featured_query(free());
        assert_eq!(query.page.limit(), FEATURED_LIMIT);
        let sql = query.select_query().sql().to_string();
        assert!(sql.contains("ORDER BY rating_average DESC, views DESC"));
    }

    #[test]
    fn list_projection_excludes_instructions() {
        assert!(!SUMMARY_COLUMNS.contains("instructions"));
    }

    #[test]
    fn invalid_filters_are_reported() {
        let mut v = Validator::new();
        let filters = RecipeFilters::from_query(
            Some("french"),
            Some("easy"),
            Some("maybe"),
            Some("  "),
            &mut v,
        );
        assert_eq!(filters.difficulty, Some(Difficulty::Easy));
        assert_eq!(filters.search, None);
        let err = v.finish().unwrap_err();
        match err {
            crate::app::error::ServiceError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["category", "isPremium"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
