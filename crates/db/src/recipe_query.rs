//! SQL construction for recipe reads and writes.
//!
//! Everything here is pure: builders return a [`QueryBuilder`] whose text
//! depends only on the filter and the [`SchemaCapabilities`], with every
//! user-supplied value pushed as a bound parameter.

use recettes_core::listing::{contains_pattern, Pagination, RecipeFilter};
use recettes_core::recipe::RecipeDraft;
use recettes_core::types::DbId;
use sqlx::{Postgres, QueryBuilder};

use crate::schema::SchemaCapabilities;

/// `SELECT ... FROM recipes r LEFT JOIN users u` producing a
/// [`Recipe`](crate::models::recipe::Recipe) row.
pub fn recipe_select(caps: SchemaCapabilities) -> String {
    let video_url = if caps.video_url {
        "r.video_url"
    } else {
        "NULL::TEXT AS video_url"
    };
    let views = if caps.views {
        "r.views"
    } else {
        "NULL::INT4 AS views"
    };
    format!(
        "SELECT r.id, r.user_id, r.title, r.description, r.image_url, {video_url}, \
         r.cuisine_type, r.prep_time_minutes, r.servings, r.instructions, {views}, \
         r.created_at, u.name AS user_name, \
         (SELECT AVG(rt.rating)::FLOAT8 FROM ratings rt WHERE rt.recipe_id = r.id) AS avg_rating, \
         (SELECT COUNT(*) FROM ratings rt WHERE rt.recipe_id = r.id) AS ratings_count \
         FROM recipes r LEFT JOIN users u ON u.id = r.user_id"
    )
}

/// Predicate selecting recipes with a non-blank video URL.
const HAS_VIDEO_PREDICATE: &str = "r.video_url IS NOT NULL AND btrim(r.video_url) <> ''";

/// One page of recipes matching `filter`, newest first.
pub fn build_list_query(
    filter: &RecipeFilter,
    caps: SchemaCapabilities,
    page: Pagination,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(recipe_select(caps));
    push_filter(&mut qb, filter, caps);
    qb.push(" ORDER BY r.created_at DESC, r.id DESC LIMIT ");
    qb.push_bind(page.limit);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset());
    qb
}

/// Number of recipes matching `filter`, ignoring pagination.
pub fn build_count_query(
    filter: &RecipeFilter,
    caps: SchemaCapabilities,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM recipes r");
    push_filter(&mut qb, filter, caps);
    qb
}

/// Newest recipes carrying a video. `None` when the column is absent.
pub fn build_video_list_query(
    caps: SchemaCapabilities,
    limit: i64,
) -> Option<QueryBuilder<'static, Postgres>> {
    if !caps.video_url {
        return None;
    }
    let mut qb = QueryBuilder::new(recipe_select(caps));
    qb.push(" WHERE ");
    qb.push(HAS_VIDEO_PREDICATE);
    qb.push(" ORDER BY r.created_at DESC, r.id DESC LIMIT ");
    qb.push_bind(limit);
    Some(qb)
}

/// Append the `WHERE` clause for `filter`.
///
/// Ingredient terms use an `EXISTS` semijoin so a recipe matching several
/// terms is still returned once.
pub fn push_filter(
    qb: &mut QueryBuilder<'static, Postgres>,
    filter: &RecipeFilter,
    caps: SchemaCapabilities,
) {
    let mut first = true;
    let mut and = |qb: &mut QueryBuilder<'static, Postgres>| {
        qb.push(if first { " WHERE " } else { " AND " });
        first = false;
    };

    if let Some(title) = &filter.title {
        and(qb);
        qb.push("r.title ILIKE ");
        qb.push_bind(contains_pattern(title));
    }

    if !filter.ingredients.is_empty() {
        and(qb);
        qb.push(
            "EXISTS (SELECT 1 FROM recipe_ingredients ri \
             JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE ri.recipe_id = r.id AND (",
        );
        for (idx, term) in filter.ingredients.iter().enumerate() {
            if idx > 0 {
                qb.push(" OR ");
            }
            qb.push("i.name ILIKE ");
            qb.push_bind(contains_pattern(term));
        }
        qb.push("))");
    }

    if let Some(cuisine) = &filter.cuisine {
        and(qb);
        qb.push("r.cuisine_type = ");
        qb.push_bind(cuisine.clone());
    }

    if let Some(max) = filter.max_prep_minutes {
        and(qb);
        qb.push("r.prep_time_minutes <= ");
        qb.push_bind(max);
    }

    if filter.has_video && caps.video_url {
        and(qb);
        qb.push(HAS_VIDEO_PREDICATE);
    }
}

/// `INSERT INTO recipes ... RETURNING id`, writing only existing columns.
pub fn build_insert(
    user_id: DbId,
    draft: &RecipeDraft,
    caps: SchemaCapabilities,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "INSERT INTO recipes (user_id, title, description, image_url, cuisine_type, \
         prep_time_minutes, servings, instructions",
    );
    if caps.video_url {
        qb.push(", video_url");
    }
    if caps.views {
        qb.push(", views");
    }
    qb.push(") VALUES (");

    let mut values = qb.separated(", ");
    values.push_bind(user_id);
    values.push_bind(draft.title.clone());
    values.push_bind(draft.description.clone());
    values.push_bind(draft.image_url.clone());
    values.push_bind(draft.cuisine_type.clone());
    values.push_bind(draft.prep_time_minutes);
    values.push_bind(draft.servings);
    values.push_bind(draft.instructions.clone());
    if caps.video_url {
        values.push_bind(draft.video_url.clone());
    }
    if caps.views {
        values.push_bind(0_i32);
    }
    values.push_unseparated(") RETURNING id");

    qb
}

/// `UPDATE recipes SET ... WHERE id = $n`, overwriting every scalar that
/// exists in the schema.
pub fn build_update(
    id: DbId,
    draft: &RecipeDraft,
    caps: SchemaCapabilities,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE recipes SET ");

    let mut set = qb.separated(", ");
    set.push("title = ").push_bind_unseparated(draft.title.clone());
    set.push("description = ")
        .push_bind_unseparated(draft.description.clone());
    set.push("image_url = ")
        .push_bind_unseparated(draft.image_url.clone());
    set.push("cuisine_type = ")
        .push_bind_unseparated(draft.cuisine_type.clone());
    set.push("prep_time_minutes = ")
        .push_bind_unseparated(draft.prep_time_minutes);
    set.push("servings = ").push_bind_unseparated(draft.servings);
    set.push("instructions = ")
        .push_bind_unseparated(draft.instructions.clone());
    if caps.video_url {
        set.push("video_url = ")
            .push_bind_unseparated(draft.video_url.clone());
    }

    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb
}
