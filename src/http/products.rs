use axum::extract::{Path, Query, State};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use tracing::instrument;

use super::{ApiError, AppState};
use crate::domain::{Language, Product, ProductCreate, ProductPatch, ProductView};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub lang: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}

/// `?lang=` wins over `Accept-Language`; English otherwise.
fn resolve_language(lang: Option<&str>, headers: &HeaderMap) -> Language {
    lang.and_then(Language::from_tag)
        .or_else(|| {
            headers
                .get(ACCEPT_LANGUAGE)
                .and_then(|value| value.to_str().ok())
                .and_then(Language::from_accept_language)
        })
        .unwrap_or_default()
}

#[instrument(skip(state, headers))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<ProductView>>, ApiError> {
    let language = resolve_language(query.lang.as_deref(), &headers);
    Ok(Json(state.products.catalog(language, query.category).await?))
}

#[instrument(skip(state, headers))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LanguageQuery>,
    headers: HeaderMap,
) -> Result<Json<ProductView>, ApiError> {
    let language = resolve_language(query.lang.as_deref(), &headers);
    let product = state.products.view_product(id).await?;
    Ok(Json(product.localized(language)))
}

#[instrument(skip(state, params))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(params): Json<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.products.create_product(params).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, patch))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.update_product(id, patch).await?))
}
