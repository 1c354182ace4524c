use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Storefront display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    /// Parses a language tag such as `ar`, `ar-SA` or `en_US`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    /// First supported language in an `Accept-Language` header value.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .find_map(Language::from_tag)
    }
}

/// Text stored in both storefront languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    #[serde(default)]
    pub ar: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Text in `language`, falling back to English when the Arabic text is missing.
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Ar if !self.ar.is_empty() => &self.ar,
            _ => &self.en,
        }
    }
}

/// A size or color option. The label is shown, the value is what carts store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub label: LocalizedText,
    pub value: String,
}

/// Represents a product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub price: Decimal,
    pub stock: u32,
    pub category_id: Option<String>,
    pub sizes: Vec<Variant>,
    pub colors: Vec<Variant>,
    pub images: Vec<String>,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    pub price: Decimal,
    pub stock: u32,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub sizes: Vec<Variant>,
    #[serde(default)]
    pub colors: Vec<Variant>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            name: LocalizedText::new(name, ""),
            description: LocalizedText::default(),
            price,
            stock,
            category_id: None,
            sizes: Vec::new(),
            colors: Vec::new(),
            images: Vec::new(),
        }
    }
}

/// Administrative product edit. Every field is optional and none is range-checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub category_id: Option<String>,
    pub sizes: Option<Vec<Variant>>,
    pub colors: Option<Vec<Variant>>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantView {
    pub label: String,
    pub value: String,
}

/// A product resolved to one language for catalog responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
    pub category_id: Option<String>,
    pub sizes: Vec<VariantView>,
    pub colors: Vec<VariantView>,
    pub images: Vec<String>,
    pub views: u64,
}

impl Product {
    pub fn localized(&self, language: Language) -> ProductView {
        let variants = |list: &[Variant]| {
            list.iter()
                .map(|v| VariantView {
                    label: v.label.get(language).to_string(),
                    value: v.value.clone(),
                })
                .collect()
        };
        ProductView {
            id: self.id.clone(),
            name: self.name.get(language).to_string(),
            description: self.description.get(language).to_string(),
            price: self.price,
            stock: self.stock,
            category_id: self.category_id.clone(),
            sizes: variants(&self.sizes),
            colors: variants(&self.colors),
            images: self.images.clone(),
            views: self.views,
        }
    }
}
