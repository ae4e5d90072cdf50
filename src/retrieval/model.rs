use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The four nested category levels, most general first. Empty string means "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryHierarchy {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub sub_category: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub sub_sub_category: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub sub_sub_sub_category: String,
}

impl CategoryHierarchy {
    pub fn new(
        category: impl Into<String>,
        sub_category: impl Into<String>,
        sub_sub_category: impl Into<String>,
        sub_sub_sub_category: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            sub_category: sub_category.into(),
            sub_sub_category: sub_sub_category.into(),
            sub_sub_sub_category: sub_sub_sub_category.into(),
        }
    }

    /// Builds a hierarchy from levels ordered like [`crate::constants::HIERARCHY_FIELDS`].
    pub fn from_levels([a, b, c, d]: [String; 4]) -> Self {
        Self::new(a, b, c, d)
    }

    /// Levels ordered like [`crate::constants::HIERARCHY_FIELDS`].
    pub fn levels(&self) -> [&str; 4] {
        [
            &self.category,
            &self.sub_category,
            &self.sub_sub_category,
            &self.sub_sub_sub_category,
        ]
    }

    /// `true` when every level carries a value.
    pub fn is_complete(&self) -> bool {
        self.levels().iter().all(|level| !level.is_empty())
    }

    /// `true` when no level carries a value.
    pub fn is_empty(&self) -> bool {
        self.levels().iter().all(|level| level.is_empty())
    }

    /// Human readable path, e.g. `Footwear >> Men >> Shoes >> Sneakers`.
    pub fn path(&self) -> String {
        self.levels().join(" >> ")
    }
}

/// A retrieved product. Produced by the retrieval engine and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    #[serde(deserialize_with = "id_string")]
    pub product_id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub brand: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub discounted_price: Option<f64>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub item_image_url: String,
    #[serde(flatten)]
    pub hierarchy: CategoryHierarchy,
}

impl CandidateResult {
    /// Creates a candidate with only an id and name; other display fields are empty.
    pub fn new(product_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            brand: String::new(),
            discounted_price: None,
            item_image_url: String::new(),
            hierarchy: CategoryHierarchy::default(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.discounted_price = Some(price);
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.item_image_url = url.into();
        self
    }

    pub fn with_hierarchy(mut self, hierarchy: CategoryHierarchy) -> Self {
        self.hierarchy = hierarchy;
        self
    }
}

/// Extracts the ids of `candidates`, preserving order.
pub fn product_ids(candidates: &[CandidateResult]) -> Vec<String> {
    candidates.iter().map(|c| c.product_id.clone()).collect()
}

/// A top-level category and the number of products in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub product_count: u64,
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "product_id must be a string or number, got {}",
            other
        ))),
    }
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    })
}
