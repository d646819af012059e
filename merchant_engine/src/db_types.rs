//! Record types shared by every catalog backend.
//!
//! Row types (`Store`, `Product`, `ProductVariant`, ...) map one-to-one onto database tables. The `New*` and `*Update`
//! types carry validated input into the backends, and the `*Detail` types are the joined views returned to clients.
//! All identifiers are opaque strings; new rows receive a random UUID.
use std::{convert::Infallible, fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use merchant_common::Price;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new_random() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

//--------------------------------------       Identifiers     ---------------------------------------------------------
id_type!(
    /// The id of the signed-in user, as supplied by the authentication provider.
    UserId
);
id_type!(StoreId);
id_type!(CategoryId);
id_type!(ColorId);
id_type!(SizeId);
id_type!(ProductId);
id_type!(ImageId);
id_type!(VariantId);

//--------------------------------------      Reference data    --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub store_id: StoreId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: ColorId,
    pub store_id: StoreId,
    pub name: String,
    /// Usually a hex code, e.g. `#ff0000`
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id: SizeId,
    pub store_id: StoreId,
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStore {
    pub id: StoreId,
    pub name: String,
    pub user_id: UserId,
}

impl NewStore {
    pub fn new<S: Into<String>>(name: S, user_id: UserId) -> Self {
        Self { id: StoreId::new_random(), name: name.into(), user_id }
    }

    pub fn with_id(mut self, id: StoreId) -> Self {
        self.id = id;
        self
    }
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub id: CategoryId,
    pub store_id: StoreId,
    pub name: String,
}

impl NewCategory {
    pub fn new<S: Into<String>>(store_id: StoreId, name: S) -> Self {
        Self { id: CategoryId::new_random(), store_id, name: name.into() }
    }

    pub fn with_id(mut self, id: CategoryId) -> Self {
        self.id = id;
        self
    }
}

/// Colors and sizes share the same shape: a display name plus a value.
#[derive(Debug, Clone)]
pub struct NewAttribute<Id> {
    pub id: Id,
    pub store_id: StoreId,
    pub name: String,
    pub value: String,
}

pub type NewColor = NewAttribute<ColorId>;
pub type NewSize = NewAttribute<SizeId>;

impl NewColor {
    pub fn new<S: Into<String>>(store_id: StoreId, name: S, value: S) -> Self {
        Self { id: ColorId::new_random(), store_id, name: name.into(), value: value.into() }
    }
}

impl NewSize {
    pub fn new<S: Into<String>>(store_id: StoreId, name: S, value: S) -> Self {
        Self { id: SizeId::new_random(), store_id, name: name.into(), value: value.into() }
    }
}

impl<Id> NewAttribute<Id> {
    pub fn with_id(mut self, id: Id) -> Self {
        self.id = id;
        self
    }
}

//--------------------------------------         Products       --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub is_featured: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub color_id: ColorId,
    pub size_id: SizeId,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A variant joined with the color and size it refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDetail {
    #[serde(flatten)]
    pub variant: ProductVariant,
    pub color: Color,
    pub size: Size,
}

/// A product joined with its category, images and variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
    pub images: Vec<Image>,
    pub variants: Vec<VariantDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewImage {
    pub url: String,
}

impl NewImage {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self { url: url.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVariant {
    pub color_id: ColorId,
    pub size_id: SizeId,
    pub quantity: i64,
}

impl NewVariant {
    pub fn new(color_id: ColorId, size_id: SizeId, quantity: i64) -> Self {
        Self { color_id, size_id, quantity }
    }
}

/// A validated product, ready to be inserted along with all of its images and variants.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub store_id: StoreId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub is_featured: bool,
    pub is_archived: bool,
    pub images: Vec<NewImage>,
    pub variants: Vec<NewVariant>,
}

impl NewProduct {
    pub fn new<S: Into<String>>(store_id: StoreId, category_id: CategoryId, name: S, price: Price) -> Self {
        Self {
            store_id,
            category_id,
            name: name.into(),
            description: String::default(),
            price,
            is_featured: false,
            is_archived: false,
            images: Vec::new(),
            variants: Vec::new(),
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: NewImage) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_variant(mut self, variant: NewVariant) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.is_featured = featured;
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.is_archived = archived;
        self
    }
}

/// A validated product update.
///
/// Applying it overwrites the scalar fields, replaces the full image set with `images`, and *appends* `variants` to the
/// variants the product already has. Existing variants are never removed by an update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub category_id: CategoryId,
    pub name: String,
    /// The description is only overwritten when supplied.
    pub description: Option<String>,
    pub price: Price,
    pub is_featured: bool,
    pub is_archived: bool,
    pub images: Vec<NewImage>,
    pub variants: Vec<NewVariant>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantUpdate {
    pub color_id: Option<ColorId>,
    pub size_id: Option<SizeId>,
    pub quantity: Option<i64>,
}

impl VariantUpdate {
    pub fn with_color_id(mut self, color_id: ColorId) -> Self {
        self.color_id = Some(color_id);
        self
    }

    pub fn with_size_id(mut self, size_id: SizeId) -> Self {
        self.size_id = Some(size_id);
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.color_id.is_none() && self.size_id.is_none() && self.quantity.is_none()
    }
}

//--------------------------------------      DeletionStage     --------------------------------------------------------
/// The stages of the product deletion workflow. A product is only removed once every variant it owns has been purged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStage {
    /// The owner check passed and deletion has started.
    Requested,
    /// Every variant owned by the product has been deleted.
    VariantsPurged,
    /// The product row (and its images) is gone.
    Deleted,
}

impl Display for DeletionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Requested => write!(f, "Requested"),
            Self::VariantsPurged => write!(f, "VariantsPurged"),
            Self::Deleted => write!(f, "Deleted"),
        }
    }
}
