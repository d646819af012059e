use std::fmt::Display;

use merchant_common::helpers::non_blank;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{
        CategoryId,
        ColorId,
        NewImage,
        NewProduct,
        NewVariant,
        Price,
        ProductDetail,
        ProductUpdate,
        SizeId,
        StoreId,
        VariantUpdate,
    },
    helpers::format_display_date,
    merchant_api::errors::ValidationError,
};

//--------------------------------------    ProductQueryFilter   -------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQueryFilter {
    pub store_id: Option<StoreId>,
    pub category_id: Option<CategoryId>,
    pub is_featured: Option<bool>,
    pub is_archived: Option<bool>,
}

impl ProductQueryFilter {
    pub fn for_store(store_id: StoreId) -> Self {
        Self { store_id: Some(store_id), ..Default::default() }
    }

    pub fn with_category_id(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.is_featured = Some(true);
        self
    }

    pub fn exclude_archived(mut self) -> Self {
        self.is_archived = Some(false);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.store_id.is_none() && self.category_id.is_none() && self.is_featured.is_none() && self.is_archived.is_none()
    }
}

impl Display for ProductQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters.")?;
            return Ok(());
        }
        if let Some(store_id) = &self.store_id {
            write!(f, "store_id: {store_id}. ")?;
        }
        if let Some(category_id) = &self.category_id {
            write!(f, "category_id: {category_id}. ")?;
        }
        if let Some(featured) = self.is_featured {
            write!(f, "is_featured: {featured}. ")?;
        }
        if let Some(archived) = self.is_archived {
            write!(f, "is_archived: {archived}. ")?;
        }
        Ok(())
    }
}

//--------------------------------------       Request forms     -------------------------------------------------------
/// The product form as submitted by the dashboard. Every field is optional here; the `into_*` conversions decide what
/// is required and produce field-specific [`ValidationError`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<ImageForm>>,
    pub price: Option<Price>,
    pub category_id: Option<String>,
    /// Legacy top-level color. It must be present on updates, but it is not stored.
    pub color_id: Option<String>,
    /// Legacy top-level size. It must be present on updates, but it is not stored.
    pub size_id: Option<String>,
    pub is_featured: Option<bool>,
    pub is_archived: Option<bool>,
    pub variants: Option<Vec<VariantForm>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageForm {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantForm {
    pub color_id: Option<String>,
    pub size_id: Option<String>,
    pub quantity: Option<i64>,
}

impl ProductForm {
    /// Validates the form for product creation.
    ///
    /// Checks run in this order: name, images, price, category, then each variant.
    pub fn into_new_product(self, store_id: StoreId) -> Result<NewProduct, ValidationError> {
        let name = required_text(self.name.as_deref(), "Name")?;
        let images = required_images(self.images)?;
        let price = required_price(self.price)?;
        let category_id = CategoryId::from(required_text(self.category_id.as_deref(), "Category id")?);
        let variants = nested_variants(self.variants)?;
        Ok(NewProduct {
            store_id,
            category_id,
            name,
            description: self.description.unwrap_or_default(),
            price,
            is_featured: self.is_featured.unwrap_or(false),
            is_archived: self.is_archived.unwrap_or(false),
            images,
            variants,
        })
    }

    /// Validates the form for a product update.
    ///
    /// Checks run in this order: name, images, price, category, color, size, then each variant.
    pub fn into_product_update(self) -> Result<ProductUpdate, ValidationError> {
        let name = required_text(self.name.as_deref(), "Name")?;
        let images = required_images(self.images)?;
        let price = required_price(self.price)?;
        let category_id = CategoryId::from(required_text(self.category_id.as_deref(), "Category id")?);
        required_text(self.color_id.as_deref(), "Color id")?;
        required_text(self.size_id.as_deref(), "Size id")?;
        let variants = nested_variants(self.variants)?;
        Ok(ProductUpdate {
            category_id,
            name,
            description: self.description,
            price,
            is_featured: self.is_featured.unwrap_or(false),
            is_archived: self.is_archived.unwrap_or(false),
            images,
            variants,
        })
    }
}

impl VariantForm {
    /// Validates a standalone variant creation request.
    pub fn into_new_variant(self) -> Result<NewVariant, ValidationError> {
        self.into_variant_with_label("Color id", "Size id", "Quantity")
    }

    /// Validates a variant patch. Absent fields are left alone; present fields must be valid.
    pub fn into_variant_update(self) -> Result<VariantUpdate, ValidationError> {
        let mut update = VariantUpdate::default();
        if let Some(color_id) = self.color_id {
            update = update.with_color_id(ColorId::from(required_text(Some(&color_id), "Color id")?));
        }
        if let Some(size_id) = self.size_id {
            update = update.with_size_id(SizeId::from(required_text(Some(&size_id), "Size id")?));
        }
        if let Some(quantity) = self.quantity {
            update = update.with_quantity(check_quantity(quantity, "Quantity")?);
        }
        Ok(update)
    }

    fn into_variant_with_label(self, color: &str, size: &str, qty: &str) -> Result<NewVariant, ValidationError> {
        let color_id = ColorId::from(required_text(self.color_id.as_deref(), color)?);
        let size_id = SizeId::from(required_text(self.size_id.as_deref(), size)?);
        let quantity = self.quantity.ok_or_else(|| ValidationError::required(qty))?;
        let quantity = check_quantity(quantity, qty)?;
        Ok(NewVariant { color_id, size_id, quantity })
    }
}

fn required_text(value: Option<&str>, field: &str) -> Result<String, ValidationError> {
    non_blank(value).map(str::to_string).ok_or_else(|| ValidationError::required(field))
}

fn required_images(images: Option<Vec<ImageForm>>) -> Result<Vec<NewImage>, ValidationError> {
    let images = images.filter(|v| !v.is_empty()).ok_or_else(|| ValidationError("Images are required".into()))?;
    images
        .into_iter()
        .map(|img| required_text(img.url.as_deref(), "Image url").map(NewImage::new))
        .collect()
}

fn required_price(price: Option<Price>) -> Result<Price, ValidationError> {
    let price = price.ok_or_else(|| ValidationError::required("Price"))?;
    check_price(price)?;
    Ok(price)
}

fn nested_variants(variants: Option<Vec<VariantForm>>) -> Result<Vec<NewVariant>, ValidationError> {
    variants
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.into_variant_with_label("Variant color id", "Variant size id", "Variant quantity"))
        .collect()
}

fn check_price(price: Price) -> Result<(), ValidationError> {
    if price.is_positive() {
        Ok(())
    } else {
        Err(ValidationError::invalid("Price must be greater than zero"))
    }
}

fn check_quantity(quantity: i64, field: &str) -> Result<i64, ValidationError> {
    if quantity < 0 {
        Err(ValidationError::invalid(format!("{field} cannot be negative")))
    } else {
        Ok(quantity)
    }
}

/// Value checks for products built in code rather than from a form.
pub fn validate_product_fields(
    name: &str,
    price: Price,
    images: &[NewImage],
    variants: &[NewVariant],
) -> Result<(), ValidationError> {
    required_text(Some(name), "Name")?;
    if images.is_empty() {
        return Err(ValidationError("Images are required".into()));
    }
    if images.iter().any(|i| i.url.trim().is_empty()) {
        return Err(ValidationError::required("Image url"));
    }
    check_price(price)?;
    variants.iter().try_for_each(|v| check_quantity(v.quantity, "Variant quantity").map(|_| ()))
}

//--------------------------------------    Dashboard columns    -------------------------------------------------------
/// A product row as shown in the dashboard table. Values are pre-formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductColumn {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_featured: bool,
    pub is_archived: bool,
    /// e.g. `$1,234.50`
    pub price: String,
    pub category: String,
    /// e.g. `March 3rd, 2024`
    pub created_at: String,
    pub variants: Vec<VariantColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantColumn {
    /// The color value (e.g. `#ff0000`), not its name
    pub color: String,
    /// The size name
    pub size: String,
    pub quantity: i64,
}

impl From<&ProductDetail> for ProductColumn {
    fn from(detail: &ProductDetail) -> Self {
        let product = &detail.product;
        let variants = detail
            .variants
            .iter()
            .map(|v| VariantColumn {
                color: v.color.value.clone(),
                size: v.size.name.clone(),
                quantity: v.variant.quantity,
            })
            .collect();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            is_featured: product.is_featured,
            is_archived: product.is_archived,
            price: product.price.to_string(),
            category: detail.category.name.clone(),
            created_at: format_display_date(&product.created_at),
            variants,
        }
    }
}
