use serde::{Deserialize, Serialize};

/// Normalised header keys of the Shopify product export columns the
/// aggregator reads. Every other column in the export is ignored.
pub mod columns {
    pub const HANDLE: &str = "handle";
    pub const TITLE: &str = "title";
    pub const BODY_HTML: &str = "body_html";
    pub const SEO_TITLE: &str = "seo_title";
    pub const SEO_DESCRIPTION: &str = "seo_description";
    pub const IMAGE_SRC: &str = "image_src";
    pub const VARIANT_SKU: &str = "variant_sku";
    pub const VARIANT_GRAMS: &str = "variant_grams";
    pub const VARIANT_PRICE: &str = "variant_price";
    pub const VARIANT_COMPARE_AT_PRICE: &str = "variant_compare_at_price";
    pub const VARIANT_REQUIRES_SHIPPING: &str = "variant_requires_shipping";
    pub const VARIANT_FULFILLMENT_SERVICE: &str = "variant_fulfillment_service";
    pub const VARIANT_TAXABLE: &str = "variant_taxable";
    pub const VARIANT_TAX_CODE: &str = "variant_tax_code";
    pub const VARIANT_IMAGE: &str = "variant_image";
    pub const VARIANT_INVENTORY_TRACKER: &str = "variant_inventory_tracker";
    pub const VARIANT_INVENTORY_QTY: &str = "variant_inventory_qty";
    pub const GIFT_CARD: &str = "gift_card";
    pub const OPTION1_NAME: &str = "option1_name";
    pub const OPTION1_VALUE: &str = "option1_value";
    pub const OPTION2_NAME: &str = "option2_name";
    pub const OPTION2_VALUE: &str = "option2_value";
    pub const OPTION3_NAME: &str = "option3_name";
    pub const OPTION3_VALUE: &str = "option3_value";
}

/// Returns `true` when a cell carries a value. Only the empty string counts
/// as absent; whitespace is a value.
pub fn is_present(value: &str) -> bool {
    !value.is_empty()
}

/// Converts a raw export header such as `Body (HTML)` into the key the
/// aggregator looks up (`body_html`).
///
/// Follows the symbol header converter Shopify exports were first read with:
/// the header is lowercased, each whitespace run becomes `_`, then anything
/// that is not an ASCII word character is dropped. Separators therefore leave
/// their neighbouring underscores behind (`Google Shopping / Gender` becomes
/// `google_shopping__gender`). Surrounding whitespace is trimmed first.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect()
}

/// One option column pair as it appears on a single export row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionCell<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// One record of a Shopify product export.
///
/// Absent cells are stored as empty strings so that they propagate as empty
/// segments once the variant columns are joined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRow {
    pub handle: String,
    pub title: String,
    pub body_html: String,
    pub seo_title: String,
    pub seo_description: String,
    pub image_src: String,
    pub variant_sku: String,
    pub variant_grams: String,
    pub variant_price: String,
    pub variant_compare_at_price: String,
    pub variant_requires_shipping: String,
    pub variant_fulfillment_service: String,
    pub variant_taxable: String,
    pub variant_tax_code: String,
    pub variant_image: String,
    pub variant_inventory_tracker: String,
    pub variant_inventory_qty: String,
    pub gift_card: String,
    pub option1_name: String,
    pub option1_value: String,
    pub option2_name: String,
    pub option2_value: String,
    pub option3_name: String,
    pub option3_value: String,
}

impl RawRow {
    /// Builds a row from `(normalised key, value)` pairs. Unknown keys are
    /// dropped; when a key repeats the last value wins.
    pub fn from_fields<K, V, I>(fields: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = RawRow::default();
        for (key, value) in fields {
            if let Some(slot) = row.slot_mut(key.as_ref()) {
                *slot = value.into();
            }
        }
        row
    }

    /// The three option column pairs in fixed order.
    pub fn options(&self) -> [OptionCell<'_>; 3] {
        [
            OptionCell {
                name: &self.option1_name,
                value: &self.option1_value,
            },
            OptionCell {
                name: &self.option2_name,
                value: &self.option2_value,
            },
            OptionCell {
                name: &self.option3_name,
                value: &self.option3_value,
            },
        ]
    }

    /// The `tracker:qty` stock entry contributed by this row.
    pub fn stock_item(&self) -> String {
        format!(
            "{}:{}",
            self.variant_inventory_tracker, self.variant_inventory_qty
        )
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut String> {
        let slot = match key {
            columns::HANDLE => &mut self.handle,
            columns::TITLE => &mut self.title,
            columns::BODY_HTML => &mut self.body_html,
            columns::SEO_TITLE => &mut self.seo_title,
            columns::SEO_DESCRIPTION => &mut self.seo_description,
            columns::IMAGE_SRC => &mut self.image_src,
            columns::VARIANT_SKU => &mut self.variant_sku,
            columns::VARIANT_GRAMS => &mut self.variant_grams,
            columns::VARIANT_PRICE => &mut self.variant_price,
            columns::VARIANT_COMPARE_AT_PRICE => &mut self.variant_compare_at_price,
            columns::VARIANT_REQUIRES_SHIPPING => &mut self.variant_requires_shipping,
            columns::VARIANT_FULFILLMENT_SERVICE => &mut self.variant_fulfillment_service,
            columns::VARIANT_TAXABLE => &mut self.variant_taxable,
            columns::VARIANT_TAX_CODE => &mut self.variant_tax_code,
            columns::VARIANT_IMAGE => &mut self.variant_image,
            columns::VARIANT_INVENTORY_TRACKER => &mut self.variant_inventory_tracker,
            columns::VARIANT_INVENTORY_QTY => &mut self.variant_inventory_qty,
            columns::GIFT_CARD => &mut self.gift_card,
            columns::OPTION1_NAME => &mut self.option1_name,
            columns::OPTION1_VALUE => &mut self.option1_value,
            columns::OPTION2_NAME => &mut self.option2_name,
            columns::OPTION2_VALUE => &mut self.option2_value,
            columns::OPTION3_NAME => &mut self.option3_name,
            columns::OPTION3_VALUE => &mut self.option3_value,
            _ => return None,
        };
        Some(slot)
    }
}

/// A finalised product ready for serialisation.
///
/// Field order is the column order of every writer; `variants` and the
/// `variant_*` columns hold one `|`-separated segment per variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub slug: String,
    pub price: String,
    pub name: String,
    pub description: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub available_on: String,
    pub images: String,
    pub shipping_category: String,
    pub tax_category: String,
    pub weight: String,
    pub sku: String,
    pub variants: String,
    pub variant_sku: String,
    pub variant_weight: String,
    pub variant_price: String,
    pub variant_cost_price: String,
    pub variant_images: String,
    pub stock_items: String,
    pub gift_card: String,
}

impl ProductRecord {
    /// Output header row.
    pub const HEADERS: [&'static str; 21] = [
        "slug",
        "price",
        "name",
        "description",
        "meta_title",
        "meta_description",
        "meta_keywords",
        "available_on",
        "images",
        "shipping_category",
        "tax_category",
        "weight",
        "sku",
        "variants",
        "variant_sku",
        "variant_weight",
        "variant_price",
        "variant_cost_price",
        "variant_images",
        "stock_items",
        "gift_card",
    ];

    /// Cell values in [`ProductRecord::HEADERS`] order.
    pub fn values(&self) -> [&str; 21] {
        [
            self.slug.as_str(),
            self.price.as_str(),
            self.name.as_str(),
            self.description.as_str(),
            self.meta_title.as_str(),
            self.meta_description.as_str(),
            self.meta_keywords.as_str(),
            self.available_on.as_str(),
            self.images.as_str(),
            self.shipping_category.as_str(),
            self.tax_category.as_str(),
            self.weight.as_str(),
            self.sku.as_str(),
            self.variants.as_str(),
            self.variant_sku.as_str(),
            self.variant_weight.as_str(),
            self.variant_price.as_str(),
            self.variant_cost_price.as_str(),
            self.variant_images.as_str(),
            self.stock_items.as_str(),
            self.gift_card.as_str(),
        ]
    }
}
