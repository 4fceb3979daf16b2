use std::fmt::Display;
use std::mem;

use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, info, instrument};

use crate::shopify::import::model::{ProductRecord, RawRow, is_present};

/// Option name Shopify writes for products without real variants.
pub const DEFAULT_OPTION_NAME: &str = "Title";
/// Separator between variants inside a joined column.
pub const VARIANT_SEPARATOR: &str = "|";
/// Separator between the `name:value` pairs of a single variant.
pub const OPTION_SEPARATOR: &str = ";";
/// Rendering of the `available_on` timestamp.
pub const AVAILABLE_ON_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

const META_KEYWORDS_SUFFIX: &str = "the Vinsol";
const SHIPPING_FALLBACK: &str = "Shopify-OTHER-Shipping Category";
const TAX_FALLBACK: &str = "Shopify-OTHER-Tax Category";
const FLAG_TRUE: &str = "TRUE";

/// Per-product option state.
///
/// Shopify only writes an option name on the row that introduces it, so the
/// accumulator remembers the last name seen in each of the three slots and
/// records one `;`-joined descriptor per variant row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionAccumulator {
    names: [String; 3],
    descriptors: Vec<String>,
}

impl OptionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one variant row into the accumulator and returns it.
    ///
    /// A descriptor is appended for every call, even when the row carries no
    /// option values, so descriptors stay aligned with variant rows.
    pub fn accumulate(mut self, row: &RawRow) -> Self {
        let mut tokens = Vec::new();
        for (remembered, cell) in self.names.iter_mut().zip(row.options()) {
            if is_present(cell.name) {
                *remembered = cell.name.to_string();
            }
            if is_present(cell.value) {
                tokens.push(format!("{remembered}:{}", cell.value));
            }
        }
        self.descriptors.push(tokens.join(OPTION_SEPARATOR));
        self
    }

    /// Names currently remembered for option slots 1 to 3.
    pub fn names(&self) -> &[String; 3] {
        &self.names
    }

    /// One descriptor per accumulated variant row.
    pub fn descriptors(&self) -> &[String] {
        &self.descriptors
    }

    /// Whether any variant row recorded at least one option value.
    pub fn has_tokens(&self) -> bool {
        self.descriptors.iter().any(|descriptor| is_present(descriptor))
    }
}

/// A product under construction: the fields of its seeding row plus the
/// parallel per-variant sequences collected so far.
///
/// `variant_sku`, `variant_weight`, `variant_price`, `variant_cost_price`,
/// `variant_images` and `stock_items` always have the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedProduct {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub available_on: String,
    pub images: String,
    pub price: String,
    pub cost_price: String,
    pub shipping_category: String,
    pub tax_category: String,
    pub weight: String,
    pub sku: String,
    pub gift_card: String,
    pub variants: OptionAccumulator,
    pub variant_sku: Vec<String>,
    pub variant_weight: Vec<String>,
    pub variant_price: Vec<String>,
    pub variant_cost_price: Vec<String>,
    pub variant_images: Vec<String>,
    pub stock_items: Vec<String>,
}

impl AggregatedProduct {
    /// Opens a product from the first row of its handle. The row also becomes
    /// the base variant.
    pub fn seed(row: &RawRow, available_on: &str) -> Self {
        let variants = if row.option1_name == DEFAULT_OPTION_NAME {
            OptionAccumulator::new()
        } else {
            OptionAccumulator::new().accumulate(row)
        };

        Self {
            slug: row.handle.clone(),
            name: row.title.clone(),
            description: row.body_html.clone(),
            meta_title: row.seo_title.clone(),
            meta_description: row.seo_description.clone(),
            meta_keywords: format!("{}, {}, {META_KEYWORDS_SUFFIX}", row.handle, row.title),
            available_on: available_on.to_string(),
            images: row.image_src.clone(),
            price: row.variant_price.clone(),
            cost_price: row.variant_compare_at_price.clone(),
            shipping_category: shipping_category(row),
            tax_category: tax_category(row),
            weight: row.variant_grams.clone(),
            sku: row.variant_sku.clone(),
            gift_card: row.gift_card.clone(),
            variants,
            variant_sku: vec![row.variant_sku.clone()],
            variant_weight: vec![row.variant_grams.clone()],
            variant_price: vec![row.variant_price.clone()],
            variant_cost_price: vec![row.variant_compare_at_price.clone()],
            variant_images: vec![row.variant_image.clone()],
            stock_items: vec![row.stock_item()],
        }
    }

    /// Appends a continuation row as one more variant.
    pub fn absorb_variant(&mut self, row: &RawRow) {
        self.variants = mem::take(&mut self.variants).accumulate(row);
        self.variant_sku.push(row.variant_sku.clone());
        self.variant_weight.push(row.variant_grams.clone());
        self.variant_price.push(row.variant_price.clone());
        self.variant_cost_price
            .push(row.variant_compare_at_price.clone());
        self.variant_images.push(row.variant_image.clone());
        self.stock_items.push(row.stock_item());
    }

    /// Number of variant rows folded into the product, the seeding row included.
    pub fn variant_count(&self) -> usize {
        self.variant_sku.len()
    }

    /// Flattens the sequences into the output record.
    ///
    /// Products whose variant rows never carried an option value lose every
    /// variant column except `stock_items`, including the seeding row's own
    /// values.
    pub fn finalize(self) -> ProductRecord {
        let keep_variants = self.variants.has_tokens();
        let join = |values: Vec<String>| {
            if keep_variants {
                values.join(VARIANT_SEPARATOR)
            } else {
                String::new()
            }
        };

        ProductRecord {
            variants: join(self.variants.descriptors),
            variant_sku: join(self.variant_sku),
            variant_weight: join(self.variant_weight),
            variant_price: join(self.variant_price),
            variant_cost_price: join(self.variant_cost_price),
            variant_images: join(self.variant_images),
            stock_items: self.stock_items.join(VARIANT_SEPARATOR),
            slug: self.slug,
            price: self.price,
            name: self.name,
            description: self.description,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            meta_keywords: self.meta_keywords,
            available_on: self.available_on,
            images: self.images,
            shipping_category: self.shipping_category,
            tax_category: self.tax_category,
            weight: self.weight,
            sku: self.sku,
            gift_card: self.gift_card,
        }
    }
}

fn shipping_category(row: &RawRow) -> String {
    if row.variant_requires_shipping == FLAG_TRUE {
        format!(
            "Shopify-{}-Shipping Category",
            row.variant_fulfillment_service
        )
    } else {
        SHIPPING_FALLBACK.to_string()
    }
}

fn tax_category(row: &RawRow) -> String {
    if row.variant_taxable == FLAG_TRUE {
        format!("Shopify-TRUE-{}-Tax Category", row.variant_tax_code)
    } else {
        TAX_FALLBACK.to_string()
    }
}

/// What [`ProductAggregator::push`] did with a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// The row opened a new product.
    Opened,
    /// The row was appended to the open product as a variant.
    Variant,
    /// The row continued the open handle without a variant SKU.
    SkippedVariant,
    /// The row started a new handle without a title.
    SkippedProduct,
}

/// Single-pass fold of export rows into products.
///
/// Rows sharing the handle of the open product are variants of it; any other
/// handle closes it and opens a new one. A titleless row on a handle boundary
/// is dropped and leaves the open product untouched, so later rows of that
/// handle still attach to it.
///
/// The open product is always the last one pushed; its slug is the open
/// handle.
#[derive(Debug, Clone)]
pub struct ProductAggregator {
    products: Vec<AggregatedProduct>,
    available_on: String,
}

impl ProductAggregator {
    /// Creates an aggregator stamping every product with `available_on`.
    pub fn new<Tz>(available_on: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            products: Vec::new(),
            available_on: available_on.format(AVAILABLE_ON_FORMAT).to_string(),
        }
    }

    /// Handle of the open product, if any.
    pub fn current_handle(&self) -> Option<&str> {
        self.products.last().map(|product| product.slug.as_str())
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Products folded so far, in input order.
    pub fn products(&self) -> &[AggregatedProduct] {
        &self.products
    }

    pub fn push(&mut self, row: RawRow) -> RowOutcome {
        let open = self
            .products
            .last_mut()
            .filter(|open| open.slug == row.handle);
        if let Some(open) = open {
            if !is_present(&row.variant_sku) {
                debug!(handle = %row.handle, "skipping variant row without SKU");
                return RowOutcome::SkippedVariant;
            }
            open.absorb_variant(&row);
            return RowOutcome::Variant;
        }

        if !is_present(&row.title) {
            debug!(handle = %row.handle, "skipping product row without title");
            return RowOutcome::SkippedProduct;
        }

        debug!(handle = %row.handle, "opening product");
        self.products
            .push(AggregatedProduct::seed(&row, &self.available_on));
        RowOutcome::Opened
    }

    /// Finalises every product, including the one still open.
    pub fn finish(self) -> Vec<ProductRecord> {
        self.products
            .into_iter()
            .map(AggregatedProduct::finalize)
            .collect()
    }
}

/// Aggregates `rows` and stamps the products with the current local time.
pub fn ingest<I>(rows: I) -> Vec<ProductRecord>
where
    I: IntoIterator<Item = RawRow>,
{
    ingest_at(rows, &Local::now())
}

/// Aggregates `rows`, stamping the products with `available_on`.
#[instrument(level = "debug", skip_all)]
pub fn ingest_at<I, Tz>(rows: I, available_on: &DateTime<Tz>) -> Vec<ProductRecord>
where
    I: IntoIterator<Item = RawRow>,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut aggregator = ProductAggregator::new(available_on);
    let mut row_count = 0usize;
    let mut skipped = 0usize;

    for row in rows {
        row_count += 1;
        match aggregator.push(row) {
            RowOutcome::SkippedVariant | RowOutcome::SkippedProduct => skipped += 1,
            RowOutcome::Opened | RowOutcome::Variant => {}
        }
    }

    info!(
        row_count,
        skipped,
        product_count = aggregator.product_count(),
        "aggregated product rows"
    );
    aggregator.finish()
}
