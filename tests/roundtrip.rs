use std::fs;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook;
use shopify_import::io::csv_read::{self, InputEncoding};
use shopify_import::io::{csv_write, excel_read};
use shopify_import::model::ProductRecord;
use shopify_import::sync::{self, InputFormat, OutputFormat, TransformOptions};
use shopify_import::{ImportError, aggregate};
use tempfile::tempdir;

const EXPORT_HEADER: &str = "Handle,Title,Body (HTML),Vendor,Type,Tags,Published,Option1 Name,Option1 Value,Option2 Name,Option2 Value,Option3 Name,Option3 Value,Variant SKU,Variant Grams,Variant Inventory Tracker,Variant Inventory Qty,Variant Inventory Policy,Variant Fulfillment Service,Variant Price,Variant Compare At Price,Variant Requires Shipping,Variant Taxable,Variant Barcode,Image Src,Image Alt Text,Gift Card,SEO Title,SEO Description,Variant Image,Variant Weight Unit,Variant Tax Code";

fn export_csv() -> String {
    [
        EXPORT_HEADER,
        "yes,Yes,\"<p>Yes, really</p>\",piks-s2,Shirts,\"cotton, vintage\",TRUE,Size,Small,Color,blue,,,PIKS-001,100,shopify,20,continue,manual,10,20,TRUE,TRUE,,https://cdn.example.com/200.jpg,,FALSE,,,https://cdn.example.com/fff.png,kg,",
        "yes,,,,,,,,Large,,red,,,PIKS-002,150,shopify,7,continue,manual,12,24,TRUE,TRUE,,,,,,,https://cdn.example.com/ggg.png,kg,",
        "yes,,,,,,,,,,,,,,,,,,,,,,,,https://cdn.example.com/201.jpg,,,,,,,",
        "mug,Mug,,acme,Mugs,,TRUE,Title,Default Title,,,,,MUG-1,300,shopify,4,deny,manual,8,,FALSE,FALSE,,,,FALSE,,,,kg,",
    ]
    .join("\n")
}

#[test]
fn csv_export_transforms_into_product_csv() {
    let temp_dir = tempdir().expect("temporary directory");
    let input_path = temp_dir.path().join("products_export.csv");
    let output_path = temp_dir.path().join("products.csv");
    fs::write(&input_path, export_csv()).expect("export written");

    let count = sync::transform(
        &input_path,
        InputFormat::Csv,
        &output_path,
        OutputFormat::Csv,
        &TransformOptions::default(),
    )
    .expect("transform succeeded");
    assert_eq!(count, 2);

    let mut reader = csv::Reader::from_path(&output_path).expect("output opened");
    let headers = reader.headers().expect("header row").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), ProductRecord::HEADERS);

    let records: Vec<ProductRecord> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("records parsed");
    assert_eq!(records.len(), 2);

    let shirt = &records[0];
    assert_eq!(shirt.slug, "yes");
    assert_eq!(shirt.description, "<p>Yes, really</p>");
    assert_eq!(shirt.variants, "Size:Small;Color:blue|Size:Large;Color:red");
    assert_eq!(shirt.variant_sku, "PIKS-001|PIKS-002");
    assert_eq!(shirt.variant_weight, "100|150");
    assert_eq!(
        shirt.variant_images,
        "https://cdn.example.com/fff.png|https://cdn.example.com/ggg.png"
    );
    assert_eq!(shirt.stock_items, "shopify:20|shopify:7");
    assert_eq!(shirt.shipping_category, "Shopify-manual-Shipping Category");
    assert_eq!(shirt.tax_category, "Shopify-TRUE--Tax Category");

    let mug = &records[1];
    assert_eq!(mug.variants, "");
    assert_eq!(mug.variant_sku, "");
    assert_eq!(mug.sku, "MUG-1");
    assert_eq!(mug.stock_items, "shopify:4");
    assert_eq!(mug.shipping_category, "Shopify-OTHER-Shipping Category");
}

#[test]
fn products_to_csv_renders_header_and_rows() {
    let temp_dir = tempdir().expect("temporary directory");
    let input_path = temp_dir.path().join("products_export.csv");
    fs::write(&input_path, export_csv()).expect("export written");

    let rendered =
        sync::products_to_csv(&input_path, InputEncoding::Utf8).expect("CSV rendered");
    let mut lines = rendered.lines();

    assert_eq!(lines.next(), Some(ProductRecord::HEADERS.join(",").as_str()));
    assert!(lines.next().expect("first product").starts_with("yes,10,Yes,"));
    assert!(lines.next().expect("second product").starts_with("mug,8,Mug,"));
    assert_eq!(lines.next(), None);
}

#[test]
fn empty_record_set_still_writes_header() {
    let rendered = csv_write::to_csv_string(&[]).expect("CSV rendered");
    assert_eq!(rendered.trim_end(), ProductRecord::HEADERS.join(","));
}

#[test]
fn latin1_export_decodes_bytes_as_code_points() {
    let mut bytes = b"Handle,Title\ncafe,Caf".to_vec();
    bytes.push(0xE9);
    bytes.push(b'\n');

    let rows = csv_read::parse_rows(bytes.as_slice(), InputEncoding::Latin1).expect("rows read");
    assert_eq!(rows[0].title, "Caf\u{e9}");

    let utf8 = csv_read::parse_rows(bytes.as_slice(), InputEncoding::Utf8);
    assert!(matches!(utf8, Err(ImportError::InvalidEncoding(_))));
}

#[test]
fn utf8_byte_order_mark_is_stripped_from_first_header() {
    let source = "\u{feff}Handle,Title\nhat,Hat\n";

    let rows = csv_read::parse_rows(source.as_bytes(), InputEncoding::Utf8).expect("rows read");

    assert_eq!(rows[0].handle, "hat");
    assert_eq!(rows[0].title, "Hat");
}

#[test]
fn export_without_handle_column_is_rejected() {
    let source = "Title,Variant SKU\nHat,H1\n";

    let result = csv_read::parse_rows(source.as_bytes(), InputEncoding::Utf8);

    assert!(matches!(result, Err(ImportError::MissingColumn(column)) if column == "handle"));
}

#[test]
fn short_rows_read_missing_cells_as_empty() {
    let source = "Handle,Title,Variant SKU\nhat,Hat\n";

    let rows = csv_read::parse_rows(source.as_bytes(), InputEncoding::Utf8).expect("rows read");

    assert_eq!(rows[0].variant_sku, "");
}

#[test]
fn excel_export_reads_like_csv() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("products_export.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let headers = [
        "Handle",
        "Title",
        "Option1 Name",
        "Option1 Value",
        "Variant SKU",
        "Variant Grams",
        "Variant Requires Shipping",
        "Variant Fulfillment Service",
    ];
    for (col_idx, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col_idx as u16, *header)
            .expect("header written");
    }
    worksheet.write_string(1, 0, "shirt").expect("cell written");
    worksheet.write_string(1, 1, "Shirt").expect("cell written");
    worksheet.write_string(1, 2, "Size").expect("cell written");
    worksheet.write_string(1, 3, "S").expect("cell written");
    worksheet.write_string(1, 4, "A1").expect("cell written");
    worksheet.write_number(1, 5, 100.0).expect("cell written");
    worksheet.write_boolean(1, 6, true).expect("cell written");
    worksheet.write_string(1, 7, "manual").expect("cell written");
    worksheet.write_string(2, 0, "shirt").expect("cell written");
    worksheet.write_string(2, 3, "M").expect("cell written");
    worksheet.write_string(2, 4, "A2").expect("cell written");
    worksheet.write_number(2, 5, 120.0).expect("cell written");
    workbook.save(&xlsx_path).expect("workbook saved");

    let rows = excel_read::read_rows(&xlsx_path, None).expect("rows read");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].variant_grams, "100");
    assert_eq!(rows[0].variant_requires_shipping, "TRUE");

    let products = aggregate::ingest(rows);
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].variants, "Size:S|Size:M");
    assert_eq!(products[0].variant_weight, "100|120");
    assert_eq!(
        products[0].shipping_category,
        "Shopify-manual-Shipping Category"
    );
}

#[test]
fn missing_sheet_is_reported() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("products_export.xlsx");
    let mut workbook = Workbook::new();
    workbook
        .add_worksheet()
        .write_string(0, 0, "Handle")
        .expect("header written");
    workbook.save(&xlsx_path).expect("workbook saved");

    let result = excel_read::read_rows(&xlsx_path, Some("Variants"));

    assert!(matches!(result, Err(ImportError::InvalidWorkbook(_))));
}

#[test]
fn excel_output_holds_products_sheet() {
    let temp_dir = tempdir().expect("temporary directory");
    let input_path = temp_dir.path().join("products_export.csv");
    let output_path = temp_dir.path().join("products.xlsx");
    fs::write(&input_path, export_csv()).expect("export written");

    sync::transform(
        &input_path,
        InputFormat::Csv,
        &output_path,
        OutputFormat::Excel,
        &TransformOptions::default(),
    )
    .expect("transform succeeded");

    let mut workbook: Xlsx<_> = open_workbook(&output_path).expect("workbook opened");
    let range = workbook
        .worksheet_range("Products")
        .expect("products sheet")
        .expect("sheet parsed");
    let mut rows = range.rows();

    let header: Vec<String> = rows
        .next()
        .expect("header row")
        .iter()
        .map(|cell| cell.to_string())
        .collect();
    assert_eq!(header, ProductRecord::HEADERS);

    let first = rows.next().expect("first product");
    assert_eq!(first[0], DataType::String("yes".into()));
    assert_eq!(first[14], DataType::String("PIKS-001|PIKS-002".into()));
    assert_eq!(rows.count(), 1);
}

#[test]
fn excel_output_without_products_keeps_header_row() {
    let temp_dir = tempdir().expect("temporary directory");
    let output_path = temp_dir.path().join("empty.xlsx");

    sync::write_records(&output_path, &[], OutputFormat::Excel).expect("workbook written");

    let mut workbook: Xlsx<_> = open_workbook(&output_path).expect("workbook opened");
    let range = workbook
        .worksheet_range("Products")
        .expect("products sheet")
        .expect("sheet parsed");
    let mut rows = range.rows();
    let header = rows.next().expect("header row");
    assert_eq!(header.len(), ProductRecord::HEADERS.len());
    assert_eq!(header[0], DataType::String("slug".into()));
    assert!(rows.next().is_none());
}

#[test]
fn json_output_lists_records_in_column_order() {
    let temp_dir = tempdir().expect("temporary directory");
    let input_path = temp_dir.path().join("products_export.csv");
    let output_path = temp_dir.path().join("products.json");
    fs::write(&input_path, export_csv()).expect("export written");

    sync::transform(
        &input_path,
        InputFormat::Csv,
        &output_path,
        OutputFormat::Json,
        &TransformOptions::default(),
    )
    .expect("transform succeeded");

    let written = fs::read_to_string(&output_path).expect("JSON read");
    let records: Vec<ProductRecord> = serde_json::from_str(&written).expect("JSON parsed");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].variant_sku, "PIKS-001|PIKS-002");

    let slug_at = written.find("\"slug\"").expect("slug key");
    let price_at = written.find("\"price\"").expect("price key");
    let gift_card_at = written.find("\"gift_card\"").expect("gift_card key");
    assert!(slug_at < price_at && price_at < gift_card_at);
}

#[test]
fn formats_are_detected_from_extensions() {
    use std::path::Path;

    assert_eq!(
        InputFormat::detect(Path::new("export.CSV")),
        Some(InputFormat::Csv)
    );
    assert_eq!(
        InputFormat::detect(Path::new("export.xlsx")),
        Some(InputFormat::Excel)
    );
    assert_eq!(
        OutputFormat::detect(Path::new("products.json")),
        Some(OutputFormat::Json)
    );
    assert_eq!(OutputFormat::detect(Path::new("products")), None);
}
