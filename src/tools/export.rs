//! Shopping list export
//!
//! Printable PDF and spreadsheet-friendly CSV renditions of a shopping list.
//! Both write to a path chosen by the caller and stamp the list's export time.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::*;
use serde::Serialize;

use crate::db::Database;
use crate::models::ShoppingList;

use super::error::{ToolError, ToolResult};

// Letter, portrait
const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN_LEFT: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 20.0;
const ROW_HEIGHT: f32 = 7.0;

// Checkbox, Item, Quantity, Unit
const COL_WIDTHS: [f32; 4] = [14.0, 90.0, 30.0, 30.0];
const TABLE_HEADERS: [&str; 4] = ["Done", "Item", "Quantity", "Unit"];

const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);
const COLOR_CHECKED: (u8, u8, u8) = (110, 110, 110);

/// Response for the export tools
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub shopping_list_id: i64,
    pub format: &'static str,
    pub file_path: String,
    pub item_count: usize,
    pub exported_at: Option<String>,
    pub message: String,
}

/// Quantities print without trailing zeros: 600, 1.5, 0.25
fn format_quantity(quantity: f64) -> String {
    let s = format!("{:.2}", quantity);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn generated_on() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}

fn load_list(db: &Database, id: i64) -> ToolResult<ShoppingList> {
    let conn = db.get_conn()?;
    ShoppingList::get_by_id(&conn, id)?.ok_or(ToolError::NotFound { entity: "Shopping list", id })
}

fn create_output_file(output_path: &str) -> ToolResult<File> {
    let path = Path::new(output_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

fn finish_export(db: &Database, list: &ShoppingList, format: &'static str, output_path: &str) -> ToolResult<ExportResponse> {
    let conn = db.get_conn()?;
    ShoppingList::mark_exported(&conn, list.id)?;
    let exported_at = ShoppingList::get_by_id(&conn, list.id)?.and_then(|l| l.exported_at);

    tracing::info!(id = list.id, format, path = output_path, "exported shopping list");
    Ok(ExportResponse {
        success: true,
        shopping_list_id: list.id,
        format,
        file_path: output_path.to_string(),
        item_count: list.items.len(),
        exported_at,
        message: format!("Exported {} items from '{}'", list.items.len(), list.name),
    })
}

// ============================================================================
// PDF Helpers
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, None))
}

fn add_text(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, x: f32, y: f32, size: f32, color: (u8, u8, u8)) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, Mm(x), Mm(y), font);
}

fn add_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32, color: (u8, u8, u8), width: f32) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![(Point::new(Mm(x1), Mm(y1)), false), (Point::new(Mm(x2), Mm(y2)), false)],
        is_closed: false,
    };
    layer.add_line(line);
}

fn table_width() -> f32 {
    COL_WIDTHS.iter().sum()
}

/// Header row with a rule underneath; returns the y of the first item row
fn draw_table_header(layer: &PdfLayerReference, font_bold: &IndirectFontRef, y: f32) -> f32 {
    let mut x = MARGIN_LEFT;
    for (header, width) in TABLE_HEADERS.iter().zip(COL_WIDTHS) {
        add_text(layer, font_bold, header, x + 1.5, y, 11.0, COLOR_BLACK);
        x += width;
    }
    add_line(layer, MARGIN_LEFT, y - 2.5, MARGIN_LEFT + table_width(), y - 2.5, COLOR_BLACK, 1.0);
    y - ROW_HEIGHT
}

// ============================================================================
// Export Tools
// ============================================================================

/// Render a shopping list as a PDF checklist
pub fn export_shopping_list_pdf(db: &Database, id: i64, output_path: &str) -> ToolResult<ExportResponse> {
    let list = load_list(db, id)?;

    let title = format!("Shopping List: {}", list.name);
    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ToolError::Export(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ToolError::Export(e.to_string()))?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = PAGE_HEIGHT - 25.0;

    add_text(&layer, &font_bold, &title, MARGIN_LEFT, y, 18.0, COLOR_BLACK);
    y -= 8.0;
    add_text(&layer, &font, &format!("Generated on: {}", generated_on()), MARGIN_LEFT, y, 10.0, COLOR_GRAY);
    y -= 12.0;

    if list.items.is_empty() {
        add_text(&layer, &font, "No items in this shopping list.", MARGIN_LEFT, y, 11.0, COLOR_BLACK);
    } else {
        y = draw_table_header(&layer, &font_bold, y);

        for item in &list.items {
            if y < MARGIN_BOTTOM {
                let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                y = draw_table_header(&layer, &font_bold, PAGE_HEIGHT - 20.0);
            }

            let color = if item.checked { COLOR_CHECKED } else { COLOR_BLACK };
            let cells = [
                if item.checked { "[x]".to_string() } else { "[ ]".to_string() },
                item.ingredient_name.clone(),
                format_quantity(item.quantity),
                item.unit.clone(),
            ];

            let mut x = MARGIN_LEFT;
            for (cell, width) in cells.iter().zip(COL_WIDTHS) {
                add_text(&layer, &font, cell, x + 1.5, y, 10.0, color);
                x += width;
            }
            add_line(&layer, MARGIN_LEFT, y - 2.5, MARGIN_LEFT + table_width(), y - 2.5, COLOR_GRAY, 0.3);
            y -= ROW_HEIGHT;
        }
    }

    let mut writer = BufWriter::new(create_output_file(output_path)?);
    doc.save(&mut writer).map_err(|e| ToolError::Export(e.to_string()))?;

    finish_export(db, &list, "pdf", output_path)
}

/// Write a shopping list as CSV: a title block, then one row per item
pub fn export_shopping_list_csv(db: &Database, id: i64, output_path: &str) -> ToolResult<ExportResponse> {
    let list = load_list(db, id)?;

    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(create_output_file(output_path)?);

    let write = |wtr: &mut csv::Writer<File>, record: &[&str]| -> ToolResult<()> {
        wtr.write_record(record).map_err(|e| ToolError::Export(e.to_string()))
    };

    write(&mut wtr, &[format!("Shopping List: {}", list.name).as_str()])?;
    write(&mut wtr, &[format!("Generated on: {}", generated_on()).as_str()])?;
    write(&mut wtr, &["Checked", "Item", "Quantity", "Unit"])?;

    for item in &list.items {
        let quantity = format_quantity(item.quantity);
        write(&mut wtr, &[
            if item.checked { "x" } else { "" },
            item.ingredient_name.as_str(),
            quantity.as_str(),
            item.unit.as_str(),
        ])?;
    }

    wtr.flush()?;
    finish_export(db, &list, "csv", output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::shopping_lists::{create_shopping_list, toggle_shopping_list_item, ShoppingListItemDraft};

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("recipe_manager_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn draft(name: &str, quantity: f64, unit: &str) -> ShoppingListItemDraft {
        ShoppingListItemDraft {
            ingredient_name: Some(name.to_string()),
            quantity: Some(quantity),
            unit: Some(unit.to_string()),
            checked: None,
        }
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(600.0), "600");
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(0.25), "0.25");
        assert_eq!(format_quantity(0.0), "0");
    }

    #[test]
    fn test_csv_export() {
        let db = Database::in_memory().unwrap();
        let list = create_shopping_list(&db, "Weekend", vec![draft("Eggs", 12.0, "pieces"), draft("Milk", 1.5, "l")]).unwrap();
        toggle_shopping_list_item(&db, list.id, list.items[1].id).unwrap();

        let dir = scratch_dir("csv_export");
        let path = dir.join("weekend.csv");
        let response = export_shopping_list_csv(&db, list.id, path.to_str().unwrap()).unwrap();
        assert_eq!(response.item_count, 2);
        assert!(response.exported_at.is_some());

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "Shopping List: Weekend");
        assert_eq!(lines[2], "Checked,Item,Quantity,Unit");
        assert_eq!(lines[3], ",Eggs,12,pieces");
        assert_eq!(lines[4], "x,Milk,1.5,l");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_pdf_export() {
        let db = Database::in_memory().unwrap();
        let items = (0..60).map(|i| draft(&format!("Item {}", i), i as f64, "pieces")).collect();
        let list = create_shopping_list(&db, "Big Shop", items).unwrap();

        let dir = scratch_dir("pdf_export");
        let path = dir.join("lists").join("big.pdf");
        let response = export_shopping_list_pdf(&db, list.id, path.to_str().unwrap()).unwrap();
        assert_eq!(response.format, "pdf");

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_missing_list() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            export_shopping_list_csv(&db, 9, "/tmp/never_written.csv"),
            Err(ToolError::NotFound { .. })
        ));
    }
}
