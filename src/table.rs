// src/table.rs - Turns the current page into table rows, text and CSV
use serde_json::Value;

use crate::entities::{Entity, EntityConfig};
use crate::error::{ClientError, ClientResult};
use crate::forms::modal::ModalKind;
use crate::pagination::{ListQuery, PageInfo};
use crate::status::{status_badge, StatusBadge};

// ==================== HEADERS ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

impl SortIndicator {
    pub fn for_column(query: &ListQuery, key: &str) -> Self {
        if query.sort_field != key {
            SortIndicator::Unsorted
        } else if query.sort_ascending {
            SortIndicator::Ascending
        } else {
            SortIndicator::Descending
        }
    }

    pub const fn arrow(&self) -> &'static str {
        match self {
            SortIndicator::Unsorted => "",
            SortIndicator::Ascending => " ^",
            SortIndicator::Descending => " v",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub key: &'static str,
    pub title: &'static str,
    pub sortable: bool,
    pub indicator: SortIndicator,
}

// ==================== ROWS ====================

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Position across all pages, 1-based.
    pub index: u64,
    pub id: i64,
    pub cells: Vec<String>,
    pub badge: StatusBadge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

impl RowAction {
    pub const fn modal(&self) -> ModalKind {
        match self {
            RowAction::View => ModalKind::View,
            RowAction::Edit => ModalKind::Update,
            RowAction::Delete => ModalKind::DeleteConfirm,
        }
    }
}

/// What a row button asks for. Opening the modal is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalRequest<T> {
    pub kind: ModalKind,
    pub record: T,
}

pub fn row_action<T: Clone>(action: RowAction, record: &T) -> ModalRequest<T> {
    ModalRequest {
        kind: action.modal(),
        record: record.clone(),
    }
}

/// Plain-text rendering of a JSON cell.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::Bool(true)) => "Yes".to_string(),
        Some(Value::Bool(false)) => "No".to_string(),
        Some(Value::String(s)) if s.is_empty() => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ==================== TABLE ====================

#[derive(Debug, Clone)]
pub struct TableView {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<TableRow>,
    pub page: PageInfo,
}

impl TableView {
    pub fn build<T: Entity>(
        config: &EntityConfig,
        query: &ListQuery,
        items: &[T],
        total_count: u64,
    ) -> ClientResult<Self> {
        let headers = config
            .columns
            .iter()
            .map(|column| HeaderCell {
                key: column.key,
                title: column.title,
                sortable: column.sortable,
                indicator: if column.sortable {
                    SortIndicator::for_column(query, column.key)
                } else {
                    SortIndicator::Unsorted
                },
            })
            .collect();

        let mut rows = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let record = serde_json::to_value(item)?;
            let badge = status_badge(item.status_code(), config.inactive_tone);
            let cells = config
                .columns
                .iter()
                .map(|column| {
                    if column.key == "status" {
                        badge.label.to_string()
                    } else {
                        cell_text(record.get(column.key))
                    }
                })
                .collect();

            rows.push(TableRow {
                index: query.row_index(position),
                id: item.id(),
                cells,
                badge,
            });
        }

        Ok(Self {
            headers,
            rows,
            page: PageInfo::from_page(total_count, query.page_number, query.page_size),
        })
    }

    fn header_labels(&self) -> Vec<String> {
        std::iter::once("#".to_string())
            .chain(
                self.headers
                    .iter()
                    .map(|h| format!("{}{}", h.title, h.indicator.arrow())),
            )
            .collect()
    }

    fn row_labels(row: &TableRow) -> Vec<String> {
        std::iter::once(row.index.to_string())
            .chain(row.cells.iter().cloned())
            .collect()
    }

    pub fn render_text(&self) -> String {
        let header = self.header_labels();
        let body: Vec<Vec<String>> = self.rows.iter().map(Self::row_labels).collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &body {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let format_line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&format_line(&header));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&format_line(&rule));
        out.push('\n');
        if body.is_empty() {
            out.push_str("No records found\n");
        }
        for row in &body {
            out.push_str(&format_line(row));
            out.push('\n');
        }
        out.push_str(&self.page.range_label(self.rows.len()));
        out.push_str(&format!(
            " (page {} of {})\n",
            self.page.page_number,
            self.page.total_pages.max(1)
        ));
        out
    }

    pub fn to_csv(&self) -> ClientResult<String> {
        let mut csv_data = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut csv_data);

            let header: Vec<&str> = std::iter::once("#")
                .chain(self.headers.iter().map(|h| h.title))
                .collect();
            writer
                .write_record(&header)
                .map_err(|e| ClientError::Decode(e.to_string()))?;

            for row in &self.rows {
                writer
                    .write_record(Self::row_labels(row))
                    .map_err(|e| ClientError::Decode(e.to_string()))?;
            }

            writer.flush().map_err(|e| ClientError::Decode(e.to_string()))?;
        }

        String::from_utf8(csv_data).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Supplier};
    use crate::status::BadgeTone;

    fn category(id: i64, name: &str, status: i64) -> Category {
        Category {
            category_id: id,
            category_name: name.to_string(),
            description: None,
            status,
        }
    }

    #[test]
    fn test_sort_indicator() {
        let mut query = ListQuery::new(10, "categoryName");
        assert_eq!(SortIndicator::for_column(&query, "categoryName"), SortIndicator::Ascending);
        assert_eq!(SortIndicator::for_column(&query, "status"), SortIndicator::Unsorted);

        query.toggle_sort("categoryName");
        assert_eq!(SortIndicator::for_column(&query, "categoryName"), SortIndicator::Descending);
    }

    #[test]
    fn test_rows_carry_index_and_badges() {
        let config = Category::config();
        let mut query = ListQuery::new(10, "categoryName");
        query.page_number = 3;
        let items = vec![category(7, "Dairy", 1), category(8, "Frozen", 2), category(9, "Old", 0)];

        let table = TableView::build(&config, &query, &items, 23).unwrap();

        let indexes: Vec<u64> = table.rows.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![21, 22, 23]);
        assert_eq!(table.rows[0].badge.label, "Active");
        assert_eq!(table.rows[0].badge.tone, BadgeTone::Green);
        assert_eq!(table.rows[1].badge.label, "Inactive");
        assert_eq!(table.rows[2].badge.label, "Deleted");
        assert_eq!(table.rows[0].cells[0], "Dairy");
        assert_eq!(table.rows[0].cells[1], "-");
        assert!(!table.page.has_next);
    }

    #[test]
    fn test_supplier_inactive_badge_is_amber() {
        let supplier = Supplier {
            supplier_id: 1,
            supplier_name: "Acme".to_string(),
            contact_person: None,
            email: "sales@acme.test".to_string(),
            phone: "+1 555 0100".to_string(),
            address: None,
            status: 2,
        };
        let query = ListQuery::new(10, "supplierName");
        let table = TableView::build(&Supplier::config(), &query, &[supplier], 1).unwrap();
        assert_eq!(table.rows[0].badge.tone, BadgeTone::Amber);
    }

    #[test]
    fn test_render_text_and_csv() {
        let config = Category::config();
        let query = ListQuery::new(10, "categoryName");
        let items = vec![category(1, "Dairy, chilled", 1)];
        let table = TableView::build(&config, &query, &items, 1).unwrap();

        let text = table.render_text();
        assert!(text.lines().next().unwrap().contains("Name ^"));
        assert!(text.contains("Dairy, chilled"));
        assert!(text.contains("Showing 1-1 of 1"));

        let csv = table.to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("#,Name,Description,Status"));
        assert_eq!(lines.next(), Some("1,\"Dairy, chilled\",-,Active"));
    }

    #[test]
    fn test_empty_table() {
        let query = ListQuery::new(10, "categoryName");
        let table = TableView::build::<Category>(&Category::config(), &query, &[], 0).unwrap();
        let text = table.render_text();
        assert!(text.contains("No records found"));
        assert!(text.contains("Showing 0 of 0"));
    }

    #[test]
    fn test_row_actions() {
        let record = category(4, "Bakery", 1);
        let request = row_action(RowAction::Edit, &record);
        assert_eq!(request.kind, ModalKind::Update);
        assert_eq!(request.record, record);
        assert_eq!(row_action(RowAction::Delete, &record).kind, ModalKind::DeleteConfirm);
    }
}
