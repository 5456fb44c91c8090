use serde_json::Value;

use crate::database::JsonRow;

use super::SearchItem;

/// One searchable entity type: who may see it, where it lives and how a hit
/// is summarised.
#[derive(Debug, Clone, Copy)]
pub struct SearchableEntity {
    /// Key of the group in the response
    pub key: &'static str,
    /// Display label of the group
    pub label: &'static str,
    /// Capability required to see this type at all
    pub capability: &'static str,
    pub table: &'static str,
    /// Text columns tested for a substring match, any one suffices
    pub fields: &'static [&'static str],
    pub title_field: &'static str,
    pub subtitle_field: &'static str,
    /// Admin path prefix; the record id is appended
    pub url_prefix: &'static str,
    /// Table carries `deleted_at` and deleted rows must stay hidden
    pub soft_delete: bool,
}

/// Evaluation order here is the group order of every search response.
pub const DEFAULT_CATALOG: &[SearchableEntity] = &[
    SearchableEntity {
        key: "users",
        label: "Users",
        capability: "users.view",
        table: "users",
        fields: &["name", "email", "phone"],
        title_field: "name",
        subtitle_field: "email",
        url_prefix: "/admin/users",
        soft_delete: true,
    },
    SearchableEntity {
        key: "products",
        label: "Products",
        capability: "products.view",
        table: "products",
        fields: &["name", "sku", "description"],
        title_field: "name",
        subtitle_field: "description",
        url_prefix: "/admin/products",
        soft_delete: true,
    },
    SearchableEntity {
        key: "tickets",
        label: "Support Tickets",
        capability: "tickets.view",
        table: "support_tickets",
        fields: &["subject", "description"],
        title_field: "subject",
        subtitle_field: "description",
        url_prefix: "/admin/tickets",
        soft_delete: false,
    },
];

impl SearchableEntity {
    /// Columns a lookup has to fetch: id, the projection and the matched fields
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = vec!["id".to_string()];
        let wanted = [self.title_field, self.subtitle_field]
            .into_iter()
            .chain(self.fields.iter().copied());
        for column in wanted {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
        columns
    }

    pub fn url(&self, id: &Value) -> String {
        format!("{}/{}", self.url_prefix, display(id))
    }

    /// Summarise a matched row; the subtitle keeps at most `subtitle_length` characters
    pub fn project(&self, row: &JsonRow, subtitle_length: usize) -> SearchItem {
        let id = row.get("id").cloned().unwrap_or(Value::Null);
        let title = row.get(self.title_field).map(display).unwrap_or_default();
        let subtitle = row
            .get(self.subtitle_field)
            .filter(|v| !v.is_null())
            .map(|v| truncate_chars(&display(v), subtitle_length));

        SearchItem {
            url: self.url(&id),
            id,
            title,
            subtitle,
        }
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First `max` characters of `s`, counted in chars rather than bytes
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn products() -> &'static SearchableEntity {
        DEFAULT_CATALOG.iter().find(|e| e.key == "products").unwrap()
    }

    fn row(value: Value) -> JsonRow {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn catalog_keys_are_unique_and_ordered() {
        let keys: Vec<&str> = DEFAULT_CATALOG.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["users", "products", "tickets"]);
    }

    #[test]
    fn columns_are_deduplicated() {
        assert_eq!(products().columns(), vec!["id", "name", "description", "sku"]);
    }

    #[test]
    fn projection_builds_url_from_type_and_id() {
        let item = products().project(
            &row(json!({ "id": "7b0e", "name": "Oak chair", "description": "Solid oak" })),
            100,
        );
        assert_eq!(item.title, "Oak chair");
        assert_eq!(item.subtitle.as_deref(), Some("Solid oak"));
        assert_eq!(item.url, "/admin/products/7b0e");

        let numeric = products().project(&row(json!({ "id": 42, "name": "Stool", "description": null })), 100);
        assert_eq!(numeric.url, "/admin/products/42");
        assert!(numeric.subtitle.is_none());
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars(&"x".repeat(100), 100).len(), 100);
    }
}
