pub const DATABASE_NAME: &str = "premium_restaurant";
pub const DATABASE_CHARSET: &str = "utf8mb4";

#[derive(Clone, Copy, Debug)]
pub struct TableDefinition {
    pub name: &'static str,
    pub ddl: &'static str,
}

/// Tables in creation order. Parents come before the tables that reference them.
pub const TABLES: [TableDefinition; 4] = [
    TableDefinition {
        name: "food_items",
        ddl: include_str!("food_items.sql"),
    },
    TableDefinition {
        name: "orders",
        ddl: include_str!("orders.sql"),
    },
    TableDefinition {
        name: "order_items",
        ddl: include_str!("order_items.sql"),
    },
    TableDefinition {
        name: "reviews",
        ddl: include_str!("reviews.sql"),
    },
];

const TABLE_CONSTRAINT_PREFIXES: [&str; 7] = [
    "FOREIGN KEY",
    "PRIMARY KEY",
    "CONSTRAINT",
    "UNIQUE",
    "KEY",
    "INDEX",
    "CHECK",
];

impl TableDefinition {
    /// Column names declared by the DDL, in declaration order.
    pub fn column_names(&self) -> Vec<&'static str> {
        let ddl = self.ddl;
        let body = match (ddl.find('('), ddl.rfind(')')) {
            (Some(start), Some(end)) if start < end => &ddl[start + 1..end],
            _ => return vec![],
        };

        split_top_level(body)
            .into_iter()
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter(|entry| {
                let upper = entry.to_ascii_uppercase();
                !TABLE_CONSTRAINT_PREFIXES
                    .iter()
                    .any(|prefix| upper.starts_with(prefix))
            })
            .filter_map(|entry| entry.split_whitespace().next())
            .collect()
    }

    pub fn column_count(&self) -> usize {
        self.column_names().len()
    }
}

// Splits on commas that are not nested inside parentheses, e.g. DECIMAL(10,2).
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in body.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => (),
        }
    }
    parts.push(&body[start..]);

    parts
}

pub fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}

pub fn create_database_statement(database: &str) -> String {
    format!(
        "CREATE DATABASE IF NOT EXISTS `{}` DEFAULT CHARACTER SET '{}'",
        database, DATABASE_CHARSET
    )
}

pub fn use_database_statement(database: &str) -> String {
    format!("USE `{}`", database)
}

#[cfg(test)]
mod test {
    use super::*;

    fn table(name: &str) -> TableDefinition {
        *TABLES.iter().find(|table| table.name == name).unwrap()
    }

    #[test]
    fn should_keep_parent_tables_before_children() {
        let names: Vec<_> = TABLES.iter().map(|table| table.name).collect();
        assert_eq!(names, ["food_items", "orders", "order_items", "reviews"]);
    }

    #[test]
    fn should_declare_expected_column_counts() {
        assert_eq!(table("food_items").column_count(), 10);
        assert_eq!(table("orders").column_count(), 5);
        assert_eq!(table("order_items").column_count(), 5);
        assert_eq!(table("reviews").column_count(), 5);
    }

    #[test]
    fn should_not_split_inside_decimal_precision() {
        assert_eq!(
            table("food_items").column_names(),
            [
                "id",
                "name",
                "description",
                "price",
                "category",
                "image_path",
                "is_special",
                "original_price",
                "discount_percentage",
                "avg_rating",
            ]
        );
    }

    #[test]
    fn should_create_every_table_idempotently() {
        for table in TABLES {
            assert!(
                table
                    .ddl
                    .starts_with(&format!("CREATE TABLE IF NOT EXISTS {} (", table.name)),
                "{} is not idempotent",
                table.name
            );
        }
    }

    #[test]
    fn should_cascade_child_foreign_keys() {
        for name in ["order_items", "reviews"] {
            let ddl = table(name).ddl;
            assert!(ddl.contains("REFERENCES orders(id) ON DELETE CASCADE"));
            assert!(ddl.contains("REFERENCES food_items(id) ON DELETE CASCADE"));
        }
    }

    #[test]
    fn should_bound_review_rating() {
        assert!(table("reviews")
            .ddl
            .contains("CHECK (rating >= 0 AND rating <= 5)"));
    }

    #[test]
    fn should_validate_identifiers() {
        assert!(is_valid_identifier(DATABASE_NAME));
        assert!(is_valid_identifier("shop$2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("premium-restaurant"));
        assert!(!is_valid_identifier("x`; DROP DATABASE y"));
        assert!(!is_valid_identifier(&"a".repeat(65)));
    }

    #[test]
    fn should_build_database_statements() {
        assert_eq!(
            create_database_statement("premium_restaurant"),
            "CREATE DATABASE IF NOT EXISTS `premium_restaurant` DEFAULT CHARACTER SET 'utf8mb4'"
        );
        assert_eq!(
            use_database_statement("premium_restaurant"),
            "USE `premium_restaurant`"
        );
    }
}
