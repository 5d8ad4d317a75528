//! Category display formatting

use crate::models::Category;

/// Format the categories of one account
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{:<8}  {}\n", "ID", "Name"));
    output.push_str(&format!("{:-<8}  {:-<20}\n", "", ""));

    for category in categories {
        output.push_str(&format!("{:<8}  {}\n", category.id.to_string(), category.name));
    }

    output
}
