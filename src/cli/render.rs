//! Terminal rendering for todo pages.

use colored::Colorize;
use serde::Serialize;

use crate::controller::TodoController;
use crate::error::Result;
use crate::model::{Item, StatusFilter};
use crate::remote::RemoteSource;
use crate::storage::KeyValueStore;

/// JSON output for a page of todos.
#[derive(Serialize)]
pub struct PageOutput<'a> {
    pub todos: &'a [Item],
    pub page: usize,
    pub per_page: usize,
    pub status: StatusFilter,
    pub total_pages: usize,
    pub total: usize,
    pub source: String,
}

impl<'a> PageOutput<'a> {
    /// Snapshot the current page of a controller.
    pub fn from_controller<R: RemoteSource, S: KeyValueStore>(
        controller: &'a TodoController<R, S>,
    ) -> Self {
        let query = controller.query();
        Self {
            todos: controller.items(),
            page: query.page(),
            per_page: query.per_page(),
            status: query.status(),
            total_pages: controller.total_pages(),
            total: controller.filtered_count(),
            source: controller.remote().describe(),
        }
    }
}

/// Print the controller's current page in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_page<R: RemoteSource, S: KeyValueStore>(
    controller: &TodoController<R, S>,
    json: bool,
) -> Result<()> {
    let output = PageOutput::from_controller(controller);

    if crate::is_csv() {
        println!("id,todo,completed,userId");
        for item in output.todos {
            println!(
                "{},{},{},{}",
                item.id,
                crate::csv_escape(&item.text),
                item.completed,
                item.owner_tag
            );
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if output.todos.is_empty() {
        println!("No todos found.");
        if output.status == StatusFilter::All && output.total == 0 {
            println!();
            println!("Create your first one with: htodo add \"What needs to be done?\"");
        }
    } else {
        for item in output.todos {
            println!("{}", format_item(item));
        }
    }

    if output.total_pages > 1 {
        println!();
        println!(
            "{}",
            format!(
                "Page {} of {} ({} {} todos)",
                output.page, output.total_pages, output.total, output.status
            )
            .dimmed()
        );
    }

    Ok(())
}

/// One table row: checkbox, id, text, and a marker for local todos.
#[must_use]
pub fn format_item(item: &Item) -> String {
    let checkbox = if item.completed {
        "[x]".green().to_string()
    } else {
        "[ ]".normal().to_string()
    };
    let text = if item.completed {
        item.text.strikethrough().dimmed().to_string()
    } else {
        item.text.clone()
    };
    let local = if item.is_synthetic() {
        format!(" {}", "(local)".cyan())
    } else {
        String::new()
    };

    format!("{checkbox} {:>5}  {text}{local}", item.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_item_marks_local_and_done() {
        colored::control::set_override(false);

        let done = Item {
            id: 12,
            text: "Ship it".to_string(),
            completed: true,
            owner_tag: 3,
        };
        assert_eq!(format_item(&done), "[x]    12  Ship it");

        let local = Item::synthetic(-1, "Local idea".to_string());
        assert_eq!(format_item(&local), "[ ]    -1  Local idea (local)");
    }
}
