//! Todo mutation commands: add, edit, toggle, delete.
//!
//! None of these write to the remote API, and none needs it. `edit`,
//! `toggle` and `delete` try to load the list first so that only visible
//! todos can be changed; when the load fails they carry on with what the
//! local store knows.

use crate::cli::render::{format_item, print_page};
use crate::cli::ViewArgs;
use crate::controller::{LoadState, Navigation};
use crate::error::Result;
use crate::model::Item;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

use super::{build_controller, runtime, CliController};

/// Output for add/edit/toggle.
#[derive(Serialize)]
struct TodoOutput<'a> {
    action: &'a str,
    id: i64,
    /// Absent when the todo's remote fields are not known locally
    todo: Option<&'a Item>,
}

/// Output for delete.
#[derive(Serialize)]
struct DeleteOutput {
    id: i64,
    deleted: bool,
    page: usize,
    moved_to_page: Option<usize>,
}

/// Create a local todo.
///
/// # Errors
///
/// Returns `Error::Validation` for blank text.
pub fn add(
    text: &str,
    store_path: Option<&PathBuf>,
    endpoint: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut controller = build_controller(&ViewArgs::default(), store_path, endpoint)?;
    let item = controller.add(text)?;
    print_todo("added", item.id, Some(&item), json)
}

/// Replace a todo's text.
///
/// # Errors
///
/// Returns an error if the text is blank or the todo is not visible.
pub fn edit(
    id: i64,
    text: &str,
    store_path: Option<&PathBuf>,
    endpoint: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut controller = loaded_controller(&ViewArgs::default(), store_path, endpoint)?;
    controller.edit(id, text)?;
    print_todo("edited", id, controller.lookup(id).as_ref(), json)
}

/// Flip a todo's completion flag.
///
/// # Errors
///
/// Returns an error if the todo is not visible, or its state is unknown
/// because the list could not be loaded.
pub fn toggle(
    id: i64,
    store_path: Option<&PathBuf>,
    endpoint: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut controller = loaded_controller(&ViewArgs::default(), store_path, endpoint)?;
    let completed = controller.toggle(id)?;
    let action = if completed { "completed" } else { "reopened" };
    print_todo(action, id, controller.lookup(id).as_ref(), json)
}

/// Hide a todo and show the page the user lands on.
///
/// # Errors
///
/// Returns an error if the todo is not visible.
pub fn delete(
    id: i64,
    view: &ViewArgs,
    store_path: Option<&PathBuf>,
    endpoint: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut controller = loaded_controller(view, store_path, endpoint)?;
    let navigation = controller.remove(id)?;
    let moved_to_page = match navigation {
        Navigation::Stay => None,
        Navigation::MovedTo(page) => Some(page),
    };

    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    if json {
        let output = DeleteOutput {
            id,
            deleted: true,
            page: controller.query().page(),
            moved_to_page,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("Deleted todo {id}");
    if controller.state() != &LoadState::Loaded {
        return Ok(());
    }
    if let Some(page) = moved_to_page {
        println!("Page is now empty, showing page {page}");
    }
    println!();
    print_page(&controller, false)
}

fn loaded_controller(
    view: &ViewArgs,
    store_path: Option<&PathBuf>,
    endpoint: Option<&str>,
) -> Result<CliController> {
    let mut controller = build_controller(view, store_path, endpoint)?;
    if let Err(e) = runtime()?.block_on(controller.refresh()) {
        warn!(error = %e, "Could not load todos, applying the change locally");
    }
    Ok(controller)
}

fn print_todo(action: &str, id: i64, item: Option<&Item>, json: bool) -> Result<()> {
    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    if json {
        let output = TodoOutput {
            action,
            id,
            todo: item,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        let mut label = action.to_string();
        if let Some(first) = label.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        match item {
            Some(item) => println!("{label}: {}", format_item(item)),
            None => println!("{label} todo {id}"),
        }
    }

    Ok(())
}
