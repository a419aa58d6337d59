//! Resource-generic handlers behind `users` and `devices`.
//!
//! Every mutation goes through the resource controller exactly the way the
//! TUI drives it: open the editor, fill the draft, submit.

use std::path::Path;

use enerctl_core::{ConsoleConfig, EntityId, Resource, ResourceController};
use tabled::Tabled;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

/// How one resource renders in each output format.
pub struct View<T, R> {
    pub row: fn(&T) -> R,
    pub detail: fn(&T) -> String,
}

fn id_of<T: Resource>(item: &T) -> String {
    item.id().map(ToString::to_string).unwrap_or_default()
}

pub async fn list<T, R>(
    ctrl: &ResourceController<T>,
    config: &ConsoleConfig,
    view: &View<T, R>,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    T: Resource,
    R: Tabled,
{
    let outcome = ctrl.activate().await;
    util::check(ctrl, outcome, config, None)?;

    let items = ctrl.snapshot().items.clone();
    if items.is_empty() && matches!(global.output, OutputFormat::Table) {
        if !global.quiet {
            eprintln!("No {} found.", T::PLURAL);
        }
        return Ok(());
    }
    let out = output::render_list(&global.output, &items, view.row, id_of::<T>)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn get<T, R>(
    ctrl: &ResourceController<T>,
    config: &ConsoleConfig,
    view: &View<T, R>,
    id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    T: Resource,
{
    let item = util::fetch_one(ctrl, config, id).await?;
    let out = output::render_single(&global.output, &item, view.detail, id_of::<T>)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn create<T: Resource>(
    ctrl: &ResourceController<T>,
    config: &ConsoleConfig,
    fields: Vec<(T::Field, Option<String>)>,
    from_file: Option<&Path>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctrl.open_create_editor();
    if let Some(path) = from_file {
        util::seed_from_file(ctrl, path)?;
    }
    util::apply_fields(ctrl, fields)?;

    let outcome = ctrl.submit().await;
    util::check(ctrl, outcome, config, None)?;
    report_status(ctrl, global);
    Ok(())
}

/// Overlay the given fields on the stored record and PUT the result.
pub async fn update<T: Resource>(
    ctrl: &ResourceController<T>,
    config: &ConsoleConfig,
    id: &str,
    fields: Vec<(T::Field, Option<String>)>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if fields.iter().all(|(_, v)| v.is_none()) {
        return Err(CliError::Validation {
            field: "fields".into(),
            reason: format!("nothing to update; pass at least one {} field flag", T::SINGULAR),
        });
    }

    let existing = util::fetch_one(ctrl, config, id).await?;
    ctrl.open_edit_editor(&existing);
    util::apply_fields(ctrl, fields)?;

    let outcome = ctrl.submit().await;
    util::check(ctrl, outcome, config, Some(id))?;
    report_status(ctrl, global);
    Ok(())
}

pub async fn delete<T: Resource>(
    ctrl: &ResourceController<T>,
    config: &ConsoleConfig,
    id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let prompt = format!("Delete {} {id}?", T::SINGULAR);
    let action = format!("{} delete", T::PLURAL);
    if !util::confirm(&prompt, &action, global.yes)? {
        if !global.quiet {
            eprintln!("Aborted.");
        }
        return Ok(());
    }

    let outcome = ctrl.remove(&EntityId::from(id)).await;
    util::check(ctrl, outcome, config, Some(id))?;
    report_status(ctrl, global);
    Ok(())
}

/// Echo the controller's status line. A mutation can succeed while the
/// follow-up reload fails; that shows as a warning, not a failure.
fn report_status<T: Resource>(ctrl: &ResourceController<T>, global: &GlobalOpts) {
    let Some(status) = ctrl.snapshot().status.clone() else {
        return;
    };
    if status.is_error() {
        output::print_warning(&status.text, &global.color, global.quiet);
    } else {
        output::print_success(&status.text, &global.color, global.quiet);
    }
}

