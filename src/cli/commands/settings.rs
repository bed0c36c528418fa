//! `targets`, `categories`, and `config`.

use crate::cli::commands::Command;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, section};
use crate::cli::table::{Table, TableColumn};
use crate::domain::{CategoryGroup, TargetTotal};

pub(crate) fn definitions() -> Vec<Command> {
    vec![
        Command::new(
            "targets",
            "Show or edit budget targets (percent of income per category)",
            "targets [show] | targets set <category>=<percent>... | targets remove <category> | targets reset",
            cmd_targets,
        ),
        Command::new(
            "categories",
            "Show or edit the category lists",
            "categories [show [group]] | categories add <group> <label> | categories remove <group> <label> | categories reset",
            cmd_categories,
        ),
        Command::new(
            "config",
            "Show or change application settings",
            "config [show] | config set <key> <value>",
            cmd_config,
        ),
    ]
}

/// Group keys (`fixed-costs`) map to their display label; anything else is kept as typed.
fn target_category(raw: &str) -> String {
    match raw.parse::<CategoryGroup>() {
        Ok(group) => group.label().to_string(),
        Err(_) => raw.trim().to_string(),
    }
}

fn cmd_targets(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None | Some((&"show", [])) => show_targets(context),
        Some((&"set", pairs)) if !pairs.is_empty() => {
            let mut targets = context.state.targets.clone();
            for pair in pairs {
                let (category, percent) = pair.split_once('=').ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "expected <category>=<percent>, got `{}`",
                        pair
                    ))
                })?;
                let percent: u32 = percent.trim().parse().map_err(|_| {
                    CommandError::InvalidArguments(format!(
                        "percent for {} must be a whole number",
                        category
                    ))
                })?;
                targets.set(target_category(category), percent);
            }
            context.state.settings.save_targets(&targets)?;
            context.state.targets = targets;
            output::success("Budget targets saved.");
            Ok(())
        }
        Some((&"remove", [category])) => {
            let category = target_category(category);
            let mut targets = context.state.targets.clone();
            if !targets.remove(&category) {
                return Err(CommandError::Message(format!(
                    "no target configured for {}",
                    category
                )));
            }
            context.state.settings.save_targets(&targets)?;
            context.state.targets = targets;
            output::success(format!("Target for {} removed.", category));
            Ok(())
        }
        Some((&"reset", [])) => {
            if !context.confirm("Restore the default targets?", false)? {
                return Ok(());
            }
            context.state.targets = context.state.settings.reset_targets()?;
            output::success("Budget targets restored to defaults.");
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: targets [show] | set <category>=<percent>... | remove <category> | reset"
                .into(),
        )),
    }
}

fn show_targets(context: &ShellContext) -> CommandResult {
    let targets = &context.state.targets;
    section("Budget targets");
    let mut table = Table::new(vec![TableColumn::left("Category"), TableColumn::right("Percent")]);
    for entry in targets.entries() {
        table.push_row(vec![entry.category.clone(), format!("{}%", entry.percent)]);
    }
    output::line(table.render());
    match targets.total_status() {
        TargetTotal::Exact => output::info("Total: 100%"),
        TargetTotal::Under(_) | TargetTotal::Over(_) => output::warning(format!(
            "Total: {}%. Targets must add up to 100% before they can be saved.",
            targets.total()
        )),
    }
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None | Some((&"show", [])) => {
            for group in CategoryGroup::ALL {
                show_group(context, group);
            }
            Ok(())
        }
        Some((&"show", [group])) => {
            show_group(context, group.parse()?);
            Ok(())
        }
        Some((&"add", [group, label])) => {
            let group: CategoryGroup = group.parse()?;
            let mut categories = context.state.categories.clone();
            categories.add(group, label)?;
            context.state.settings.save_categories(&categories)?;
            context.state.categories = categories;
            output::success(format!("Added `{}` to {}.", label.trim(), group));
            Ok(())
        }
        Some((&"remove", [group, label])) => {
            let group: CategoryGroup = group.parse()?;
            let mut categories = context.state.categories.clone();
            if !categories.remove(group, label) {
                return Err(CommandError::Message(format!(
                    "`{}` is not listed under {}",
                    label.trim(),
                    group
                )));
            }
            context.state.settings.save_categories(&categories)?;
            context.state.categories = categories;
            output::success(format!("Removed `{}` from {}.", label.trim(), group));
            Ok(())
        }
        Some((&"reset", [])) => {
            if !context.confirm("Restore the default category lists?", false)? {
                return Ok(());
            }
            context.state.categories = context.state.settings.reset_categories()?;
            output::success("Category lists restored to defaults.");
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: categories [show [group]] | add <group> <label> | remove <group> <label> | reset"
                .into(),
        )),
    }
}

fn show_group(context: &ShellContext, group: CategoryGroup) {
    section(format!("{} ({})", group.label(), group.key()));
    let labels = context.state.categories.labels(group);
    if labels.is_empty() {
        output::info("(empty)");
    }
    for label in labels {
        output::line(format!("  {}", label));
    }
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None | Some((&"show", [])) => {
            section("Configuration");
            let mut table = Table::new(vec![TableColumn::left("Key"), TableColumn::left("Value")]);
            for (key, value) in context.state.config.fields() {
                table.push_row(vec![key.to_string(), value]);
            }
            output::line(table.render());
            output::info(format!(
                "Data directory: {}",
                context.state.config_manager.base_dir().display()
            ));
            output::info(format!("Database: {}", context.state.store.path().display()));
            output::info(format!(
                "Targets: {}",
                context.state.settings.targets_path().display()
            ));
            output::info(format!(
                "Categories: {}",
                context.state.settings.categories_path().display()
            ));
            Ok(())
        }
        Some((&"set", [key, value])) => {
            let mut config = context.state.config.clone();
            config.set_field(key, value)?;
            context.state.update_config(config)?;
            output::success(format!("{} updated.", key));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [show] | config set <key> <value>".into(),
        )),
    }
}
