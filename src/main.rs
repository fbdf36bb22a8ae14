mod avatar;
mod cli;
mod config;
mod rename;
mod scene;
mod tui;

use std::io::{BufRead, Write};
use std::path::Path;

use clap::Parser;
use cli::{Cli, Command, RenameArgs};

use crate::avatar::Subject;
use crate::rename::{graph, menu, RenameError};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load(cli.config.as_deref())?;
    config::init(cfg);
    let avatar = cli.avatar.as_deref().or(config::default_avatar());

    init_logger();
    match cli.command {
        None => {
            let Some(scene) = cli.scene else {
                anyhow::bail!("No scene given. Run `rekey <scene.toml>` or see `rekey --help`.");
            };
            tui::run(&scene, avatar)
        }
        Some(Command::List { scene }) => list(&scene, avatar),
        Some(Command::Refs { scene, parameter }) => refs(&scene, avatar, &parameter),
        Some(Command::Rename(args)) => rename_command(&args, avatar),
    }
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn list(path: &Path, avatar: Option<&str>) -> anyhow::Result<()> {
    let mut scene = scene::load(path)?;
    let subject = Subject::resolve(scene.select(avatar)?)?;
    print!("{}", directory_report(&subject));
    Ok(())
}

fn directory_report(subject: &Subject<'_>) -> String {
    let mut out = format!(
        "=== {} ===\n  root menu {} ({} page{})\n",
        subject.name,
        subject.root_menu,
        subject.pages.len(),
        if subject.pages.len() == 1 { "" } else { "s" }
    );
    if subject.parameters.is_empty() {
        out.push_str("  (no parameters)\n");
    }
    for p in &subject.parameters.parameters {
        let pages = menu::find_references(subject.menus, &subject.pages, &p.name);
        out.push_str(&format!(
            "  {} [{}]  (default {}, {} menu{})\n",
            p.name,
            p.value_type.label(),
            p.default,
            pages.len(),
            if pages.len() == 1 { "" } else { "s" }
        ));
    }
    out
}

fn refs(path: &Path, avatar: Option<&str>, parameter: &str) -> anyhow::Result<()> {
    let mut scene = scene::load(path)?;
    let subject = Subject::resolve(scene.select(avatar)?)?;
    if !subject.parameters.contains(parameter) {
        return Err(RenameError::ParameterNotFound(parameter.to_string()).into());
    }
    print!("{}", menu_report(&subject, parameter));
    Ok(())
}

/// The "show menu names" report for `parameter`.
fn menu_report(subject: &Subject<'_>, parameter: &str) -> String {
    let pages = menu::find_references(subject.menus, &subject.pages, parameter);
    if pages.is_empty() {
        return format!(
            "The parameter \"{parameter}\" was not found in any menus on {}.\n",
            subject.name
        );
    }
    let controls = menu::count_controls_referencing(subject.menus, &subject.pages, parameter);
    let mut out = format!(
        "Parameter \"{parameter}\" is found in {} menu{} ({} control{}):\n",
        pages.len(),
        if pages.len() > 1 { "s" } else { "" },
        controls,
        if controls > 1 { "s" } else { "" },
    );
    for page in &pages {
        out.push_str(&format!("  - {page}\n"));
    }
    out
}

fn rename_command(args: &RenameArgs, avatar: Option<&str>) -> anyhow::Result<()> {
    let mut scene = scene::load(&args.scene)?;
    {
        let mut subject = Subject::resolve(scene.select(avatar)?)?;
        let from = args.parameter.as_str();
        let to = args.new_name.as_str();

        // Reject before prompting; rename() repeats these checks.
        if to.trim().is_empty() {
            return Err(RenameError::EmptyName.into());
        }
        if !subject.parameters.contains(from) {
            return Err(RenameError::ParameterNotFound(from.to_string()).into());
        }
        if subject.parameters.contains(to) {
            return Err(RenameError::NameConflict(to.to_string()).into());
        }

        print!("{}", menu_report(&subject, from));
        if !args.yes && !confirm(&format!("Rename parameter \"{from}\" to \"{to}\"?"))? {
            println!("Aborted.");
            return Ok(());
        }

        let working = menu::find_references(subject.menus, &subject.pages, from);
        let affected = graph::collect_all(subject.graphs, subject.blend_trees, &working);
        log::info!("{} objects recorded for the rename", affected.len());

        let outcome = rename::rename(&mut subject, &working, from, to)?;
        debug_assert!(affected.is_superset(&outcome.written()));
        for edit in &outcome.edits {
            println!("  {}: {}", subject.describe(&edit.object), edit.field);
        }
        println!(
            "Renamed \"{from}\" to \"{to}\": {} field{} changed.",
            outcome.edits.len(),
            if outcome.edits.len() == 1 { "" } else { "s" }
        );
    }

    if args.dry_run {
        println!("Dry run: scene not saved.");
        return Ok(());
    }
    let out = args.output.as_deref().unwrap_or(&args.scene);
    scene::save(&scene, out, config::backup() && out == args.scene.as_path())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::fixtures::sample_avatar;

    #[test]
    fn report_lists_each_page_once() {
        let mut avatar = sample_avatar();
        let subject = Subject::resolve(&mut avatar).unwrap();
        assert_eq!(
            menu_report(&subject, "Hat"),
            "Parameter \"Hat\" is found in 1 menu (2 controls):\n  - Hats\n"
        );
    }

    #[test]
    fn directory_report_names_root_menu() {
        let mut avatar = sample_avatar();
        let subject = Subject::resolve(&mut avatar).unwrap();
        let report = directory_report(&subject);
        assert!(report.starts_with("=== Kitsune ===\n  root menu Main (3 pages)\n"));
        assert!(report.contains("  Hat [int]"));
    }

    #[test]
    fn report_for_unreferenced_parameter() {
        let mut avatar = sample_avatar();
        let subject = Subject::resolve(&mut avatar).unwrap();
        assert_eq!(
            menu_report(&subject, "Speed"),
            "The parameter \"Speed\" was not found in any menus on Kitsune.\n"
        );
    }
}
