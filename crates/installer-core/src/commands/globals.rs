//! `init-globals`: install agents, templates, and the tool itself into the global root

use super::{
    backup_root_for, plan_if_present, report_force, report_missing, report_prescan,
    summary_line, RunOutcome,
};
use crate::plan::{execute, resolve, Candidate, FilePlan, ResolveOutcome};
use crate::toolkit::{self, Layout, AGENTS, BINARY_NAME, TEMPLATES};
use crate::ui::{Marker, StatusLine, Ui};
use anyhow::Result;
use std::path::PathBuf;

/// Options for the global install
#[derive(Debug, Clone)]
pub struct GlobalsOptions {
    /// Toolkit directory; auto-detected when absent
    pub source: Option<PathBuf>,

    /// Overwrite existing files without asking (originals are still backed up)
    pub force: bool,

    /// The running executable, installed as `bin/claude-init` on every run
    pub self_binary: PathBuf,

    /// Value of PATH used for the "is bin/ on PATH" hint
    pub path_var: Option<std::ffi::OsString>,
}

/// Run the global install
pub fn init_globals<U: Ui + ?Sized>(
    opts: &GlobalsOptions,
    layout: &Layout,
    ui: &mut U,
) -> Result<RunOutcome> {
    let source_dir = toolkit::locate_toolkit(opts.source.as_deref())?;

    ui.intro("Claude Code — Global Setup")?;
    ui.note(&format!("Source:  {}", source_dir.display()))?;
    ui.note(&format!("Target:  {}", layout.root().display()))?;

    let plans = build_plans(opts, &source_dir, layout, ui)?;
    run_plans(opts, plans, layout, ui)
}

fn build_plans<U: Ui + ?Sized>(
    opts: &GlobalsOptions,
    source_dir: &std::path::Path,
    layout: &Layout,
    ui: &mut U,
) -> Result<Vec<FilePlan>> {
    let mut plans: Vec<FilePlan> = Vec::new();

    match toolkit::find_global_doc(source_dir) {
        Some(src) => plans.push(
            Candidate::new(src, layout.root().join("CLAUDE.md"), layout.label("CLAUDE.md"))
                .into(),
        ),
        None => report_missing(ui, "CLAUDE.md source")?,
    }

    for agent in AGENTS {
        let file = format!("{}.md", agent);
        let rel = format!("agents/{}", file);
        plan_if_present(
            &mut plans,
            ui,
            source_dir.join("agents").join(&file),
            layout.agents_dir().join(&file),
            layout.label(&rel),
            &rel,
        )?;
    }

    for name in TEMPLATES {
        let rel = format!("templates/{}", name);
        plan_if_present(
            &mut plans,
            ui,
            source_dir.join("templates").join(name),
            layout.templates_dir().join(name),
            layout.label(&rel),
            &rel,
        )?;
    }

    plans.push(
        Candidate::always_apply(
            &opts.self_binary,
            layout.bin_dir().join(BINARY_NAME),
            layout.label(&format!("bin/{}", BINARY_NAME)),
        )
        .into(),
    );

    Ok(plans)
}

fn run_plans<U: Ui + ?Sized>(
    opts: &GlobalsOptions,
    mut plans: Vec<FilePlan>,
    layout: &Layout,
    ui: &mut U,
) -> Result<RunOutcome> {
    report_prescan(&plans, ui)?;
    if opts.force {
        report_force(&plans, ui)?;
    }

    if resolve(&mut plans, opts.force, ui)? == ResolveOutcome::Aborted {
        ui.cancelled("Aborted.")?;
        return Ok(RunOutcome::Aborted);
    }

    let backups = backup_root_for(&layout.backups_dir());
    let counts = execute(&plans, &backups, ui)?;
    ui.note(&summary_line(&counts))?;

    let bin_dir = layout.bin_dir();
    if toolkit::dir_in_path(&bin_dir, opts.path_var.as_deref()) {
        ui.status(
            &StatusLine::new(Marker::Done, bin_dir.display().to_string())
                .with_note("already in PATH"),
        )?;
    } else {
        ui.note(&format!(
            "Add to your shell profile (~/.bashrc or ~/.zshrc):\n\n    {}",
            layout.path_export()
        ))?;
    }

    ui.outro("Run `claude-init init-project` inside any project directory.")?;
    Ok(RunOutcome::Completed(counts))
}
