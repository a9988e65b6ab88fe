//! `init-project`: scaffold project files from the globally installed templates

use super::{
    backup_root_for, plan_if_present, report_force, report_missing, report_prescan,
    summary_line, RunOutcome,
};
use crate::error::InstallError;
use crate::plan::{execute, resolve, Candidate, FilePlan, ResolveOutcome};
use crate::toolkit::gitignore::{self, SETTINGS_ENTRY};
use crate::toolkit::render::{self, RenderedTemplate};
use crate::toolkit::{Layout, MCP_TEMPLATE, PROJECT_TEMPLATE};
use crate::ui::{Marker, StatusLine, Ui};
use anyhow::Result;
use std::path::PathBuf;

/// Templates copied verbatim: (template name, destination relative to the project)
const PROJECT_FILES: &[(&str, &str)] = &[
    ("CONVENTIONS.md", "CONVENTIONS.md"),
    ("session-notes.md", "docs/session-notes.md"),
    ("settings.json", ".claude/settings.json"),
    ("settings.local.json", ".claude/settings.local.json"),
];

/// Options for project scaffolding
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    /// Directory to scaffold into
    pub project_dir: PathBuf,

    /// Project name; defaults to the directory name
    pub name: Option<String>,

    /// Vector-store collection; when set `.mcp.json` is rendered for it
    pub collection: Option<String>,

    /// Do not create `.mcp.json`
    pub no_mcp: bool,

    /// Overwrite existing files without asking (originals are still backed up)
    pub force: bool,

    /// Where rendered templates are staged; the system temp directory when `None`
    pub render_dir: Option<PathBuf>,
}

impl ProjectOptions {
    pub fn project_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.project_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string())
        })
    }
}

/// Run project scaffolding
pub fn init_project<U: Ui + ?Sized>(
    opts: &ProjectOptions,
    layout: &Layout,
    ui: &mut U,
) -> Result<RunOutcome> {
    let templates = layout.templates_dir();
    if !templates.is_dir() {
        return Err(InstallError::TemplatesMissing(templates).into());
    }

    let project_name = opts.project_name();
    let dir = &opts.project_dir;

    ui.intro("Claude Code — Project Init")?;
    ui.note(&format!("Project:    {}", project_name))?;
    ui.note(&format!("Directory:  {}", dir.display()))?;

    // Rendered copies are plan sources. They live until this function returns,
    // by any path, and are removed when dropped.
    let mut rendered: Vec<RenderedTemplate> = Vec::new();
    let render_dir = opts.render_dir.as_deref();
    let mut plans: Vec<FilePlan> = Vec::new();

    let project_tpl = templates.join(PROJECT_TEMPLATE);
    if project_tpl.exists() {
        let doc = render::render_project_doc(&project_tpl, &project_name, render_dir)?;
        plans.push(Candidate::new(doc.path(), dir.join("CLAUDE.md"), "CLAUDE.md").into());
        rendered.push(doc);
    } else {
        report_missing(ui, PROJECT_TEMPLATE)?;
    }

    for (template, dest) in PROJECT_FILES {
        plan_if_present(
            &mut plans,
            ui,
            templates.join(template),
            dir.join(dest),
            dest.to_string(),
            &format!("templates/{}", template),
        )?;
    }

    if !opts.no_mcp {
        let mcp_tpl = templates.join(MCP_TEMPLATE);
        if !mcp_tpl.exists() {
            report_missing(ui, MCP_TEMPLATE)?;
        } else if let Some(collection) = &opts.collection {
            let config =
                render::render_mcp_config(&mcp_tpl, collection, &project_name, render_dir)?;
            plans.push(Candidate::new(config.path(), dir.join(".mcp.json"), ".mcp.json").into());
            rendered.push(config);
        } else {
            plans.push(Candidate::new(mcp_tpl, dir.join(".mcp.json"), ".mcp.json").into());
        }
    }

    report_prescan(&plans, ui)?;

    let gitignore_path = dir.join(".gitignore");
    let entry_present = gitignore::has_entry(&gitignore_path, SETTINGS_ENTRY)?;
    ui.status(&if entry_present {
        StatusLine::new(Marker::Unchanged, ".gitignore").with_note("entry present")
    } else {
        StatusLine::new(Marker::New, ".gitignore").with_note("entry will be added")
    })?;

    if opts.force {
        report_force(&plans, ui)?;
    }

    if resolve(&mut plans, opts.force, ui)? == ResolveOutcome::Aborted {
        ui.cancelled("Aborted.")?;
        return Ok(RunOutcome::Aborted);
    }

    let backups = backup_root_for(&dir.join(".claude").join("backups"));
    let mut counts = execute(&plans, &backups, ui)?;

    if gitignore::ensure_entry(&gitignore_path, SETTINGS_ENTRY)? {
        ui.status(&StatusLine::new(Marker::Done, ".gitignore").with_note("entry added"))?;
        counts.installed += 1;
    }

    ui.note(&summary_line(&counts))?;
    print_next_steps(opts, ui)?;
    ui.outro("Happy coding!")?;
    Ok(RunOutcome::Completed(counts))
}

fn print_next_steps<U: Ui + ?Sized>(opts: &ProjectOptions, ui: &mut U) -> Result<()> {
    let mut steps = vec![
        "Edit CLAUDE.md: fill in project description, module map, rules".to_string(),
        "Edit CONVENTIONS.md: adjust commit scopes to match your modules".to_string(),
    ];
    if !opts.no_mcp && opts.collection.is_none() {
        steps.push(
            "Edit .mcp.json: set your collection name (or delete it if not using Qdrant)"
                .to_string(),
        );
    }

    let body: Vec<String> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("  {}. {}", i + 1, step))
        .collect();
    ui.note(&format!("Next steps\n{}", body.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Counts;
    use crate::toolkit::TEMPLATES;
    use crate::ui::scripted::ScriptedUi;
    use crate::ui::ConflictAction;
    use std::fs;

    const MCP_TPL: &str =
        r#"{"mcpServers":{"project-search":{"env":{"COLLECTION_NAME":"your-collection-name"}}}}"#;

    struct Fixture {
        _dir: tempfile::TempDir,
        layout: Layout,
        project: PathBuf,
        staging: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let layout = Layout::new(dir.path().join(".claude"));
            let templates = layout.templates_dir();
            fs::create_dir_all(&templates).unwrap();
            for name in TEMPLATES {
                fs::write(templates.join(name), *name).unwrap();
            }
            fs::write(
                templates.join(PROJECT_TEMPLATE),
                "# <project-name>\n\nWorking on <project-name>.\n",
            )
            .unwrap();
            fs::write(templates.join(MCP_TEMPLATE), MCP_TPL).unwrap();

            let project = dir.path().join("acme");
            fs::create_dir_all(&project).unwrap();
            let staging = dir.path().join("staging");
            fs::create_dir_all(&staging).unwrap();
            Self {
                _dir: dir,
                layout,
                project,
                staging,
            }
        }

        fn opts(&self) -> ProjectOptions {
            ProjectOptions {
                project_dir: self.project.clone(),
                render_dir: Some(self.staging.clone()),
                ..ProjectOptions::default()
            }
        }

        fn read(&self, rel: &str) -> String {
            fs::read_to_string(self.project.join(rel)).unwrap()
        }

        fn staged_files(&self) -> usize {
            fs::read_dir(&self.staging).unwrap().count()
        }
    }

    #[test]
    fn test_scaffold_fresh_project() {
        let fx = Fixture::new();
        let mut ui = ScriptedUi::default();

        let outcome = init_project(&fx.opts(), &fx.layout, &mut ui).unwrap();

        // 6 files plus the .gitignore entry
        assert_eq!(outcome, RunOutcome::Completed(Counts::new(7, 0, 0)));
        assert_eq!(fx.read("CLAUDE.md"), "# acme\n\nWorking on acme.\n");
        assert_eq!(fx.read("CONVENTIONS.md"), "CONVENTIONS.md");
        assert_eq!(fx.read("docs/session-notes.md"), "session-notes.md");
        assert_eq!(fx.read(".claude/settings.json"), "settings.json");
        assert_eq!(fx.read(".claude/settings.local.json"), "settings.local.json");
        assert_eq!(fx.read(".mcp.json"), MCP_TPL);
        assert!(fx.read(".gitignore").contains(SETTINGS_ENTRY));
        assert!(ui.notes.iter().any(|n| n.contains("3. Edit .mcp.json")));
    }

    #[test]
    fn test_collection_renders_mcp_config() {
        let fx = Fixture::new();
        let mut opts = fx.opts();
        opts.name = Some("widget".to_string());
        opts.collection = Some("widget-docs".to_string());
        let mut ui = ScriptedUi::default();

        init_project(&opts, &fx.layout, &mut ui).unwrap();

        assert_eq!(
            fx.read(".mcp.json"),
            r#"{"mcpServers":{"widget-search":{"env":{"COLLECTION_NAME":"widget-docs"}}}}"#
        );
        assert_eq!(fx.read("CLAUDE.md"), "# widget\n\nWorking on widget.\n");
        assert!(!ui.notes.iter().any(|n| n.contains(".mcp.json")));
    }

    #[test]
    fn test_no_mcp_skips_mcp_config() {
        let fx = Fixture::new();
        let mut opts = fx.opts();
        opts.no_mcp = true;

        let outcome = init_project(&opts, &fx.layout, &mut ScriptedUi::default()).unwrap();

        assert_eq!(outcome, RunOutcome::Completed(Counts::new(6, 0, 0)));
        assert!(!fx.project.join(".mcp.json").exists());
    }

    #[test]
    fn test_rerun_with_skip_all_changes_nothing() {
        let fx = Fixture::new();
        init_project(&fx.opts(), &fx.layout, &mut ScriptedUi::default()).unwrap();
        fs::write(fx.project.join("CLAUDE.md"), "my notes").unwrap();
        let gitignore_before = fx.read(".gitignore");
        let mut ui = ScriptedUi::answering(ConflictAction::SkipAll);

        let outcome = init_project(&fx.opts(), &fx.layout, &mut ui).unwrap();

        assert_eq!(outcome, RunOutcome::Completed(Counts::new(0, 0, 6)));
        assert_eq!(ui.asked[0].len(), 6);
        assert_eq!(fx.read("CLAUDE.md"), "my notes");
        assert_eq!(fx.read(".gitignore"), gitignore_before);
        assert!(!fx.project.join(".claude").join("backups").exists());
    }

    #[test]
    fn test_overwrite_backs_up_into_project() {
        let fx = Fixture::new();
        fs::write(fx.project.join("CLAUDE.md"), "hand written").unwrap();
        fs::write(fx.project.join(".gitignore"), "target/\n").unwrap();
        let mut ui = ScriptedUi::answering(ConflictAction::OverwriteAll);

        let outcome = init_project(&fx.opts(), &fx.layout, &mut ui).unwrap();

        assert_eq!(outcome, RunOutcome::Completed(Counts::new(6, 1, 0)));
        assert_eq!(fx.read("CLAUDE.md"), "# acme\n\nWorking on acme.\n");
        let backups = fx.project.join(".claude").join("backups");
        let run = fs::read_dir(&backups).unwrap().next().unwrap().unwrap().path();
        assert_eq!(fs::read_to_string(run.join("CLAUDE.md")).unwrap(), "hand written");
        assert!(fx.read(".gitignore").starts_with("target/\n\n"));
    }

    #[test]
    fn test_quit_leaves_project_untouched() {
        let fx = Fixture::new();
        fs::write(fx.project.join("CONVENTIONS.md"), "ours").unwrap();
        let mut ui = ScriptedUi::answering(ConflictAction::Quit);

        let outcome = init_project(&fx.opts(), &fx.layout, &mut ui).unwrap();

        assert_eq!(outcome, RunOutcome::Aborted);
        let entries: Vec<_> = fs::read_dir(&fx.project)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["CONVENTIONS.md"]);
    }

    #[test]
    fn test_rendered_templates_removed_on_success() {
        let fx = Fixture::new();
        let mut opts = fx.opts();
        opts.collection = Some("acme-docs".to_string());

        init_project(&opts, &fx.layout, &mut ScriptedUi::default()).unwrap();

        assert_eq!(fx.staged_files(), 0);
    }

    #[test]
    fn test_failed_run_removes_rendered_templates() {
        let fx = Fixture::new();
        // docs/ cannot be created, so the run fails after CLAUDE.md is written
        fs::write(fx.project.join("docs"), "not a directory").unwrap();
        let mut opts = fx.opts();
        opts.collection = Some("acme-docs".to_string());

        let result = init_project(&opts, &fx.layout, &mut ScriptedUi::default());

        assert!(result.is_err());
        assert_eq!(fx.read("CLAUDE.md"), "# acme\n\nWorking on acme.\n");
        assert!(!fx.project.join(".mcp.json").exists());
        assert_eq!(fx.staged_files(), 0);
    }

    #[test]
    fn test_interrupted_run_removes_rendered_templates() {
        let fx = Fixture::new();
        let mut opts = fx.opts();
        opts.collection = Some("acme-docs".to_string());
        let mut ui = ScriptedUi::default().interrupted_after(0);

        let err = init_project(&opts, &fx.layout, &mut ui).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::Interrupted)
        ));
        assert!(!fx.project.join("CLAUDE.md").exists());
        assert!(!fx.project.join(".gitignore").exists());
        assert_eq!(fx.staged_files(), 0);
    }

    #[test]
    fn test_missing_templates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path().join(".claude"));
        let opts = ProjectOptions {
            project_dir: dir.path().to_path_buf(),
            ..ProjectOptions::default()
        };

        let err = init_project(&opts, &layout, &mut ScriptedUi::default()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::TemplatesMissing(_))
        ));
    }

    #[test]
    fn test_missing_template_is_skipped_with_notice() {
        let fx = Fixture::new();
        fs::remove_file(fx.layout.templates_dir().join("CONVENTIONS.md")).unwrap();
        let mut ui = ScriptedUi::default();

        let outcome = init_project(&fx.opts(), &fx.layout, &mut ui).unwrap();

        assert_eq!(outcome, RunOutcome::Completed(Counts::new(6, 0, 0)));
        assert!(ui
            .lines
            .iter()
            .any(|l| l.marker == Marker::Missing && l.label == "templates/CONVENTIONS.md"));
        assert!(!fx.project.join("CONVENTIONS.md").exists());
    }

    #[test]
    fn test_project_name_defaults_to_directory() {
        let opts = ProjectOptions {
            project_dir: PathBuf::from("/work/my-service"),
            ..ProjectOptions::default()
        };
        assert_eq!(opts.project_name(), "my-service");
    }
}
