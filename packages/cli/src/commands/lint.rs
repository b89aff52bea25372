use crate::config::{Config, DEFAULT_CONFIG_NAME};
use crate::workspace::{open_session, page_path};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagebuilder_editor::{resolve_issue_label, MapTranslator, Translator};
use pagebuilder_linter::{lint_tree, DiagnosticLevel, LintOptions, RuleRegistry};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Page file or directory of page files (defaults to the configured page)
    pub input: Option<PathBuf>,

    /// Show all diagnostics including info level, and clean files
    #[arg(short = 'a', long = "all")]
    pub show_all: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Skip a rule by name (repeatable)
    #[arg(long = "disable", value_name = "RULE")]
    pub disabled: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    diagnostics: usize,
    errors: usize,
    warnings: usize,
}

pub fn lint(args: LintArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = match &args.input {
        Some(input) => PathBuf::from(cwd).join(input),
        None => page_path(cwd, &config, None),
    };

    println!("🔍 {} Page Linter", "Starting".green().bold());
    println!("   Input: {}", input.display());
    println!();

    let mut totals = Totals::default();
    let mut files_checked = 0;

    let files = if input.is_file() {
        vec![input.clone()]
    } else if input.is_dir() {
        let files = find_page_files(&input, &config, cwd);
        println!("   Found {} page files", files.len());
        println!();
        files
    } else {
        return Err(anyhow::anyhow!("Input path does not exist: {}", input.display()));
    };

    for file in files {
        let file_totals = lint_file(&file, cwd, &args)?;
        totals.diagnostics += file_totals.diagnostics;
        totals.errors += file_totals.errors;
        totals.warnings += file_totals.warnings;
        files_checked += 1;
    }

    println!();
    println!(
        "✨ {} Linting complete!",
        if totals.errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Files checked: {}", files_checked);
    println!("   Total diagnostics: {}", totals.diagnostics);

    if totals.errors > 0 {
        println!("   {} {}", "Errors:".red(), totals.errors);
    }
    if totals.warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), totals.warnings);
    }

    if totals.errors == 0 && totals.warnings == 0 {
        println!("   {} No issues found!", "✓".green());
    }

    // Exit with error code if there are errors
    if totals.errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn lint_file(file_path: &Path, cwd: &str, args: &LintArgs) -> Result<Totals> {
    // Lints the tree the editor would show: stored local history wins over the file
    let session = match open_session(cwd, Some(file_path)) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{} Failed to open {}: {:#}", "✗".red(), file_path.display(), err);
            return Ok(Totals {
                errors: 1,
                ..Totals::default()
            });
        }
    };

    let mut registry = RuleRegistry::new();
    for name in &args.disabled {
        if !registry.disable(name) {
            eprintln!("{} Unknown rule '{}'", "⚠️".yellow(), name);
        }
    }

    let diagnostics = lint_tree(
        session.present(),
        LintOptions {
            registry: Some(registry),
            errors_only: false,
        },
    );

    if diagnostics.is_empty() {
        if args.show_all {
            println!("{} {}", "✓".green(), file_path.display());
        }
        return Ok(Totals::default());
    }

    let totals = Totals {
        diagnostics: diagnostics.len(),
        errors: diagnostics
            .iter()
            .filter(|d| matches!(d.level, DiagnosticLevel::Error))
            .count(),
        warnings: diagnostics
            .iter()
            .filter(|d| matches!(d.level, DiagnosticLevel::Warning))
            .count(),
    };

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&diagnostics)?;
        println!("{}", json);
        return Ok(totals);
    }

    let translator = MapTranslator::english();
    println!("{}", file_path.display());

    for diagnostic in &diagnostics {
        let level_str = match diagnostic.level {
            DiagnosticLevel::Error => "error".red().bold(),
            DiagnosticLevel::Warning => "warning".yellow().bold(),
            DiagnosticLevel::Info => "info".blue().bold(),
        };

        if !args.show_all && matches!(diagnostic.level, DiagnosticLevel::Info) {
            continue;
        }

        let label = resolve_issue_label(&diagnostic.to_issue());
        println!(
            "  {} [{}] {}: {}",
            level_str,
            diagnostic.rule,
            diagnostic.location(),
            diagnostic.message
        );
        println!("    {} {}", "↳".dimmed(), translator.translate(&label.translation_key()).dimmed());

        if let Some(suggestion) = &diagnostic.suggestion {
            println!("    {} {}", "💡".dimmed(), suggestion.dimmed());
        }
    }

    println!();
    Ok(totals)
}

/// Page JSON files under `dir`, skipping the config file, the history store
/// and published output
fn find_page_files(dir: &Path, config: &Config, cwd: &str) -> Vec<PathBuf> {
    let skipped = [config.get_storage_dir(cwd), config.get_publish_dir(cwd)];

    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !skipped.iter().any(|skip| entry.path() == skip.as_path()))
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file()
                && path.extension().is_some_and(|e| e == "json")
                && path.file_name().is_some_and(|name| name != DEFAULT_CONFIG_NAME)
        })
        .collect()
}
