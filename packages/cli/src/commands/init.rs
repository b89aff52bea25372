use crate::config::{Config, DEFAULT_CONFIG_NAME};
use crate::workspace::write_page;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagebuilder_common::{ComponentNode, ComponentTree, Viewport};
use pagebuilder_editor::{EditorOptions, Page};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Id of the starter page
    #[arg(long, default_value = "home")]
    pub id: String,

    /// Page file to create
    #[arg(short, long, default_value = "page.json")]
    pub page: String,

    /// Column count for grids that do not set their own
    #[arg(long, default_value = "12")]
    pub grid_cols: u32,

    /// Viewport the canvas starts on
    #[arg(long, default_value = "desktop")]
    pub viewport: Viewport,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing page builder project...".bright_blue().bold());

    let config = Config {
        page: args.page.clone(),
        editor: EditorOptions {
            grid_cols: args.grid_cols,
            default_viewport: args.viewport,
            ..EditorOptions::default()
        },
        ..Config::default()
    };

    // Create the starter page if it doesn't exist
    let page_file = PathBuf::from(cwd).join(&args.page);
    if !page_file.exists() {
        let page = Page {
            slug: args.id.clone(),
            ..Page::new(&args.id)
        }
        .with_components(starter_components());
        write_page(&page_file, &page)?;
        println!("  {} Created {}", "✓".green(), args.page);
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagebuilder add Text --parent hero --prop text=Hello");
    println!("  2. Run: pagebuilder render");
    println!("  3. Run: pagebuilder save");

    Ok(())
}

fn starter_components() -> ComponentTree {
    ComponentTree::from_nodes(vec![ComponentNode::container("hero", "Section")
        .with_prop("position", "relative")
        .with_prop("padding", "48px 24px")])
}
